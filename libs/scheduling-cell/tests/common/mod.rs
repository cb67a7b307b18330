#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use scheduling_cell::models::{Interval, NewAppointment};
use scheduling_cell::store::ScheduleStore;
use scheduling_cell::testing::InMemoryScheduleStore;

pub fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn hours(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Interval {
    Interval::new(t(start_h, start_m), t(end_h, end_m)).unwrap()
}

pub async fn book(
    store: &Arc<InMemoryScheduleStore>,
    doctor_id: Uuid,
    on: NaiveDate,
    start: NaiveTime,
    duration_minutes: i32,
) -> Uuid {
    store
        .insert_appointment(&NewAppointment {
            patient_id: Uuid::new_v4(),
            doctor_id,
            date: on,
            start_time: start,
            duration_minutes,
        })
        .await
        .unwrap()
        .id
}

/// Book every slot of a working-hours window at the given granularity.
pub async fn fully_book(
    store: &Arc<InMemoryScheduleStore>,
    doctor_id: Uuid,
    on: NaiveDate,
    window: Interval,
    granularity_minutes: i32,
) {
    let mut cursor = window.start;
    loop {
        let end = cursor + chrono::Duration::minutes(granularity_minutes as i64);
        if end > window.end {
            break;
        }
        book(store, doctor_id, on, cursor, granularity_minutes).await;
        cursor = end;
    }
}
