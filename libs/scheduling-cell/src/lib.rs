pub mod models;
pub mod services;
pub mod store;
pub mod testing;

pub use models::{
    Appointment, AppointmentStatus, Doctor, Interval, NearestAvailability, NewAppointment,
    SchedulingError, TimeSlot,
};
pub use services::conflict::ConflictDetectionService;
pub use services::search::NearestAvailabilityService;
pub use services::slots::SlotService;
pub use services::store::SupabaseScheduleStore;
pub use store::ScheduleStore;
