pub mod conflict;
pub mod search;
pub mod slots;
pub mod store;
