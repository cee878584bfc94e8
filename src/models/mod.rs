pub mod booking;
pub mod property;
