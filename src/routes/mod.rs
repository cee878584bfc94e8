pub mod admin;
pub mod booking;
pub mod health;
pub mod images;
pub mod payment;
pub mod property;
