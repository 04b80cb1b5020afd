pub mod checkin;
pub mod notifications;
pub mod registration;
