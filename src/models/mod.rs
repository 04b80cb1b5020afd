pub mod checkin;
pub mod event;
pub mod notification;
pub mod registration;
pub mod user;

pub use checkin::CheckIn;
pub use event::{Event, EventStatus};
pub use notification::{Notification, NotificationKind};
pub use registration::{Registration, RegistrationStatus};
pub use user::{Profile, User};
