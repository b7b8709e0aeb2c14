mod notification_hub;

pub use notification_hub::NotificationHub;
