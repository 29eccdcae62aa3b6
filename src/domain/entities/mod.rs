pub mod comparison;
pub mod frame;
pub mod monitoring;
pub mod notification;
pub mod reference;

pub use comparison::ComparisonResult;
pub use frame::ImageFrame;
pub use monitoring::MonitoringConfig;
pub use notification::NotificationTarget;
pub use reference::ReferenceSnapshot;
