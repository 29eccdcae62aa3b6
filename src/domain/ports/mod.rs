pub mod capture;
pub mod notifier;
pub mod recognizer;
pub mod store;

pub use capture::{CaptureError, PageCapture, PageHandle};
pub use notifier::{ChangeNotifier, NotificationError};
pub use recognizer::{RecognitionError, TextRecognizer};
pub use store::{MonitoringStore, ReferenceStore, SettingsStore, StoreError};
