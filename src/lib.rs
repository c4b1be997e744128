pub mod core;

pub use crate::core::config::{parse_project_list, AppConfig, ConfigError, ProjectConfig};
pub use crate::core::notify::{LarkNotifier, NotificationPayload, Notifier};
pub use crate::core::scanner::{ProjectOutcome, ReleaseScanner, ScanSummary};
pub use crate::core::store::{FileSeenStore, MemorySeenStore, SeenStore};
