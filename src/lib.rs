pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::SamClient;
pub use adapters::mail::{ConsoleNotifier, MailSettings, SmtpNotifier};
pub use adapters::storage::LocalStorage;
pub use crate::core::{engine::AlertEngine, pipeline::AlertPipeline};
pub use domain::model::{RunOutcome, RunReport};
pub use utils::error::{AlertError, Result};
