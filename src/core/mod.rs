pub mod classifier;
pub mod dedup;
pub mod digest;
pub mod engine;
pub mod persistence;
pub mod pipeline;
pub mod window;

pub use crate::domain::model::{Extracted, MatchBatch, Opportunity, RunOutcome, SeenSet};
pub use crate::domain::ports::{ConfigProvider, Notifier, Pipeline, Storage};
pub use crate::utils::error::Result;
