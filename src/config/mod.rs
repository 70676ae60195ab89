pub mod toml_config;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub const SAM_SEARCH_ENDPOINT: &str = "https://api.sam.gov/opportunities/v2/search";
pub const DEFAULT_BACKFILL_FROM: &str = "2025-04-01";
pub const MAX_RESULT_LIMIT: usize = 1000;
/// Upper bound for the search request timeout, in seconds.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;
