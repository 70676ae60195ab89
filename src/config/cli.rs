use super::{DEFAULT_BACKFILL_FROM, MAX_REQUEST_TIMEOUT_SECS, MAX_RESULT_LIMIT, SAM_SEARCH_ENDPOINT};
use crate::adapters::mail::MailSettings;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use clap::Parser;
use std::time::Duration;

#[derive(Clone, Parser)]
#[command(name = "sam-alerts")]
#[command(about = "Email new SAM.gov vehicle procurement notices")]
pub struct CliConfig {
    #[arg(long, env = "SAM_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "TO_EMAIL")]
    pub to_email: String,

    #[arg(long, env = "FROM_EMAIL")]
    pub from_email: String,

    #[arg(long, env = "GMAIL_APP_PASSWORD", hide_env_values = true)]
    pub app_password: Option<String>,

    #[arg(long, default_value = ".", help = "Directory for the seen record and exports")]
    pub data_dir: String,

    #[arg(long, default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    #[arg(long, default_value = "465")]
    pub smtp_port: u16,

    #[arg(long, default_value = "1000", help = "Result cap for the search request")]
    pub limit: usize,

    #[arg(long, default_value = DEFAULT_BACKFILL_FROM, help = "Start date of the first-run window")]
    pub backfill_from: NaiveDate,

    #[arg(long, default_value = "30", help = "Search request timeout in seconds")]
    pub request_timeout: u64,

    #[arg(long, help = "Print the digest instead of emailing it; keep the seen record")]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Only meaningful after `validate()` has passed.
    pub fn mail_settings(&self) -> MailSettings {
        MailSettings {
            from: self.from_email.clone(),
            to: self.to_email.clone(),
            password: self.app_password.clone().unwrap_or_default(),
            smtp_host: self.smtp_host.clone(),
            smtp_port: self.smtp_port,
        }
    }
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("to_email", &self.to_email)
            .field("from_email", &self.from_email)
            .field("data_dir", &self.data_dir)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("limit", &self.limit)
            .field("backfill_from", &self.backfill_from)
            .field("request_timeout", &self.request_timeout)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        SAM_SEARCH_ENDPOINT
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn result_limit(&self) -> usize {
        self.limit
    }

    fn backfill_from(&self) -> NaiveDate {
        self.backfill_from
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("api_key", &self.api_key)?;
        validation::validate_email("to_email", &self.to_email)?;
        validation::validate_email("from_email", &self.from_email)?;
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_non_empty_string("smtp_host", &self.smtp_host)?;
        validation::validate_range("smtp_port", self.smtp_port, 1, u16::MAX)?;
        validation::validate_range("limit", self.limit, 1, MAX_RESULT_LIMIT)?;
        validation::validate_range("request_timeout", self.request_timeout, 1, MAX_REQUEST_TIMEOUT_SECS)?;

        if !self.dry_run {
            let password = validation::validate_required_field("app_password", &self.app_password)?;
            validation::validate_non_empty_string("app_password", password)?;
        }

        Ok(())
    }
}
