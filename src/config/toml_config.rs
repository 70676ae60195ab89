use super::{DEFAULT_BACKFILL_FROM, MAX_REQUEST_TIMEOUT_SECS, MAX_RESULT_LIMIT, SAM_SEARCH_ENDPOINT};
use crate::adapters::http::DEFAULT_REQUEST_TIMEOUT;
use crate::adapters::mail::{MailSettings, SMTPS_PORT};
use crate::core::ConfigProvider;
use crate::utils::error::{AlertError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub sam: SamConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Clone, Deserialize)]
pub struct SamConfig {
    pub api_key: String,
    pub limit: Option<usize>,
    pub backfill_from: Option<NaiveDate>,
    /// Seconds.
    pub request_timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Clone, Deserialize)]
pub struct MailConfig {
    pub from: String,
    pub to: String,
    pub password: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub json: bool,
}

impl std::fmt::Debug for SamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamConfig")
            .field("limit", &self.limit)
            .field("backfill_from", &self.backfill_from)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish_non_exhaustive()
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AlertError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AlertError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SAM_API_KEY})。未設定的變數原樣保留。
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AlertError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    pub fn smtp_host(&self) -> &str {
        self.mail.smtp_host.as_deref().unwrap_or("smtp.gmail.com")
    }

    pub fn smtp_port(&self) -> u16 {
        self.mail.smtp_port.unwrap_or(SMTPS_PORT)
    }

    pub fn mail_settings(&self) -> MailSettings {
        MailSettings {
            from: self.mail.from.clone(),
            to: self.mail.to.clone(),
            password: self.mail.password.clone().unwrap_or_default(),
            smtp_host: self.smtp_host().to_string(),
            smtp_port: self.smtp_port(),
        }
    }

    fn check_substituted(field: &str, value: &str) -> Result<()> {
        if value.contains("${") {
            return Err(AlertError::MissingConfigError {
                field: format!("{} (environment variable in '{}' is not set)", field, value),
            });
        }
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        SAM_SEARCH_ENDPOINT
    }

    fn api_key(&self) -> &str {
        &self.sam.api_key
    }

    fn result_limit(&self) -> usize {
        self.sam.limit.unwrap_or(MAX_RESULT_LIMIT)
    }

    fn backfill_from(&self) -> NaiveDate {
        self.sam.backfill_from.unwrap_or_else(|| {
            DEFAULT_BACKFILL_FROM
                .parse()
                .unwrap_or(NaiveDate::MIN)
        })
    }

    fn request_timeout(&self) -> Duration {
        self.sam
            .request_timeout
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        // api_key 不回顯在錯誤訊息裡
        if self.sam.api_key.contains("${") {
            return Err(AlertError::MissingConfigError {
                field: "sam.api_key".to_string(),
            });
        }
        validation::validate_non_empty_string("sam.api_key", &self.sam.api_key)?;
        validation::validate_range("sam.limit", self.result_limit(), 1, MAX_RESULT_LIMIT)?;
        if let Some(timeout) = self.sam.request_timeout {
            validation::validate_range("sam.request_timeout", timeout, 1, MAX_REQUEST_TIMEOUT_SECS)?;
        }
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;

        Self::check_substituted("mail.from", &self.mail.from)?;
        Self::check_substituted("mail.to", &self.mail.to)?;
        validation::validate_email("mail.from", &self.mail.from)?;
        validation::validate_email("mail.to", &self.mail.to)?;
        validation::validate_non_empty_string("mail.smtp_host", self.smtp_host())?;
        validation::validate_range("mail.smtp_port", self.smtp_port(), 1, u16::MAX)?;

        if !self.dry_run {
            let password = validation::validate_required_field("mail.password", &self.mail.password)?;
            if password.contains("${") {
                return Err(AlertError::MissingConfigError {
                    field: "mail.password".to_string(),
                });
            }
            validation::validate_non_empty_string("mail.password", password)?;
        }

        Ok(())
    }
}
