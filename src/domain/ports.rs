use crate::adapters::http::DEFAULT_REQUEST_TIMEOUT;
use crate::domain::model::{Digest, Extracted, MatchBatch, RunReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Replace `path` with `data` in one step; readers never see a partial file.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Location of `path` as reported to the operator.
    fn display_path(&self, path: &str) -> std::path::PathBuf;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_key(&self) -> &str;
    fn result_limit(&self) -> usize;
    fn backfill_from(&self) -> NaiveDate;
    fn request_timeout(&self) -> Duration {
        DEFAULT_REQUEST_TIMEOUT
    }
    fn dry_run(&self) -> bool {
        false
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn recipient(&self) -> &str;
    async fn deliver(&self, digest: &Digest) -> Result<()>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Extracted>;
    async fn transform(&self, extracted: Extracted) -> Result<MatchBatch>;
    async fn load(&self, batch: MatchBatch) -> Result<RunReport>;
}
