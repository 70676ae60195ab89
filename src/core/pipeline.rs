use crate::adapters::http::SamClient;
use crate::core::{
    classifier, dedup, digest, persistence, ConfigProvider, Notifier, Pipeline, Storage,
};
use crate::domain::model::{Extracted, MatchBatch, RunReport, SearchWindow};
use crate::utils::error::Result;
use chrono::NaiveDate;

pub struct AlertPipeline<S: Storage, C: ConfigProvider, N: Notifier> {
    storage: S,
    config: C,
    notifier: N,
    client: SamClient,
    run_date: NaiveDate,
}

impl<S: Storage, C: ConfigProvider, N: Notifier> AlertPipeline<S, C, N> {
    pub fn new(storage: S, config: C, notifier: N, run_date: NaiveDate) -> Self {
        let client = SamClient::new(config.api_endpoint(), config.api_key(), config.result_limit())
            .with_timeout(config.request_timeout());
        Self {
            storage,
            config,
            notifier,
            client,
            run_date,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, N: Notifier> Pipeline for AlertPipeline<S, C, N> {
    async fn extract(&self) -> Result<Extracted> {
        let seen = persistence::load_seen(&self.storage).await;
        let window =
            SearchWindow::for_run(self.run_date, seen.is_none(), self.config.backfill_from());

        if seen.is_none() {
            tracing::info!("🆕 First run, backfilling from {}", window.posted_from_param());
        }

        let opportunities = self.client.search(&window).await?;
        tracing::info!("Fetched {} opportunities for {}", opportunities.len(), window);

        Ok(Extracted {
            window,
            opportunities,
            seen,
        })
    }

    async fn transform(&self, extracted: Extracted) -> Result<MatchBatch> {
        let fetched = extracted.opportunities.len();
        let seen = extracted.seen.unwrap_or_default();

        let classified: Vec<_> = extracted
            .opportunities
            .into_iter()
            .filter(|opp| {
                let verdict = classifier::evaluate(&opp.title);
                tracing::debug!("{} {:?}: {}", opp.notice_id, verdict, opp.title);
                verdict.is_match()
            })
            .collect();
        let classified_count = classified.len();

        let matches = dedup::filter_new(classified, &seen);
        tracing::info!(
            "{} of {} opportunities matched, {} not seen before",
            classified_count,
            fetched,
            matches.len()
        );

        Ok(MatchBatch {
            window: extracted.window,
            fetched,
            matches,
            seen,
        })
    }

    async fn load(&self, batch: MatchBatch) -> Result<RunReport> {
        let MatchBatch {
            window,
            fetched,
            matches,
            mut seen,
        } = batch;

        let export_name =
            persistence::write_export(&self.storage, self.run_date, &matches).await?;
        let export_path = self.storage.display_path(&export_name);
        tracing::info!("📁 Export saved to: {}", export_path.display());

        let message = digest::compose(&matches);
        self.notifier.deliver(&message).await?;

        let dry_run = self.config.dry_run();
        if dry_run {
            tracing::info!("🔍 Dry run, seen record left unchanged");
        } else {
            tracing::info!(
                "📧 Delivered {} matches to {}",
                matches.len(),
                self.notifier.recipient()
            );
            let added = dedup::record_delivered(&mut seen, &matches);
            persistence::write_seen(&self.storage, &seen).await?;
            tracing::debug!("Recorded {} new ids, {} total", added, seen.len());
        }

        Ok(RunReport {
            window,
            fetched,
            matched: matches.len(),
            export_path,
            recipient: self.notifier.recipient().to_string(),
            seen_total: seen.len(),
            dry_run,
        })
    }
}
