use crate::core::Pipeline;
use crate::domain::model::RunOutcome;
use crate::utils::error::Result;

pub struct AlertEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AlertEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Fetch, classify and dedup; export and notify only when something new
    /// turned up.
    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Starting alert run");

        let extracted = self.pipeline.extract().await?;
        let batch = self.pipeline.transform(extracted).await?;

        if batch.is_empty() {
            tracing::info!("📭 No new results to send.");
            return Ok(RunOutcome::NoNewResults {
                fetched: batch.fetched,
            });
        }

        let report = self.pipeline.load(batch).await?;
        tracing::info!(
            "✅ Sent {} new results to {}",
            report.matched,
            report.recipient
        );

        Ok(RunOutcome::Delivered(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence;
    use crate::core::pipeline::tests::{run_date, MockConfig, MockNotifier, MockStorage};
    use crate::core::pipeline::AlertPipeline;
    use httpmock::prelude::*;

    fn search_body() -> serde_json::Value {
        serde_json::json!({
            "totalRecords": 3,
            "opportunitiesData": [
                {"noticeId": "a", "title": "2025 Ford F-150 left-hand drive pickup, agency XYZ", "responseDeadLine": "2025-06-20"},
                {"noticeId": "b", "title": "passenger van, left-hand drive, 12-seat shuttle"},
                {"noticeId": "c", "title": "mid-size truck for logistics base"}
            ]
        })
    }

    #[tokio::test]
    async fn test_run_delivers_then_second_run_is_empty() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(search_body());
        });

        let storage = MockStorage::default();
        let notifier = MockNotifier::default();

        let engine = AlertEngine::new(AlertPipeline::new(
            storage.clone(),
            MockConfig::new(server.url("/search")),
            notifier.clone(),
            run_date(),
        ));

        match engine.run().await.unwrap() {
            RunOutcome::Delivered(report) => {
                assert_eq!(report.fetched, 3);
                assert_eq!(report.matched, 2);
            }
            other => panic!("expected delivery, got {:?}", other),
        }

        // 同一批資料再跑一次，不應重複通知
        match engine.run().await.unwrap() {
            RunOutcome::NoNewResults { fetched } => assert_eq!(fetched, 3),
            other => panic!("expected no new results, got {:?}", other),
        }

        api_mock.assert_hits(2);
        assert_eq!(notifier.sent.lock().await.len(), 1);
        assert_eq!(
            storage.get_string(persistence::SEEN_FILE).await.unwrap(),
            "Notice ID\na\nc\n"
        );
    }

    #[tokio::test]
    async fn test_run_without_matches_writes_nothing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(serde_json::json!({
                "opportunitiesData": [{"noticeId": "z", "title": "Custodial services"}]
            }));
        });

        let storage = MockStorage::default();
        let notifier = MockNotifier::default();
        let engine = AlertEngine::new(AlertPipeline::new(
            storage.clone(),
            MockConfig::new(server.url("/search")),
            notifier.clone(),
            run_date(),
        ));

        assert!(matches!(
            engine.run().await.unwrap(),
            RunOutcome::NoNewResults { fetched: 1 }
        ));
        assert!(notifier.sent.lock().await.is_empty());
        assert!(storage.get_string("sam_opps_20250603.csv").await.is_none());
        assert!(storage.get_string(persistence::SEEN_FILE).await.is_none());
    }

    #[tokio::test]
    async fn test_run_fetch_failure_is_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(500);
        });

        let notifier = MockNotifier::default();
        let engine = AlertEngine::new(AlertPipeline::new(
            MockStorage::default(),
            MockConfig::new(server.url("/search")),
            notifier.clone(),
            run_date(),
        ));

        assert!(engine.run().await.is_err());
        assert!(notifier.sent.lock().await.is_empty());
    }
}
