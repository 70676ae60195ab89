use clap::Parser;
use sam_alerts::core::{ConfigProvider, Notifier};
use sam_alerts::utils::{logger, validation::Validate};
use sam_alerts::{
    AlertEngine, AlertError, AlertPipeline, CliConfig, ConsoleNotifier, LocalStorage, RunOutcome,
    SmtpNotifier,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting sam-alerts");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(e);
    }

    let run_date = chrono::Local::now().date_naive();
    let storage = LocalStorage::new(config.data_dir.clone());

    let result = if config.dry_run() {
        tracing::info!("🔍 DRY RUN MODE - digest is printed, not emailed");
        let notifier = ConsoleNotifier::new(config.to_email.clone());
        run(storage, config, notifier, run_date).await
    } else {
        match SmtpNotifier::new(&config.mail_settings()) {
            Ok(notifier) => run(storage, config, notifier, run_date).await,
            Err(e) => Err(e),
        }
    };

    match result {
        Ok(RunOutcome::NoNewResults { .. }) => {
            println!("📭 No new results to send.");
        }
        Ok(RunOutcome::Delivered(report)) => {
            println!("{}", report.summary());
            println!("📁 Export saved to: {}", report.export_path.display());
        }
        Err(e) => exit_with(e),
    }
}

async fn run<N: Notifier>(
    storage: LocalStorage,
    config: CliConfig,
    notifier: N,
    run_date: chrono::NaiveDate,
) -> sam_alerts::Result<RunOutcome> {
    let pipeline = AlertPipeline::new(storage, config, notifier, run_date);
    AlertEngine::new(pipeline).run().await
}

fn exit_with(e: AlertError) -> ! {
    tracing::error!(
        "❌ Alert run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code().max(1));
}
