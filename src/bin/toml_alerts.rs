use anyhow::Context;
use clap::Parser;
use sam_alerts::config::toml_config::TomlConfig;
use sam_alerts::core::{ConfigProvider, Notifier};
use sam_alerts::utils::{logger, validation::Validate};
use sam_alerts::{
    AlertEngine, AlertPipeline, ConsoleNotifier, LocalStorage, RunOutcome, SmtpNotifier,
};

#[derive(Parser)]
#[command(name = "toml-alerts")]
#[command(about = "SAM.gov vehicle alerts with TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sam-alerts.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the digest instead of emailing it
    #[arg(long)]
    dry_run: bool,
}

fn load_config(args: &Args) -> anyhow::Result<TomlConfig> {
    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    // 應用命令列覆蓋設定
    if args.dry_run {
        config.dry_run = true;
    }

    config
        .validate()
        .with_context(|| format!("Invalid configuration in '{}'", args.config))?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            eprintln!("💡 Make sure the file exists, is valid TOML, and every ${{VAR}} it references is set");
            std::process::exit(3);
        }
    };

    logger::init_logger(args.verbose || config.logging.verbose, config.logging.json);
    tracing::info!("🚀 Starting TOML-based alert run from {}", args.config);
    tracing::debug!("sam: {:?}, mail: {:?}", config.sam, config.mail);

    let run_date = chrono::Local::now().date_naive();
    let storage = LocalStorage::new(config.data_dir().to_string());

    let result = if config.dry_run() {
        tracing::info!("🔍 DRY RUN MODE - digest is printed, not emailed");
        let notifier = ConsoleNotifier::new(config.mail.to.clone());
        run(storage, config, notifier, run_date).await
    } else {
        match SmtpNotifier::new(&config.mail_settings()) {
            Ok(notifier) => run(storage, config, notifier, run_date).await,
            Err(e) => Err(e),
        }
    };

    match result {
        Ok(RunOutcome::NoNewResults { .. }) => println!("📭 No new results to send."),
        Ok(RunOutcome::Delivered(report)) => {
            println!("{}", report.summary());
            println!("📁 Export saved to: {}", report.export_path.display());
        }
        Err(e) => {
            tracing::error!("❌ Alert run failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    }
}

async fn run<N: Notifier>(
    storage: LocalStorage,
    config: TomlConfig,
    notifier: N,
    run_date: chrono::NaiveDate,
) -> sam_alerts::Result<RunOutcome> {
    AlertEngine::new(AlertPipeline::new(storage, config, notifier, run_date))
        .run()
        .await
}
