use anyhow::Context;
use clap::Parser;
use idm_core::config::Settings;
use idm_core::ingest::auth::CasTicketIssuer;
use idm_core::ingest::transactions::EpiasClient;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod pipeline;

#[derive(Debug, Parser)]
#[command(name = "idm_worker")]
struct Args {
    /// key=value file with EPIAS_USERNAME, EPIAS_PASSWORD and optional START_DATE/END_DATE.
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Range start (YYYY-MM-DDTHH:MM:SS, read at UTC+03:00). Overrides START_DATE.
    #[arg(long)]
    start_date: Option<String>,

    /// Range end (YYYY-MM-DDTHH:MM:SS, read at UTC+03:00). Overrides END_DATE.
    #[arg(long)]
    end_date: Option<String>,

    /// Where the ticket cache and report files live.
    #[arg(long, default_value = ".")]
    run_dir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Installed before settings load so config problems are logged like any other failure.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let loaded = load_settings(&args);
    let dsn = match &loaded {
        Ok(settings) => settings.sentry_dsn.clone(),
        Err(_) => std::env::var("SENTRY_DSN").ok().filter(|s| !s.trim().is_empty()),
    };
    let _sentry_guard = init_sentry(dsn.as_deref());

    let result = match loaded {
        Ok(settings) => execute(&args, &settings).await,
        Err(err) => Err(err),
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %format!("{err:#}"), "report run failed");
    }
    result
}

fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(&args.env_file)
        .with_context(|| format!("failed to load settings from {}", args.env_file.display()))?;
    if let Some(start) = &args.start_date {
        settings.start_date = Some(start.clone());
    }
    if let Some(end) = &args.end_date {
        settings.end_date = Some(end.clone());
    }
    Ok(settings)
}

async fn execute(args: &Args, settings: &Settings) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.run_dir)
        .with_context(|| format!("failed to create run dir {}", args.run_dir.display()))?;

    let http = idm_core::ingest::http_client()?;
    let issuer = CasTicketIssuer::from_settings(http.clone(), settings);
    let source = EpiasClient::from_settings(http, settings);

    let outcome = pipeline::run(settings, &args.run_dir, issuer, &source).await?;
    tracing::info!(
        contracts = outcome.summaries.len(),
        results = ?outcome.results_path,
        "report run finished"
    );
    Ok(())
}

fn init_sentry(dsn: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let dsn = dsn?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
