use anyhow::Context;
use chrono::Utc;
use idm_core::aggregate::aggregate;
use idm_core::config::Settings;
use idm_core::domain::summary::ContractSummary;
use idm_core::domain::transaction::parse_transactions;
use idm_core::ingest::auth::{Authenticator, TicketIssuer};
use idm_core::ingest::transactions::{self, TransactionSource};
use idm_core::report;
use idm_core::storage::artifacts;
use idm_core::storage::ticket_cache::TicketCache;
use idm_core::time::tr_market::resolve_date_range;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct RunOutcome {
    pub summaries: Vec<ContractSummary>,
    pub results_path: Option<PathBuf>,
}

/// authenticate -> fetch -> aggregate -> report, failing fast on the first fatal error.
pub async fn run<I, S>(
    settings: &Settings,
    run_dir: &Path,
    issuer: I,
    source: &S,
) -> anyhow::Result<RunOutcome>
where
    I: TicketIssuer,
    S: TransactionSource,
{
    let credentials = settings.credentials()?;
    let range = resolve_date_range(
        settings.start_date.as_deref(),
        settings.end_date.as_deref(),
        Utc::now(),
    )?;

    let auth = Authenticator::new(TicketCache::in_dir(run_dir), issuer);
    let ticket = auth
        .get_ticket(&credentials)
        .await
        .context("failed to obtain ticket")?;

    let raw = transactions::fetch_raw(source, &ticket, &range)
        .await
        .context("failed to fetch transaction data")?;
    artifacts::write_raw(run_dir, &raw);

    let records = parse_transactions(&raw).context("failed to decode transaction data")?;
    let summaries = aggregate(&records);
    if summaries.is_empty() {
        println!("No transaction data found.");
        return Ok(RunOutcome {
            summaries,
            results_path: None,
        });
    }

    println!("Processed {} contract groups.\n", summaries.len());
    println!("{}", report::render_table(&summaries));

    let delimited = report::to_delimited(&summaries)?;
    let results_path = artifacts::write_results(run_dir, &delimited)?;
    tracing::info!(path = %results_path.display(), contracts = summaries.len(), "saved grouped results");

    Ok(RunOutcome {
        summaries,
        results_path: Some(results_path),
    })
}
