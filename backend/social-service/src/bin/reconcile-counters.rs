use anyhow::{bail, Context, Result};
use social_service::config::Config;
use social_service::metrics;
use social_service::repository;
use social_service::services::CounterService;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const USAGE: &str = "usage: reconcile-counters [sweep | watch | one <uuid>]";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reconcile_counters=info,social_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(env = %config.app.env, backend = ?config.store.backend, "Starting counter reconciliation");

    let store = repository::connect(&config)
        .await
        .context("Failed to open social store")?;
    let counters = CounterService::new(store);

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("sweep");

    match command {
        "sweep" => {
            let summary = counters
                .reconcile_all(config.reconcile.batch_size)
                .await
                .context("Reconciliation sweep failed")?;
            metrics::record_reconcile_run("success");
            info!(
                accounts = summary.accounts_checked,
                content = summary.content_checked,
                drift_corrected = summary.drift_corrected,
                "Sweep complete"
            );
        }

        "watch" => {
            let interval = Duration::from_secs(config.reconcile.interval_secs.max(1));
            info!(interval_secs = interval.as_secs(), "Watching for drift");
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match counters.reconcile_all(config.reconcile.batch_size).await {
                            Ok(summary) => {
                                metrics::record_reconcile_run("success");
                                info!(drift_corrected = summary.drift_corrected, "Sweep complete");
                            }
                            Err(e) => {
                                metrics::record_reconcile_run("error");
                                e.log();
                                warn!(retry_in_secs = interval.as_secs(), "Sweep failed");
                            }
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutdown requested");
                        break;
                    }
                }
            }
        }

        "one" => {
            let Some(raw) = args.get(2) else {
                bail!(USAGE);
            };
            let id: Uuid = raw.parse().context("Invalid record id")?;
            let report = counters
                .reconcile_counters(id)
                .await
                .context("Reconciliation failed")?;
            info!(drifted = report.drifted(), ?report, "Record reconciled");
        }

        _ => bail!(USAGE),
    }

    Ok(())
}
