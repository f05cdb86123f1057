//! Batch driver: enriches businesses with bounded concurrency, a politeness
//! delay, and a stop flag checked before each business starts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use leadgen_core::{AppConfig, BusinessRecord};
use leadgen_enrich::{EnrichOutcome, Enricher, EnrichmentReport, Fetch};

/// Cooperative cancellation flag shared between the Ctrl-C listener and the
/// batch driver.
#[derive(Debug, Clone, Default)]
pub(crate) struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub(crate) fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Spawns a task that raises the flag on the first Ctrl-C.
    pub(crate) fn listen_for_ctrl_c(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::warn!("received ctrl-c, finishing in-flight businesses");
                    signal.stop();
                }
                Err(e) => tracing::error!(error = %e, "failed to listen for ctrl-c"),
            }
        });
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BatchOptions {
    pub max_concurrent: usize,
    pub delay: Duration,
}

impl BatchOptions {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            max_concurrent: config.max_concurrent.max(1),
            delay: Duration::from_millis(config.inter_request_delay_ms),
        }
    }
}

/// Result of a batch run, in input order.
#[derive(Debug, Default)]
pub(crate) struct BatchSummary {
    pub records: Vec<BusinessRecord>,
    pub scraped: usize,
    pub failed: usize,
    pub without_website: usize,
    pub with_whatsapp: usize,
    /// Businesses never started because the stop flag was raised.
    pub skipped: usize,
}

impl BatchSummary {
    fn record(&mut self, business: BusinessRecord, report: &EnrichmentReport) {
        match report.outcome {
            EnrichOutcome::Scraped => self.scraped += 1,
            EnrichOutcome::NoWebsite => self.without_website += 1,
            EnrichOutcome::RejectedWebsite(_) | EnrichOutcome::FetchFailed(_) => self.failed += 1,
        }
        if report.whatsapp_source.is_some() {
            self.with_whatsapp += 1;
        }
        self.records.push(business);
    }
}

/// Enriches `businesses` with at most `options.max_concurrent` in flight.
///
/// Output order matches input order. Once `stop` is raised no new business
/// starts; the records finished so far are returned.
pub(crate) async fn run_batch<F: Fetch>(
    enricher: &Enricher<F>,
    businesses: Vec<BusinessRecord>,
    options: BatchOptions,
    stop: &StopSignal,
) -> BatchSummary {
    let total = businesses.len();
    tracing::info!(total, max_concurrent = options.max_concurrent, "starting enrichment batch");

    let results: Vec<Option<(BusinessRecord, EnrichmentReport)>> = stream::iter(businesses)
        .map(|business| async move {
            if stop.is_stopped() {
                return None;
            }
            let done = enricher.enrich_detailed(business).await;
            if !options.delay.is_zero() {
                tokio::time::sleep(options.delay).await;
            }
            Some(done)
        })
        .buffered(options.max_concurrent.max(1))
        .collect()
        .await;

    let mut summary = BatchSummary::default();
    for result in results {
        match result {
            Some((business, report)) => summary.record(business, &report),
            None => summary.skipped += 1,
        }
    }

    if summary.skipped > 0 {
        tracing::warn!(
            finished = summary.records.len(),
            skipped = summary.skipped,
            "batch stopped early"
        );
    }
    tracing::info!(
        total,
        scraped = summary.scraped,
        failed = summary.failed,
        without_website = summary.without_website,
        with_whatsapp = summary.with_whatsapp,
        "enrichment batch finished"
    );
    summary
}
