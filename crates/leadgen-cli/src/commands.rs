//! Command handlers called from `main` once config and logging are set up.
//!
//! Per-business failures are absorbed by the enricher; only setup problems
//! (bad input file, missing API key, unwritable cache) abort a command.

use std::path::Path;

use anyhow::Context;
use leadgen_core::{AppConfig, BusinessRecord, SearchQuery};
use leadgen_enrich::{Enricher, Fetch};
use leadgen_places::{PlacesClient, PlacesSearch};

use crate::batch::{run_batch, BatchOptions, StopSignal};
use crate::store::{
    filter_new, read_records, whatsapp_leads, write_export, write_records, ExportFormat, LeadStore,
};

/// Enrich the records in `input` and write them to `output` (stdout if `None`).
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, the HTTP client
/// cannot be built, or the output cannot be written.
pub(crate) async fn run_enrich(
    config: &AppConfig,
    input: &Path,
    output: Option<&Path>,
    stop: &StopSignal,
) -> anyhow::Result<()> {
    let businesses = read_records(input).await?;
    let enricher = Enricher::from_config(config)
        .context("failed to build website fetcher")?;

    let summary = run_batch(&enricher, businesses, BatchOptions::from_config(config), stop).await;
    write_records(output, &summary.records).await
}

/// Search, enrich the businesses not seen before, and append them to the cache.
///
/// # Errors
///
/// Returns an error for an invalid niche/city, a missing Places API key, a
/// search where every query variation failed, or an unreadable/unwritable cache.
pub(crate) async fn run_search(
    config: &AppConfig,
    niche: &str,
    city: &str,
    output: Option<&Path>,
    stop: &StopSignal,
) -> anyhow::Result<()> {
    let query = SearchQuery::new(niche, city)?;
    let places = PlacesClient::from_config(config)?;
    let enricher = Enricher::from_config(config)
        .context("failed to build website fetcher")?;
    let store = LeadStore::new(&config.data_dir);

    let enriched = search_and_enrich(
        &places,
        &enricher,
        &store,
        &query,
        config.max_businesses,
        BatchOptions::from_config(config),
        stop,
    )
    .await?;

    write_records(output, &enriched).await
}

/// Core of `search`, generic over the provider and fetcher so it can run
/// against in-memory fakes.
pub(crate) async fn search_and_enrich<P, F>(
    places: &P,
    enricher: &Enricher<F>,
    store: &LeadStore,
    query: &SearchQuery,
    max_businesses: usize,
    options: BatchOptions,
    stop: &StopSignal,
) -> anyhow::Result<Vec<BusinessRecord>>
where
    P: PlacesSearch,
    F: Fetch,
{
    let mut cached = store.load(query).await?;
    let found = places.search(query).await?;
    let found_count = found.len();

    let mut fresh = filter_new(&cached, found);
    fresh.truncate(max_businesses);
    tracing::info!(
        niche = %query.niche,
        city = %query.city,
        found = found_count,
        cached = cached.len(),
        new = fresh.len(),
        "search results filtered against cache"
    );

    if fresh.is_empty() {
        return Ok(Vec::new());
    }

    let summary = run_batch(enricher, fresh, options, stop).await;
    cached.extend(summary.records.iter().cloned());
    let path = store.save(query, &cached).await?;
    tracing::info!(path = %path.display(), total = cached.len(), "cache updated");

    Ok(summary.records)
}

/// Write a cached search as JSON or CSV, optionally only the WhatsApp leads.
///
/// # Errors
///
/// Returns an error for an invalid niche/city or an unreadable cache.
pub(crate) async fn run_export(
    config: &AppConfig,
    niche: &str,
    city: &str,
    whatsapp_only: bool,
    format: ExportFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let query = SearchQuery::new(niche, city)?;
    let store = LeadStore::new(&config.data_dir);
    let records = store.load(&query).await?;
    if records.is_empty() {
        tracing::warn!(path = %store.path_for(&query).display(), "no cached results for this search");
    }

    let records = if whatsapp_only {
        whatsapp_leads(records)
    } else {
        records
    };
    write_export(output, &records, format).await
}
