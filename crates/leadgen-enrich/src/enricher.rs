//! Per-business enrichment: fetch the website, extract contacts, merge.

use leadgen_core::business::non_empty;
use leadgen_core::{AppConfig, BusinessRecord};

use crate::error::FetchError;
use crate::extract::{ContactExtractor, ScrapedContacts};
use crate::fetch::{Fetch, PageFetcher};
use crate::phone::PhoneNormalizer;
use crate::url_guard::validate_website;

#[derive(Debug, Clone, Copy, Default)]
pub struct EnricherOptions {
    pub phone: PhoneNormalizer,
    /// Let loopback hosts through the URL guard. Only local test servers need this.
    pub allow_loopback: bool,
}

/// What happened to the business's website during enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichOutcome {
    NoWebsite,
    RejectedWebsite(String),
    FetchFailed(String),
    Scraped,
}

/// Where the final WhatsApp number came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhatsAppSource {
    /// Already set on the input record and not replaced.
    Existing,
    Website,
    Phone,
}

/// Diagnostic companion to an enriched record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub outcome: EnrichOutcome,
    pub whatsapp_source: Option<WhatsAppSource>,
}

/// Enriches business records with contact channels scraped from their
/// websites, falling back to the listed phone for WhatsApp.
///
/// Holds no per-business state, so one instance may serve concurrent calls
/// for different records.
#[derive(Debug, Clone)]
pub struct Enricher<F = PageFetcher> {
    fetcher: F,
    extractor: ContactExtractor,
    options: EnricherOptions,
}

impl Enricher<PageFetcher> {
    /// Builds an enricher with an HTTP fetcher configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let fetcher = PageFetcher::new(config.fetch_timeout_secs, &config.user_agent)?;
        Ok(Self::new(
            fetcher,
            EnricherOptions {
                phone: PhoneNormalizer::new(config.strip_country_prefix),
                allow_loopback: false,
            },
        ))
    }
}

impl<F: Fetch> Enricher<F> {
    #[must_use]
    pub fn new(fetcher: F, options: EnricherOptions) -> Self {
        Self {
            fetcher,
            extractor: ContactExtractor::new(options.phone),
            options,
        }
    }

    /// Returns `business` with whatever contact channels could be found.
    ///
    /// Never fails: an unusable website or a failed fetch leaves the scraped
    /// fields as they were.
    pub async fn enrich(&self, business: BusinessRecord) -> BusinessRecord {
        self.enrich_detailed(business).await.0
    }

    /// [`Enricher::enrich`] plus a report of what happened.
    pub async fn enrich_detailed(
        &self,
        business: BusinessRecord,
    ) -> (BusinessRecord, EnrichmentReport) {
        let mut enriched = business;
        let had_whatsapp = non_empty(enriched.whatsapp.as_deref()).is_some();

        let mut whatsapp_source = had_whatsapp.then_some(WhatsAppSource::Existing);
        let outcome = match self.scrape(&enriched).await {
            Ok(contacts) => {
                if non_empty(contacts.whatsapp.as_deref()).is_some() {
                    whatsapp_source = Some(WhatsAppSource::Website);
                }
                merge(&mut enriched, contacts);
                EnrichOutcome::Scraped
            }
            Err(outcome) => outcome,
        };

        if whatsapp_source.is_none() {
            if let Some(number) = enriched
                .phone()
                .and_then(|p| self.options.phone.normalize(p))
            {
                enriched.whatsapp = Some(number);
                whatsapp_source = Some(WhatsAppSource::Phone);
            }
        }

        log_result(&enriched, &outcome);

        (
            enriched,
            EnrichmentReport {
                outcome,
                whatsapp_source,
            },
        )
    }

    async fn scrape(&self, business: &BusinessRecord) -> Result<ScrapedContacts, EnrichOutcome> {
        let Some(raw) = business.website() else {
            return Err(EnrichOutcome::NoWebsite);
        };

        let url = validate_website(raw, self.options.allow_loopback).map_err(|reason| {
            tracing::debug!(business = %business.name, website = raw, %reason, "website rejected");
            EnrichOutcome::RejectedWebsite(reason.to_string())
        })?;

        tracing::debug!(business = %business.name, url = %url, "fetching website");
        let html = self.fetcher.fetch(&url).await.map_err(|err| {
            tracing::warn!(business = %business.name, url = %url, error = %err, "website fetch failed");
            EnrichOutcome::FetchFailed(err.to_string())
        })?;

        Ok(self.extractor.extract(&html))
    }
}

/// Scraped values overwrite only when non-empty; each field independently.
fn merge(record: &mut BusinessRecord, contacts: ScrapedContacts) {
    let ScrapedContacts {
        email,
        whatsapp,
        linkedin,
        facebook,
        instagram,
    } = contacts;

    for (slot, scraped) in [
        (&mut record.email, email),
        (&mut record.whatsapp, whatsapp),
        (&mut record.linkedin, linkedin),
        (&mut record.facebook, facebook),
        (&mut record.instagram, instagram),
    ] {
        if let Some(value) = scraped.filter(|v| !v.trim().is_empty()) {
            *slot = Some(value);
        }
    }
}

fn log_result(record: &BusinessRecord, outcome: &EnrichOutcome) {
    let found = record.found_channels();
    match outcome {
        EnrichOutcome::FetchFailed(reason) => {
            tracing::info!(business = %record.name, %reason, found = ?found, "enriched without website data");
        }
        _ if found.is_empty() => {
            tracing::info!(business = %record.name, outcome = ?outcome, "no contact channels found");
        }
        _ => {
            tracing::info!(business = %record.name, found = ?found, "contact channels found");
        }
    }
}
