//! Contact enrichment for business records.
//!
//! Given a [`BusinessRecord`](leadgen_core::BusinessRecord), [`Enricher`]
//! fetches the business's website once, runs the tiered extractors in
//! [`extract`] over the markup, merges the winners into the record, and
//! falls back to the listed phone for WhatsApp.

pub mod enricher;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod phone;
pub mod url_guard;

pub use enricher::{EnrichOutcome, Enricher, EnricherOptions, EnrichmentReport, WhatsAppSource};
pub use error::{FetchError, UrlRejection};
pub use extract::{ContactExtractor, ScrapedContacts, SocialNetwork, Tier};
pub use fetch::{Fetch, PageFetcher};
pub use phone::{normalize_phone, PhoneNormalizer};
pub use url_guard::validate_website;
