//! Tiered contact extraction over fetched markup.
//!
//! Every channel (email, WhatsApp, LinkedIn, Facebook, Instagram) is described
//! by an ordered list of [`Strategy`] values. Each strategy points at a part
//! of the page (anchors, hinted regions, generic content regions, the whole
//! document) and says how to read it. All strategies run; their candidates
//! are pooled, deduplicated per channel, and ranked by [`Tier`].

mod email;
mod social;
mod whatsapp;

use std::borrow::Cow;
use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use crate::phone::PhoneNormalizer;

pub use social::SocialNetwork;

use email::EmailChannel;
use social::SocialChannel;
use whatsapp::WhatsAppChannel;

/// Priority level of an extraction strategy. Lower wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Anchor whose `href` encodes the value (`mailto:`, `wa.me/…`, profile URL).
    Link = 1,
    /// Element whose class or id hints at the channel.
    TaggedRegion = 2,
    /// Common content element (paragraph, cell, footer, …).
    ContactRegion = 3,
    /// Regex over the raw markup.
    DocumentSweep = 4,
    /// Loose phone pattern over the visible text.
    PhoneSweep = 5,
}

/// A provisionally extracted value and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub value: String,
    pub tier: Tier,
    pub source: &'static str,
}

#[derive(Debug, Default)]
pub(crate) struct CandidatePool {
    candidates: Vec<Candidate>,
}

impl CandidatePool {
    pub(crate) fn push(&mut self, value: String, tier: Tier, source: &'static str) {
        self.candidates.push(Candidate {
            value,
            tier,
            source,
        });
    }

    /// Sorts by tier and keeps the first candidate for each dedup key.
    ///
    /// The sort is stable, so within a tier document order decides.
    pub(crate) fn ranked(mut self, key: impl Fn(&str) -> String) -> Vec<Candidate> {
        self.candidates.sort_by_key(|c| c.tier);
        let mut seen = HashSet::new();
        self.candidates
            .into_iter()
            .filter(|c| seen.insert(key(&c.value)))
            .collect()
    }
}

/// Which part of the page a strategy looks at.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target {
    /// Elements matching a CSS selector.
    Elements(&'static str),
    /// Elements whose `class` or `id` contains one of the hints (case-insensitive).
    Tagged(&'static [&'static str]),
    /// Generic content-bearing elements.
    ContactRegions,
    /// The page as a whole.
    Document,
}

/// How the targeted part is turned into a haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    /// The element's `href` attribute.
    Href,
    /// Visible text.
    Text,
    /// Serialized markup, attributes included.
    Markup,
}

/// Which channel reader is applied to each haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Read {
    Href,
    Values,
    Phones,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Strategy {
    pub tier: Tier,
    pub source: &'static str,
    pub target: Target,
    pub view: View,
    pub read: Read,
}

/// Per-channel value shape: how hrefs and free text become candidates.
///
/// Readers return only values that already passed the channel's validity
/// filter. A haystack that yields nothing is simply skipped.
pub(crate) trait Channel {
    fn name(&self) -> &'static str;

    fn strategies(&self) -> &'static [Strategy];

    fn from_href(&self, href: &str) -> Option<String>;

    fn scan_values(&self, haystack: &str) -> Vec<String>;

    fn scan_phones(&self, _haystack: &str) -> Vec<String> {
        Vec::new()
    }

    /// Dedup key for a value.
    fn key(&self, value: &str) -> String {
        value.to_string()
    }
}

const CONTACT_REGIONS_CSS: &str = "p, span, div, td, li, address, footer, header, aside, \
     [class*=footer], [class*=header], [class*=sidebar]";

const NON_VISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Parsed page plus the raw markup it came from.
pub(crate) struct Page<'a> {
    raw: &'a str,
    document: Html,
    visible_text: String,
}

impl<'a> Page<'a> {
    pub(crate) fn parse(raw: &'a str) -> Self {
        let document = Html::parse_document(raw);
        let visible_text = visible_text(&document);
        Self {
            raw,
            document,
            visible_text,
        }
    }

    fn haystacks(&self, target: Target, view: View) -> Vec<Cow<'_, str>> {
        match target {
            Target::Document => match view {
                View::Markup => vec![Cow::Borrowed(self.raw)],
                View::Text => vec![Cow::Borrowed(self.visible_text.as_str())],
                View::Href => Vec::new(),
            },
            Target::Elements(css) => self.select(css, |_| true, view),
            Target::ContactRegions => self.select(CONTACT_REGIONS_CSS, |_| true, view),
            Target::Tagged(hints) => self.select("[class], [id]", |el| is_tagged(el, hints), view),
        }
    }

    fn select(
        &self,
        css: &str,
        keep: impl Fn(&ElementRef<'_>) -> bool,
        view: View,
    ) -> Vec<Cow<'_, str>> {
        let Ok(selector) = Selector::parse(css) else {
            tracing::debug!(css, "skipping strategy with unparseable selector");
            return Vec::new();
        };
        self.document
            .select(&selector)
            .filter(|el| keep(el))
            .filter_map(|el| match view {
                View::Href => el.value().attr("href").map(Cow::Borrowed),
                View::Text => Some(Cow::Owned(element_text(el))),
                View::Markup => Some(Cow::Owned(el.html())),
            })
            .collect()
    }
}

fn is_tagged(el: &ElementRef<'_>, hints: &[&str]) -> bool {
    let element = el.value();
    [element.attr("class"), element.attr("id")]
        .into_iter()
        .flatten()
        .map(str::to_ascii_lowercase)
        .any(|marker| hints.iter().any(|hint| marker.contains(hint)))
}

/// Text nodes of an element joined by spaces, so adjacent cells never fuse
/// into one number or address.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn visible_text(document: &Html) -> String {
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent_tag = node
                .parent()
                .and_then(|p| p.value().as_element().map(scraper::node::Element::name));
            if parent_tag.is_some_and(|tag| NON_VISIBLE_TAGS.contains(&tag)) {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs every strategy of `channel` over `page` and returns the ranked,
/// deduplicated candidates.
pub(crate) fn rank<C: Channel>(channel: &C, page: &Page<'_>) -> Vec<Candidate> {
    let mut pool = CandidatePool::default();
    for strategy in channel.strategies() {
        for haystack in page.haystacks(strategy.target, strategy.view) {
            let values = match strategy.read {
                Read::Href => channel.from_href(&haystack).into_iter().collect(),
                Read::Values => channel.scan_values(&haystack),
                Read::Phones => channel.scan_phones(&haystack),
            };
            for value in values {
                pool.push(value, strategy.tier, strategy.source);
            }
        }
    }
    pool.ranked(|v| channel.key(v))
}

fn log_winner(channel: &str, winner: Option<&Candidate>) {
    if let Some(c) = winner {
        tracing::debug!(
            channel,
            tier = ?c.tier,
            source = c.source,
            value = %c.value,
            "selected contact candidate"
        );
    }
}

/// Highest-ranked candidate of a channel.
pub(crate) fn best<C: Channel>(channel: &C, page: &Page<'_>) -> Option<String> {
    let ranked = rank(channel, page);
    let winner = ranked.into_iter().next();
    log_winner(channel.name(), winner.as_ref());
    winner.map(|c| c.value)
}

/// Contact signals scraped from one page. `None` means nothing was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedContacts {
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub linkedin: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

/// Runs the five channel extractors over a page.
///
/// Stateless apart from the phone normalization policy; one instance can be
/// shared across any number of concurrent enrichments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactExtractor {
    phone: PhoneNormalizer,
}

impl ContactExtractor {
    #[must_use]
    pub fn new(phone: PhoneNormalizer) -> Self {
        Self { phone }
    }

    /// Extracts every channel from `html`. Never fails; malformed markup
    /// degrades to fewer candidates.
    #[must_use]
    pub fn extract(&self, html: &str) -> ScrapedContacts {
        let page = Page::parse(html);
        ScrapedContacts {
            email: email::select(&EmailChannel, &page),
            whatsapp: best(&WhatsAppChannel::new(self.phone), &page),
            linkedin: best(&SocialChannel::new(SocialNetwork::LinkedIn), &page),
            facebook: best(&SocialChannel::new(SocialNetwork::Facebook), &page),
            instagram: best(&SocialChannel::new(SocialNetwork::Instagram), &page),
        }
    }

}
