use std::sync::LazyLock;

use regex::Regex;

use super::{Channel, Read, Strategy, Target, Tier, View};
use crate::phone::PhoneNormalizer;

/// Number carried by a WhatsApp click-to-chat URL, either in the path
/// (`wa.me/5511…`) or in a `phone=` query parameter.
static WA_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:wa\.me/|whatsapp\.com/(?:send/?)?\?phone=|whatsapp://send/?\?phone=)\+?(\d+)")
        .expect("valid whatsapp link regex")
});

/// Loose Brazilian phone shape: optional `+55`, two-digit area code,
/// optional ninth digit, then 4 + 4 digits.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?55[\s.-]?)?\(?\d{2}\)?[\s.-]?9?\d{4}[\s.-]?\d{4}")
        .expect("valid phone regex")
});

const WHATSAPP_HINTS: &[&str] = &["whatsapp", "wa", "telefone", "phone", "contato", "contact"];

/// Phone-pattern hits must still look like a full number after normalization.
const MIN_SWEEP_DIGITS: usize = 10;

static STRATEGIES: &[Strategy] = &[
    Strategy {
        tier: Tier::Link,
        source: "whatsapp_link",
        target: Target::Elements(
            r#"a[href*="wa.me"], a[href*="whatsapp.com"], a[href^="whatsapp:"]"#,
        ),
        view: View::Href,
        read: Read::Href,
    },
    Strategy {
        tier: Tier::TaggedRegion,
        source: "tagged_region",
        target: Target::Tagged(WHATSAPP_HINTS),
        view: View::Text,
        read: Read::Phones,
    },
    Strategy {
        tier: Tier::ContactRegion,
        source: "contact_region",
        target: Target::ContactRegions,
        view: View::Text,
        read: Read::Values,
    },
    Strategy {
        tier: Tier::DocumentSweep,
        source: "document_sweep",
        target: Target::Document,
        view: View::Markup,
        read: Read::Values,
    },
    Strategy {
        tier: Tier::PhoneSweep,
        source: "phone_sweep",
        target: Target::Document,
        view: View::Text,
        read: Read::Phones,
    },
];

pub(crate) struct WhatsAppChannel {
    phone: PhoneNormalizer,
}

impl WhatsAppChannel {
    pub(crate) fn new(phone: PhoneNormalizer) -> Self {
        Self { phone }
    }
}

impl Channel for WhatsAppChannel {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    fn strategies(&self) -> &'static [Strategy] {
        STRATEGIES
    }

    fn from_href(&self, href: &str) -> Option<String> {
        let caps = WA_LINK_RE.captures(href)?;
        self.phone.normalize(caps.get(1)?.as_str())
    }

    fn scan_values(&self, haystack: &str) -> Vec<String> {
        WA_LINK_RE
            .captures_iter(haystack)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| self.phone.normalize(m.as_str()))
            .collect()
    }

    fn scan_phones(&self, haystack: &str) -> Vec<String> {
        PHONE_RE
            .find_iter(haystack)
            .filter_map(|m| self.phone.normalize(m.as_str()))
            .filter(|digits| digits.len() >= MIN_SWEEP_DIGITS)
            .collect()
    }

    fn key(&self, value: &str) -> String {
        value.chars().filter(char::is_ascii_digit).collect()
    }
}
