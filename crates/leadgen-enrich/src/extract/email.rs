use std::sync::LazyLock;

use regex::Regex;

use super::{log_winner, rank, Channel, Page, Read, Strategy, Target, Tier, View};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});
static EMAIL_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email shape regex"));

const EMAIL_HINTS: &[&str] = &["email", "mail", "contato", "contact"];

/// Local parts of catch-all inboxes. English only: `contato@` is NOT on it.
pub(crate) const GENERIC_LOCAL_PARTS: &[&str] = &[
    "noreply",
    "no-reply",
    "donotreply",
    "info",
    "admin",
    "webmaster",
    "postmaster",
    "abuse",
    "support",
    "help",
    "sales",
    "contact",
    "hello",
];

/// Retina sprites and asset names (`logo@2x.png`) look like addresses.
const ASSET_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

static STRATEGIES: &[Strategy] = &[
    Strategy {
        tier: Tier::Link,
        source: "mailto_link",
        target: Target::Elements("a[href]"),
        view: View::Href,
        read: Read::Href,
    },
    Strategy {
        tier: Tier::TaggedRegion,
        source: "tagged_region",
        target: Target::Tagged(EMAIL_HINTS),
        view: View::Text,
        read: Read::Values,
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
];

pub(crate) struct EmailChannel;

impl Channel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn strategies(&self) -> &'static [Strategy] {
        STRATEGIES
    }

    fn from_href(&self, href: &str) -> Option<String> {
        let href = href.trim();
        let (scheme, rest) = href.split_at_checked(7)?;
        if !scheme.eq_ignore_ascii_case("mailto:") {
            return None;
        }
        let address = rest.split(['?', ',']).next()?.trim();
        is_valid_email(address).then(|| address.to_string())
    }

    fn scan_values(&self, haystack: &str) -> Vec<String> {
        EMAIL_RE
            .find_iter(haystack)
            .map(|m| m.as_str())
            .filter(|e| is_valid_email(e))
            .map(str::to_string)
            .collect()
    }

    fn key(&self, value: &str) -> String {
        value.to_lowercase()
    }
}

pub(crate) fn is_valid_email(candidate: &str) -> bool {
    if !EMAIL_SHAPE_RE.is_match(candidate) {
        return false;
    }
    let lowered = candidate.to_ascii_lowercase();
    !ASSET_SUFFIXES.iter().any(|ext| lowered.ends_with(ext))
}

/// Whether the address is a catch-all inbox rather than a person or team.
pub(crate) fn is_generic(email: &str) -> bool {
    let local = email.split('@').next().unwrap_or_default().to_lowercase();
    GENERIC_LOCAL_PARTS.contains(&local.as_str())
}

/// Best corporate address, falling back to the best generic one.
pub(crate) fn select(channel: &EmailChannel, page: &Page<'_>) -> Option<String> {
    let ranked = rank(channel, page);
    let winner = ranked
        .iter()
        .find(|c| !is_generic(&c.value))
        .or_else(|| ranked.first());
    log_winner(channel.name(), winner);
    winner.map(|c| c.value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Option<String> {
        select(&EmailChannel, &Page::parse(html))
    }

    #[test]
    fn mailto_link_beats_contact_region_text() {
        let html = r#"
            <p>Fale com ana@empresa.com</p>
            <a href="mailto:bruno@empresa.com">Escreva</a>
        "#;
        assert_eq!(extract(html).as_deref(), Some("bruno@empresa.com"));
    }

    #[test]
    fn tagged_region_beats_generic_region() {
        let html = r#"
            <p>Vendas: carla@empresa.com</p>
            <div class="box-contato">daniel@empresa.com</div>
        "#;
        assert_eq!(extract(html).as_deref(), Some("daniel@empresa.com"));
    }

    #[test]
    fn mailto_query_string_is_stripped() {
        let html = r#"<a href="MAILTO:eva@empresa.com?subject=Orcamento">x</a>"#;
        assert_eq!(extract(html).as_deref(), Some("eva@empresa.com"));
    }

    #[test]
    fn invalid_mailto_falls_through_to_text() {
        let html = r#"
            <a href="mailto:">x</a>
            <footer>felipe@empresa.com</footer>
        "#;
        assert_eq!(extract(html).as_deref(), Some("felipe@empresa.com"));
    }

    #[test]
    fn corporate_address_preferred_over_generic() {
        let html = r#"
            <a href="mailto:info@empresa.com">info</a>
            <p>maria@empresa.com</p>
        "#;
        assert_eq!(extract(html).as_deref(), Some("maria@empresa.com"));
    }

    #[test]
    fn generic_address_used_when_nothing_else() {
        let html = r#"<a href="mailto:contact@empresa.com">x</a>"#;
        assert_eq!(extract(html).as_deref(), Some("contact@empresa.com"));
    }

    #[test]
    fn portuguese_contato_is_not_generic() {
        let html = r#"
            <a href="mailto:contato@empresa.com">contato</a>
            <p>maria@empresa.com</p>
        "#;
        // `contato` is not on the denylist, so the higher-tier link wins.
        assert_eq!(extract(html).as_deref(), Some("contato@empresa.com"));
    }

    #[test]
    fn denylist_entries_are_literal() {
        for local in GENERIC_LOCAL_PARTS {
            assert!(is_generic(&format!("{local}@empresa.com")), "{local}");
        }
        assert!(is_generic("NoReply@empresa.com"));
        assert!(!is_generic("contato@empresa.com"));
        assert!(!is_generic("maria@empresa.com"));
        assert!(!is_generic("info.sp@empresa.com"));
    }

    #[test]
    fn asset_names_are_not_emails() {
        let html = r#"<img src="/img/logo@2x.png"><p>nada aqui</p>"#;
        assert_eq!(extract(html), None);
    }

    #[test]
    fn duplicate_addresses_differing_in_case_collapse() {
        let html = r#"
            <a href="mailto:Joao@Empresa.com">x</a>
            <p>joao@empresa.com</p>
        "#;
        let ranked = rank(&EmailChannel, &Page::parse(html));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].tier, Tier::Link);
        assert_eq!(ranked[0].value, "Joao@Empresa.com");
    }

    #[test]
    fn raw_markup_sweep_finds_addresses_in_attributes() {
        let html = r#"<div data-email="gabi@empresa.com"></div>"#;
        let ranked = rank(&EmailChannel, &Page::parse(html));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].tier, Tier::DocumentSweep);
    }

    #[test]
    fn no_addresses_yields_none() {
        assert_eq!(extract("<html><body><p>Sem contato</p></body></html>"), None);
    }
}
