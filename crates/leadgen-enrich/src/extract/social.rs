use std::sync::LazyLock;

use regex::Regex;

use super::{Channel, Read, Strategy, Target, Tier, View};

/// Social network whose profile URL is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialNetwork {
    LinkedIn,
    Facebook,
    Instagram,
}

impl SocialNetwork {
    #[must_use]
    pub fn domain(self) -> &'static str {
        match self {
            SocialNetwork::LinkedIn => "linkedin.com",
            SocialNetwork::Facebook => "facebook.com",
            SocialNetwork::Instagram => "instagram.com",
        }
    }

    fn label(self) -> &'static str {
        match self {
            SocialNetwork::LinkedIn => "linkedin",
            SocialNetwork::Facebook => "facebook",
            SocialNetwork::Instagram => "instagram",
        }
    }

    fn link_re(self) -> &'static Regex {
        match self {
            SocialNetwork::LinkedIn => &LINKEDIN_RE,
            SocialNetwork::Facebook => &FACEBOOK_RE,
            SocialNetwork::Instagram => &INSTAGRAM_RE,
        }
    }

    fn strategies(self) -> &'static [Strategy] {
        match self {
            SocialNetwork::LinkedIn => LINKEDIN_STRATEGIES,
            SocialNetwork::Facebook => FACEBOOK_STRATEGIES,
            SocialNetwork::Instagram => INSTAGRAM_STRATEGIES,
        }
    }
}

static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://(?:[a-z]{2,3}\.)?linkedin\.com/[^\s"'<>]+"#)
        .expect("valid linkedin regex")
});
static FACEBOOK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://(?:www\.|m\.|pt-br\.)?facebook\.com/[^\s"'<>]+"#)
        .expect("valid facebook regex")
});
static INSTAGRAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://(?:www\.)?instagram\.com/[^\s"'<>]+"#)
        .expect("valid instagram regex")
});

/// First path segments of share dialogs, tracking pixels and embeds: these
/// carry the network's domain but never point at the business's own profile.
/// Matched as whole segments, so `/sharepizzaria` is still a profile.
const NON_PROFILE_SEGMENTS: &[&str] = &[
    "sharer",
    "sharer.php",
    "share",
    "share.php",
    "sharearticle",
    "sharing",
    "intent",
    "dialog",
    "plugins",
    "tr",
];

/// Punctuation that prose puts right after a pasted URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', ')', ']'];

/// Builds the four tiers for one network. `$anchors` must select anchors whose
/// href carries the network domain.
macro_rules! social_strategies {
    ($anchors:literal, $hints:expr) => {
        &[
            Strategy {
                tier: Tier::Link,
                source: "profile_link",
                target: Target::Elements($anchors),
                view: View::Href,
                read: Read::Href,
            },
            Strategy {
                tier: Tier::TaggedRegion,
                source: "tagged_region",
                target: Target::Tagged($hints),
                view: View::Markup,
                read: Read::Values,
            },
            Strategy {
                tier: Tier::ContactRegion,
                source: "contact_region",
                target: Target::ContactRegions,
                view: View::Markup,
                read: Read::Values,
            },
            Strategy {
                tier: Tier::DocumentSweep,
                source: "document_sweep",
                target: Target::Document,
                view: View::Markup,
                read: Read::Values,
            },
        ]
    };
}

static LINKEDIN_STRATEGIES: &[Strategy] = social_strategies!(
    r#"a[href*="linkedin.com"]"#,
    &["linkedin", "social", "redes", "follow", "siga"]
);
static FACEBOOK_STRATEGIES: &[Strategy] = social_strategies!(
    r#"a[href*="facebook.com"]"#,
    &["facebook", "social", "redes", "follow", "siga"]
);
static INSTAGRAM_STRATEGIES: &[Strategy] = social_strategies!(
    r#"a[href*="instagram.com"]"#,
    &["instagram", "insta", "social", "redes", "follow", "siga"]
);

pub(crate) struct SocialChannel {
    network: SocialNetwork,
}

impl SocialChannel {
    pub(crate) fn new(network: SocialNetwork) -> Self {
        Self { network }
    }

    fn accept(&self, url: &str) -> Option<String> {
        let url = url.trim();
        let lowered = url.to_ascii_lowercase();
        let domain = self.network.domain();
        let at = lowered.find(domain)?;
        let path = &lowered[at + domain.len()..];
        if first_segment(path).is_some_and(|seg| NON_PROFILE_SEGMENTS.contains(&seg)) {
            return None;
        }
        Some(url.replace("&amp;", "&"))
    }
}

fn first_segment(path: &str) -> Option<&str> {
    path.strip_prefix('/')?.split(['/', '?', '#']).next()
}

impl Channel for SocialChannel {
    fn name(&self) -> &'static str {
        self.network.label()
    }

    fn strategies(&self) -> &'static [Strategy] {
        self.network.strategies()
    }

    fn from_href(&self, href: &str) -> Option<String> {
        self.accept(href)
    }

    fn scan_values(&self, haystack: &str) -> Vec<String> {
        self.network
            .link_re()
            .find_iter(haystack)
            .filter_map(|m| self.accept(m.as_str().trim_end_matches(TRAILING_PUNCTUATION)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{best, rank, Page};
    use super::*;

    fn extract(html: &str, network: SocialNetwork) -> Option<String> {
        best(&SocialChannel::new(network), &Page::parse(html))
    }

    #[test]
    fn anchor_href_is_returned_verbatim() {
        let html = r#"<a href="https://facebook.com/padariasilva">Facebook</a>"#;
        assert_eq!(
            extract(html, SocialNetwork::Facebook).as_deref(),
            Some("https://facebook.com/padariasilva")
        );
    }

    #[test]
    fn anchor_beats_url_in_text() {
        let html = r#"
            <p>Antigo: https://www.linkedin.com/company/velho</p>
            <a href="https://www.linkedin.com/company/novo">LinkedIn</a>
        "#;
        assert_eq!(
            extract(html, SocialNetwork::LinkedIn).as_deref(),
            Some("https://www.linkedin.com/company/novo")
        );
    }

    #[test]
    fn share_links_are_rejected() {
        let html = r#"
            <a href="https://www.facebook.com/sharer/sharer.php?u=x">Compartilhar</a>
            <a href="https://www.linkedin.com/shareArticle?url=x">Compartilhar</a>
        "#;
        assert_eq!(extract(html, SocialNetwork::Facebook), None);
        assert_eq!(extract(html, SocialNetwork::LinkedIn), None);
    }

    #[test]
    fn tracking_pixel_is_not_a_profile() {
        let html = r#"<noscript><img src="https://www.facebook.com/tr?id=123&ev=PageView"></noscript>"#;
        assert_eq!(extract(html, SocialNetwork::Facebook), None);
    }

    #[test]
    fn url_outside_anchor_is_found_by_sweep() {
        let html = r#"<script>var ig = "https://instagram.com/padariasilva";</script>"#;
        let ranked = rank(&SocialChannel::new(SocialNetwork::Instagram), &Page::parse(html));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].tier, Tier::DocumentSweep);
        assert_eq!(ranked[0].value, "https://instagram.com/padariasilva");
    }

    #[test]
    fn tagged_region_outranks_generic_region() {
        let html = r#"
            <p data-link="https://instagram.com/outro">x</p>
            <section class="redes-sociais" data-link="https://instagram.com/certo"></section>
        "#;
        assert_eq!(
            extract(html, SocialNetwork::Instagram).as_deref(),
            Some("https://instagram.com/certo")
        );
    }

    #[test]
    fn networks_do_not_cross_match() {
        let html = r#"<a href="https://instagram.com/padaria">IG</a>"#;
        assert_eq!(extract(html, SocialNetwork::Facebook), None);
        assert_eq!(extract(html, SocialNetwork::LinkedIn), None);
    }

    #[test]
    fn malformed_anchor_href_still_counts_when_it_names_the_domain() {
        let html = r#"<a href="facebook.com/padariasilva">Facebook</a>"#;
        assert_eq!(
            extract(html, SocialNetwork::Facebook).as_deref(),
            Some("facebook.com/padariasilva")
        );
    }

    #[test]
    fn profile_names_starting_with_share_words_are_kept() {
        let html = r#"
            <a href="https://www.facebook.com/sharepizzaria">Facebook</a>
            <a href="https://instagram.com/intentionalcafe">Instagram</a>
            <a href="https://www.linkedin.com/company/trilhas">LinkedIn</a>
        "#;
        assert_eq!(
            extract(html, SocialNetwork::Facebook).as_deref(),
            Some("https://www.facebook.com/sharepizzaria")
        );
        assert_eq!(
            extract(html, SocialNetwork::Instagram).as_deref(),
            Some("https://instagram.com/intentionalcafe")
        );
        assert_eq!(
            extract(html, SocialNetwork::LinkedIn).as_deref(),
            Some("https://www.linkedin.com/company/trilhas")
        );
    }

    #[test]
    fn dialog_and_plugin_paths_are_rejected() {
        let html = r#"
            <a href="https://www.facebook.com/dialog/feed?app_id=1">x</a>
            <a href="https://www.facebook.com/plugins/page.php?href=y">x</a>
            <a href="https://www.linkedin.com/sharing/share-offsite/?url=z">x</a>
        "#;
        assert_eq!(extract(html, SocialNetwork::Facebook), None);
        assert_eq!(extract(html, SocialNetwork::LinkedIn), None);
    }

    #[test]
    fn trailing_prose_punctuation_is_trimmed() {
        let html = "<p>Siga (https://instagram.com/padaria).</p>";
        assert_eq!(
            extract(html, SocialNetwork::Instagram).as_deref(),
            Some("https://instagram.com/padaria")
        );
        let html = "<p>Curta https://facebook.com/padaria, e comente!</p>";
        assert_eq!(
            extract(html, SocialNetwork::Facebook).as_deref(),
            Some("https://facebook.com/padaria")
        );
    }
}
