use serde::{Deserialize, Serialize};

/// One company candidate returned by a places-search provider.
///
/// `name`, `phone`, `website`, and `address` come from the provider and are
/// passed through enrichment untouched. The remaining fields are enrichment
/// targets that start absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "telefone")]
    pub phone: Option<String>,
    #[serde(default, alias = "site")]
    pub website: Option<String>,
    #[serde(default, alias = "endereco")]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
}

impl BusinessRecord {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// The phone text, if present and not blank.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        non_empty(self.phone.as_deref())
    }

    /// The website text, if present and not blank.
    #[must_use]
    pub fn website(&self) -> Option<&str> {
        non_empty(self.website.as_deref())
    }

    /// Whether `other` refers to the same company.
    ///
    /// Matches on case-insensitive name, or on identical non-empty phone text.
    /// Nothing smarter than that is attempted.
    #[must_use]
    pub fn is_same_business(&self, other: &BusinessRecord) -> bool {
        let same_name = !self.name.trim().is_empty()
            && self.name.trim().to_lowercase() == other.name.trim().to_lowercase();
        let same_phone = match (self.phone(), other.phone()) {
            (Some(a), Some(b)) => a.trim() == b.trim(),
            _ => false,
        };
        same_name || same_phone
    }

    /// Names of the contact channels that hold a value.
    #[must_use]
    pub fn found_channels(&self) -> Vec<&'static str> {
        [
            ("email", &self.email),
            ("whatsapp", &self.whatsapp),
            ("linkedin", &self.linkedin),
            ("facebook", &self.facebook),
            ("instagram", &self.instagram),
        ]
        .into_iter()
        .filter(|(_, value)| non_empty(value.as_deref()).is_some())
        .map(|(label, _)| label)
        .collect()
    }
}

/// Treat blank strings the same as an absent value.
#[must_use]
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
