//! Wire types for `places:searchText`.

use leadgen_core::BusinessRecord;
use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/places:searchText`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSearchRequest<'a> {
    pub text_query: &'a str,
    pub language_code: &'a str,
    pub region_code: &'a str,
    pub max_result_count: u32,
}

/// Response envelope. The API omits `places` entirely when nothing matched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextSearchResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub website_uri: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub text: String,
}

impl Place {
    /// Converts to a [`BusinessRecord`]; places without a display name are dropped.
    #[must_use]
    pub fn into_business(self) -> Option<BusinessRecord> {
        let name = self.display_name.map(|d| d.text)?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(BusinessRecord {
            name: name.to_string(),
            phone: self.international_phone_number,
            website: self.website_uri,
            address: self.formatted_address,
            ..BusinessRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_camel_case() {
        let body = TextSearchRequest {
            text_query: "padaria em Campinas",
            language_code: "pt-BR",
            region_code: "BR",
            max_result_count: 20,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "textQuery": "padaria em Campinas",
                "languageCode": "pt-BR",
                "regionCode": "BR",
                "maxResultCount": 20
            })
        );
    }

    #[test]
    fn empty_response_has_no_places() {
        let resp: TextSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.places.is_empty());
    }

    #[test]
    fn place_maps_to_business_record() {
        let place: Place = serde_json::from_value(serde_json::json!({
            "displayName": { "text": " Padaria Silva ", "languageCode": "pt" },
            "formattedAddress": "Rua das Flores, 10 - Campinas, SP",
            "internationalPhoneNumber": "+55 19 98888-7777",
            "websiteUri": "https://padariasilva.com.br/"
        }))
        .unwrap();
        let record = place.into_business().unwrap();
        assert_eq!(record.name, "Padaria Silva");
        assert_eq!(record.phone.as_deref(), Some("+55 19 98888-7777"));
        assert_eq!(record.website.as_deref(), Some("https://padariasilva.com.br/"));
        assert_eq!(
            record.address.as_deref(),
            Some("Rua das Flores, 10 - Campinas, SP")
        );
        assert_eq!(record.email, None);
    }

    #[test]
    fn nameless_place_is_dropped() {
        let place: Place = serde_json::from_value(serde_json::json!({
            "formattedAddress": "Somewhere"
        }))
        .unwrap();
        assert!(place.into_business().is_none());
    }
}
