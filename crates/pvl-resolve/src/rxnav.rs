//! Online ingredient lookup against the RxNav REST API.

use std::time::Duration;

use pvl_model::{ResolverConfig, Rxcui};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::trace;

use crate::error::{LookupError, ResolveError, Result};
use crate::lookup::IngredientLookup;

/// Term type of ingredient concepts.
const INGREDIENT_TTY: &str = "IN";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RelatedResponse {
    related_group: Option<RelatedGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelatedGroup {
    #[serde(default)]
    concept_group: Vec<ConceptGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConceptGroup {
    tty: Option<String>,
    #[serde(default)]
    concept_properties: Vec<ConceptProperties>,
}

#[derive(Debug, Deserialize)]
struct ConceptProperties {
    rxcui: String,
}

impl RelatedResponse {
    /// First concept of the first ingredient group.
    pub(crate) fn ingredient(&self, rxcui: Rxcui) -> std::result::Result<Option<Rxcui>, LookupError> {
        let first = self
            .related_group
            .iter()
            .flat_map(|group| &group.concept_group)
            .filter(|group| group.tty.as_deref() == Some(INGREDIENT_TTY))
            .find_map(|group| group.concept_properties.first());
        let Some(concept) = first else {
            return Ok(None);
        };
        concept
            .rxcui
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LookupError::Malformed {
                rxcui,
                message: format!("non-numeric ingredient rxcui '{}'", concept.rxcui),
            })
    }
}

/// Blocking RxNav client; one GET per product.
pub struct RxNavClient {
    client: Client,
    base_url: String,
}

impl RxNavClient {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ResolveError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn related_url(&self, rxcui: Rxcui) -> String {
        format!("{}/rxcui/{rxcui}/related.json?tty={INGREDIENT_TTY}", self.base_url)
    }
}

impl IngredientLookup for RxNavClient {
    fn name(&self) -> &'static str {
        "rxnav"
    }

    fn lookup(&self, rxcui: Rxcui) -> std::result::Result<Option<Rxcui>, LookupError> {
        let url = self.related_url(rxcui);
        trace!(%url, "Requesting related concepts");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, concat!("pvl/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|source| LookupError::Network { rxcui, source })?;

        if !response.status().is_success() {
            return Err(LookupError::Status {
                rxcui,
                status: response.status().as_u16(),
            });
        }

        let body: RelatedResponse = response.json().map_err(|err| LookupError::Malformed {
            rxcui,
            message: err.to_string(),
        })?;
        body.ingredient(rxcui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RelatedResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn picks_first_ingredient_group() {
        let body = parse(
            r#"{"relatedGroup":{"rxcui":"313782","termType":["IN"],"conceptGroup":[
                {"tty":"BN"},
                {"tty":"IN","conceptProperties":[
                    {"rxcui":"161","name":"acetaminophen","tty":"IN"},
                    {"rxcui":"999","name":"other","tty":"IN"}
                ]}
            ]}}"#,
        );
        assert_eq!(body.ingredient(313782).unwrap(), Some(161));
    }

    #[test]
    fn empty_group_has_no_ingredient() {
        assert_eq!(parse(r#"{"relatedGroup":{"conceptGroup":[{"tty":"IN"}]}}"#).ingredient(1).unwrap(), None);
        assert_eq!(parse("{}").ingredient(1).unwrap(), None);
    }

    #[test]
    fn non_numeric_rxcui_is_malformed() {
        let body = parse(
            r#"{"relatedGroup":{"conceptGroup":[{"tty":"IN","conceptProperties":[{"rxcui":"abc"}]}]}}"#,
        );
        assert!(matches!(body.ingredient(7), Err(LookupError::Malformed { rxcui: 7, .. })));
    }

    #[test]
    fn url_has_no_double_slash() {
        let config = ResolverConfig {
            base_url: "https://rxnav.example/REST/".into(),
            ..ResolverConfig::default()
        };
        let client = RxNavClient::new(&config).unwrap();
        assert_eq!(
            client.related_url(42),
            "https://rxnav.example/REST/rxcui/42/related.json?tty=IN"
        );
    }
}
