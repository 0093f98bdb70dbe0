use crate::app::ports::PlaceLookupPort;
use crate::config::{ApiKey, PlacesConfig};
use crate::error::{EnricherError, Result};
use crate::places::{Place, SearchTextRequest, SearchTextResponse};
use async_trait::async_trait;
use tracing::{debug, error, instrument, warn};

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

/// Places text-search client over `reqwest`. One POST per lookup, no retries.
pub struct PlacesHttpClient {
    client: reqwest::Client,
    api_url: String,
    field_mask: String,
    api_key: ApiKey,
}

impl PlacesHttpClient {
    pub fn new(config: &PlacesConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(EnricherError::Config("Places API key is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            field_mask: config.field_mask.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn search_text(&self, business_name: &str) -> std::result::Result<(u16, String), reqwest::Error> {
        let resp = self
            .client
            .post(&self.api_url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .header(FIELD_MASK_HEADER, &self.field_mask)
            .json(&SearchTextRequest {
                text_query: business_name,
            })
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok((status, body))
    }
}

/// Decode a text-search response body and take the first candidate.
pub fn parse_first_place(body: &str) -> Result<Option<Place>> {
    let response: SearchTextResponse = serde_json::from_str(body)?;
    Ok(response.into_first())
}

#[async_trait]
impl PlaceLookupPort for PlacesHttpClient {
    #[instrument(skip(self))]
    async fn lookup(&self, business_name: &str) -> Option<Place> {
        if business_name.trim().is_empty() {
            warn!("Skipping empty business name.");
            return None;
        }

        let (status, body) = match self.search_text(business_name).await {
            Ok(r) => r,
            Err(e) => {
                error!("API request failed for '{}': {}", business_name, e);
                if let Some(status) = e.status() {
                    error!("Response status: {}", status);
                }
                return None;
            }
        };
        debug!("Places response status={} size={} bytes", status, body.len());

        if !(200..300).contains(&status) {
            error!("API request failed for '{}': status {}", business_name, status);
            error!("Response text: {}", body);
            return None;
        }

        match parse_first_place(&body) {
            Ok(Some(place)) => Some(place),
            Ok(None) => {
                warn!("No place found for '{}'. Response: {}", business_name, body);
                None
            }
            Err(e) => {
                error!(
                    "An unexpected error occurred processing '{}': {}",
                    business_name, e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_place_takes_first() {
        let body = r#"{"places":[{"rating":4.2,"userRatingCount":7},{"rating":1.0}]}"#;
        let place = parse_first_place(body).unwrap().unwrap();
        assert_eq!(place.rating.unwrap().to_string(), "4.2");
        assert_eq!(place.user_rating_count, Some(7));
    }

    #[test]
    fn test_parse_first_place_empty() {
        assert!(parse_first_place("{}").unwrap().is_none());
        assert!(parse_first_place(r#"{"places":[]}"#).unwrap().is_none());
    }

    #[test]
    fn test_parse_first_place_malformed() {
        assert!(parse_first_place("<html>oops</html>").is_err());
    }

    #[test]
    fn test_new_requires_key() {
        let config = PlacesConfig::default();
        assert!(PlacesHttpClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_empty_name_returns_none() {
        let config = PlacesConfig {
            api_key: ApiKey::new("KEY"),
            // Unroutable; the empty name must short-circuit before any request
            api_url: "http://127.0.0.1:9/places:searchText".into(),
            ..PlacesConfig::default()
        };
        let client = PlacesHttpClient::new(&config).unwrap();
        assert!(client.lookup("   ").await.is_none());
    }
}
