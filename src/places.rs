//! Wire shapes for the Places API (New) text search.
//!
//! Only the fields named in the request field mask are modelled; everything is
//! optional because the API omits fields it has no data for.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextRequest<'a> {
    pub text_query: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

impl SearchTextResponse {
    /// The API orders candidates by relevance; only the first is used.
    pub fn into_first(self) -> Option<Place> {
        self.places.into_iter().next()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Kept as the JSON number so the textual form survives (`4.0` stays `4.0`)
    #[serde(default)]
    pub rating: Option<serde_json::Number>,
    #[serde(default)]
    pub user_rating_count: Option<u64>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Resource name, `places/{place_id}/photos/{photo_reference}`
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub author_attributions: Vec<AuthorAttribution>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorAttribution {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

impl AuthorAttribution {
    /// `"{display name}: {uri}"`, missing parts rendered empty.
    pub fn credit(&self) -> String {
        format!(
            "{}: {}",
            self.display_name.as_deref().unwrap_or(""),
            self.uri.as_deref().unwrap_or("")
        )
    }
}

/// Media URL for a photo resource.
///
/// Returns an empty string when either the credential or the photo name is
/// empty; callers skip the photo in that case.
pub fn build_photo_url(base_url: &str, api_key: &str, photo_name: &str, max_width: u32) -> String {
    if api_key.is_empty() || photo_name.is_empty() {
        return String::new();
    }
    format!(
        "{}/{}/media?key={}&maxWidthPx={}",
        base_url.trim_end_matches('/'),
        photo_name,
        api_key,
        max_width
    )
}
