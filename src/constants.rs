/// Fixed names and endpoints shared by both tools.

// Column names
pub const BUSINESS_NAME_COLUMN: &str = "Business Name";
pub const REVIEW_COUNT_COLUMN: &str = "review count";
pub const RATING_COLUMN: &str = "rating";
pub const PHOTO_COLUMN_PREFIX: &str = "photos_";
pub const ATTRIBUTIONS_COLUMN: &str = "image_attributions";

// Default file locations for the enricher
pub const DEFAULT_INPUT_FILENAME: &str = "input.csv";
pub const DEFAULT_OUTPUT_FILENAME: &str = "output.csv";
pub const DEFAULT_CONFIG_FILENAME: &str = "enricher.toml";

// Google Places (New) API
pub const API_KEY_ENV: &str = "GOOGLE_PLACES_API_KEY";
pub const API_URL_ENV: &str = "PLACES_API_URL";
pub const PLACES_API_URL: &str = "https://places.googleapis.com/v1/places:searchText";
pub const PLACES_PHOTO_BASE_URL: &str = "https://places.googleapis.com/v1";
pub const FIELD_MASK: &str = "places.rating,places.userRatingCount,places.photos";
pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 400;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Separators used when flattening photo attributions into one cell
pub const AUTHOR_SEPARATOR: &str = "; ";
pub const PHOTO_ATTRIBUTION_SEPARATOR: &str = " | ";

/// Header name for the photo slot at `index`.
pub fn photo_column(index: usize) -> String {
    format!("{}{}", PHOTO_COLUMN_PREFIX, index)
}
