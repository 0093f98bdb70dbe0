use crate::constants::{
    photo_column, ATTRIBUTIONS_COLUMN, AUTHOR_SEPARATOR, PHOTO_ATTRIBUTION_SEPARATOR,
    RATING_COLUMN, REVIEW_COUNT_COLUMN,
};
use crate::error::Result;
use crate::places::{build_photo_url, Photo, Place};
use crate::tabular::Dataset;
use std::path::Path;
use tracing::{info, warn};

/// Read the business names from `column` of the CSV at `path`, trimmed and in
/// file order.
pub fn load_business_names(path: &Path, column: &str) -> Result<Vec<String>> {
    let dataset = Dataset::read_path(path)?;
    let names: Vec<String> = dataset
        .column_values(column, &path.display().to_string())?
        .into_iter()
        .map(|n| n.trim().to_string())
        .collect();
    info!("Read {} business names from '{}'", names.len(), path.display());
    Ok(names)
}

/// How photo references become URLs.
#[derive(Debug, Clone)]
pub struct PhotoSettings<'a> {
    pub base_url: &'a str,
    pub api_key: &'a str,
    pub max_width: u32,
    /// Photos past this count are dropped
    pub max_photos: Option<usize>,
}

/// One output row: a business name plus what the lookup found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichedBusiness {
    pub name: String,
    pub review_count: String,
    pub rating: String,
    pub photo_urls: Vec<String>,
    pub image_attributions: String,
}

impl EnrichedBusiness {
    /// A row with only the name filled in, used when the lookup found nothing.
    pub fn unmatched(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_lookup(name: impl Into<String>, place: Option<&Place>, photos: &PhotoSettings<'_>) -> Self {
        let name = name.into();
        let Some(place) = place else {
            return Self::unmatched(name);
        };

        let mut candidates: Vec<&Photo> = place.photos.iter().collect();
        if let Some(cap) = photos.max_photos {
            if candidates.len() > cap {
                warn!(
                    "'{}' has {} photos, keeping the first {}",
                    name,
                    candidates.len(),
                    cap
                );
                candidates.truncate(cap);
            }
        }

        let mut photo_urls = Vec::new();
        let mut attributions = Vec::new();
        for photo in candidates {
            let Some(photo_name) = photo.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let url = build_photo_url(photos.base_url, photos.api_key, photo_name, photos.max_width);
            if url.is_empty() {
                continue;
            }
            photo_urls.push(url);
            attributions.push(photo_credit(photo));
        }

        Self {
            name,
            review_count: place
                .user_rating_count
                .map(|c| c.to_string())
                .unwrap_or_default(),
            rating: place.rating.as_ref().map(|r| r.to_string()).unwrap_or_default(),
            photo_urls,
            image_attributions: attributions
                .into_iter()
                .filter(|a| !a.is_empty())
                .collect::<Vec<_>>()
                .join(PHOTO_ATTRIBUTION_SEPARATOR),
        }
    }
}

/// All author credits of one photo, `"; "`-joined.
fn photo_credit(photo: &Photo) -> String {
    photo
        .author_attributions
        .iter()
        .map(|a| a.credit())
        .collect::<Vec<_>>()
        .join(AUTHOR_SEPARATOR)
}

/// Buffers enriched rows until the widest photo list is known.
#[derive(Debug, Clone)]
pub struct EnrichmentTable {
    name_column: String,
    rows: Vec<EnrichedBusiness>,
    max_photos: usize,
}

impl EnrichmentTable {
    pub fn new(name_column: impl Into<String>) -> Self {
        Self {
            name_column: name_column.into(),
            rows: Vec::new(),
            max_photos: 0,
        }
    }

    pub fn push(&mut self, row: EnrichedBusiness) {
        self.max_photos = self.max_photos.max(row.photo_urls.len());
        self.rows.push(row);
    }

    pub fn max_photos(&self) -> usize {
        self.max_photos
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output header: name, review count, rating, one column per photo slot,
    /// attributions.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![
            self.name_column.clone(),
            REVIEW_COUNT_COLUMN.to_string(),
            RATING_COLUMN.to_string(),
        ];
        headers.extend((0..self.max_photos).map(photo_column));
        headers.push(ATTRIBUTIONS_COLUMN.to_string());
        headers
    }

    /// Lay the rows out under [`headers`](Self::headers). Rows with fewer
    /// photos leave the trailing photo cells empty.
    pub fn to_dataset(&self) -> Dataset {
        let mut dataset = Dataset::new(self.headers());
        for row in &self.rows {
            let mut cells = Vec::with_capacity(dataset.headers.len());
            cells.push(row.name.clone());
            cells.push(row.review_count.clone());
            cells.push(row.rating.clone());
            for slot in 0..self.max_photos {
                cells.push(row.photo_urls.get(slot).cloned().unwrap_or_default());
            }
            cells.push(row.image_attributions.clone());
            dataset.push_row(cells);
        }
        dataset
    }
}
