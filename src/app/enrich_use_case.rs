use tracing::{error, info, warn};

use crate::app::ports::{EnrichOutputPort, PlaceLookupPort};
use crate::config::{ApiKey, EnricherConfig};
use crate::observability::metrics;
use crate::pipeline::enrich::{EnrichedBusiness, EnrichmentTable, PhotoSettings};

/// Settings the use case needs to turn lookups into rows.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub name_column: String,
    pub photo_base_url: String,
    pub api_key: ApiKey,
    pub photo_max_width: u32,
    pub max_photos: Option<usize>,
}

impl EnrichOptions {
    pub fn from_config(config: &EnricherConfig) -> Self {
        Self {
            name_column: config.name_column.clone(),
            photo_base_url: config.places.photo_base_url.clone(),
            api_key: config.places.api_key.clone(),
            photo_max_width: config.places.photo_max_width,
            max_photos: config.max_photos,
        }
    }

    fn photo_settings(&self) -> PhotoSettings<'_> {
        PhotoSettings {
            base_url: &self.photo_base_url,
            api_key: self.api_key.expose(),
            max_width: self.photo_max_width,
            max_photos: self.max_photos,
        }
    }
}

/// Outcome of one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub processed: usize,
    pub found: usize,
    pub not_found: usize,
    pub skipped: usize,
    pub max_photos: usize,
    pub written: bool,
}

/// Looks up every business in order, buffers the rows and writes them once
/// the photo column count is known.
pub struct EnrichUseCase {
    lookup: Box<dyn PlaceLookupPort>,
    output: Box<dyn EnrichOutputPort>,
    options: EnrichOptions,
}

impl EnrichUseCase {
    pub fn new(
        lookup: Box<dyn PlaceLookupPort>,
        output: Box<dyn EnrichOutputPort>,
        options: EnrichOptions,
    ) -> Self {
        Self {
            lookup,
            output,
            options,
        }
    }

    /// Enrich all rows without writing them.
    pub async fn build_table(&self, names: &[String]) -> (EnrichmentTable, EnrichSummary) {
        let photos = self.options.photo_settings();
        let mut table = EnrichmentTable::new(self.options.name_column.clone());
        let mut summary = EnrichSummary::default();
        let total = names.len();

        for (i, name) in names.iter().enumerate() {
            info!("Processing {}/{}: '{}'", i + 1, total, name);
            summary.processed += 1;

            if name.trim().is_empty() {
                warn!("Skipping empty business name.");
                metrics::lookup::skipped();
                summary.skipped += 1;
                table.push(EnrichedBusiness::unmatched(name.clone()));
                continue;
            }

            let place = self.lookup.lookup(name).await;
            match &place {
                Some(p) => {
                    summary.found += 1;
                    metrics::lookup::success();
                    metrics::lookup::photos(p.photos.len());
                }
                None => {
                    summary.not_found += 1;
                    metrics::lookup::failed();
                }
            }
            table.push(EnrichedBusiness::from_lookup(name.clone(), place.as_ref(), &photos));
        }

        summary.max_photos = table.max_photos();
        (table, summary)
    }

    /// Enrich and write. A write failure is logged and reflected in
    /// `EnrichSummary::written`; lookups already done are not retried.
    pub async fn run(&self, names: &[String]) -> EnrichSummary {
        let (table, mut summary) = self.build_table(names).await;

        if table.is_empty() {
            warn!("No results to write to output file.");
            return summary;
        }

        let dataset = table.to_dataset();
        match self.output.write_table(&dataset).await {
            Ok(()) => {
                metrics::output::rows_written(dataset.len());
                info!(
                    "Wrote {} rows with {} photo columns",
                    dataset.len(),
                    summary.max_photos
                );
                summary.written = true;
            }
            Err(e) => {
                error!("Error writing enrichment output: {:#}", e);
            }
        }
        summary
    }
}
