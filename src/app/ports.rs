use async_trait::async_trait;

use crate::places::Place;
use crate::tabular::Dataset;

/// Looks a business up by free-text name.
///
/// Implementations never fail the run: every problem is logged and reported as
/// `None`.
#[async_trait]
pub trait PlaceLookupPort: Send + Sync {
    async fn lookup(&self, business_name: &str) -> Option<Place>;
}

/// Receives the finished enrichment table.
#[async_trait]
pub trait EnrichOutputPort: Send + Sync {
    async fn write_table(&self, table: &Dataset) -> anyhow::Result<()>;
}
