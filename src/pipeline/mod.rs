// The two pipelines: key-column merge and Places enrichment

pub mod enrich;
pub mod merge;

pub use enrich::{EnrichedBusiness, EnrichmentTable};
pub use merge::{merge, merge_files, JoinMode, MergeSummary};
