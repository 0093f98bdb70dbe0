use crate::app::ports::EnrichOutputPort;
use crate::tabular::Dataset;
use anyhow::Context;
use std::path::PathBuf;
use tracing::info;

/// Writes the enrichment table as a CSV file.
///
/// The file is only created when `write_table` runs, so a run that aborts
/// early leaves no output behind.
pub struct CsvFileOutputAdapter {
    file_path: PathBuf,
}

impl CsvFileOutputAdapter {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

#[async_trait::async_trait]
impl EnrichOutputPort for CsvFileOutputAdapter {
    async fn write_table(&self, table: &Dataset) -> anyhow::Result<()> {
        if let Some(dir) = self.file_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        table
            .write_path(&self.file_path)
            .with_context(|| format!("Error writing to '{}'", self.file_path.display()))?;
        info!(
            "Successfully wrote {} rows to '{}'.",
            table.len(),
            self.file_path.display()
        );
        Ok(())
    }
}
