use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnricherError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Column '{column}' not found in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("Merge would produce duplicate column '{0}'")]
    DuplicateColumn(String),
}

impl EnricherError {
    pub fn missing_column(column: &str, source_name: impl Into<String>) -> Self {
        EnricherError::MissingColumn {
            column: column.to_string(),
            source_name: source_name.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EnricherError>;
