use crate::error::{EnricherError, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// An in-memory CSV table: one header row plus string cells.
///
/// Every row is kept exactly as wide as the header. Short input rows are
/// padded with empty cells and cells past the header are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Read a dataset from a CSV file with a header row.
    pub fn read_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;
        debug!(
            "Read {} rows with {} columns from {}",
            dataset.len(),
            dataset.headers.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();
        if let Some(first) = headers.first_mut() {
            if let Some(stripped) = first.strip_prefix('\u{feff}') {
                *first = stripped.to_string();
            }
        }

        let mut dataset = Self::new(headers);
        for record in csv_reader.records() {
            let record = record?;
            dataset.push_row(record.iter().map(|c| c.to_string()).collect());
        }
        Ok(dataset)
    }

    /// Write the dataset to `path`, replacing any existing file.
    pub fn write_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.to_writer(file)?;
        debug!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Append a row, fitting it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All values of one column in row order, or a `MissingColumn` error
    /// naming `source_name`.
    pub fn column_values(&self, name: &str, source_name: &str) -> Result<Vec<&str>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| EnricherError::missing_column(name, source_name))?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader_pads_and_truncates_rows() {
        let input = "id,x,y\n1,a\n2,b,c,extra\n";
        let dataset = Dataset::from_reader(input.as_bytes()).unwrap();

        assert_eq!(dataset.headers, vec!["id", "x", "y"]);
        assert_eq!(dataset.rows[0], vec!["1", "a", ""]);
        assert_eq!(dataset.rows[1], vec!["2", "b", "c"]);
    }

    #[test]
    fn test_from_reader_strips_bom() {
        let input = "\u{feff}Business Name,city\nAcme,Seattle\n";
        let dataset = Dataset::from_reader(input.as_bytes()).unwrap();
        assert_eq!(dataset.column_index("Business Name"), Some(0));
    }

    #[test]
    fn test_to_writer_quotes_fields() {
        let mut dataset = Dataset::new(vec!["name".into(), "note".into()]);
        dataset.push_row(vec!["Joe's, Inc".into(), "says \"hi\"".into()]);

        let mut out = Vec::new();
        dataset.to_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, "name,note\n\"Joe's, Inc\",\"says \"\"hi\"\"\"\n");
    }

    #[test]
    fn test_column_values_missing_column() {
        let dataset = Dataset::new(vec!["id".into()]);
        let err = dataset.column_values("Business Name", "input.csv").unwrap_err();
        assert_eq!(err.to_string(), "Column 'Business Name' not found in input.csv");
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let dataset = Dataset::from_reader("id,name\n".as_bytes()).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.headers.len(), 2);
    }
}
