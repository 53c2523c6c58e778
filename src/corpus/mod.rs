use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// One input text unit: the concatenated title, bullet points, and
/// description of a product row. Immutable once read.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(rename = "TITLE", default)]
    title: Option<String>,
    #[serde(rename = "BULLET_POINTS", default)]
    bullet_points: Option<String>,
    #[serde(rename = "DESCRIPTION", default)]
    description: Option<String>,
}

impl ProductRow {
    // Missing fields concatenate as empty strings.
    fn into_document(self) -> Document {
        Document {
            text: format!(
                "{}{}{}",
                self.title.unwrap_or_default(),
                self.bullet_points.unwrap_or_default(),
                self.description.unwrap_or_default()
            ),
        }
    }
}

/// Load the product corpus from a CSV file with `TITLE`, `BULLET_POINTS`,
/// and `DESCRIPTION` columns. A missing or unreadable file is an infra
/// error and aborts the run.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open corpus file: {}", path.display()))?;

    let mut documents = Vec::new();
    for (index, row) in reader.deserialize::<ProductRow>().enumerate() {
        let row = row.with_context(|| format!("Failed to parse corpus row {}", index + 1))?;
        documents.push(row.into_document());
    }

    info!("Loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_corpus(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_corpus_concatenates_fields() {
        let file = write_corpus(
            "TITLE,BULLET_POINTS,DESCRIPTION\n\
             Acme Widget,[waterproof],A red widget.\n",
        );

        let documents = load_corpus(file.path()).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].text, "Acme Widget[waterproof]A red widget.");
    }

    #[test]
    fn test_empty_fields_concatenate_as_empty_strings() {
        let file = write_corpus(
            "TITLE,BULLET_POINTS,DESCRIPTION\n\
             Acme Widget,,\n\
             ,,Only a description.\n",
        );

        let documents = load_corpus(file.path()).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].text, "Acme Widget");
        assert_eq!(documents[1].text, "Only a description.");
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let file = write_corpus(
            "PRODUCT_ID,TITLE,BULLET_POINTS,DESCRIPTION,PRODUCT_LENGTH\n\
             1,Acme Widget,[red],Widget description,10\n",
        );

        let documents = load_corpus(file.path()).unwrap();
        assert_eq!(documents[0].text, "Acme Widget[red]Widget description");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_corpus("/nonexistent/corpus.csv").is_err());
    }
}
