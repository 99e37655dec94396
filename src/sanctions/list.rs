use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SanctionsLoadError {
    #[error("cannot open sanctions file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed sanctions CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("sanctions CSV has no 'name' column")]
    MissingNameColumn,
}

/// Immutable, lower-cased snapshot of sanctioned names in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanctionsList {
    names: Vec<String>,
}

impl SanctionsList {
    /// Build a list from raw names. Empty entries are dropped and the rest lower-cased.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .filter(|n| !n.as_ref().trim().is_empty())
            .map(|n| n.as_ref().to_lowercase())
            .collect();
        SanctionsList { names }
    }

    /// Read a CSV with a `name` header column.
    pub fn load(path: &Path) -> Result<Self, SanctionsLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, SanctionsLoadError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let name_idx = rdr
            .headers()?
            .iter()
            .position(|h| h == "name")
            .ok_or(SanctionsLoadError::MissingNameColumn)?;

        let mut names = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if let Some(name) = record.get(name_idx) {
                names.push(name.to_string());
            }
        }

        Ok(Self::from_names(names))
    }

    /// Load `path`, degrading to an empty list on any failure.
    ///
    /// This is the process-start path: failures are logged once here and every
    /// later screening call simply reports no match.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(list) if list.is_empty() => {
                warn!(path = %path.display(), "sanctions file contains no names, list is empty");
                list
            }
            Ok(list) => {
                info!(path = %path.display(), count = list.len(), "loaded sanctions list");
                list
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load sanctions list, list will be empty");
                SanctionsList::default()
            }
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
