use crate::utils::error::Result;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Mapping from Morse token to decoded character.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    mapping: HashMap<String, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `character,token` records and merges them into the table.
    ///
    /// Records with fewer than two fields are skipped. A later record for the
    /// same token replaces an earlier one. Nothing is merged unless the whole
    /// source reads cleanly. Returns the number of records applied.
    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> Result<usize> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut staged = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            if record.len() < 2 {
                tracing::debug!("Skipping short symbol record: {:?}", record);
                continue;
            }
            staged.push((record[1].to_string(), record[0].to_string()));
        }

        let applied = staged.len();
        self.mapping.extend(staged);
        Ok(applied)
    }

    /// Loads the table from a CSV file.
    ///
    /// Failures are logged and leave the table as it was; the service keeps
    /// running with whatever mappings it already has.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> usize {
        let path = path.as_ref();
        let result = File::open(path)
            .map_err(Into::into)
            .and_then(|file| self.load_from_reader(file));

        match result {
            Ok(_) => {
                tracing::info!(
                    "Loaded {} morse code mappings from {}",
                    self.mapping.len(),
                    path.display()
                );
            }
            Err(e) => {
                tracing::error!("Error loading morse mappings from {}: {}", path.display(), e);
            }
        }

        self.mapping.len()
    }

    /// Returns `primary` when it exists, otherwise a file with the same
    /// basename in the working directory.
    pub fn resolve_path<P: AsRef<Path>>(primary: P) -> PathBuf {
        let primary = primary.as_ref();
        if primary.exists() {
            return primary.to_path_buf();
        }

        match primary.file_name() {
            Some(name) => {
                tracing::debug!(
                    "{} not found, falling back to local {}",
                    primary.display(),
                    Path::new(name).display()
                );
                PathBuf::from(name)
            }
            None => primary.to_path_buf(),
        }
    }

    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.mapping.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SymbolTable {
    /// Builds a table from `(token, character)` pairs.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            mapping: iter
                .into_iter()
                .map(|(token, character)| (token.into(), character.into()))
                .collect(),
        }
    }
}
