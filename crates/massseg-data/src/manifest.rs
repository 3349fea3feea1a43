//! CSV manifest of validation examples.
//!
//! Every row names an image and its label, both relative to the data
//! directory. There is no header row; columns after the second are ignored.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use rand::Rng;

use crate::error::{DatasetError, DatasetResult};

/// One validation example: image and label paths relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub image: PathBuf,
    pub label: PathBuf,
}

impl ManifestEntry {
    pub fn new(image: impl Into<PathBuf>, label: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            label: label.into(),
        }
    }
}

/// Ordered, immutable list of validation examples.
///
/// The manifest is read once; every call to [`Manifest::iter`] starts a
/// fresh pass from the first entry.
#[derive(Debug, Clone)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Wraps a list of entries.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::EmptyManifest`] if `entries` is empty.
    pub fn new(entries: Vec<ManifestEntry>) -> DatasetResult<Self> {
        if entries.is_empty() {
            return Err(DatasetError::EmptyManifest);
        }
        Ok(Self { entries })
    }

    /// Reads a manifest from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not valid CSV, has a
    /// row with fewer than two non-empty fields, or has no rows.
    pub fn from_csv(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::ManifestReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest = Self::from_reader(file)?;
        tracing::info!(
            manifest = %path.display(),
            examples = manifest.len(),
            "loaded validation manifest"
        );
        Ok(manifest)
    }

    /// Reads a manifest from any CSV source.
    ///
    /// # Errors
    ///
    /// See [`Manifest::from_csv`].
    pub fn from_reader<R: Read>(reader: R) -> DatasetResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);

            match (record.get(0), record.get(1)) {
                (Some(image), Some(label)) if !image.is_empty() && !label.is_empty() => {
                    entries.push(ManifestEntry::new(image, label));
                }
                _ => {
                    return Err(DatasetError::MalformedRow {
                        line,
                        fields: record.iter().filter(|field| !field.is_empty()).count(),
                    });
                }
            }
        }

        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: construction rejects empty manifests.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Starts a new pass over the entries, in read order.
    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }

    /// Picks one entry uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &ManifestEntry {
        &self.entries[rng.random_range(0..self.entries.len())]
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
