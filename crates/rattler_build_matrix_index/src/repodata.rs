//! Populating an [`InMemoryIndex`] from `repodata.json` files.

use std::path::Path;

use rattler_conda_types::{PackageRecord, RepoData};

use crate::{IndexEntry, InMemoryIndex, error::IndexError};

impl From<&PackageRecord> for IndexEntry {
    fn from(record: &PackageRecord) -> Self {
        IndexEntry {
            name: record.name.as_normalized().to_string(),
            version: record.version.clone(),
            build: record.build.clone(),
            build_number: record.build_number,
            depends: record.depends.clone(),
        }
    }
}

impl InMemoryIndex {
    /// Build an index from parsed repodata. Both `.tar.bz2` and `.conda`
    /// records are included.
    pub fn from_repodata(repodata: &RepoData) -> Self {
        let mut index = InMemoryIndex::new();
        for record in repodata
            .packages
            .values()
            .chain(repodata.conda_packages.values())
        {
            index.add_entry(IndexEntry::from(record));
        }
        index
    }

    /// Parse a repodata document.
    pub fn from_repodata_str(input: &str, path: &Path) -> Result<Self, IndexError> {
        let repodata: RepoData =
            serde_json::from_str(input).map_err(|source| IndexError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_repodata(&repodata))
    }

    /// Load a local `repodata.json` file.
    pub fn from_repodata_path(path: &Path) -> Result<Self, IndexError> {
        let input = fs_err::read_to_string(path)
            .map_err(|e| IndexError::IoError(path.to_path_buf(), e))?;
        let index = Self::from_repodata_str(&input, path)?;
        tracing::debug!(
            "Loaded {} package records from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    /// Load and merge several `repodata.json` files.
    pub fn from_repodata_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, IndexError> {
        let mut index = InMemoryIndex::new();
        for path in paths {
            index.extend(Self::from_repodata_path(path.as_ref())?);
        }
        Ok(index)
    }
}
