use std::{collections::BTreeMap, str::FromStr};

use rattler_conda_types::{Version, VersionWithSource};

use crate::PackageIndex;

/// A single package build known to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// The normalized package name.
    pub name: String,
    /// The version, keeping the string it was published as.
    pub version: VersionWithSource,
    /// The build string (`py27_0`), empty for hand-made entries.
    pub build: String,
    /// The build number.
    pub build_number: u64,
    /// Dependency specs such as `python 2.7*` or `python >=2.7,<2.8.0a0`.
    pub depends: Vec<String>,
}

/// A package index held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    packages: BTreeMap<String, Vec<IndexEntry>>,
}

impl InMemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a build of `name` at `version` with the given dependency specs.
    /// A version that is not a valid conda version is logged and skipped.
    pub fn add_package<I, S>(
        &mut self,
        name: impl Into<String>,
        version: impl AsRef<str>,
        depends: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into().to_ascii_lowercase();
        let version = match VersionWithSource::from_str(version.as_ref()) {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!("Ignoring {name} {}: {e}", version.as_ref());
                return self;
            }
        };
        self.add_entry(IndexEntry {
            name,
            version,
            build: String::new(),
            build_number: 0,
            depends: depends.into_iter().map(Into::into).collect(),
        })
    }

    /// Add a fully described entry.
    pub fn add_entry(&mut self, entry: IndexEntry) -> &mut Self {
        self.packages
            .entry(entry.name.to_ascii_lowercase())
            .or_default()
            .push(entry);
        self
    }

    /// Add all entries of another index.
    pub fn extend(&mut self, other: InMemoryIndex) -> &mut Self {
        for entry in other.packages.into_values().flatten() {
            self.add_entry(entry);
        }
        self
    }

    /// All entries of `package`, in insertion order.
    pub fn entries(&self, package: &str) -> &[IndexEntry] {
        self.packages
            .get(&package.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The number of entries in the index.
    pub fn len(&self) -> usize {
        self.packages.values().map(Vec::len).sum()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Entries of `package` at `version`. `2.7` and `2.7.0` are the same
    /// version.
    fn builds_of<'a>(
        &'a self,
        package: &str,
        version: &'a Version,
    ) -> impl Iterator<Item = &'a IndexEntry> + 'a {
        self.entries(package)
            .iter()
            .filter(move |entry| entry.version.version() == version)
    }
}

impl PackageIndex for InMemoryIndex {
    fn versions_of(&self, package: &str) -> Vec<VersionWithSource> {
        let mut versions: Vec<VersionWithSource> = self
            .entries(package)
            .iter()
            .map(|entry| entry.version.clone())
            .collect();
        versions.sort();
        versions.dedup_by(|a, b| a.version() == b.version());
        versions
    }

    fn dependencies_of(&self, package: &str, version: &Version) -> Vec<String> {
        let mut depends: Vec<String> = Vec::new();
        for dependency in self.builds_of(package, version).flat_map(|e| &e.depends) {
            if !depends.contains(dependency) {
                depends.push(dependency.clone());
            }
        }
        depends
    }

    fn dependency_sets_of(&self, package: &str, version: &Version) -> Vec<Vec<String>> {
        self.builds_of(package, version)
            .map(|entry| entry.depends.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index() -> InMemoryIndex {
        let mut index = InMemoryIndex::new();
        index
            .add_package("python", "2.7.2", Vec::<String>::new())
            .add_package("python", "2.6.2", Vec::<String>::new())
            .add_package("python", "3.5.0", Vec::<String>::new())
            .add_package("numpy", "1.8.0", ["python 2.7*"])
            .add_package("numpy", "1.8.0", ["python 3.5*"])
            .add_package("numpy", "1.10.4", ["python >=3"]);
        index
    }

    fn versions(index: &InMemoryIndex, package: &str) -> Vec<String> {
        index
            .versions_of(package)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn v(s: &str) -> Version {
        Version::from_str(s).unwrap()
    }

    #[test]
    fn test_versions_are_sorted_and_unique() {
        let index = index();
        assert_eq!(versions(&index, "python"), vec!["2.6.2", "2.7.2", "3.5.0"]);
        assert_eq!(versions(&index, "numpy"), vec!["1.8.0", "1.10.4"]);
        assert_eq!(versions(&index, "perl"), Vec::<String>::new());
    }

    #[test]
    fn test_conda_ordering() {
        let mut index = InMemoryIndex::new();
        for version in ["1.0", "1.0a1", "1.0dev1", "1.0.post1", "1.0rc1"] {
            index.add_package("pkg", version, Vec::<String>::new());
        }
        assert_eq!(
            versions(&index, "pkg"),
            vec!["1.0dev1", "1.0a1", "1.0rc1", "1.0", "1.0.post1"]
        );
    }

    #[test]
    fn test_dependencies_of_merges_builds() {
        let index = index();
        assert_eq!(
            index.dependencies_of("numpy", &v("1.8.0")),
            vec!["python 2.7*", "python 3.5*"]
        );
        assert_eq!(
            index.dependency_sets_of("numpy", &v("1.8.0")),
            vec![vec!["python 2.7*"], vec!["python 3.5*"]]
        );
        assert_eq!(
            index.dependencies_of("numpy", &v("1.8")),
            vec!["python 2.7*", "python 3.5*"]
        );
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let mut index = InMemoryIndex::new();
        index.add_package("NumPy", "1.8.0", ["python"]);
        assert_eq!(versions(&index, "numpy"), vec!["1.8.0"]);
        assert_eq!(index.entries("NUMPY").len(), 1);
    }

    #[test]
    fn test_invalid_versions_are_ignored() {
        let mut index = InMemoryIndex::new();
        index
            .add_package("python", "2.7.2", Vec::<String>::new())
            .add_package("python", "not a version", Vec::<String>::new());
        assert_eq!(versions(&index, "python"), vec!["2.7.2"]);
        assert_eq!(index.len(), 1);
    }
}
