//! # rattler_build_matrix_index
//!
//! The package index consulted while expanding a build matrix. An index answers
//! two questions: which versions of a package exist, and what a given version
//! depends on.
//!
//! [`InMemoryIndex`] is the provided implementation. It can be filled by hand
//! or from local `repodata.json` files:
//!
//! ```rust
//! use std::str::FromStr;
//!
//! use rattler_build_matrix_index::{InMemoryIndex, PackageIndex};
//! use rattler_conda_types::Version;
//!
//! let mut index = InMemoryIndex::new();
//! index.add_package("python", "2.7.2", Vec::<String>::new());
//! index.add_package("python", "2.6.2", Vec::<String>::new());
//! index.add_package("numpy", "1.8.0", ["python"]);
//!
//! let versions: Vec<String> = index.versions_of("python").iter().map(|v| v.to_string()).collect();
//! assert_eq!(versions, vec!["2.6.2", "2.7.2"]);
//!
//! let numpy = Version::from_str("1.8.0").unwrap();
//! assert_eq!(index.dependencies_of("numpy", &numpy), vec!["python"]);
//! ```

mod error;
mod memory;
mod repodata;

pub use error::IndexError;
pub use memory::{InMemoryIndex, IndexEntry};

use rattler_conda_types::{Version, VersionWithSource};

/// Read access to a package index. Queries must be deterministic for the
/// duration of a resolution.
pub trait PackageIndex {
    /// All versions of `package` in conda order, without duplicates. Each
    /// version keeps the string it was published as.
    fn versions_of(&self, package: &str) -> Vec<VersionWithSource>;

    /// The dependency specs of all builds of `package` at `version`.
    fn dependencies_of(&self, package: &str, version: &Version) -> Vec<String>;

    /// The dependency specs of `package` at `version`, one list per build.
    ///
    /// A version that was built several times (for example once per python
    /// version) has several lists. The default treats all dependencies as one
    /// build.
    fn dependency_sets_of(&self, package: &str, version: &Version) -> Vec<Vec<String>> {
        vec![self.dependencies_of(package, version)]
    }
}

impl<T: PackageIndex + ?Sized> PackageIndex for &T {
    fn versions_of(&self, package: &str) -> Vec<VersionWithSource> {
        (**self).versions_of(package)
    }

    fn dependencies_of(&self, package: &str, version: &Version) -> Vec<String> {
        (**self).dependencies_of(package, version)
    }

    fn dependency_sets_of(&self, package: &str, version: &Version) -> Vec<Vec<String>> {
        (**self).dependency_sets_of(package, version)
    }
}
