//! # rattler-build-matrix
//!
//! Expands a legacy conda recipe (`meta.yaml` with `# [selector]` lines) into
//! every distribution a package index allows: each consistent combination of
//! python, numpy, perl and r versions becomes a [`ResolvedDistribution`] with
//! a build identifier such as `np18py27_0`.
//!
//! ```rust
//! use rattler_build_matrix::{ResolveOptions, resolve_all};
//! use rattler_build_matrix_index::InMemoryIndex;
//! use rattler_build_matrix_recipe::Recipe;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut index = InMemoryIndex::new();
//! index
//!     .add_package("python", "2.7.2", Vec::<String>::new())
//!     .add_package("python", "3.5.0", Vec::<String>::new());
//!
//! let recipe = Recipe::from_source(
//!     "package:\n  name: demo\n  version: 1.0\nrequirements:\n  build:\n    - python\n",
//! );
//! let distributions = resolve_all(&recipe, &index, &ResolveOptions::default())?;
//! let ids = distributions
//!     .iter()
//!     .map(|d| d.build_id())
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(ids, vec!["py27_0", "py35_0"]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod resolved_distribution;
pub mod resolver;

pub use error::ResolveError;
pub use resolved_distribution::ResolvedDistribution;
pub use resolver::{ResolveOptions, resolve_all};
