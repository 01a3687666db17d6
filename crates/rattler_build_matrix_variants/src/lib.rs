//! # rattler_build_matrix_variants
//!
//! Computes the build matrix of a recipe: every combination of python, numpy,
//! perl and r versions that the recipe's requirements allow, that a package
//! index can provide, and that is consistent with the dependencies recorded in
//! that index.
//!
//! ## Example
//!
//! ```rust
//! use rattler_build_matrix_index::InMemoryIndex;
//! use rattler_build_matrix_types::Requirement;
//! use rattler_build_matrix_variants::{EnumerateOptions, enumerate_variable_sets};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut index = InMemoryIndex::new();
//! index.add_package("python", "2.6.2", Vec::<String>::new());
//! index.add_package("python", "2.7.2", Vec::<String>::new());
//! index.add_package("python", "3.5.0", Vec::<String>::new());
//! index.add_package("numpy", "1.8.0", ["python"]);
//!
//! let requirements: Vec<Requirement> = ["python >=2.7", "numpy x.x"]
//!     .iter()
//!     .map(|s| s.parse())
//!     .collect::<Result<_, _>>()?;
//!
//! let sets = enumerate_variable_sets(&requirements, &index, &EnumerateOptions::default())?;
//!
//! // numpy varies slowest, python fastest; 2.6.2 is excluded by `>=2.7`
//! let tokens: Vec<String> = sets
//!     .iter()
//!     .map(|set| set.tokens().map(|t| t.concat()))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(tokens, vec!["np18py27", "np18py35"]);
//! # Ok(())
//! # }
//! ```

pub mod combination;
pub mod enumerate;
pub mod error;

pub use combination::{Axis, compute_combinations};
pub use enumerate::{EnumerateOptions, enumerate_variable_sets};
pub use error::EnumerateError;
