//! # Descriptors Crate
//!
//! Everything the triage engine knows about a molecule is a set of named
//! numbers. This crate owns that representation and the ways of obtaining it.
//!
//! ## Main Components
//!
//! - **types**: [`DescriptorMap`] and the well-known descriptor [`names`]
//! - **parser**: Parse delimited descriptor tables exported by external toolkits
//! - **index**: [`DescriptorTable`], an in-memory lookup by structure identifier
//! - **provider**: The [`DescriptorProvider`] interface and [`MergedProvider`]
//! - **error**: Error types for loading tables
//!
//! ## Example Usage
//!
//! ```ignore
//! use descriptors::{DescriptorProvider, DescriptorTable, MergedProvider};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let physchem = DescriptorTable::load_from_file(Path::new("data/physchem.csv"))?;
//! let admet = DescriptorTable::load_from_file(Path::new("data/admet.csv"))?;
//! let provider = MergedProvider::new(Arc::new(physchem)).with_secondary(Arc::new(admet));
//!
//! match provider.compute("CCO") {
//!     Ok(descriptors) => println!("logp = {:?}", descriptors.get("logp")),
//!     Err(failure) => println!("{failure}"),
//! }
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod provider;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DescriptorError, Result};
pub use index::DescriptorTable;
pub use provider::{compute_batch, DescriptorProvider, MergedProvider, ParseFailure};
pub use types::{names, DescriptorMap};
