//! # Sources Crate
//!
//! Candidate intake for compound triage.
//!
//! ## Components
//!
//! - **types**: [`Candidate`], a structure identifier plus its descriptors
//!   (or nothing, when the structure could not be parsed)
//! - **intake**: Reading structure lists, one identifier per line
//! - **resolver**: [`CandidateResolver`], which runs every identifier through a
//!   [`DescriptorProvider`](descriptors::DescriptorProvider) in parallel
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{read_candidate_list, CandidateResolver};
//! use descriptors::DescriptorTable;
//! use std::sync::Arc;
//!
//! let ids = read_candidate_list(Path::new("data/library.smi"))?;
//! let table = DescriptorTable::load_from_file(Path::new("data/physchem.csv"))?;
//! let candidates = CandidateResolver::new(Arc::new(table)).resolve(&ids);
//! ```

pub mod intake;
pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use intake::{parse_candidate_list, read_candidate_list};
pub use resolver::CandidateResolver;
pub use types::Candidate;
