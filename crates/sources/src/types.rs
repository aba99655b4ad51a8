//! The candidate model.

use descriptors::DescriptorMap;
use serde::Serialize;

/// One chemical structure under evaluation.
///
/// `id` is the raw structure representation exactly as supplied (usually a
/// SMILES string). `descriptors` is `None` when the provider could not parse
/// the structure; such a candidate never appears in any result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: String,
    pub descriptors: Option<DescriptorMap>,
}

impl Candidate {
    /// A candidate whose descriptors were computed.
    pub fn parsed(id: impl Into<String>, descriptors: DescriptorMap) -> Self {
        Self {
            id: id.into(),
            descriptors: Some(descriptors),
        }
    }

    /// A candidate the provider could not parse.
    pub fn unparsed(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            descriptors: None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.descriptors.is_some()
    }
}
