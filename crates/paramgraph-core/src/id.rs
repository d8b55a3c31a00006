//! Stable ID newtypes for parameter-graph entities.
//!
//! All IDs are distinct newtype wrappers over [`Uuid`], providing type safety
//! so that an `OptionId` cannot be accidentally used where a `ParameterId` is
//! expected. Every ID renders in the hyphenated UUID form, which is exactly
//! [`ID_LEN`] characters long; handle ids rely on that fixed width.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Length of every rendered id (hyphenated UUID).
pub const ID_LEN: usize = 36;

/// Identity of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterId(pub Uuid);

/// Identity of one option of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub Uuid);

/// Identity of a stored dependency row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyId(pub Uuid);

/// Identity of a node-position record, and therefore of an on-canvas node.
///
/// The canonical node of a parameter reuses the parameter's UUID; duplicates
/// carry a freshly generated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl ParameterId {
    /// Generates a fresh random parameter id.
    pub fn generate() -> Self {
        ParameterId(Uuid::new_v4())
    }
}

impl OptionId {
    /// Generates a fresh random option id.
    pub fn generate() -> Self {
        OptionId(Uuid::new_v4())
    }
}

impl DependencyId {
    /// Generates a fresh random dependency id.
    pub fn generate() -> Self {
        DependencyId(Uuid::new_v4())
    }
}

impl NodeId {
    /// Generates an id for a duplicate node.
    pub fn generate() -> Self {
        NodeId(Uuid::new_v4())
    }

    /// The id of the canonical node of `parameter`.
    pub fn canonical(parameter: ParameterId) -> Self {
        NodeId(parameter.0)
    }

    /// Returns true if this is the canonical node id of `parameter`.
    pub fn is_canonical_for(&self, parameter: ParameterId) -> bool {
        self.0 == parameter.0
    }
}

// Display implementations -- hyphenated UUID.

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(s).map_err(|_| CoreError::InvalidId {
        value: s.to_string(),
    })
}

impl FromStr for ParameterId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid(s).map(ParameterId)
    }
}

impl FromStr for OptionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid(s).map(OptionId)
    }
}

impl FromStr for DependencyId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid(s).map(DependencyId)
    }
}

impl FromStr for NodeId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid(s).map(NodeId)
    }
}
