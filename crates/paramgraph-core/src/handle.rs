//! Connection handle ids.
//!
//! Every option row of a node exposes a source handle `<nodeId>-<optionId>`;
//! every node exposes one target handle `<nodeId>-target`. Ids have a fixed
//! rendered width ([`ID_LEN`]), so the node id is the leading segment and the
//! option id the trailing segment of the string.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::id::{NodeId, OptionId, ID_LEN};

const TARGET_SUFFIX: &str = "-target";

/// Handle on an option row; drags from here start a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceHandle {
    pub node: NodeId,
    pub option: OptionId,
}

/// Handle on a node's input side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetHandle {
    pub node: NodeId,
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.node, self.option)
    }
}

impl fmt::Display for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.node, TARGET_SUFFIX)
    }
}

fn invalid(handle: &str) -> CoreError {
    CoreError::InvalidHandle {
        handle: handle.to_string(),
    }
}

impl FromStr for SourceHandle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 * ID_LEN + 1 || s.as_bytes()[ID_LEN] != b'-' {
            return Err(invalid(s));
        }
        let node = s[..ID_LEN].parse().map_err(|_| invalid(s))?;
        let option = s[s.len() - ID_LEN..].parse().map_err(|_| invalid(s))?;
        Ok(SourceHandle { node, option })
    }
}

impl FromStr for TargetHandle {
    type Err = CoreError;

    /// Accepts `<nodeId>-target` and a bare `<nodeId>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let well_formed = s.len() == ID_LEN
            || (s.len() == ID_LEN + TARGET_SUFFIX.len() && s.ends_with(TARGET_SUFFIX));
        if !well_formed || !s.is_char_boundary(ID_LEN) {
            return Err(invalid(s));
        }
        let node = s[..ID_LEN].parse().map_err(|_| invalid(s))?;
        Ok(TargetHandle { node })
    }
}
