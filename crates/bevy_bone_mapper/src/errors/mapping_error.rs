use std::fmt;

use thiserror::Error;

use super::AssetError;

/// Which of the two rigs an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigSide {
    Source,
    Target,
}

impl fmt::Display for RigSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RigSide::Source => f.write_str("source"),
            RigSide::Target => f.write_str("target"),
        }
    }
}

/// Possible errors produced while mapping bones between two rigs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("the {0} root is not set")]
    MissingInput(RigSide),
    #[error("no humanoid mapping could be produced for the {0} rig")]
    ResolutionFailure(RigSide),
    #[error("asset operation failed: {0}")]
    Asset(#[from] AssetError),
}

pub type MappingResult<T> = Result<T, MappingError>;
