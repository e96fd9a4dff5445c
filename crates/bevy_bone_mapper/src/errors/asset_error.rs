use thiserror::Error;

/// Possible errors produced by an [`AssetDatabase`](crate::assets::AssetDatabase)
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse RON in {path:?}: {source}")]
    RonParse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("could not serialize RON: {0}")]
    RonSerialize(#[from] ron::Error),
    #[error("no asset at {0:?}")]
    Missing(String),
    #[error("asset at {0:?} is not a re-importable model")]
    NotAModel(String),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn ron(path: impl Into<String>, source: ron::error::SpannedError) -> Self {
        Self::RonParse {
            path: path.into(),
            source,
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;
