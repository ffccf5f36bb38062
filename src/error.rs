use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, MergeError>;

#[derive(thiserror::Error, Debug)]
pub enum MergeError {
    /// The document parsed but does not have the `whitelists[0].endpoints` shape.
    #[error("Invalid whitelist structure in {origin}: {reason}")]
    Structure { origin: String, reason: String },

    /// An endpoint could not be turned into its canonical identity key.
    #[error("Failed to serialize endpoint: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The merged document could not be written out as JSON.
    #[error("Failed to encode whitelist {}: {source}", origin.display())]
    Encode {
        origin: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse JSON from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    pub fn structure(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        MergeError::Structure {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MergeError::Io {
            path: path.into(),
            source,
        }
    }
}
