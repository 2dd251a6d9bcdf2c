use std::fmt;

/// Error types for cluster decomposition
///
/// All variants are file-level: the directory orchestration catches them,
/// reports the failure, and moves on to the next file.
#[derive(Debug)]
pub enum RewriteError {
    /// Block scanner reached end of input before the braces balanced
    UnclosedBlock { opening_line: String },

    /// A nested database/user block is missing a required attribute
    MissingAttribute {
        attribute: &'static str,
        cluster_kind: String,
        cluster_name: String,
    },

    /// A cluster declaration line does not carry the expected quoted tokens
    MalformedHeader { line: String },
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::UnclosedBlock { opening_line } => {
                write!(f, "Unclosed block starting at: {}", opening_line.trim())
            }
            RewriteError::MissingAttribute {
                attribute,
                cluster_kind,
                cluster_name,
            } => {
                write!(
                    f,
                    "Can not find {} in {} \"{}\"",
                    attribute, cluster_kind, cluster_name
                )
            }
            RewriteError::MalformedHeader { line } => {
                write!(f, "Malformed resource declaration: {}", line.trim())
            }
        }
    }
}

impl std::error::Error for RewriteError {}
