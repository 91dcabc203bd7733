use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the caller at construction and ingest time.
///
/// Per-tick operations never fail; degenerate geometry and out-of-bounds
/// accesses are handled locally.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid simulation configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Scene blob does not match the configured grid size.
    #[error("scene blob is {got} bytes, expected {expected} ({width}x{height})")]
    BlobSize {
        got: usize,
        expected: usize,
        width: usize,
        height: usize,
    },

    /// Scene blob references an id outside the kind registry.
    #[error("bad particle id {id} at offset {offset}")]
    UnknownKind { id: u8, offset: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_names_offset() {
        let e = Error::UnknownKind { id: 42, offset: 17 };
        let msg = format!("{e}");
        assert!(msg.contains("42"));
        assert!(msg.contains("17"));
    }

    #[test]
    fn test_blob_size_names_dimensions() {
        let e = Error::BlobSize {
            got: 10,
            expected: 12,
            width: 4,
            height: 3,
        };
        assert!(format!("{e}").contains("4x3"));
    }
}
