//! Error types for STL reading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for STL reading operations.
pub type StlResult<T> = Result<T, StlError>;

/// Errors that can occur while reading an STL file.
///
/// ASCII grammar errors carry the 1-based line number of the offending line
/// so callers can point users at the exact spot in the file.
#[derive(Debug, Error)]
pub enum StlError {
    /// File not found.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Binary STL ended before the 80-byte header was complete.
    #[error("truncated binary STL: incomplete 80-byte header")]
    TruncatedHeader,

    /// Binary STL ended before the 4-byte triangle count was complete.
    #[error("truncated binary STL: incomplete triangle count")]
    TruncatedFaceCount,

    /// Binary STL ended in the middle of a 50-byte triangle record.
    #[error("truncated binary STL: incomplete record for triangle {index}")]
    TruncatedTriangle {
        /// Zero-based index of the triangle whose record was cut short.
        index: u32,
    },

    /// ASCII facet structure is broken: a `facet` line is missing tokens or
    /// the `normal` keyword, or an `endfacet` has no open facet.
    #[error("malformed facet in line {line}: expected `facet normal nx ny nz`")]
    MalformedFacet {
        /// 1-based line number of the offending line.
        line: u64,
    },

    /// ASCII `outer` line is not followed by `loop`.
    #[error("malformed loop in line {line}: expected `outer loop`")]
    MalformedLoop {
        /// 1-based line number of the offending line.
        line: u64,
    },

    /// ASCII `vertex` line has fewer than three coordinate tokens.
    #[error("malformed vertex in line {line}: expected `vertex x y z`")]
    MalformedVertex {
        /// 1-based line number of the offending line.
        line: u64,
    },

    /// ASCII `endfacet` was reached with a vertex count other than three.
    #[error("bad facet in line {line}: facet closed with {count} vertices, expected 3")]
    BadFacetVertexCount {
        /// 1-based line number of the `endfacet` line.
        line: u64,
        /// Number of `vertex` lines seen inside the facet.
        count: usize,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
