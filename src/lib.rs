//! STL file reading with bit-exact vertex welding.
//!
//! This crate reads triangle meshes from STL files (both the ASCII and the
//! binary variant) into a canonical in-memory representation:
//!
//! - a deduplicated vertex coordinate array — triangle corners with
//!   bit-identical coordinates share one vertex,
//! - a triangle corner-index array,
//! - a per-triangle face-normal array,
//! - a partition of the triangle range into the named solids recorded
//!   sequentially in the file.
//!
//! Triangles that degenerate to fewer than three distinct corners after
//! welding are dropped, together with their normals; solid ranges are
//! adjusted accordingly.
//!
//! # Format Detection
//!
//! A file is treated as ASCII when its first whitespace-delimited token is
//! `solid` (case-insensitive), binary otherwise. A binary file whose header
//! happens to start with the bytes `solid` is misclassified as ASCII; this
//! heuristic limitation is inherent to the STL format. Callers that know
//! the variant can use [`read_stl_ascii`] or [`read_stl_binary`] directly.
//!
//! # Welding
//!
//! Welding uses exact coordinate equality, never an epsilon. Files whose
//! exporters emit near-duplicate but not bit-identical corners keep those
//! vertices distinct; run a tolerance-based repair pass downstream if that
//! is a problem for your data.
//!
//! # Example
//!
//! ```no_run
//! use stl_io::read_stl;
//!
//! let mesh = read_stl("model.stl").unwrap();
//! println!(
//!     "{} vertices, {} triangles, {} solids",
//!     mesh.vertex_count(),
//!     mesh.triangle_count(),
//!     mesh.solid_count()
//! );
//! for solid in 0..mesh.solid_count() {
//!     let range = mesh.solid_range(solid).unwrap();
//!     println!("solid {solid}: triangles {range:?}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod ascii;
mod binary;
mod error;
mod mesh;
mod weld;

pub use ascii::{read_stl_ascii, read_stl_ascii_from};
pub use binary::{read_stl_binary, read_stl_binary_from};
pub use error::{StlError, StlResult};
pub use mesh::StlMesh;

// Re-export nalgebra types used in the accessor API.
pub use nalgebra::{Point3, Vector3};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The two STL file variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StlFormat {
    /// Human-readable `solid ... endsolid` text format.
    Ascii,
    /// Packed little-endian binary format.
    Binary,
}

impl StlFormat {
    /// Detect the variant of an STL file from its leading content.
    ///
    /// Reports [`StlFormat::Ascii`] when the first whitespace-delimited
    /// token equals `solid` (case-insensitive), [`StlFormat::Binary`]
    /// otherwise. The probe is authoritative: [`read_stl`] follows it
    /// without a second opinion.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn detect<P: AsRef<Path>>(path: P) -> StlResult<Self> {
        let file = open_file(path.as_ref())?;
        let mut reader = BufReader::new(file);

        // Scan past any amount of leading whitespace and collect the first
        // token. The token only has to be compared against `solid`, so the
        // scan stops once it grows past five bytes; binary content with no
        // whitespace therefore never gets read in full.
        let mut token: Vec<u8> = Vec::with_capacity(6);
        'scan: loop {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let mut used = 0;
            for &byte in buf {
                used += 1;
                if byte.is_ascii_whitespace() {
                    if !token.is_empty() {
                        break 'scan;
                    }
                } else {
                    token.push(byte);
                    if token.len() > 5 {
                        break 'scan;
                    }
                }
            }
            reader.consume(used);
        }

        Ok(if token.eq_ignore_ascii_case(b"solid") {
            Self::Ascii
        } else {
            Self::Binary
        })
    }
}

/// Check whether an STL file is in the ASCII variant.
///
/// Convenience wrapper around [`StlFormat::detect`].
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn is_ascii_stl<P: AsRef<Path>>(path: P) -> StlResult<bool> {
    Ok(StlFormat::detect(path)? == StlFormat::Ascii)
}

/// Read an STL file, auto-detecting the ASCII or binary variant.
///
/// # Errors
///
/// Returns an error if:
/// - the file cannot be opened or read,
/// - an ASCII file violates the STL grammar (the error carries the 1-based
///   line number),
/// - a binary file is truncated.
///
/// A failed read never yields a partially populated mesh.
///
/// # Example
///
/// ```no_run
/// use stl_io::read_stl;
///
/// let mesh = read_stl("model.stl").unwrap();
/// assert!(mesh.triangle_count() > 0);
/// ```
pub fn read_stl<P: AsRef<Path>>(path: P) -> StlResult<StlMesh> {
    let path = path.as_ref();
    match StlFormat::detect(path)? {
        StlFormat::Ascii => read_stl_ascii(path),
        StlFormat::Binary => read_stl_binary(path),
    }
}

/// Open a file, reporting a missing file as [`StlError::FileNotFound`].
pub(crate) fn open_file(path: &Path) -> StlResult<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StlError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StlError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn detects_ascii_by_leading_solid_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "a.stl", b"solid thing\nendsolid thing\n");
        assert_eq!(StlFormat::detect(&path).unwrap(), StlFormat::Ascii);
        assert!(is_ascii_stl(&path).unwrap());
    }

    #[test]
    fn detection_folds_case_and_skips_leading_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "a.stl", b"  \n\t SOLID thing\n");
        assert_eq!(StlFormat::detect(&path).unwrap(), StlFormat::Ascii);
    }

    #[test]
    fn detection_scans_past_long_leading_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = vec![b' '; 300];
        bytes.extend_from_slice(b"solid padded\nendsolid padded\n");
        let path = write_temp(&dir, "padded.stl", &bytes);
        assert_eq!(StlFormat::detect(&path).unwrap(), StlFormat::Ascii);
    }

    #[test]
    fn detects_binary_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = vec![0u8; 80];
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let path = write_temp(&dir, "b.stl", &bytes);
        assert_eq!(StlFormat::detect(&path).unwrap(), StlFormat::Binary);
        assert!(!is_ascii_stl(&path).unwrap());
    }

    #[test]
    fn empty_file_detects_as_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "e.stl", b"");
        assert_eq!(StlFormat::detect(&path).unwrap(), StlFormat::Binary);
    }

    #[test]
    fn missing_file_reports_file_not_found() {
        let err = read_stl("no_such_file_980123.stl").unwrap_err();
        assert!(matches!(err, StlError::FileNotFound { .. }));
    }

    #[test]
    fn read_stl_dispatches_on_detected_format() {
        let dir = tempfile::tempdir().unwrap();

        let ascii = write_temp(
            &dir,
            "tri.stl",
            b"solid t
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
vertex 0 1 0
endloop
endfacet
endsolid t
",
        );
        let mesh = read_stl(&ascii).unwrap();
        assert_eq!(mesh.triangle_count(), 1);

        let mut bytes = vec![0u8; 80];
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let binary = write_temp(&dir, "empty.stl", &bytes);
        let mesh = read_stl(&binary).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.solid_count(), 1);
    }
}
