//! Binary STL parsing.
//!
//! Fixed little-endian layout:
//!
//! ```text
//! UINT8[80]    – Header (free-form, discarded)
//! UINT32       – Number of triangles
//! foreach triangle (50 bytes)
//!     REAL32[3] – Face normal
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (discarded)
//! end
//! ```
//!
//! All values are decoded with explicit `from_le_bytes`, so reading is
//! correct on big-endian hosts as well. The binary format has no solid
//! subdivision; the whole file is modeled as a single solid.

use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{StlError, StlResult};
use crate::mesh::StlMesh;
use crate::open_file;
use crate::weld::{weld, RawStl};

/// Binary STL header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle record (normal + 3 vertices + attribute count).
const TRIANGLE_SIZE: usize = 50;

/// Upper bound on the triangle count trusted for preallocation.
///
/// The count field is attacker-controlled; a crafted file can claim
/// `u32::MAX` triangles while being 84 bytes long, and reserving for that
/// claim would abort the process before the first short read is noticed.
/// Larger files still parse fine, the vectors just grow as records arrive.
const MAX_TRUSTED_TRIANGLES: u32 = 1 << 22;

/// Read a binary STL file and weld its vertices.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or ends before the header,
/// the triangle count, or any triangle record is complete.
///
/// # Example
///
/// ```no_run
/// use stl_io::read_stl_binary;
///
/// let mesh = read_stl_binary("model.stl").unwrap();
/// assert_eq!(mesh.solid_count(), 1);
/// ```
pub fn read_stl_binary<P: AsRef<Path>>(path: P) -> StlResult<StlMesh> {
    let file = open_file(path.as_ref())?;
    read_stl_binary_from(BufReader::new(file))
}

/// Read binary STL content from any reader.
///
/// # Errors
///
/// Returns an error if reading fails or the content is truncated.
pub fn read_stl_binary_from<R: Read>(mut reader: R) -> StlResult<StlMesh> {
    let mut header = [0u8; HEADER_SIZE];
    read_exact_or(&mut reader, &mut header, StlError::TruncatedHeader)?;

    let mut count = [0u8; 4];
    read_exact_or(&mut reader, &mut count, StlError::TruncatedFaceCount)?;
    let triangle_count = u32::from_le_bytes(count);

    let mut raw =
        RawStl::with_triangle_capacity(triangle_count.min(MAX_TRUSTED_TRIANGLES) as usize);

    let mut record = [0u8; TRIANGLE_SIZE];
    for index in 0..triangle_count {
        read_exact_or(&mut reader, &mut record, StlError::TruncatedTriangle { index })?;

        // 12 little-endian f32: normal first, then the three vertices. The
        // trailing two attribute bytes of the record are discarded.
        let mut values = [0.0f32; 12];
        for (value, bytes) in values.iter_mut().zip(record[..48].chunks_exact(4)) {
            *value = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        raw.push_normal([values[0], values[1], values[2]]);
        raw.push_corner([values[3], values[4], values[5]]);
        raw.push_corner([values[6], values[7], values[8]]);
        raw.push_corner([values[9], values[10], values[11]]);
        raw.push_triangle();
    }

    raw.solid_ranges = vec![0, triangle_count];
    Ok(weld(raw))
}

/// Read exactly `buf.len()` bytes, mapping a short read to `on_short`.
fn read_exact_or<R: Read>(reader: &mut R, buf: &mut [u8], on_short: StlError) -> StlResult<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            on_short
        } else {
            StlError::Io(e)
        }
    })
}
