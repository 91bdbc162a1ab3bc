//! ASCII STL parsing.
//!
//! The grammar is line oriented:
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```
//!
//! A file may contain several `solid ... endsolid` blocks; each becomes one
//! solid range in the resulting mesh. Unrecognized leading keywords
//! (including `endsolid` and `endloop`) are skipped, which keeps the parser
//! forward compatible with files that carry extra annotations.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{StlError, StlResult};
use crate::mesh::StlMesh;
use crate::open_file;
use crate::weld::{weld, RawStl};

/// Read an ASCII STL file and weld its vertices.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or violates the ASCII STL
/// grammar. Grammar errors carry the 1-based line number of the offending
/// line.
///
/// # Example
///
/// ```no_run
/// use stl_io::read_stl_ascii;
///
/// let mesh = read_stl_ascii("model.stl").unwrap();
/// println!("{} triangles", mesh.triangle_count());
/// ```
pub fn read_stl_ascii<P: AsRef<Path>>(path: P) -> StlResult<StlMesh> {
    let file: File = open_file(path.as_ref())?;
    read_stl_ascii_from(BufReader::new(file))
}

/// Read ASCII STL content from any buffered reader.
///
/// # Errors
///
/// Returns an error if reading fails or the content violates the ASCII STL
/// grammar.
pub fn read_stl_ascii_from<R: BufRead>(mut reader: R) -> StlResult<StlMesh> {
    let mut raw = RawStl::default();
    let mut facet_open = false;
    let mut facet_vertex_count = 0usize;

    // Lines are read as raw bytes and converted lossily. Solid names are
    // free-form and exporters do write non-UTF-8 names (Latin-1 being the
    // usual case); those bytes only ever land in skipped tokens.
    let mut line_buf = Vec::new();
    let mut line_no = 0u64;
    loop {
        line_buf.clear();
        if reader.read_until(b'\n', &mut line_buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = String::from_utf8_lossy(&line_buf);
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "vertex" => {
                let mut coords = [0.0f32; 3];
                for slot in &mut coords {
                    let token = tokens
                        .next()
                        .ok_or(StlError::MalformedVertex { line: line_no })?;
                    *slot = parse_component(token);
                }
                raw.push_corner(coords);
                facet_vertex_count += 1;
            }
            "facet" => {
                if tokens.next() != Some("normal") {
                    return Err(StlError::MalformedFacet { line: line_no });
                }
                let mut normal = [0.0f32; 3];
                for slot in &mut normal {
                    let token = tokens
                        .next()
                        .ok_or(StlError::MalformedFacet { line: line_no })?;
                    *slot = parse_component(token);
                }
                raw.push_normal(normal);
                facet_open = true;
                facet_vertex_count = 0;
            }
            "outer" => {
                if tokens.next() != Some("loop") {
                    return Err(StlError::MalformedLoop { line: line_no });
                }
            }
            "endfacet" => {
                // Every triangle needs the normal its facet line pushed.
                if !facet_open {
                    return Err(StlError::MalformedFacet { line: line_no });
                }
                facet_open = false;
                if facet_vertex_count != 3 {
                    return Err(StlError::BadFacetVertexCount {
                        line: line_no,
                        count: facet_vertex_count,
                    });
                }
                raw.push_triangle();
            }
            "solid" => {
                raw.solid_ranges.push(raw.triangle_count());
            }
            // endsolid, endloop, anything unknown
            _ => {}
        }
    }

    raw.close_solids();
    Ok(weld(raw))
}

/// Parse one numeric token with C `atof` semantics: the longest leading
/// prefix that forms a valid base-10 float is used, and a token with no
/// valid prefix yields `0.0`.
///
/// Malformed numeric text therefore never fails the parse. This mirrors the
/// permissive behavior many STL consumers rely on; files that exercise it
/// are malformed but common in the wild.
fn parse_component(token: &str) -> f32 {
    for end in (1..=token.len()).rev() {
        if !token.is_char_boundary(end) {
            continue;
        }
        if let Ok(value) = token[..end].parse::<f32>() {
            return value;
        }
    }
    0.0
}
