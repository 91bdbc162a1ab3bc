//! Vertex welding and triangle re-indexing.
//!
//! The parsers produce one coordinate triple per triangle corner, in file
//! order. Welding collapses corners with bit-identical coordinates into a
//! single shared vertex, re-indexes the triangles accordingly, drops
//! triangles that degenerate to fewer than three distinct corners, and
//! translates the per-solid triangle ranges into the surviving index space.
//!
//! Welding is **bit-exact by design**: no epsilon, no tolerance. STL files
//! written by exporters that emit near-duplicate but not identical corner
//! coordinates keep those vertices distinct. Use a dedicated repair pass if
//! tolerance-based merging is needed.

use std::cmp::Ordering;

use crate::mesh::StlMesh;

/// One parsed triangle corner, tagged with its position in the raw corner
/// stream so triangles can be re-indexed after sorting.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CornerKey {
    /// Corner coordinates as read from the file.
    pub coords: [f32; 3],
    /// Position of this corner in the raw (pre-weld) corner stream.
    pub index: u32,
}

impl CornerKey {
    /// Lexicographic total order on (x, y, z).
    ///
    /// `total_cmp` keeps values that compare equal under `==` adjacent after
    /// sorting (`-0.0` sorts directly before `0.0`), so run-compaction with
    /// [`Self::same_coords`] still merges them.
    fn cmp_coords(&self, other: &Self) -> Ordering {
        self.coords[0]
            .total_cmp(&other.coords[0])
            .then(self.coords[1].total_cmp(&other.coords[1]))
            .then(self.coords[2].total_cmp(&other.coords[2]))
    }

    /// Exact component-wise equality. NaN corners never merge.
    fn same_coords(&self, other: &Self) -> bool {
        self.coords == other.coords
    }
}

/// Raw parser output, handed to [`weld`] by move.
///
/// `tris` holds triples of positions into `corners`. Parsers always append
/// corners in `{3k, 3k+1, 3k+2}` shape, but welding only relies on each
/// corner's `index` tag, not on that layout.
#[derive(Debug, Default)]
pub(crate) struct RawStl {
    pub corners: Vec<CornerKey>,
    pub tris: Vec<u32>,
    pub normals: Vec<f32>,
    pub solid_ranges: Vec<u32>,
}

impl RawStl {
    /// Pre-allocate for a known triangle count (binary path).
    pub fn with_triangle_capacity(triangles: usize) -> Self {
        Self {
            corners: Vec::with_capacity(triangles * 3),
            tris: Vec::with_capacity(triangles * 3),
            normals: Vec::with_capacity(triangles * 3),
            solid_ranges: Vec::with_capacity(2),
        }
    }

    /// Append one corner, tagging it with its stream position.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: corner indices are u32, meshes with >1.4B triangles are unsupported
    pub fn push_corner(&mut self, coords: [f32; 3]) {
        let index = self.corners.len() as u32;
        self.corners.push(CornerKey { coords, index });
    }

    /// Append one face normal.
    pub fn push_normal(&mut self, normal: [f32; 3]) {
        self.normals.extend_from_slice(&normal);
    }

    /// Close the current facet: the three most recently pushed corners form
    /// one triangle.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: corner indices are u32, meshes with >1.4B triangles are unsupported
    pub fn push_triangle(&mut self) {
        debug_assert!(self.corners.len() >= 3);
        let end = self.corners.len() as u32;
        self.tris.extend([end - 3, end - 2, end - 1]);
    }

    /// Number of raw triangles recorded so far.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: corner indices are u32, meshes with >1.4B triangles are unsupported
    pub fn triangle_count(&self) -> u32 {
        (self.tris.len() / 3) as u32
    }

    /// Append the closing solid boundary.
    ///
    /// A well-formed ASCII file opens at least one solid; if none was seen,
    /// a leading `0` is inserted first so the boundary list always starts
    /// at zero.
    pub fn close_solids(&mut self) {
        if self.solid_ranges.is_empty() {
            self.solid_ranges.push(0);
        }
        self.solid_ranges.push(self.triangle_count());
    }
}

/// Collapse bit-identical corners, re-index and filter the triangles, and
/// adjust the solid ranges.
///
/// Consumes the raw streams and produces the four canonical mesh arrays:
///
/// 1. A working copy of the corner stream is sorted lexicographically.
/// 2. Each maximal run of equal coordinates becomes one unique vertex; a
///    remap table records the unique slot for every original corner.
/// 3. Triangles are remapped in file order. A triangle survives only if its
///    three remapped indices are pairwise distinct; survivors keep their
///    relative order.
/// 4. Normals are filtered congruently so they stay triangle-aligned.
/// 5. Each raw solid boundary `b` becomes the number of surviving triangles
///    with raw index `< b`. Boundaries stay non-decreasing; a solid whose
///    triangles were all dropped keeps a zero-length range.
///
/// Never fails on parser-produced input. Assumes every entry of `raw.tris`
/// is a valid position in `raw.corners`.
pub(crate) fn weld(raw: RawStl) -> StlMesh {
    let RawStl {
        mut corners,
        tris,
        normals,
        solid_ranges,
    } = raw;

    let mut coords = Vec::new();
    let mut new_index = vec![0u32; corners.len()];

    if !corners.is_empty() {
        corners.sort_unstable_by(CornerKey::cmp_coords);

        coords.reserve(corners.len());
        coords.extend_from_slice(&corners[0].coords);
        new_index[corners[0].index as usize] = 0;

        let mut unique = 0u32;
        for i in 1..corners.len() {
            if !corners[i].same_coords(&corners[i - 1]) {
                unique += 1;
                coords.extend_from_slice(&corners[i].coords);
            }
            new_index[corners[i].index as usize] = unique;
        }
    }

    // Remap triangles in file order, dropping degenerates. The prefix array
    // records, for each raw triangle index, how many earlier triangles
    // survived; raw solid boundaries are translated through it.
    let raw_tri_count = tris.len() / 3;
    let mut out_tris = Vec::with_capacity(tris.len());
    let mut out_normals = Vec::with_capacity(normals.len());
    let mut surviving_before = Vec::with_capacity(raw_tri_count + 1);
    let mut survived = 0u32;

    for t in 0..raw_tri_count {
        surviving_before.push(survived);
        let a = new_index[tris[3 * t] as usize];
        let b = new_index[tris[3 * t + 1] as usize];
        let c = new_index[tris[3 * t + 2] as usize];
        if a != b && a != c && b != c {
            out_tris.extend([a, b, c]);
            out_normals.extend_from_slice(&normals[3 * t..3 * t + 3]);
            survived += 1;
        }
    }
    surviving_before.push(survived);

    let out_ranges = solid_ranges
        .iter()
        .map(|&b| surviving_before[b as usize])
        .collect();

    StlMesh {
        coords,
        tris: out_tris,
        normals: out_normals,
        solid_ranges: out_ranges,
    }
}
