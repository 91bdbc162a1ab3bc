//! The canonical welded mesh.

use std::ops::Range;

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle mesh read from an STL file, with bit-identical corner
/// coordinates welded into shared vertices.
///
/// # Memory Layout
///
/// Four flat arrays:
///
/// - coordinates: `[x0, y0, z0, x1, y1, z1, ...]`, one triple per unique
///   vertex
/// - triangle indices: `[a0, b0, c0, a1, b1, c1, ...]`, three vertex indices
///   per triangle
/// - normals: `[nx0, ny0, nz0, ...]`, one face normal per triangle, aligned
///   with the triangle array
/// - solid ranges: `numSolids + 1` boundaries; consecutive pairs are the
///   half-open triangle range of each solid, in file order
///
/// Every surviving triangle has three pairwise-distinct vertex indices;
/// triangles that collapsed during welding were dropped together with their
/// normals.
///
/// # Example
///
/// ```no_run
/// use stl_io::read_stl;
///
/// let mesh = read_stl("model.stl").unwrap();
/// for t in 0..mesh.triangle_count() {
///     let [a, b, c] = mesh.triangle(t).unwrap();
///     println!("triangle {t}: {a} {b} {c}");
/// }
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StlMesh {
    pub(crate) coords: Vec<f32>,
    pub(crate) tris: Vec<u32>,
    pub(crate) normals: Vec<f32>,
    pub(crate) solid_ranges: Vec<u32>,
}

impl StlMesh {
    /// Number of unique vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.coords.len() / 3
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.tris.len() / 3
    }

    /// Number of solids.
    ///
    /// ASCII files may contain several `solid ... endsolid` blocks; binary
    /// files always contain exactly one solid.
    #[inline]
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.solid_ranges.len().saturating_sub(1)
    }

    /// Check whether the mesh has no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tris.is_empty()
    }

    /// Position of a vertex, or `None` if the index is out of range.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<Point3<f32>> {
        let c = self.coords.get(3 * index..3 * index + 3)?;
        Some(Point3::new(c[0], c[1], c[2]))
    }

    /// Vertex indices of a triangle, or `None` if the index is out of range.
    #[must_use]
    pub fn triangle(&self, index: usize) -> Option<[u32; 3]> {
        let t = self.tris.get(3 * index..3 * index + 3)?;
        Some([t[0], t[1], t[2]])
    }

    /// Position of one corner (0..3) of a triangle.
    #[must_use]
    pub fn triangle_vertex(&self, index: usize, corner: usize) -> Option<Point3<f32>> {
        if corner >= 3 {
            return None;
        }
        let t = self.triangle(index)?;
        self.vertex(t[corner] as usize)
    }

    /// Face normal of a triangle, exactly as stored in the file.
    ///
    /// Normals are not validated or re-derived; files with zero or
    /// inconsistent normals hand those through unchanged.
    #[must_use]
    pub fn normal(&self, index: usize) -> Option<Vector3<f32>> {
        let n = self.normals.get(3 * index..3 * index + 3)?;
        Some(Vector3::new(n[0], n[1], n[2]))
    }

    /// Half-open triangle range of a solid, or `None` if the index is out
    /// of range.
    ///
    /// A solid whose triangles were all dropped during welding keeps a
    /// zero-length range.
    #[must_use]
    pub fn solid_range(&self, solid: usize) -> Option<Range<usize>> {
        let begin = *self.solid_ranges.get(solid)? as usize;
        let end = *self.solid_ranges.get(solid + 1)? as usize;
        Some(begin..end)
    }

    /// Iterate over all triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.tris.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Flat coordinate array, three entries per unique vertex.
    #[inline]
    #[must_use]
    pub fn coords(&self) -> &[f32] {
        &self.coords
    }

    /// Flat triangle index array, three entries per triangle.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.tris
    }

    /// Flat normal array, three entries per triangle.
    #[inline]
    #[must_use]
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Solid boundary array, `solid_count() + 1` entries.
    #[inline]
    #[must_use]
    pub fn solid_ranges(&self) -> &[u32] {
        &self.solid_ranges
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn two_triangle_mesh() -> StlMesh {
        // Two triangles sharing an edge, in one solid.
        StlMesh {
            coords: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                1.0, 1.0, 0.0,
            ],
            tris: vec![0, 1, 2, 1, 3, 2],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            solid_ranges: vec![0, 2],
        }
    }

    #[test]
    fn counts() {
        let mesh = two_triangle_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.solid_count(), 1);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn indexed_lookups() {
        let mesh = two_triangle_mesh();
        assert_eq!(mesh.vertex(3), Some(Point3::new(1.0, 1.0, 0.0)));
        assert_eq!(mesh.triangle(1), Some([1, 3, 2]));
        assert_eq!(
            mesh.triangle_vertex(1, 1),
            Some(Point3::new(1.0, 1.0, 0.0))
        );
        assert_eq!(mesh.normal(0), Some(Vector3::new(0.0, 0.0, 1.0)));
        assert_eq!(mesh.solid_range(0), Some(0..2));
    }

    #[test]
    fn out_of_range_lookups() {
        let mesh = two_triangle_mesh();
        assert_eq!(mesh.vertex(4), None);
        assert_eq!(mesh.triangle(2), None);
        assert_eq!(mesh.triangle_vertex(0, 3), None);
        assert_eq!(mesh.normal(2), None);
        assert_eq!(mesh.solid_range(1), None);
    }

    #[test]
    fn triangle_iterator() {
        let mesh = two_triangle_mesh();
        let tris: Vec<[u32; 3]> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn default_mesh_is_empty() {
        let mesh = StlMesh::default();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.solid_count(), 0);
    }
}
