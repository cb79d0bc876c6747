use glam::Vec3;
use std::collections::HashSet;

use super::region::Surface;
use crate::error::{SurfaceError, SurfaceResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |b, p| {
            Self::new(b.min.min(p), b.max.max(p))
        }))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }
}

/// The model data this crate consumes: flat vertex triplets, flat face
/// index triples and a bounding box.
pub trait ModelSource {
    fn vertices(&self) -> &[f32];
    fn faces(&self) -> &[u32];
    fn bounding_box(&self) -> Aabb;
}

#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    vertices: Vec<f32>,
    faces: Vec<u32>,
    bounds: Option<Aabb>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<f32>, faces: Vec<u32>) -> SurfaceResult<Self> {
        if vertices.len() % 3 != 0 {
            return Err(SurfaceError::RaggedBuffer {
                name: "vertex",
                len: vertices.len(),
                stride: 3,
            });
        }
        if faces.len() % 3 != 0 {
            return Err(SurfaceError::RaggedBuffer {
                name: "face",
                len: faces.len(),
                stride: 3,
            });
        }
        let bounds = Aabb::from_points(vertices.chunks_exact(3).map(Vec3::from_slice));
        Ok(Self {
            vertices,
            faces,
            bounds,
        })
    }

    /// Axis-aligned box of half extents `half`, twelve triangles.
    pub fn cuboid(half: Vec3) -> Self {
        let mut vertices = Vec::with_capacity(24);
        for i in 0..8u32 {
            let sign = |bit: u32| if i & bit != 0 { 1.0 } else { -1.0 };
            vertices.extend_from_slice(&[half.x * sign(1), half.y * sign(2), half.z * sign(4)]);
        }
        #[rustfmt::skip]
        let faces = vec![
            0, 1, 3, 0, 3, 2, // -z
            4, 6, 7, 4, 7, 5, // +z
            0, 4, 5, 0, 5, 1, // -y
            2, 3, 7, 2, 7, 6, // +y
            0, 2, 6, 0, 6, 4, // -x
            1, 5, 7, 1, 7, 3, // +x
        ];
        let bounds = Some(Aabb::new(-half, half));
        Self {
            vertices,
            faces,
            bounds,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.faces.len() / 3
    }
}

impl ModelSource for TriangleMesh {
    fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    fn faces(&self) -> &[u32] {
        &self.faces
    }

    fn bounding_box(&self) -> Aabb {
        self.bounds.unwrap_or(Aabb::new(Vec3::ZERO, Vec3::ZERO))
    }
}

/// A model's vertices and the undirected, deduplicated edges of its faces.
///
/// Only meaningful as the moving body of a pairwise test. Used as a
/// boundary it cannot answer and reports every segment as blocked.
#[derive(Debug, Clone)]
pub struct MeshSurface {
    verts: Vec<Vec3>,
    edges: Vec<(usize, usize)>,
}

impl MeshSurface {
    pub fn from_model<M: ModelSource + ?Sized>(model: &M) -> SurfaceResult<Self> {
        let raw = model.vertices();
        if raw.len() % 3 != 0 {
            return Err(SurfaceError::RaggedBuffer {
                name: "vertex",
                len: raw.len(),
                stride: 3,
            });
        }
        let verts: Vec<Vec3> = raw.chunks_exact(3).map(Vec3::from_slice).collect();

        let faces = model.faces();
        if faces.len() % 3 != 0 {
            return Err(SurfaceError::RaggedBuffer {
                name: "face",
                len: faces.len(),
                stride: 3,
            });
        }
        let pairs = faces
            .chunks_exact(3)
            .flat_map(|f| [(f[0], f[1]), (f[1], f[2]), (f[2], f[0])]);
        Self::from_edges(verts, pairs)
    }

    /// Builds from explicit vertex-index pairs; reversed duplicates and
    /// self-loops are dropped, first occurrence order is kept.
    pub fn from_edges(
        verts: Vec<Vec3>,
        pairs: impl IntoIterator<Item = (u32, u32)>,
    ) -> SurfaceResult<Self> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for (a, b) in pairs {
            for index in [a, b] {
                if index as usize >= verts.len() {
                    return Err(SurfaceError::FaceIndexOutOfRange {
                        index,
                        vertex_count: verts.len(),
                    });
                }
            }
            if a == b {
                continue;
            }
            let (a, b) = (a as usize, b as usize);
            if seen.insert((a.min(b), a.max(b))) {
                edges.push((a, b));
            }
        }
        Ok(Self { verts, edges })
    }

    pub fn verts(&self) -> &[Vec3] {
        &self.verts
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_points(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.edges.iter().map(|&(a, b)| (self.verts[a], self.verts[b]))
    }
}

impl Surface for MeshSurface {
    fn crosses_surface(&self, _first: Vec3, _second: Vec3) -> bool {
        log::error!("mesh surface cannot act as a boundary; reporting blocked");
        true
    }

    fn crossing_location(&self, first: Vec3, second: Vec3) -> Option<f32> {
        self.crosses_surface(first, second).then_some(0.0)
    }

    fn kind(&self) -> &'static str {
        "mesh"
    }

    fn is_boundary(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_edges_are_deduplicated() {
        // two triangles sharing the 1-2 diagonal
        let mesh = TriangleMesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0],
            vec![0, 1, 2, 2, 1, 3],
        )
        .unwrap();
        let surface = MeshSurface::from_model(&mesh).unwrap();
        assert_eq!(surface.verts().len(), 4);
        assert_eq!(surface.edge_count(), 5);
    }

    #[test]
    fn cuboid_has_eighteen_edges() {
        // 12 box edges plus one diagonal per face
        let surface = MeshSurface::from_model(&TriangleMesh::cuboid(Vec3::ONE)).unwrap();
        assert_eq!(surface.verts().len(), 8);
        assert_eq!(surface.edge_count(), 18);
    }

    #[test]
    fn out_of_range_face_is_an_error() {
        let mesh = TriangleMesh::new(vec![0.0; 6], vec![0, 1, 2]).unwrap();
        assert_eq!(
            MeshSurface::from_model(&mesh).unwrap_err(),
            SurfaceError::FaceIndexOutOfRange {
                index: 2,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn ragged_buffers_are_rejected() {
        assert!(TriangleMesh::new(vec![0.0; 4], vec![]).is_err());
        assert!(TriangleMesh::new(vec![0.0; 9], vec![0, 1]).is_err());
    }

    #[test]
    fn mesh_as_boundary_fails_closed() {
        let surface = MeshSurface::from_edges(vec![Vec3::ZERO, Vec3::X], [(0, 1)]).unwrap();
        assert!(surface.crosses_surface(Vec3::ZERO, Vec3::ZERO));
    }

    #[test]
    fn bounding_box_spans_vertices() {
        let mesh = TriangleMesh::new(vec![-1.0, 0.0, 2.0, 3.0, -4.0, 0.5], vec![]).unwrap();
        let b = mesh.bounding_box();
        assert_eq!(b.min, Vec3::new(-1.0, -4.0, 0.5));
        assert_eq!(b.max, Vec3::new(3.0, 0.0, 2.0));
        assert_eq!(b.center(), Vec3::new(1.0, -2.0, 1.25));
    }
}
