/// Geometry primitives shared by the loader and the renderers
use nalgebra::{Point3, Vector2, Vector3};

use crate::error::{Attribute, ObjError};
use crate::face::FaceVertex;

/// A fully resolved vertex: position, normal and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub uv: Vector2<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, uv: Vector2<f32>) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Face normal of the triangle `(v0, v1, v2)`.
///
/// Uses the edges `u = v0 - v1`, `w = v2 - v1` and returns
/// `normalize(-(u × w))`, which points out of counter-clockwise faces.
/// Zero-area triangles yield the zero vector.
pub fn face_normal(v0: &Point3<f32>, v1: &Point3<f32>, v2: &Point3<f32>) -> Vector3<f32> {
    let u = v0 - v1;
    let w = v2 - v1;
    (-u.cross(&w))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's positions
    pub fn calculate_normal(&self) -> Vector3<f32> {
        face_normal(
            &self.vertices[0].position,
            &self.vertices[1].position,
            &self.vertices[2].position,
        )
    }

    /// Mean of the three vertex normals, used for flat shading
    pub fn average_normal(&self) -> Vector3<f32> {
        let sum = self.vertices[0].normal + self.vertices[1].normal + self.vertices[2].normal;
        sum.try_normalize(f32::EPSILON)
            .unwrap_or_else(|| self.calculate_normal())
    }
}

/// Attribute arrays and 0-based index streams as read from an OBJ source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub uvs: Vec<Vector2<f32>>,
    pub position_indices: Vec<u32>,
    pub normal_indices: Vec<u32>,
    pub uv_indices: Vec<u32>,
}

impl RawMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.position_indices.len() / 3
    }

    /// Append one triangle's indices. All three vertices are expected to
    /// share a layout, so the optional streams grow by 0 or 3.
    pub fn push_face(&mut self, face: &[FaceVertex; 3]) {
        for vertex in face {
            self.position_indices.push(vertex.position());
            if let Some(uv) = vertex.uv() {
                self.uv_indices.push(uv);
            }
            if let Some(normal) = vertex.normal() {
                self.normal_indices.push(normal);
            }
        }
    }

    /// Check stream lengths and index bounds.
    ///
    /// A normal stream is only required once normals exist; meshes without
    /// `vn` data get theirs from the normal synthesizer.
    pub fn validate(&self) -> Result<(), ObjError> {
        let expected = self.position_indices.len();

        if !self.uv_indices.is_empty() && self.uv_indices.len() != expected {
            return Err(ObjError::MismatchedIndexStreams {
                attribute: Attribute::TexCoord,
                expected,
                found: self.uv_indices.len(),
            });
        }

        let normals_required = !self.normals.is_empty() && expected > 0;
        if (normals_required || !self.normal_indices.is_empty())
            && self.normal_indices.len() != expected
        {
            return Err(ObjError::MismatchedIndexStreams {
                attribute: Attribute::Normal,
                expected,
                found: self.normal_indices.len(),
            });
        }

        check_bounds(&self.position_indices, self.positions.len(), Attribute::Position)?;
        check_bounds(&self.uv_indices, self.uvs.len(), Attribute::TexCoord)?;
        check_bounds(&self.normal_indices, self.normals.len(), Attribute::Normal)?;
        Ok(())
    }

    /// Create a cube centred on the origin with one normal per face
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let positions = vec![
            Point3::new(-half, -half, -half),
            Point3::new(half, -half, -half),
            Point3::new(half, half, -half),
            Point3::new(-half, half, -half),
            Point3::new(-half, -half, half),
            Point3::new(half, -half, half),
            Point3::new(half, half, half),
            Point3::new(-half, half, half),
        ];
        let normals = vec![
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
        ];

        // (corners, normal) per face, two triangles each
        let faces: [([u32; 4], u32); 6] = [
            ([4, 5, 6, 7], 0), // front
            ([0, 3, 2, 1], 1), // back
            ([3, 7, 6, 2], 2), // top
            ([0, 1, 5, 4], 3), // bottom
            ([1, 2, 6, 5], 4), // right
            ([0, 4, 7, 3], 5), // left
        ];

        let mut mesh = Self {
            positions,
            normals,
            ..Self::default()
        };
        for (corners, normal) in faces {
            for tri in [[0, 1, 2], [0, 2, 3]] {
                for corner in tri {
                    mesh.position_indices.push(corners[corner]);
                    mesh.normal_indices.push(normal);
                }
            }
        }
        mesh
    }
}

fn check_bounds(indices: &[u32], len: usize, attribute: Attribute) -> Result<(), ObjError> {
    match indices.iter().find(|&&index| index as usize >= len) {
        Some(&index) => Err(ObjError::InvalidIndex {
            attribute,
            index,
            len,
        }),
        None => Ok(()),
    }
}

/// A flat, non-indexed triangle list: every three vertices form a face
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterleavedMesh {
    pub vertices: Vec<Vertex>,
}

impl InterleavedMesh {
    /// Floats per vertex in [`InterleavedMesh::to_flat_f32`]
    pub const FLOATS_PER_VERTEX: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|tri| Triangle::new(tri[0], tri[1], tri[2]))
    }

    /// Axis-aligned bounding box as `(min, max)`, `None` when empty
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        }))
    }

    /// Vertex data as `px py pz nx ny nz u v` per vertex, ready for upload
    pub fn to_flat_f32(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.vertices.len() * Self::FLOATS_PER_VERTEX);
        for v in &self.vertices {
            data.extend_from_slice(&[
                v.position.x,
                v.position.y,
                v.position.z,
                v.normal.x,
                v.normal.y,
                v.normal.z,
                v.uv.x,
                v.uv.y,
            ]);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normal_ccw_points_up() {
        let n = face_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        );
        assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_face_normal_degenerate_is_zero() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(face_normal(&p, &p, &p), Vector3::zeros());
    }

    #[test]
    fn test_cube_is_valid() {
        let cube = RawMesh::cube(2.0);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.normal_indices.len(), cube.position_indices.len());
        assert!(cube.validate().is_ok());
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let cube = RawMesh::cube(2.0);
        for (tri, normals) in cube
            .position_indices
            .chunks_exact(3)
            .zip(cube.normal_indices.chunks_exact(3))
        {
            let n = face_normal(
                &cube.positions[tri[0] as usize],
                &cube.positions[tri[1] as usize],
                &cube.positions[tri[2] as usize],
            );
            assert!((n - cube.normals[normals[0] as usize]).norm() < 1e-6);
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_position() {
        let mut mesh = RawMesh::new();
        mesh.positions.push(Point3::origin());
        mesh.position_indices.extend_from_slice(&[0, 0, 3]);
        match mesh.validate() {
            Err(ObjError::InvalidIndex {
                attribute: Attribute::Position,
                index: 3,
                len: 1,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_normal_stream_when_normals_exist() {
        let mut mesh = RawMesh::new();
        mesh.positions.extend_from_slice(&[Point3::origin(); 3]);
        mesh.normals.push(Vector3::z());
        mesh.position_indices.extend_from_slice(&[0, 1, 2]);
        assert!(matches!(
            mesh.validate(),
            Err(ObjError::MismatchedIndexStreams {
                attribute: Attribute::Normal,
                expected: 3,
                found: 0,
            })
        ));
    }

    #[test]
    fn test_bounds() {
        assert!(InterleavedMesh::new().bounds().is_none());
        let mesh = crate::interleave::interleave(&RawMesh::cube(3.0)).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Point3::new(-1.5, -1.5, -1.5));
        assert_eq!(max, Point3::new(1.5, 1.5, 1.5));
    }

    #[test]
    fn test_flat_layout() {
        let mesh = InterleavedMesh {
            vertices: vec![Vertex::new(
                Point3::new(1.0, 2.0, 3.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector2::new(0.25, 0.75),
            )],
        };
        assert_eq!(
            mesh.to_flat_f32(),
            vec![1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.25, 0.75]
        );
    }
}
