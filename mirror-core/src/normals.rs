/// Per-vertex normal synthesis for meshes without `vn` data
use nalgebra::{Point3, Vector3};

use crate::error::{Attribute, ObjError};
use crate::geometry::{face_normal, RawMesh};

/// Running sum of adjacent face normals and face count for every position.
///
/// Faces are weighted equally: neither area nor corner angle affects the
/// contribution.
#[derive(Debug, Clone)]
pub struct NormalAccumulator {
    sums: Vec<Vector3<f32>>,
    counts: Vec<u32>,
}

impl NormalAccumulator {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            sums: vec![Vector3::zeros(); vertex_count],
            counts: vec![0; vertex_count],
        }
    }

    /// Add the normal of triangle `tri` to each of its three vertices
    pub fn add_face(&mut self, positions: &[Point3<f32>], tri: [u32; 3]) -> Result<(), ObjError> {
        let mut corners = [Point3::origin(); 3];
        for (corner, &index) in corners.iter_mut().zip(&tri) {
            *corner = *positions
                .get(index as usize)
                .ok_or(ObjError::InvalidIndex {
                    attribute: Attribute::Position,
                    index,
                    len: positions.len(),
                })?;
        }

        let n = face_normal(&corners[0], &corners[1], &corners[2]);
        for &index in &tri {
            let slot = index as usize;
            if slot >= self.sums.len() {
                return Err(ObjError::InvalidIndex {
                    attribute: Attribute::Position,
                    index,
                    len: self.sums.len(),
                });
            }
            self.sums[slot] += n;
            self.counts[slot] += 1;
        }
        Ok(())
    }

    /// Accumulated, not yet averaged, normal of `vertex`
    pub fn sum(&self, vertex: usize) -> Option<Vector3<f32>> {
        self.sums.get(vertex).copied()
    }

    pub fn face_count(&self, vertex: usize) -> Option<u32> {
        self.counts.get(vertex).copied()
    }

    /// Average and re-normalize every accumulator.
    ///
    /// Fails on the first vertex with no adjacent face, or whose mean
    /// normal has zero length.
    pub fn finish(self) -> Result<Vec<Vector3<f32>>, ObjError> {
        self.sums
            .into_iter()
            .zip(self.counts)
            .enumerate()
            .map(|(index, (sum, count))| {
                if count == 0 {
                    return Err(ObjError::DegenerateVertex { index });
                }
                (sum / count as f32)
                    .try_normalize(f32::EPSILON)
                    .ok_or(ObjError::DegenerateVertex { index })
            })
            .collect()
    }
}

/// Fill in `normals` and `normal_indices` when the mesh has no normals.
///
/// Returns whether normals were synthesized. Meshes that already carry
/// normals, or that have no faces, are left untouched.
pub fn synthesize_normals(mesh: &mut RawMesh) -> Result<bool, ObjError> {
    if !mesh.normals.is_empty() || mesh.position_indices.is_empty() {
        return Ok(false);
    }

    let mut accumulator = NormalAccumulator::new(mesh.positions.len());
    for tri in mesh.position_indices.chunks_exact(3) {
        accumulator.add_face(&mesh.positions, [tri[0], tri[1], tri[2]])?;
    }

    mesh.normals = accumulator.finish()?;
    mesh.normal_indices = mesh.position_indices.clone();
    Ok(true)
}
