/// Expansion of indexed attribute streams into a flat vertex list
use nalgebra::Vector2;

use crate::error::{Attribute, ObjError};
use crate::geometry::{InterleavedMesh, RawMesh, Vertex};

fn fetch<T: Copy>(items: &[T], index: u32, attribute: Attribute) -> Result<T, ObjError> {
    items
        .get(index as usize)
        .copied()
        .ok_or(ObjError::InvalidIndex {
            attribute,
            index,
            len: items.len(),
        })
}

/// Build one output vertex per entry of `position_indices`.
///
/// Shared vertices are duplicated, so the result draws as a plain triangle
/// list. Missing uv indices default every uv to zero; normals must already
/// be resolvable.
pub fn interleave(mesh: &RawMesh) -> Result<InterleavedMesh, ObjError> {
    let count = mesh.position_indices.len();
    if mesh.normal_indices.len() != count {
        return Err(ObjError::MismatchedIndexStreams {
            attribute: Attribute::Normal,
            expected: count,
            found: mesh.normal_indices.len(),
        });
    }
    let has_uvs = !mesh.uv_indices.is_empty();
    if has_uvs && mesh.uv_indices.len() != count {
        return Err(ObjError::MismatchedIndexStreams {
            attribute: Attribute::TexCoord,
            expected: count,
            found: mesh.uv_indices.len(),
        });
    }

    let mut out = InterleavedMesh::with_capacity(count);
    for i in 0..count {
        let position = fetch(&mesh.positions, mesh.position_indices[i], Attribute::Position)?;
        let normal = fetch(&mesh.normals, mesh.normal_indices[i], Attribute::Normal)?;
        let uv = if has_uvs {
            fetch(&mesh.uvs, mesh.uv_indices[i], Attribute::TexCoord)?
        } else {
            Vector2::zeros()
        };
        out.vertices.push(Vertex::new(position, normal, uv));
    }
    Ok(out)
}
