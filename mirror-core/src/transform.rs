/// 3D transformation matrices and rotation state
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: Z, Y, X
        rz * ry * rx
    }

    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Place a local transform inside its parent's world transform
    pub fn compose(world: &Matrix4<f32>, local: &Matrix4<f32>) -> Matrix4<f32> {
        world * local
    }

    /// Mirror through the plane containing `point` with normal `normal`.
    ///
    /// `normal` need not be unit length. The result has determinant -1,
    /// so triangle winding flips under it.
    pub fn reflection_matrix(point: &Point3<f32>, normal: &Vector3<f32>) -> Matrix4<f32> {
        let n = normal
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::y);
        let d = -n.dot(&point.coords);

        let linear = Matrix3::identity() - 2.0 * n * n.transpose();
        let mut m = linear.to_homogeneous();
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&(-2.0 * d * n));
        m
    }

    /// Matrix for transforming normals under `model`: inverse transpose of
    /// its linear part, falling back to the linear part when singular
    pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
        let linear: Matrix3<f32> = model.fixed_view::<3, 3>(0, 0).into_owned();
        linear
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or(linear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = Transform::rotation_matrix(&rotation);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_compose_applies_local_first() {
        let world = Transform::translation_matrix(0.0, 5.0, 0.0);
        let local = Transform::scale_matrix(2.0, 2.0, 2.0);
        let p = Transform::compose(&world, &local).transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Point3::new(2.0, 7.0, 2.0));
    }

    #[test]
    fn test_reflection_through_offset_plane() {
        // Floor at y = -1
        let m = Transform::reflection_matrix(&Point3::new(0.0, -1.0, 0.0), &Vector3::y());
        let p = m.transform_point(&Point3::new(3.0, 2.0, -4.0));
        assert!((p - Point3::new(3.0, -4.0, -4.0)).norm() < 1e-6);
        assert!((m.determinant() + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_reflection_is_an_involution() {
        let m = Transform::reflection_matrix(
            &Point3::new(1.0, 2.0, 3.0),
            &Vector3::new(1.0, 1.0, 0.0),
        );
        assert!((m * m - Matrix4::identity()).norm() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_of_rotation_is_rotation() {
        let model = Transform::rotation_matrix(&RotationState::new(0.3, 0.5, 0.1));
        let normal = Transform::normal_matrix(&model);
        let linear: Matrix3<f32> = model.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((normal - linear).norm() < 1e-5);
    }
}
