/// Scene description: model, mirror, light, material and camera
use nalgebra::{Matrix4, Point3, Vector3};

use crate::projection::Camera;
use crate::resource::MeshResource;
use crate::transform::{RotationState, Transform};

/// Surface colours of the model, RGB in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
}

impl Material {
    pub const PRESET_NAMES: [&'static str; 5] = ["clay", "gold", "jade", "ruby", "silver"];

    pub fn new(ambient: Vector3<f32>, diffuse: Vector3<f32>) -> Self {
        Self { ambient, diffuse }
    }

    /// Look up a named preset (case-insensitive)
    pub fn preset(name: &str) -> Option<Self> {
        let diffuse = match name.to_ascii_lowercase().as_str() {
            "clay" => Vector3::new(0.8, 0.5, 0.35),
            "gold" => Vector3::new(0.9, 0.7, 0.2),
            "jade" => Vector3::new(0.35, 0.8, 0.55),
            "ruby" => Vector3::new(0.85, 0.15, 0.2),
            "silver" => Vector3::new(0.75, 0.75, 0.8),
            _ => return None,
        };
        Some(Self::new(diffuse * 0.2, diffuse))
    }

    /// Preset following `current` in [`Material::PRESET_NAMES`], wrapping
    pub fn next_preset_name(current: &str) -> &'static str {
        let position = Self::PRESET_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(current));
        match position {
            Some(i) => Self::PRESET_NAMES[(i + 1) % Self::PRESET_NAMES.len()],
            None => Self::PRESET_NAMES[0],
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vector3::new(0.2, 0.2, 0.2), Vector3::new(0.8, 0.8, 0.8))
    }
}

/// A single point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
}

impl PointLight {
    pub fn new(position: Point3<f32>, ambient: Vector3<f32>, diffuse: Vector3<f32>) -> Self {
        Self {
            position,
            ambient,
            diffuse,
        }
    }

    /// Lambert term: ambient plus diffuse scaled by `max(n·l, 0)`
    pub fn shade(
        &self,
        material: &Material,
        point: &Point3<f32>,
        normal: &Vector3<f32>,
    ) -> Vector3<f32> {
        let to_light = (self.position - point)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let lambert = normal.dot(&to_light).max(0.0);
        material.ambient.component_mul(&self.ambient)
            + material.diffuse.component_mul(&self.diffuse) * lambert
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(
            Point3::new(3.0, 5.0, 4.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }
}

/// The reflecting plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirrorPlane {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
    /// Half the side length of the visible mirror quad
    pub half_extent: f32,
}

impl MirrorPlane {
    /// Horizontal mirror at height `y`
    pub fn floor(y: f32, half_extent: f32) -> Self {
        Self {
            point: Point3::new(0.0, y, 0.0),
            normal: Vector3::y(),
            half_extent,
        }
    }

    pub fn reflection_matrix(&self) -> Matrix4<f32> {
        Transform::reflection_matrix(&self.point, &self.normal)
    }

    /// Corners of the mirror quad, counter-clockwise seen from the normal side
    pub fn corners(&self) -> [Point3<f32>; 4] {
        let n = self
            .normal
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::y);
        let helper = if n.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::z()
        };
        let t = n.cross(&helper).normalize() * self.half_extent;
        let b = n.cross(&t);
        let c = self.point;
        [c - t - b, c + t - b, c + t + b, c - t + b]
    }

    /// Signed distance of `p` from the plane
    pub fn distance(&self, p: &Point3<f32>) -> f32 {
        let n = self
            .normal
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::y);
        n.dot(&(p - self.point))
    }
}

/// Everything the viewer draws
#[derive(Debug)]
pub struct Scene {
    pub model: MeshResource,
    pub rotation: RotationState,
    /// Placement of the model in the world
    pub world: Matrix4<f32>,
    /// Moves the model's centre to its local origin, so rotation spins it in place
    pub pivot: Matrix4<f32>,
    pub mirror: MirrorPlane,
    pub light: PointLight,
    pub material: Material,
    pub camera: Camera,
}

impl Scene {
    pub fn new(
        model: MeshResource,
        mirror: MirrorPlane,
        material: Material,
        camera: Camera,
    ) -> Self {
        Self {
            model,
            rotation: RotationState::zero(),
            world: Matrix4::identity(),
            pivot: Matrix4::identity(),
            mirror,
            light: PointLight::default(),
            material,
            camera,
        }
    }

    /// Centre the model on the origin and scale its largest extent to `size`
    pub fn fit_model(&mut self, size: f32) {
        (self.world, self.pivot) = match self.model.mesh().bounds() {
            Some((min, max)) => {
                let extent = (max - min).max();
                let scale = if extent > f32::EPSILON { size / extent } else { 1.0 };
                let centre = nalgebra::center(&min, &max);
                (
                    Transform::scale_matrix(scale, scale, scale),
                    Transform::translation_matrix(-centre.x, -centre.y, -centre.z),
                )
            }
            None => (Matrix4::identity(), Matrix4::identity()),
        };
    }

    /// `world * rotation * pivot`
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let local = Transform::rotation_matrix(&self.rotation) * self.pivot;
        Transform::compose(&self.world, &local)
    }

    /// Model matrix of the duplicate seen in the mirror
    pub fn mirrored_model_matrix(&self) -> Matrix4<f32> {
        self.mirror.reflection_matrix() * self.model_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        for name in Material::PRESET_NAMES {
            assert!(Material::preset(name).is_some());
        }
        assert!(Material::preset("GOLD").is_some());
        assert!(Material::preset("plastic").is_none());
    }

    #[test]
    fn test_next_preset_wraps() {
        assert_eq!(Material::next_preset_name("clay"), "gold");
        assert_eq!(Material::next_preset_name("silver"), "clay");
        assert_eq!(Material::next_preset_name("unknown"), "clay");
    }

    #[test]
    fn test_shade_facing_and_away() {
        let light = PointLight::new(
            Point3::new(0.0, 10.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
        );
        let material = Material::default();
        let p = Point3::origin();

        let lit = light.shade(&material, &p, &Vector3::y());
        assert!((lit - Vector3::new(1.0, 1.0, 1.0)).norm() < 1e-6);

        let unlit = light.shade(&material, &p, &-Vector3::y());
        assert!((unlit - material.ambient).norm() < 1e-6);
    }

    #[test]
    fn test_mirror_corners_lie_on_plane() {
        let mirror = MirrorPlane::floor(-1.0, 3.0);
        for c in mirror.corners() {
            assert!(mirror.distance(&c).abs() < 1e-6);
            assert!((c.x.abs() - 3.0).abs() < 1e-6 && (c.z.abs() - 3.0).abs() < 1e-6);
        }
        let [a, b, c, _] = mirror.corners();
        let n = crate::geometry::face_normal(&a, &b, &c);
        assert!((n - Vector3::y()).norm() < 1e-6);
    }

    #[test]
    fn test_fit_model() {
        let mut scene = Scene::new(
            MeshResource::from_raw(&crate::geometry::RawMesh::cube(10.0)).unwrap(),
            MirrorPlane::floor(-2.0, 3.0),
            Material::default(),
            Camera::default(),
        );
        scene.fit_model(2.0);
        let corner = scene
            .model_matrix()
            .transform_point(&Point3::new(5.0, 5.0, 5.0));
        assert!((corner - Point3::new(1.0, 1.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_off_origin_model_rotates_in_place() {
        let mut raw = crate::geometry::RawMesh::cube(2.0);
        for p in &mut raw.positions {
            p.x += 10.0;
        }
        let mut scene = Scene::new(
            MeshResource::from_raw(&raw).unwrap(),
            MirrorPlane::floor(-2.0, 3.0),
            Material::default(),
            Camera::default(),
        );
        scene.fit_model(2.0);

        let centre = Point3::new(10.0, 0.0, 0.0);
        for step in 0..8 {
            scene.rotation = RotationState::new(0.3, step as f32 * std::f32::consts::FRAC_PI_4, 0.0);
            let placed = scene.model_matrix().transform_point(&centre);
            assert!(placed.coords.norm() < 1e-4, "centre drifted to {:?}", placed);
        }

        // a spinning model never dips to the mirror
        scene.rotation = RotationState::new(0.0, std::f32::consts::PI, 0.0);
        let bottom = scene
            .model_matrix()
            .transform_point(&Point3::new(9.0, -1.0, -1.0));
        assert!(scene.mirror.distance(&bottom) > 0.0);
    }

    #[test]
    fn test_mirrored_model_sits_below_floor() {
        let mut scene = Scene::new(
            MeshResource::empty(),
            MirrorPlane::floor(-1.0, 3.0),
            Material::default(),
            Camera::default(),
        );
        scene.world = Transform::translation_matrix(0.0, 1.0, 0.0);
        let p = scene
            .mirrored_model_matrix()
            .transform_point(&Point3::origin());
        assert!((p - Point3::new(0.0, -3.0, 0.0)).norm() < 1e-6);
    }
}
