use crate::{
    bounds::{BoundingBox, BoundsProvider},
    Light, Material, Mesh, Transform,
};

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub material: Material,
    pub transform: Transform,
}

/// Lights plus at most one displayed subject.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub lights: Vec<Light>,
    subject: Option<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn set_lights(&mut self, lights: Vec<Light>) {
        self.lights = lights;
    }

    /// Replaces the current subject, if any.
    pub fn set_subject(&mut self, mesh: Mesh, material: Material, transform: Transform) {
        self.subject = Some(SceneObject {
            mesh,
            material,
            transform,
        });
    }

    pub fn subject(&self) -> Option<&SceneObject> {
        self.subject.as_ref()
    }

    pub fn has_subject(&self) -> bool {
        self.subject.is_some()
    }

    pub fn object_count(&self) -> usize {
        usize::from(self.subject.is_some())
    }

    pub fn iter_objects(&self) -> impl Iterator<Item = (&Mesh, &Material, &Transform)> {
        self.subject
            .iter()
            .map(|o| (&o.mesh, &o.material, &o.transform))
    }
}

impl BoundsProvider for Scene {
    /// World-space union over every displayed object. Lights carry no geometry.
    fn compute_bounds(&self) -> BoundingBox {
        self.iter_objects()
            .filter(|(mesh, _, _)| !mesh.positions.is_empty())
            .map(|(mesh, _, transform)| mesh.compute_bounds().transformed(&transform.to_mat4()))
            .reduce(|a, b| a.union(&b))
            .unwrap_or(BoundingBox::EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::Scene;
    use crate::{bounds::BoundsProvider, Light, Material, Mesh, Transform};
    use glam::Vec3;

    #[test]
    fn empty_scene_has_zero_bounds() {
        let mut scene = Scene::new();
        scene.add_light(Light::point(Vec3::splat(10.0), Vec3::ONE, 1.0));
        assert!(scene.compute_bounds().is_degenerate());
    }

    #[test]
    fn bounds_follow_subject_transform() {
        let mut scene = Scene::new();
        scene.set_subject(
            Mesh::unit_cube(),
            Material::default(),
            Transform {
                translation: Vec3::new(1.0, 0.0, 0.0),
                scale: Vec3::new(2.0, 1.0, 1.0),
                ..Transform::IDENTITY
            },
        );
        let b = scene.compute_bounds();
        assert_eq!(b.size(), Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(b.center(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn subject_is_replaced_not_added() {
        let mut scene = Scene::new();
        scene.set_subject(Mesh::unit_cube(), Material::default(), Transform::IDENTITY);
        scene.set_subject(
            Mesh::cuboid(Vec3::ZERO, Vec3::splat(3.0)),
            Material::default(),
            Transform::IDENTITY,
        );
        assert_eq!(scene.object_count(), 1);
        assert_eq!(scene.compute_bounds().size(), Vec3::splat(3.0));
    }
}
