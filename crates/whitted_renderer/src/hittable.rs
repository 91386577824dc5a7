//! Flattened scene objects and the nearest-hit search over them.

use whitted_core::{Material, Primitive, Shape};
use whitted_math::{Interval, Mat3, Mat4, Mat4Ext, Ray, Vec3};

use crate::shape::Geometry;

/// A primitive instance placed in the world.
///
/// The inverse and normal matrices are derived once at construction; the
/// object is rebuilt rather than mutated when its transform changes.
#[derive(Clone, Debug)]
pub struct SceneObject {
    primitive: Primitive,
    transform: Mat4,
    inverse: Mat4,
    normal_matrix: Mat3,
}

impl SceneObject {
    /// Place a primitive with an object-to-world transform.
    pub fn new(primitive: Primitive, transform: Mat4) -> Self {
        Self {
            primitive,
            transform,
            inverse: transform.inverse(),
            normal_matrix: transform.normal_matrix(),
        }
    }

    pub fn shape(&self) -> Shape {
        self.primitive.shape
    }

    pub fn material(&self) -> &Material {
        &self.primitive.material
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    /// Object-to-world transform.
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Map a world point into object space.
    pub fn object_point(&self, world: Vec3) -> Vec3 {
        self.inverse.transform_point3(world)
    }

    /// Intersect a world-space ray. The returned `t` is in units of the
    /// world ray's direction.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        self.primitive
            .shape
            .intersect(&ray.transformed(&self.inverse), ray_t)
    }

    /// World-space unit normal at a world-space surface point.
    ///
    /// Returns `Vec3::ZERO` for degenerate transforms.
    pub fn normal_at(&self, world_point: Vec3) -> Vec3 {
        let local = self.primitive.shape.normal(self.object_point(world_point));
        (self.normal_matrix * local).normalize_or_zero()
    }

    /// Texture coordinates at a world-space surface point.
    pub fn uv_at(&self, world_point: Vec3) -> (f32, f32) {
        self.primitive.shape.uv(self.object_point(world_point))
    }
}

/// Record of a ray-object intersection.
#[derive(Clone, Copy, Debug)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Outward world-space unit normal
    pub normal: Vec3,
    /// The object that was hit
    pub object: &'a SceneObject,
}

/// The flat working set of the tracer.
#[derive(Clone, Debug, Default)]
pub struct ObjectList {
    objects: Vec<SceneObject>,
}

impl ObjectList {
    /// Create a new empty object list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneObject> {
        self.objects.iter()
    }

    /// Nearest hit with `t` strictly inside `ray_t`.
    ///
    /// Linear scan; on equal `t` the object found first wins.
    pub fn closest_hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<(f32, &SceneObject)> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let interval = ray_t.with_max(closest_so_far);
            if let Some(t) = object.intersect(ray, interval) {
                closest_so_far = t;
                closest = Some((t, object));
            }
        }

        closest.map(|(t, object)| {
            let p = ray.at(t);
            HitRecord {
                t,
                p,
                normal: object.normal_at(p),
                object,
            }
        })
    }

    /// True if anything lies strictly inside `ray_t` along the ray.
    pub fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.objects
            .iter()
            .any(|object| object.intersect(ray, ray_t).is_some())
    }
}

impl FromIterator<SceneObject> for ObjectList {
    fn from_iter<I: IntoIterator<Item = SceneObject>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ObjectList {
    type Item = &'a SceneObject;
    type IntoIter = std::slice::Iter<'a, SceneObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere_at(center: Vec3) -> SceneObject {
        SceneObject::new(
            Primitive::new(Shape::Sphere, Material::default()),
            Mat4::from_translation(center),
        )
    }

    const FORWARD: Interval = Interval {
        min: 1e-3,
        max: f32::INFINITY,
    };

    #[test]
    fn test_closest_hit_picks_nearest() {
        let list: ObjectList = [
            sphere_at(Vec3::new(0.0, 0.0, -5.0)),
            sphere_at(Vec3::new(0.0, 0.0, -2.0)),
            sphere_at(Vec3::new(0.0, 0.0, -8.0)),
        ]
        .into_iter()
        .collect();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = list.closest_hit(&ray, FORWARD).unwrap();

        assert!((hit.t - 1.5).abs() < 1e-5);
        assert!((hit.p - Vec3::new(0.0, 0.0, -1.5)).length() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert!(std::ptr::eq(hit.object, list.iter().nth(1).unwrap()));
    }

    #[test]
    fn test_closest_hit_none() {
        let mut list = ObjectList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(list.closest_hit(&ray, FORWARD).is_none());

        list.add(sphere_at(Vec3::new(3.0, 0.0, -2.0)));
        assert!(list.closest_hit(&ray, FORWARD).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_equal_t_keeps_first() {
        let first = SceneObject::new(
            Primitive::new(Shape::Sphere, Material::diffuse(Vec3::X)),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)),
        );
        let second = SceneObject::new(
            Primitive::new(Shape::Sphere, Material::diffuse(Vec3::Y)),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)),
        );
        let list: ObjectList = [first, second].into_iter().collect();

        let hit = list
            .closest_hit(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), FORWARD)
            .unwrap();
        assert_eq!(hit.object.material().diffuse, Vec3::X);
    }

    #[test]
    fn test_scaled_object_t_in_world_units() {
        // Sphere of world radius 2
        let object = SceneObject::new(
            Primitive::new(Shape::Sphere, Material::default()),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0)) * Mat4::from_scale(Vec3::splat(4.0)),
        );
        let t = object
            .intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), FORWARD)
            .unwrap();
        assert!((t - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_large_scale_objects_still_hit() {
        // Object-space directions shrink to 1/2000 of the world ray
        let scale = 2000.0;
        let place = |shape| {
            SceneObject::new(
                Primitive::new(shape, Material::default()),
                Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0 * scale))
                    * Mat4::from_scale(Vec3::splat(scale)),
            )
        };
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        for (shape, expected) in [
            (Shape::Sphere, 1.5 * scale),
            (Shape::Cylinder, 1.5 * scale),
            (Shape::Cube, 1.5 * scale),
            // Radius at mid height is a quarter
            (Shape::Cone, 1.75 * scale),
        ] {
            let t = place(shape)
                .intersect(&ray, FORWARD)
                .unwrap_or_else(|| panic!("{} missed", shape.name()));
            assert!((t - expected).abs() < 1e-3 * scale, "{}: {t}", shape.name());
        }

        // Straight down the axis of a large cylinder only the cap is hit
        let cylinder = SceneObject::new(
            Primitive::new(Shape::Cylinder, Material::default()),
            Mat4::from_scale(Vec3::splat(scale)),
        );
        let down = Ray::new(Vec3::new(0.0, 2.0 * scale, 0.0), Vec3::NEG_Y);
        let t = cylinder.intersect(&down, FORWARD).unwrap();
        assert!((t - 1.5 * scale).abs() < 1e-3 * scale);
    }

    #[test]
    fn test_normal_under_non_uniform_scale() {
        // Ellipsoid squashed along y: the normal at (1, 0, 0) stays +x and at a
        // tilted point leans towards the squashed axis
        let object = SceneObject::new(
            Primitive::new(Shape::Sphere, Material::default()),
            Mat4::from_scale(Vec3::new(2.0, 0.5, 2.0)),
        );
        let n = object.normal_at(Vec3::new(1.0, 0.0, 0.0));
        assert!((n - Vec3::X).length() < 1e-5);

        let world = object.transform().transform_point3(Vec3::new(0.0, 0.5, 0.5).normalize() * 0.5);
        let n = object.normal_at(world);
        assert!((n.length() - 1.0).abs() < 1e-4);
        // Steeper than the object-space 45 degrees
        assert!(n.y > n.z);
    }

    #[test]
    fn test_occluded_respects_max() {
        let list: ObjectList = [sphere_at(Vec3::new(0.0, 0.0, -5.0))].into_iter().collect();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(list.occluded(&ray, Interval::new(1e-3, 10.0)));
        // Light in front of the sphere
        assert!(!list.occluded(&ray, Interval::new(1e-3, 3.0)));
    }
}
