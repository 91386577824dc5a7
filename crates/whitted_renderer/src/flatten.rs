//! Scene tree flattening.

use whitted_core::SceneNode;
use whitted_math::Mat4;

use crate::hittable::{ObjectList, SceneObject};

/// Flatten a scene tree into world-space objects.
///
/// Pre-order: each node's operations are composed onto the inherited
/// transform in the order listed, its primitives are emitted with the
/// result, then its children inherit the same result.
pub fn flatten(root: &SceneNode) -> ObjectList {
    let mut objects = ObjectList::new();
    flatten_node(root, Mat4::IDENTITY, &mut objects);

    log::debug!("Flattened scene into {} objects", objects.len());
    objects
}

fn flatten_node(node: &SceneNode, parent: Mat4, objects: &mut ObjectList) {
    let transform = node
        .transformations
        .iter()
        .fold(parent, |acc, op| acc * op.to_matrix());

    for primitive in &node.primitives {
        objects.add(SceneObject::new(primitive.clone(), transform));
    }

    for child in &node.children {
        flatten_node(child, transform, objects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whitted_core::{Material, Primitive, Shape, Transformation};
    use whitted_math::Vec3;

    fn prim(shape: Shape) -> Primitive {
        Primitive::new(shape, Material::default())
    }

    #[test]
    fn test_parent_translate_then_child_scale() {
        let t = Vec3::new(5.0, 0.0, 0.0);
        let s = Vec3::splat(2.0);
        let root = SceneNode::new()
            .with_transformation(Transformation::Translate(t))
            .with_child(
                SceneNode::new()
                    .with_transformation(Transformation::Scale(s))
                    .with_primitive(prim(Shape::Sphere)),
            );

        let objects = flatten(&root);
        assert_eq!(objects.len(), 1);

        let expected = Mat4::from_translation(t) * Mat4::from_scale(s);
        let got = *objects.iter().next().unwrap().transform();
        assert!(got.abs_diff_eq(expected, 1e-6));

        // T after S: the unit point lands at 5 + 2, not 2 * (5 + 1)
        let p = got.transform_point3(Vec3::X);
        assert!((p - Vec3::new(7.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_operations_right_multiply_in_order() {
        let ops = [
            Transformation::Translate(Vec3::new(0.0, 1.0, 0.0)),
            Transformation::Rotate {
                axis: Vec3::Z,
                angle: std::f32::consts::FRAC_PI_2,
            },
            Transformation::Scale(Vec3::new(3.0, 1.0, 1.0)),
        ];
        let node = ops
            .iter()
            .cloned()
            .fold(SceneNode::new(), SceneNode::with_transformation)
            .with_primitive(prim(Shape::Cube));

        let objects = flatten(&node);
        let m = *objects.iter().next().unwrap().transform();

        // Scale x by 3, rotate onto y, then lift by 1
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 4.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_count_matches_reachable_primitives() {
        let root = SceneNode::new()
            .with_primitive(prim(Shape::Cube))
            .with_primitive(prim(Shape::Cone))
            .with_child(
                SceneNode::new()
                    .with_child(SceneNode::new().with_primitive(prim(Shape::Sphere)))
                    .with_primitive(prim(Shape::Cylinder)),
            );

        let objects = flatten(&root);
        assert_eq!(objects.len(), root.primitive_count());
        assert_eq!(objects.len(), 4);

        // Pre-order: the node's own primitives come before its children's
        let shapes: Vec<Shape> = objects.iter().map(SceneObject::shape).collect();
        assert_eq!(
            shapes,
            vec![Shape::Cube, Shape::Cone, Shape::Cylinder, Shape::Sphere]
        );
    }

    #[test]
    fn test_siblings_do_not_share_transforms() {
        let root = SceneNode::new()
            .with_child(
                SceneNode::new()
                    .with_transformation(Transformation::Translate(Vec3::X))
                    .with_primitive(prim(Shape::Sphere)),
            )
            .with_child(SceneNode::new().with_primitive(prim(Shape::Sphere)));

        let objects = flatten(&root);
        let origins: Vec<Vec3> = objects
            .iter()
            .map(|o| o.transform().transform_point3(Vec3::ZERO))
            .collect();
        assert_eq!(origins, vec![Vec3::X, Vec3::ZERO]);
    }

    #[test]
    fn test_flatten_is_repeatable() {
        let root = SceneNode::new()
            .with_transformation(Transformation::Scale(Vec3::splat(2.0)))
            .with_primitive(prim(Shape::Sphere));
        let before = root.clone();

        let a = flatten(&root);
        let b = flatten(&root);
        assert_eq!(root, before);
        assert_eq!(a.len(), b.len());
        assert_eq!(
            a.iter().next().unwrap().transform(),
            b.iter().next().unwrap().transform()
        );
    }
}
