//! Simple ray tracer example.
//!
//! Builds a small scene in code (mirror sphere, cone, floor slab)
//! and saves it to PPM format.

use whitted_core::{
    CameraData, Color, GlobalData, Light, Material, Primitive, Scene, SceneNode, Shape,
    Transformation,
};
use whitted_renderer::{RenderConfig, RenderSession, Vec3};

fn main() {
    env_logger::init();

    println!("Whitted Ray Tracer - Simple Example");
    println!("===================================");

    let scene = build_scene();
    println!("Scene has {} primitives", scene.primitive_count());

    let config = RenderConfig {
        max_depth: 4,
        ..Default::default()
    };
    let mut session = RenderSession::new(640, 480).with_config(config);
    session.set_scene(scene);

    let start = std::time::Instant::now();
    let image = session.render();
    println!("Rendered {}x{} in {:?}", image.width, image.height, start.elapsed());

    let filename = std::path::Path::new("output.ppm");
    match image.save(filename) {
        Ok(()) => println!("Saved to {}", filename.display()),
        Err(e) => eprintln!("Failed to save image: {}", e),
    }

    let stats = session.stats();
    println!(
        "Rays: {} primary, {} reflection, {} shadow",
        stats.primary_rays, stats.reflection_rays, stats.shadow_rays
    );
}

fn build_scene() -> Scene {
    let floor = SceneNode::new()
        .with_transformation(Transformation::Translate(Vec3::new(0.0, -1.0, 0.0)))
        .with_transformation(Transformation::Scale(Vec3::new(8.0, 0.1, 8.0)))
        .with_primitive(Primitive::new(
            Shape::Cube,
            Material {
                ambient: Color::splat(0.3),
                diffuse: Color::new(0.6, 0.6, 0.5),
                reflective: Color::splat(0.3),
                ..Default::default()
            },
        ));

    let mirror_ball = SceneNode::new()
        .with_transformation(Transformation::Translate(Vec3::new(-0.8, 0.0, 0.0)))
        .with_transformation(Transformation::Scale(Vec3::splat(1.5)))
        .with_primitive(Primitive::new(
            Shape::Sphere,
            Material {
                ambient: Color::splat(0.05),
                diffuse: Color::splat(0.1),
                specular: Color::ONE,
                reflective: Color::splat(0.9),
                shininess: 40.0,
                ..Default::default()
            },
        ));

    let cone = SceneNode::new()
        .with_transformation(Transformation::Translate(Vec3::new(1.2, -0.3, 0.5)))
        .with_transformation(Transformation::Rotate {
            axis: Vec3::Z,
            angle: 0.3,
        })
        .with_primitive(Primitive::new(
            Shape::Cone,
            Material {
                ambient: Color::new(0.3, 0.1, 0.1),
                diffuse: Color::new(0.8, 0.2, 0.2),
                specular: Color::splat(0.5),
                shininess: 12.0,
                ..Default::default()
            },
        ));

    Scene::new(
        "simple",
        CameraData::look_at(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, Vec3::Y),
    )
    .with_globals(GlobalData {
        ka: 0.2,
        kd: 0.8,
        ks: 0.4,
        kt: 0.0,
    })
    .with_light(Light::point(Vec3::new(3.0, 4.0, 4.0), Color::ONE))
    .with_light(Light::directional(
        Vec3::new(-1.0, -1.0, -0.5),
        Color::splat(0.3),
    ))
    .with_root(
        SceneNode::new()
            .with_child(floor)
            .with_child(mirror_ball)
            .with_child(cone),
    )
}
