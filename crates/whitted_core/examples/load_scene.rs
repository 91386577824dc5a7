//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run --example load_scene -- scenes/spheres.json

use std::env;

use whitted_core::{load_scene, Light, SceneNode};

fn print_node(node: &SceneNode, depth: usize) {
    let indent = "  ".repeat(depth + 1);
    for op in &node.transformations {
        println!("{}{:?}", indent, op);
    }
    for prim in &node.primitives {
        let texture = prim
            .material
            .active_texture()
            .map(|t| t.file.as_str())
            .unwrap_or("-");
        println!(
            "{}{} diffuse=({:.2}, {:.2}, {:.2}) texture={}",
            indent,
            prim.shape.name(),
            prim.material.diffuse.x,
            prim.material.diffuse.y,
            prim.material.diffuse.z,
            texture
        );
    }
    for child in &node.children {
        println!("{}node", indent);
        print_node(child, depth + 1);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_scene <path-to-scene-json>");
        println!("\nExamples:");
        println!("  cargo run --example load_scene -- scenes/spheres.json");
        println!("  cargo run --example load_scene -- scenes/mirrors.json");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            println!("\n=== Scene: {} ===", scene.name);
            println!("Primitives: {}", scene.primitive_count());
            println!("Lights: {}", scene.light_count());
            println!(
                "Globals: ka={} kd={} ks={} kt={}",
                scene.globals.ka, scene.globals.kd, scene.globals.ks, scene.globals.kt
            );

            println!("\n--- Lights ---");
            for light in &scene.lights {
                match light {
                    Light::Point { position, .. } => println!(
                        "  point at ({:.2}, {:.2}, {:.2})",
                        position.x, position.y, position.z
                    ),
                    Light::Directional { direction, .. } => println!(
                        "  directional towards ({:.2}, {:.2}, {:.2})",
                        direction.x, direction.y, direction.z
                    ),
                }
            }

            println!("\n--- Tree ---");
            print_node(&scene.root, 0);
        }
        Err(e) => {
            eprintln!("Error loading scene: {}", e);
            std::process::exit(1);
        }
    }
}
