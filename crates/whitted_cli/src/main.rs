//! `whitted`: render a JSON scene file to PNG or PPM.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use whitted_renderer::{ReflectionGate, RenderConfig, RenderMode, RenderSession};

#[derive(Parser, Debug)]
#[command(name = "whitted", about = "Whitted-style recursive ray tracer", version)]
struct Cli {
    /// Scene description (JSON)
    scene: PathBuf,

    /// Output image; the extension picks the format (png or ppm)
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Maximum reflection depth
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Only mark which pixels hit geometry
    #[arg(long)]
    isect_only: bool,

    /// Reflect only off materials with a non-zero reflective colour
    #[arg(long)]
    material_reflection: bool,

    /// Apply point light distance attenuation
    #[arg(long)]
    attenuation: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            max_depth: self.depth,
            mode: if self.isect_only {
                RenderMode::IntersectOnly
            } else {
                RenderMode::Shaded
            },
            reflection_gate: if self.material_reflection {
                ReflectionGate::MaterialReflective
            } else {
                ReflectionGate::GlobalSpecular
            },
            light_attenuation: self.attenuation,
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let format = cli
        .output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if !matches!(format.as_deref(), Some("png" | "ppm")) {
        bail!(
            "unsupported output format for {}; use .png or .ppm",
            cli.output.display()
        );
    }

    let mut session = RenderSession::new(cli.width, cli.height).with_config(cli.render_config());
    session
        .load_scene(&cli.scene)
        .with_context(|| format!("failed to load scene {}", cli.scene.display()))?;

    let image = session.render();
    image
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    log::info!("Wrote {}", cli.output.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    log::info!("Starting whitted");
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "camera": { "position": [0, 0, 3], "look_at": [0, 0, 0] },
        "lights": [ { "type": "point", "position": [0, 5, 5], "color": [1, 1, 1] } ],
        "root": { "primitives": [ { "shape": "sphere" } ] }
    }"#;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["whitted", "scene.json"]).unwrap();
        assert_eq!((cli.width, cli.height), (800, 600));
        assert_eq!(cli.output, PathBuf::from("render.png"));

        let config = cli.render_config();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.mode, RenderMode::Shaded);
        assert_eq!(config.reflection_gate, ReflectionGate::GlobalSpecular);
        assert!(!config.light_attenuation);
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "whitted",
            "scene.json",
            "--depth",
            "7",
            "--isect-only",
            "--material-reflection",
            "--attenuation",
        ])
        .unwrap();

        let config = cli.render_config();
        assert_eq!(config.max_depth, 7);
        assert_eq!(config.mode, RenderMode::IntersectOnly);
        assert_eq!(config.reflection_gate, ReflectionGate::MaterialReflective);
        assert!(config.light_attenuation);
    }

    #[test]
    fn test_missing_scene_argument() {
        assert!(Cli::try_parse_from(["whitted"]).is_err());
    }

    #[test]
    fn test_run_writes_ppm() {
        let dir = tempfile::tempdir().unwrap();
        let scene = dir.path().join("sphere.json");
        std::fs::write(&scene, SCENE).unwrap();
        let output = dir.path().join("out.ppm");

        let cli = Cli::try_parse_from([
            "whitted",
            scene.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--width",
            "8",
            "--height",
            "6",
        ])
        .unwrap();
        run(&cli).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"P6"));
    }

    #[test]
    fn test_run_rejects_unknown_format_and_bad_scene() {
        let dir = tempfile::tempdir().unwrap();
        let scene = dir.path().join("bad.json");
        std::fs::write(&scene, "{").unwrap();

        let cli = Cli {
            scene: scene.clone(),
            output: dir.path().join("out.bmp"),
            width: 4,
            height: 4,
            depth: 1,
            isect_only: false,
            material_reflection: false,
            attenuation: false,
            verbose: false,
        };
        assert!(run(&cli).is_err());

        let cli = Cli {
            output: dir.path().join("out.png"),
            ..cli
        };
        let err = run(&cli).unwrap_err();
        assert!(err.to_string().contains("failed to load scene"));
        assert!(!dir.path().join("out.png").exists());
    }
}
