use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use tinyraster::camera::Camera;
use tinyraster::light::DirectionalLight;
use tinyraster::math::vec3::Vec3;
use tinyraster::{Engine, EngineConfig, Materials, Model, ShadingMode, Texture};

#[derive(Parser)]
#[command(about = "Render an OBJ model on the CPU")]
struct Args {
    /// Wavefront OBJ model to render
    model: PathBuf,

    /// Shading mode
    #[arg(long, value_enum, default_value_t = ShadingMode::Gouraud)]
    mode: ShadingMode,

    /// Output image (format from extension)
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Diffuse texture
    #[arg(long)]
    diffuse: Option<PathBuf>,

    /// Object-space normal map
    #[arg(long)]
    normal: Option<PathBuf>,

    /// Tangent-space normal map
    #[arg(long)]
    tangent_normal: Option<PathBuf>,

    /// Specular map
    #[arg(long)]
    specular: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Camera position, as "x,y,z"
    #[arg(long, value_parser = parse_vec3, default_value = "1,1,3")]
    eye: Vec3,

    /// Point the camera looks at, as "x,y,z"
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
    target: Vec3,

    /// Camera up vector, as "x,y,z"
    #[arg(long, value_parser = parse_vec3, default_value = "0,1,0")]
    up: Vec3,

    /// Direction toward the light, as "x,y,z"
    #[arg(long, value_parser = parse_vec3, default_value = "1,1,1")]
    light: Vec3,

    /// Also bake an ambient occlusion map to this file
    #[arg(long)]
    bake_occlusion: Option<PathBuf>,

    /// Random directions sampled while baking
    #[arg(long, default_value_t = 1000)]
    passes: u32,

    /// Seed for the baking directions
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("`{p}`: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected three comma-separated numbers, got `{s}`")),
    }
}

fn load_texture(path: Option<&Path>) -> Result<Option<Texture>> {
    path.map(|p| Texture::from_file(p).with_context(|| format!("loading {}", p.display())))
        .transpose()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let model = Model::from_obj(&args.model)
        .with_context(|| format!("loading {}", args.model.display()))?;
    let materials = Materials {
        diffuse: load_texture(args.diffuse.as_deref())?,
        normal: load_texture(args.normal.as_deref())?,
        tangent_normal: load_texture(args.tangent_normal.as_deref())?,
        specular: load_texture(args.specular.as_deref())?,
    };

    let mut config = EngineConfig::new(args.width, args.height);
    config.camera = Camera::new(args.eye, args.target, args.up);
    config.light = DirectionalLight::new(args.light);
    config.occlusion_passes = args.passes;
    config.seed = args.seed;
    let engine = Engine::new(config);

    let image = engine.render(args.mode, &model, &materials)?;
    image
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("wrote {}", args.output.display());

    if let Some(path) = &args.bake_occlusion {
        let mut rng = StdRng::seed_from_u64(engine.config().seed);
        let map = engine.bake_occlusion(&model, &mut rng)?;
        map.save_gray(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote occlusion map {}", path.display());
    }

    Ok(())
}
