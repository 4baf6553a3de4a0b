// std
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
// others
use clap::{Parser, ValueEnum};
use log::{error, info};
// pbrt
use rs_photon::cameras::perspective::PinholeCamera;
use rs_photon::core::camera::Camera;
use rs_photon::core::geometry::{Bounds3f, Point2i, Point3f, Vector3f};
use rs_photon::core::pbrt::{Float, Spectrum};
use rs_photon::core::primitive::Primitive;
use rs_photon::core::reflection::Bsdf;
use rs_photon::core::scene::{MediumRegion, Scene};
use rs_photon::integrators::photon_map::settings::{
    DirectLighting, GatherKernel, PhotonMapSettings,
};
use rs_photon::integrators::photon_map::PhotonMapIntegrator;
use rs_photon::lights::point::PointLight;
use rs_photon::materials::glass::GlassBsdf;
use rs_photon::materials::matte::MatteBsdf;
use rs_photon::materials::mirror::MirrorBsdf;
use rs_photon::media::homogeneous::HomogeneousMedium;
use rs_photon::shapes::quad::Quad;
use rs_photon::shapes::sphere::Sphere;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(ValueEnum, Debug, Copy, Clone)]
enum DemoScene {
    /// Cornell box with a glass and a mirror sphere
    Cornell,
    /// Cornell box filled with thin fog
    Fog,
    /// Glass sphere on a floor below a point light
    Caustic,
}

/// Render one of the built-in scenes with photon mapping.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// scene to render
    #[arg(value_enum, default_value = "cornell")]
    scene: DemoScene,
    /// image file to write (PNG)
    #[arg(short = 'o', long = "output", default_value = "rs_photon.png")]
    output: PathBuf,
    /// use specified number of threads for rendering
    #[arg(short = 't', long = "nthreads", default_value_t = 0)]
    nthreads: usize,
    #[arg(long = "width", default_value_t = 512)]
    width: i32,
    #[arg(long = "height", default_value_t = 512)]
    height: i32,
    /// surface photons to store
    #[arg(short = 'p', long = "photons", default_value_t = 250_000)]
    photons: usize,
    /// volume photons to store
    #[arg(long = "volume-photons", default_value_t = 100_000)]
    volume_photons: usize,
    #[arg(short = 'r', long = "radius", default_value_t = 0.05)]
    radius: Float,
    #[arg(long = "volume-radius", default_value_t = 0.1)]
    volume_radius: Float,
    /// maximum number of photons per density estimate
    #[arg(short = 'k', long = "gather-count", default_value_t = 64)]
    gather_count: usize,
    /// samples per pixel
    #[arg(short = 's', long = "spp", default_value_t = 4)]
    spp: u32,
    /// sample direct light explicitly instead of using first bounce photons
    #[arg(long = "next-event")]
    next_event: bool,
    /// store caustic photons only (requires --next-event)
    #[arg(long = "caustics-only")]
    caustics_only: bool,
    /// smooth density estimates with the Epanechnikov kernel
    #[arg(long = "epanechnikov")]
    epanechnikov: bool,
    #[arg(long = "seed", default_value_t = 0)]
    seed: u64,
}

fn matte(r: Float, g: Float, b: Float) -> Option<Arc<dyn Bsdf>> {
    Some(Arc::new(MatteBsdf::new(Spectrum::rgb(r, g, b))))
}

fn cornell_box() -> Vec<Arc<dyn Primitive>> {
    let white = matte(0.73, 0.73, 0.73);
    let glass: Option<Arc<dyn Bsdf>> = Some(Arc::new(GlassBsdf::new(
        Spectrum::new(1.0),
        Spectrum::new(1.0),
        1.5,
    )));
    let mirror: Option<Arc<dyn Bsdf>> = Some(Arc::new(MirrorBsdf::new(Spectrum::new(0.95))));
    vec![
        // floor, ceiling and back wall
        Arc::new(Quad::new(
            Point3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(2.0, 0.0, 0.0),
            white.clone(),
            None,
        )),
        Arc::new(Quad::new(
            Point3f::new(-1.0, 2.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            white.clone(),
            None,
        )),
        Arc::new(Quad::new(
            Point3f::new(-1.0, 0.0, 1.0),
            Vector3f::new(0.0, 2.0, 0.0),
            Vector3f::new(2.0, 0.0, 0.0),
            white,
            None,
        )),
        // red left and green right wall
        Arc::new(Quad::new(
            Point3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(0.0, 2.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            matte(0.65, 0.05, 0.05),
            None,
        )),
        Arc::new(Quad::new(
            Point3f::new(1.0, 0.0, -1.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(0.0, 2.0, 0.0),
            matte(0.12, 0.45, 0.15),
            None,
        )),
        // ceiling light, facing down
        Arc::new(Quad::new(
            Point3f::new(-0.25, 1.99, -0.25),
            Vector3f::new(0.5, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 0.5),
            matte(0.78, 0.78, 0.78),
            Some(Spectrum::new(17.0)),
        )),
        Arc::new(Sphere::new(Point3f::new(-0.45, 0.35, 0.3), 0.35, mirror, None)),
        Arc::new(Sphere::new(Point3f::new(0.45, 0.35, -0.3), 0.35, glass, None)),
    ]
}

fn build_scene(demo: DemoScene) -> Scene {
    match demo {
        DemoScene::Cornell => Scene::new(cornell_box(), None),
        DemoScene::Fog => {
            let medium = HomogeneousMedium::new(&Spectrum::new(0.02), &Spectrum::new(0.15), 0.3);
            let region = MediumRegion {
                medium: Arc::new(medium),
                bounds: Bounds3f::new(Point3f::new(-1.0, 0.0, -1.0), Point3f::new(1.0, 2.0, 1.0)),
            };
            Scene::new(cornell_box(), Some(region))
        }
        DemoScene::Caustic => {
            let glass: Option<Arc<dyn Bsdf>> = Some(Arc::new(GlassBsdf::new(
                Spectrum::new(1.0),
                Spectrum::new(1.0),
                1.5,
            )));
            let primitives: Vec<Arc<dyn Primitive>> = vec![
                Arc::new(Quad::new(
                    Point3f::new(-3.0, 0.0, -3.0),
                    Vector3f::new(0.0, 0.0, 6.0),
                    Vector3f::new(6.0, 0.0, 0.0),
                    matte(0.8, 0.8, 0.8),
                    None,
                )),
                Arc::new(Sphere::new(Point3f::new(0.0, 0.6, 0.0), 0.5, glass, None)),
                Arc::new(PointLight::new(
                    Point3f::new(0.3, 2.5, 0.2),
                    Spectrum::new(30.0),
                )),
            ];
            Scene::new(primitives, None)
        }
    }
}

fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    let settings = PhotonMapSettings {
        photon_count: args.photons,
        volume_photon_count: args.volume_photons,
        gather_radius: args.radius,
        volume_gather_radius: args.volume_radius,
        gather_count: args.gather_count,
        caustics_only: args.caustics_only,
        gather_kernel: if args.epanechnikov {
            GatherKernel::Epanechnikov
        } else {
            GatherKernel::Uniform
        },
        direct_lighting: if args.next_event {
            DirectLighting::NextEvent
        } else {
            DirectLighting::Photons
        },
        spp: args.spp,
        seed: args.seed,
        num_threads: args.nthreads,
        ..Default::default()
    };
    let (pos, look_at) = match args.scene {
        DemoScene::Caustic => (Point3f::new(0.0, 2.0, -3.5), Point3f::new(0.0, 0.4, 0.0)),
        _ => (Point3f::new(0.0, 1.0, -3.4), Point3f::new(0.0, 1.0, 0.0)),
    };
    let camera: Arc<dyn Camera> = Arc::new(PinholeCamera::new(
        pos,
        look_at,
        Vector3f::new(0.0, 1.0, 0.0),
        40.0,
        Point2i {
            x: args.width,
            y: args.height,
        },
    ));
    let scene: Scene = build_scene(args.scene);
    let integrator = PhotonMapIntegrator::new(camera, settings);
    let film = integrator.render(&scene)?;
    film.write_image(&args.output)?;
    info!("Wrote {:?}", args.output);
    Ok(())
}

fn main() {
    env_logger::init();
    // handle command line options
    let args = Cli::parse();
    info!(
        "rs_photon version {} [Detected {} cores]",
        VERSION,
        num_cpus::get()
    );
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
