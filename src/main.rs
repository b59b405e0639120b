use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Error};
use clap::Parser;
use crossbeam::channel;
use log::{error, info, warn};
use notify::{event::ModifyKind, Event, EventKind, RecursiveMode, Watcher};
use terminal_size::{terminal_size, Height, Width};

use ansirt::{
    integrator,
    render::{Config, ConfigBuilder},
    scene,
};

/// Render a scene to the terminal by marching rays through it.
#[derive(Parser, Debug)]
#[command(name = "ansirt")]
struct Opts {
    /// The scene file to render
    scene: PathBuf,

    /// Width of the image in pixels [default: half the terminal width]
    #[arg(long)]
    width: Option<u32>,

    /// Height of the image in pixels [default: the terminal height]
    #[arg(long)]
    height: Option<u32>,

    /// Distance between containment tests along each ray
    #[arg(long, default_value_t = 1.0)]
    step_size: f64,

    /// Depth at which rays give up
    #[arg(long, default_value_t = 100.0)]
    max_depth: f64,

    /// Largest number of objects accepted from the scene file
    #[arg(long, default_value_t = 16)]
    max_objects: usize,

    /// Don't draw lights as spheres
    #[arg(long)]
    hide_lights: bool,

    /// Number of render threads [default: number of CPUs]
    #[arg(long, short)]
    jobs: Option<usize>,

    /// Write a PNG to this path instead of drawing to the terminal
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Re-render whenever the scene file changes
    #[arg(long)]
    watch: bool,
}

impl Opts {
    fn config(&self) -> Result<Arc<Config>, Error> {
        let cfg = ConfigBuilder::default()
            .set_step_size(self.step_size)
            .set_max_depth(self.max_depth)
            .set_max_objects(self.max_objects)
            .set_draw_lights(!self.hide_lights)
            .set_jobs(self.jobs.unwrap_or_else(num_cpus::get))
            .build()?;
        Ok(cfg)
    }

    fn dimensions(&self) -> (u32, u32) {
        image_size(self.width, self.height, terminal_size())
    }
}

/// Terminal cells assumed when stdout isn't a terminal.
const FALLBACK_TERMINAL: (u32, u32) = (80, 24);

/// Pick the image size, filling in whatever wasn't given on the command line from the size of
/// the terminal. Each pixel takes up two terminal cells.
fn image_size(
    width: Option<u32>,
    height: Option<u32>,
    terminal: Option<(Width, Height)>,
) -> (u32, u32) {
    let (columns, lines) = terminal
        .map(|(Width(w), Height(h))| (u32::from(w), u32::from(h)))
        .unwrap_or(FALLBACK_TERMINAL);

    (width.unwrap_or(columns / 2), height.unwrap_or(lines))
}

fn render_once(opts: &Opts, cfg: &Config) -> Result<(), Error> {
    let scene = scene::load(&opts.scene, cfg.max_objects)
        .with_context(|| format!("failed to load scene `{}`", opts.scene.display()))?;

    let (width, height) = opts.dimensions();
    let canvas = integrator::render(cfg, &scene, width, height).context("failed to render")?;

    match &opts.output {
        Some(path) => {
            image::save_buffer(
                path,
                &canvas.data(),
                canvas.width(),
                canvas.height(),
                image::ColorType::Rgb8,
            )
            .with_context(|| format!("failed to write `{}`", path.display()))?;
            info!("wrote {}", path.display());
        }

        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(canvas.to_ansi().as_bytes())?;
            out.flush()?;
        }
    }

    Ok(())
}

fn watch(opts: &Opts, cfg: &Config) -> Result<(), Error> {
    let scene_path = opts.scene.canonicalize()?;
    let scene_dir = scene_path
        .parent()
        .map(Path::to_path_buf)
        .context("scene file has no parent directory")?;

    let (changed, changes) = channel::unbounded();

    let mut watcher = {
        let scene_path = scene_path.clone();
        notify::recommended_watcher(move |event: notify::Result<Event>| match event {
            Ok(Event {
                kind: EventKind::Modify(ModifyKind::Data(_)) | EventKind::Create(_),
                paths,
                ..
            }) if paths.contains(&scene_path) => {
                let _ = changed.send(());
            }
            Ok(_) => (),
            Err(err) => warn!("watch error: {}", err),
        })?
    };

    watcher.watch(&scene_dir, RecursiveMode::NonRecursive)?;
    info!("watching {}", scene_path.display());

    if let Err(err) = render_once(opts, cfg) {
        error!("{:#}", err);
    }

    while changes.recv().is_ok() {
        // A single save can produce several events.
        while changes.try_recv().is_ok() {}

        if let Err(err) = render_once(opts, cfg) {
            error!("{:#}", err);
        }
    }

    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let opts = Opts::parse();
    let cfg = opts.config()?;

    if opts.watch {
        watch(&opts, &cfg)
    } else {
        render_once(&opts, &cfg)
    }
}
