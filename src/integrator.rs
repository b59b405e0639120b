use crossbeam::{channel, thread};
use log::debug;
use nalgebra::Point3;

use crate::{
    canvas::{Canvas, Pixel},
    march::march,
    ray::Ray,
    render::Config,
    scene::Scene,
    Error,
};

mod shading;

pub use shading::shade_hit;

/// The point on the screen plane that the ray for pixel `(col, row)` passes through. The
/// center of the canvas lines up with the viewpoint.
pub fn screen_point(cfg: &Config, width: u32, height: u32, col: u32, row: u32) -> Point3<f64> {
    Point3::new(
        col as f64 - (width / 2) as f64,
        row as f64 - (height / 2) as f64,
        cfg.screen_depth,
    )
}

/// Compute the color seen through `pass`.
pub fn trace(cfg: &Config, scene: &Scene, pass: Point3<f64>) -> Result<Pixel, Error> {
    let ray = Ray::new(*scene.viewpoint(), pass)?;
    Ok(march(cfg, scene, ray).map_or(cfg.background, |hit| shade_hit(cfg, scene, &hit)))
}

fn render_row(
    cfg: &Config,
    scene: &Scene,
    width: u32,
    height: u32,
    row: u32,
) -> Result<Vec<Pixel>, Error> {
    (0..width)
        .map(|col| trace(cfg, scene, screen_point(cfg, width, height, col, row)))
        .collect()
}

/// Reject scenes that can't be rendered with this configuration.
fn check_scene(cfg: &Config, scene: &Scene) -> Result<(), Error> {
    if scene.is_empty() {
        return Err(Error::EmptyScene);
    }

    if scene.len() > cfg.max_objects {
        return Err(Error::TooManyObjects {
            count: scene.len(),
            max: cfg.max_objects,
        });
    }

    // Every primary ray shares the viewpoint and the screen depth.
    Ray::new(*scene.viewpoint(), Point3::new(0., 0., cfg.screen_depth))?;

    Ok(())
}

/// Render the scene to a `width` by `height` canvas, spreading rows over `cfg.jobs` threads.
pub fn render(cfg: &Config, scene: &Scene, width: u32, height: u32) -> Result<Canvas, Error> {
    check_scene(cfg, scene)?;
    let mut canvas = Canvas::new(width, height)?;

    let jobs = cfg.jobs.max(1);
    debug!(
        "rendering {} objects at {}x{} with {} jobs",
        scene.len(),
        width,
        height,
        jobs
    );

    let (input, rows) = channel::unbounded();
    for row in 0..height {
        // `rows` is still alive, so the queue can't be disconnected.
        let _ = input.send(row);
    }
    drop(input);

    let (results, finished) = channel::unbounded();

    let outcome = thread::scope(|s| {
        for _ in 0..jobs {
            let rows = rows.clone();
            let results = results.clone();
            s.spawn(move |_| {
                for row in rows {
                    let pixels = render_row(cfg, scene, width, height, row);
                    if results.send((row, pixels)).is_err() {
                        break;
                    }
                }
            });
        }

        drop(results);

        for (row, pixels) in finished.iter() {
            canvas.blit_row(row as usize, &pixels?);
        }

        Ok::<(), Error>(())
    });

    match outcome {
        Ok(res) => res?,
        Err(panic) => std::panic::resume_unwind(panic),
    }

    debug!("finished rendering {} rows", height);

    Ok(canvas)
}
