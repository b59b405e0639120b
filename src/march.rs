use nalgebra::Point3;

use crate::{
    ray::Ray,
    render::Config,
    scene::{ObjectId, Scene},
};

/// Information about a ray hit with scene geometry.
#[derive(Debug, Clone)]
pub struct Hit {
    /// The first object, in scene order, that contained the ray's step.
    pub object: ObjectId,

    /// The ray that caused the intersection, stopped at the hit.
    pub ray: Ray,
}

impl Hit {
    /// The point where the intersection was found.
    pub fn point(&self) -> &Point3<f64> {
        &self.ray.step
    }

    /// The depth where the intersection was found.
    pub fn depth(&self) -> f64 {
        self.ray.depth()
    }
}

/// Walk the ray in fixed steps until one of the scene's objects contains it, or it passes the
/// maximum depth.
///
/// At every step the objects are tested in scene order and the first one that contains the
/// point is returned, even if a later object is closer along the ray.
pub fn march(cfg: &Config, scene: &Scene, mut ray: Ray) -> Option<Hit> {
    ray.reset();

    loop {
        ray.walk(cfg.step_size);

        if ray.depth() > cfg.max_depth {
            return None;
        }

        if let Some((object, _)) = scene
            .objects()
            .find(|(_, obj)| obj.contains(&ray.step, cfg.draw_lights))
        {
            return Some(Hit { object, ray });
        }
    }
}
