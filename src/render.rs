use std::sync::Arc;

use crate::{canvas::Pixel, Error};

pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder {
            config: Config {
                step_size: 1.0,
                max_depth: 100.0,
                max_objects: 16,
                draw_lights: true,
                jobs: 1,
                screen_depth: 0.0,
                background: Pixel::background(),
            },
        }
    }
}

impl ConfigBuilder {
    /// Set the distance in z between two containment tests. Smaller steps are slower, but
    /// resolve thinner features.
    pub fn set_step_size(mut self, step_size: f64) -> Self {
        self.config.step_size = step_size;
        self
    }

    pub fn set_max_depth(mut self, max_depth: f64) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn set_max_objects(mut self, max_objects: usize) -> Self {
        self.config.max_objects = max_objects;
        self
    }

    pub fn set_draw_lights(mut self, draw_lights: bool) -> Self {
        self.config.draw_lights = draw_lights;
        self
    }

    pub fn set_jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = usize::max(jobs, 1);
        self
    }

    pub fn set_screen_depth(mut self, screen_depth: f64) -> Self {
        self.config.screen_depth = screen_depth;
        self
    }

    /// Set the color of pixels whose primary ray escapes. Channels are clamped into `0..=255`.
    pub fn set_background(mut self, background: Pixel) -> Self {
        self.config.background = background.clamp();
        self
    }

    pub fn build(self) -> Result<Arc<Config>, Error> {
        let cfg = self.config;

        if !(cfg.step_size.is_finite() && cfg.step_size > 0.) {
            return Err(Error::InvalidConfig("step size must be positive"));
        }

        if !(cfg.max_depth.is_finite() && cfg.max_depth > 0.) {
            return Err(Error::InvalidConfig("max depth must be positive"));
        }

        if cfg.max_objects == 0 {
            return Err(Error::InvalidConfig("max objects must be at least one"));
        }

        if !cfg.screen_depth.is_finite() {
            return Err(Error::InvalidConfig("screen depth must be finite"));
        }

        Ok(Arc::new(cfg))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Distance in z between containment tests.
    pub step_size: f64,

    /// Depth beyond which a ray is considered to have missed.
    pub max_depth: f64,

    /// The largest number of objects a scene may hold.
    pub max_objects: usize,

    /// Whether lights occupy space and can be hit.
    pub draw_lights: bool,

    /// Number of worker threads used by the frame assembler.
    pub jobs: usize,

    /// The z coordinate of the screen plane that primary rays pass through.
    pub screen_depth: f64,

    /// Color of pixels whose primary ray escapes the scene.
    pub background: Pixel,
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::default().config
    }
}
