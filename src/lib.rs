//! A fixed-step ray marcher for scenes of cubes, spheres, ground slabs and point lights,
//! rendering to a grid of 24-bit pixels.

pub mod canvas;
mod error;
pub mod integrator;
pub mod march;
pub mod math;
pub mod ray;
pub mod render;
pub mod scene;
pub mod shapes;

pub use error::Error;
