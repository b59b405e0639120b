use nalgebra::{Point3, Vector3};

/// The kinds of solid a scene can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// An axis-aligned cube.
    Cube,

    /// A sphere.
    Sphere,

    /// A thin, axis-aligned slab standing in for a ground plane.
    Plane,

    /// A point light, drawn as a sphere when lights are visualized.
    Light,
}

impl Shape {
    /// Map the type tag used in scene files to a shape.
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'c' => Some(Shape::Cube),
            's' => Some(Shape::Sphere),
            'p' => Some(Shape::Plane),
            'l' => Some(Shape::Light),
            _ => None,
        }
    }

    pub fn tag(&self) -> char {
        match self {
            Shape::Cube => 'c',
            Shape::Sphere => 's',
            Shape::Plane => 'p',
            Shape::Light => 'l',
        }
    }

    /// Returns `true` when `point` lies inside this shape, placed at `center` with the given
    /// `rotation` and `size`. Lights only occupy space when `draw_lights` is set.
    pub fn contains(
        &self,
        size: f64,
        center: &Point3<f64>,
        rotation: &Vector3<f64>,
        point: &Point3<f64>,
        draw_lights: bool,
    ) -> bool {
        match self {
            Shape::Cube => cube(size, center, rotation, point),
            Shape::Sphere => sphere(size, center, rotation, point),
            Shape::Plane => plane(size, center, rotation, point),
            Shape::Light => draw_lights && sphere(size, center, rotation, point),
        }
    }
}

/// True when `point` is no further than `radius` from `center`.
pub fn sphere(
    radius: f64,
    center: &Point3<f64>,
    _rotation: &Vector3<f64>,
    point: &Point3<f64>,
) -> bool {
    (point - center).norm_squared() <= radius * radius
}

/// True when `point` lies in the axis-aligned box of half-width `side` around `center`.
///
/// The rotation is accepted for symmetry with the other shapes, but cubes are always
/// axis-aligned.
pub fn cube(
    side: f64,
    center: &Point3<f64>,
    _rotation: &Vector3<f64>,
    point: &Point3<f64>,
) -> bool {
    let d = (point - center).abs();
    d.x <= side && d.y <= side && d.z <= side
}

/// True when `point` lies within `side` of `center` in x and z, and within one unit in y.
pub fn plane(
    side: f64,
    center: &Point3<f64>,
    _rotation: &Vector3<f64>,
    point: &Point3<f64>,
) -> bool {
    let d = (point - center).abs();
    d.x <= side && d.y <= 1. && d.z <= side
}
