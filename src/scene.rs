use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

use crate::{canvas::Pixel, shapes::Shape};

mod file;

pub use file::{load, parse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A solid or light placed in the scene.
#[derive(Debug, Clone)]
pub struct Object {
    pub shape: Shape,

    /// Whether a hit on this object casts a reflection ray.
    pub reflective: bool,

    pub position: Point3<f64>,

    /// Orientation of the object. Only carried through to the shape predicates; none of them
    /// currently rotate.
    pub rotation: Vector3<f64>,

    /// Size of the object. The x component is the radius or half-width used for containment.
    pub scale: Vector3<f64>,

    /// Surface color, in the unclamped `0..=255` range.
    pub material: Pixel,
}

impl Object {
    pub fn new(shape: Shape, position: Point3<f64>, size: f64, material: Pixel) -> Self {
        Self {
            shape,
            reflective: false,
            position,
            rotation: Vector3::zeros(),
            scale: Vector3::new(size, size, size),
            material,
        }
    }

    pub fn with_rotation(mut self, rotation: Vector3<f64>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_reflective(mut self, reflective: bool) -> Self {
        self.reflective = reflective;
        self
    }

    pub fn is_light(&self) -> bool {
        self.shape == Shape::Light
    }

    /// Test whether `point` lies inside this object.
    #[inline]
    pub fn contains(&self, point: &Point3<f64>, draw_lights: bool) -> bool {
        self.shape.contains(
            self.scale.x,
            &self.position,
            &self.rotation,
            point,
            draw_lights,
        )
    }
}

/// An ordered collection of objects viewed from a single viewpoint. Earlier objects take
/// precedence when several contain the same point.
#[derive(Debug, Clone)]
pub struct Scene {
    viewpoint: Point3<f64>,
    objects: Vec<Object>,
    lights: SmallVec<[ObjectId; 4]>,
}

impl Scene {
    pub fn new(viewpoint: Point3<f64>) -> Self {
        Self {
            viewpoint,
            objects: Vec::new(),
            lights: SmallVec::new(),
        }
    }

    pub fn viewpoint(&self) -> &Point3<f64> {
        &self.viewpoint
    }

    pub fn set_viewpoint(&mut self, viewpoint: Point3<f64>) {
        self.viewpoint = viewpoint;
    }

    /// Append an object to the end of the scene.
    pub fn add(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        if object.is_light() {
            self.lights.push(id);
        }
        self.objects.push(object);
        id
    }

    /// Add a cube with the given half-width.
    pub fn cube(&mut self, position: Point3<f64>, side: f64, material: Pixel) -> ObjectId {
        self.add(Object::new(Shape::Cube, position, side, material))
    }

    /// Add a sphere with the given radius.
    pub fn sphere(&mut self, position: Point3<f64>, radius: f64, material: Pixel) -> ObjectId {
        self.add(Object::new(Shape::Sphere, position, radius, material))
    }

    /// Add a ground slab with the given half-width.
    pub fn plane(&mut self, position: Point3<f64>, side: f64, material: Pixel) -> ObjectId {
        self.add(Object::new(Shape::Plane, position, side, material))
    }

    /// Add a point light, drawn with the given radius when lights are visualized.
    pub fn light(&mut self, position: Point3<f64>, radius: f64, material: Pixel) -> ObjectId {
        self.add(Object::new(Shape::Light, position, radius, material))
    }

    #[inline]
    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    /// Iterate over the objects in precedence order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(ix, obj)| (ObjectId(ix as u32), obj))
    }

    /// Iterate over the lights in scene order.
    pub fn lights(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.lights.iter().map(|&id| (id, self.object(id)))
    }

    pub fn num_lights(&self) -> usize {
        self.lights.len()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
