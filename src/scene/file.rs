//! Loader for the plain-text scene format.
//!
//! A scene file is a sequence of whitespace separated records, each made of fourteen fields:
//!
//! ```text
//! type  px py pz  rx ry rz  sx sy sz  reflective  r g b
//! ```
//!
//! The first character of `type` selects the kind of record: `v` for the viewpoint, or one of
//! the [`Shape`] tags. A `#` comments out the rest of its line.

use std::path::Path;

use log::warn;
use nalgebra::{Point3, Vector3};

use crate::{
    canvas::Pixel,
    scene::{Object, Scene},
    shapes::Shape,
    Error,
};

const FIELDS: usize = 14;

const VIEWPOINT: char = 'v';

/// Read and parse the scene file at `path`.
pub fn load(path: impl AsRef<Path>, max_objects: usize) -> Result<Scene, Error> {
    let input = std::fs::read_to_string(path)?;
    parse(&input, max_objects)
}

/// Parse a scene, rejecting scenes with more than `max_objects` objects.
pub fn parse(input: &str, max_objects: usize) -> Result<Scene, Error> {
    let tokens: Vec<&str> = input
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace)
        .collect();

    let mut viewpoint = None;
    let mut objects = Vec::new();

    for (ix, fields) in tokens.chunks(FIELDS).enumerate() {
        let record = ix + 1;

        if fields.len() < FIELDS {
            return Err(Error::TruncatedRecord {
                record,
                expected: FIELDS,
                found: fields.len(),
            });
        }

        let mut fields = Fields {
            record,
            fields: fields.iter(),
        };

        let tag = fields.tag();
        let position = fields.point("position")?;

        if tag == VIEWPOINT {
            viewpoint = Some(position);
            continue;
        }

        let rotation = fields.vector("rotation")?;
        let scale = fields.vector("scale")?;
        let reflective = fields.int("reflective")? != 0;
        let material = Pixel::new(fields.int("red")?, fields.int("green")?, fields.int("blue")?);

        let Some(shape) = Shape::from_tag(tag) else {
            warn!("record {}: unrecognized object type `{}`, skipping", record, tag);
            continue;
        };

        objects.push(Object {
            shape,
            reflective,
            position,
            rotation,
            scale,
            material,
        });

        if objects.len() > max_objects {
            return Err(Error::TooManyObjects {
                count: objects.len(),
                max: max_objects,
            });
        }
    }

    let mut scene = Scene::new(viewpoint.ok_or(Error::MissingViewpoint)?);
    for object in objects {
        scene.add(object);
    }

    Ok(scene)
}

/// Cursor over the fields of a single record.
struct Fields<'a, 'b> {
    record: usize,
    fields: std::slice::Iter<'b, &'a str>,
}

impl<'a> Fields<'a, '_> {
    fn text(&mut self) -> &'a str {
        // Records are length checked before a cursor is made.
        self.fields.next().copied().unwrap_or_default()
    }

    fn tag(&mut self) -> char {
        self.text().chars().next().unwrap_or_default()
    }

    fn float(&mut self, field: &'static str) -> Result<f64, Error> {
        let record = self.record;
        let text = self.text();
        text.parse().map_err(|_err| Error::Parse {
            record,
            field,
            text: text.to_string(),
        })
    }

    fn int(&mut self, field: &'static str) -> Result<i32, Error> {
        let record = self.record;
        let text = self.text();
        text.parse().map_err(|_err| Error::Parse {
            record,
            field,
            text: text.to_string(),
        })
    }

    fn vector(&mut self, field: &'static str) -> Result<Vector3<f64>, Error> {
        Ok(Vector3::new(
            self.float(field)?,
            self.float(field)?,
            self.float(field)?,
        ))
    }

    fn point(&mut self, field: &'static str) -> Result<Point3<f64>, Error> {
        self.vector(field).map(Point3::from)
    }
}
