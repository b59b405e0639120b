use nalgebra::Point3;

use crate::Error;

/// A ray through `origin` and `pass`, walked by depth along the z axis.
#[derive(Debug, Clone)]
pub struct Ray {
    /// The anchor of the ray.
    pub origin: Point3<f64>,

    /// A second point that fixes the direction of the ray: the screen position for primary
    /// rays, or the light position for shadow rays.
    pub pass: Point3<f64>,

    /// The current point along the ray.
    pub step: Point3<f64>,

    /// Change in x and y per unit of z.
    dxdz: f64,
    dydz: f64,
}

impl Ray {
    /// Construct a new ray. Rays whose two points share a z coordinate have no slope to walk
    /// along, and are rejected.
    pub fn new(origin: Point3<f64>, pass: Point3<f64>) -> Result<Ray, Error> {
        let dz = pass.z - origin.z;
        if dz == 0. {
            return Err(Error::DegenerateRay { z: pass.z });
        }

        Ok(Ray {
            origin,
            pass,
            step: Point3::origin(),
            dxdz: (pass.x - origin.x) / dz,
            dydz: (pass.y - origin.y) / dz,
        })
    }

    /// The depth reached so far.
    #[inline]
    pub fn depth(&self) -> f64 {
        self.step.z
    }

    /// Return to the start of the walk.
    pub fn reset(&mut self) {
        self.step = Point3::origin();
    }

    /// Advance `step` by `amount` in z, and place x and y on the line's slope at the new depth.
    ///
    /// The slope is scaled by the depth alone, so the walk follows a line through the world
    /// origin that is parallel to the one through `origin` and `pass`.
    #[inline]
    pub fn walk(&mut self, amount: f64) {
        self.step.z += amount;
        self.step.x = self.dxdz * self.step.z;
        self.step.y = self.dydz * self.step.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_walk() {
        let mut ray = Ray::new(Point3::new(0., 0., -10.), Point3::new(5., -10., 0.)).unwrap();
        assert_eq!(0., ray.depth());

        ray.walk(1.);
        assert_relative_eq!(Point3::new(0.5, -1., 1.), ray.step);

        ray.walk(1.);
        ray.walk(2.);
        assert_relative_eq!(Point3::new(2., -4., 4.), ray.step);
        assert_eq!(4., ray.depth());

        ray.reset();
        assert_eq!(Point3::origin(), ray.step);
    }

    #[test]
    fn test_walk_ignores_origin_offset() {
        let mut ray = Ray::new(Point3::new(3., 3., 1.), Point3::new(5., 3., 3.)).unwrap();
        ray.walk(2.);
        assert_relative_eq!(Point3::new(2., 0., 2.), ray.step);
    }

    #[test]
    fn test_degenerate_ray() {
        let res = Ray::new(Point3::new(0., 0., 5.), Point3::new(1., 1., 5.));
        assert!(matches!(res, Err(Error::DegenerateRay { .. })));
    }
}
