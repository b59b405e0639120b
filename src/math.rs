use nalgebra::{Point3, Vector3};

use crate::Error;

/// Scale factor applied to the mirrored pass point of a reflection ray. Single precision, so
/// reflections land on the same side of containment boundaries as in the C renderer.
pub const REFLECT_SCALE: f64 = 0.005_f32 as f64;

/// Divide every component of `vec` by its largest component.
///
/// This is not a unit-length normalization: the result has a largest component of exactly `1.0`.
/// A vector whose largest component is zero can't be normalized this way.
pub fn normalize_by_max(vec: &Vector3<f64>) -> Result<Vector3<f64>, Error> {
    let max = vec.x.max(vec.y).max(vec.z);
    if max == 0. || !max.is_finite() {
        return Err(Error::DegenerateNormalization { max });
    }
    Ok(vec / max)
}

/// Mirror `pass` about `normal`, producing the pass point of a reflection ray.
///
/// The x and y components are mirrored and then shrunk by [`REFLECT_SCALE`], while the z
/// component is only negated. `normal` is used as-is, without normalizing it first.
pub fn reflect_about(pass: &Point3<f64>, normal: &Vector3<f64>) -> Point3<f64> {
    let twice_dot = 2. * pass.coords.dot(normal);
    Point3::new(
        (pass.x - twice_dot * normal.x) * REFLECT_SCALE,
        (pass.y - twice_dot * normal.y) * REFLECT_SCALE,
        -pass.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vector_ops() {
        let a = Vector3::new(1., 2., 3.);
        let b = Vector3::new(4., -5., 6.);

        assert_eq!(Vector3::new(-3., 7., -3.), a - b);
        assert_eq!(Vector3::new(2., 4., 6.), 2. * a);
        assert_relative_eq!(12., a.dot(&b));
    }

    #[test]
    fn test_normalize_by_max() {
        let res = normalize_by_max(&Vector3::new(2., 8., -4.)).unwrap();
        assert_relative_eq!(Vector3::new(0.25, 1., -0.5), res);

        // The largest component wins, not the largest magnitude.
        let res = normalize_by_max(&Vector3::new(-10., 2., 1.)).unwrap();
        assert_relative_eq!(Vector3::new(-5., 1., 0.5), res);
    }

    #[test]
    fn test_normalize_by_zero_max() {
        assert!(matches!(
            normalize_by_max(&Vector3::new(0., -1., -2.)),
            Err(Error::DegenerateNormalization { .. })
        ));
    }

    #[test]
    fn test_reflect_scale_is_single_precision() {
        assert_eq!(0.005_f32, REFLECT_SCALE as f32);
        assert!(REFLECT_SCALE < 0.005);
    }

    #[test]
    fn test_reflect_about() {
        let pass = Point3::new(10., 0., 0.);
        let normal = Vector3::new(5., 0., 5.);
        let res = reflect_about(&pass, &normal);

        assert_eq!(-490. * REFLECT_SCALE, res.x);
        assert_relative_eq!(-2.45, res.x, epsilon = 1e-6);
        assert_relative_eq!(0., res.y);
        assert_relative_eq!(0., res.z);
    }
}
