use log::trace;

use crate::{
    canvas::Pixel,
    march::{march, Hit},
    math,
    ray::Ray,
    render::Config,
    scene::Scene,
};

/// Depth at which the falloff reaches zero.
const FALLOFF_DEPTH: f64 = 150.;

/// Brightness added to directly lit hits at `depth`.
fn direct_intensity(depth: f64) -> i32 {
    (50. + (FALLOFF_DEPTH - depth).powi(3) / 1_000_000. * 255.).floor() as i32
}

/// Brightness added by a reflection that hit something at `depth`.
fn reflected_intensity(depth: f64) -> i32 {
    ((FALLOFF_DEPTH - depth).powi(3) / 2_000_000. * 255.).floor() as i32
}

/// Shade the color of a primary hit.
pub fn shade_hit(cfg: &Config, scene: &Scene, hit: &Hit) -> Pixel {
    let object = scene.object(hit.object);

    // Scenes without lights count as having every light blocked.
    let mut pixel = if lights_missed(cfg, scene, hit) == scene.num_lights() {
        Pixel::black()
    } else {
        let mut pixel = object.material;
        pixel.brighten(direct_intensity(hit.depth()));
        pixel.clamp()
    };

    if object.reflective {
        if let Some(refl) = reflect(cfg, scene, hit) {
            pixel.brighten(reflected_intensity(refl.depth()));
            pixel += scene.object(refl.object).material;
            pixel = pixel.clamp();
        }
    }

    pixel
}

/// Count the lights whose shadow ray is stopped by something other than the light itself or
/// the object that was hit.
fn lights_missed(cfg: &Config, scene: &Scene, hit: &Hit) -> usize {
    scene
        .lights()
        .filter(|(id, light)| {
            let ray = match Ray::new(*hit.point(), light.position) {
                Ok(ray) => ray,
                Err(err) => {
                    trace!("no shadow ray to light {:?}: {}", id, err);
                    return false;
                }
            };

            march(cfg, scene, ray).map_or(false, |blocker| {
                blocker.object != *id && blocker.object != hit.object
            })
        })
        .count()
}

/// March the single reflection ray of a hit. The hit point stands in for the surface normal.
fn reflect(cfg: &Config, scene: &Scene, hit: &Hit) -> Option<Hit> {
    let normal = hit.point().coords;
    let pass = math::reflect_about(&hit.ray.pass, &normal);

    match Ray::new(*hit.point(), pass) {
        Ok(ray) => march(cfg, scene, ray),
        Err(err) => {
            trace!("no reflection ray from {:?}: {}", hit.point(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scene::Object, shapes::Shape};
    use nalgebra::Point3;

    fn primary(scene: &Scene, pass: Point3<f64>) -> Hit {
        let ray = Ray::new(*scene.viewpoint(), pass).unwrap();
        march(&Config::default(), scene, ray).expect("primary hit")
    }

    fn straight_ahead() -> Point3<f64> {
        Point3::new(0., 0., 0.)
    }

    /// A dim sphere hit at a depth of 100 by the central ray.
    fn far_sphere() -> Scene {
        let mut scene = Scene::new(Point3::new(0., 0., -10.));
        scene.sphere(Point3::new(0., 0., 101.), 1., Pixel::new(100, 20, 0));
        scene
    }

    #[test]
    fn test_intensity() {
        assert_eq!(81, direct_intensity(100.));
        assert_eq!(749, direct_intensity(10.));
        assert_eq!(15, reflected_intensity(100.));
        assert_eq!(349, reflected_intensity(10.));
    }

    #[test]
    fn test_unobstructed_light() {
        let cfg = Config::default();
        let mut scene = far_sphere();
        scene.light(Point3::new(0., 50., 50.), 1., Pixel::new(255, 255, 255));

        let hit = primary(&scene, straight_ahead());
        assert_eq!(100., hit.depth());
        assert_eq!(0, lights_missed(&cfg, &scene, &hit));
        assert_eq!(Pixel::new(181, 101, 81), shade_hit(&cfg, &scene, &hit));
    }

    #[test]
    fn test_occluded_light() {
        let cfg = Config::default();
        let mut scene = far_sphere();
        scene.light(Point3::new(0., 50., 50.), 1., Pixel::new(255, 255, 255));

        // The shadow ray walks (0, -z, z).
        scene.cube(Point3::new(0., -30., 30.), 1., Pixel::new(0, 0, 255));

        let hit = primary(&scene, straight_ahead());
        assert_eq!(1, lights_missed(&cfg, &scene, &hit));
        assert_eq!(Pixel::black(), shade_hit(&cfg, &scene, &hit));
    }

    #[test]
    fn test_partially_occluded_lights() {
        let cfg = Config::default();
        let mut scene = far_sphere();
        scene.light(Point3::new(0., 50., 50.), 1., Pixel::new(255, 255, 255));
        // Its shadow ray walks (-z, 0, z), clear of the cube.
        scene.light(Point3::new(50., 0., 50.), 1., Pixel::new(255, 255, 255));
        scene.cube(Point3::new(0., -30., 30.), 1., Pixel::new(0, 0, 255));

        let hit = primary(&scene, straight_ahead());
        assert_eq!(1, lights_missed(&cfg, &scene, &hit));
        assert_eq!(Pixel::new(181, 101, 81), shade_hit(&cfg, &scene, &hit));
    }

    #[test]
    fn test_no_lights_is_black() {
        let cfg = Config::default();
        let scene = far_sphere();

        let hit = primary(&scene, straight_ahead());
        assert_eq!(Pixel::black(), shade_hit(&cfg, &scene, &hit));
    }

    #[test]
    fn test_hit_object_does_not_shadow_itself() {
        let cfg = Config::default();
        let mut scene = Scene::new(Point3::new(0., 0., -10.));
        let floor = scene.plane(Point3::new(0., 0., 100.), 200., Pixel::new(10, 10, 10));
        scene.light(Point3::new(0., 50., -49.), 1., Pixel::new(255, 255, 255));

        let hit = primary(&scene, straight_ahead());
        assert_eq!(floor, hit.object);
        assert_eq!(1., hit.depth());

        // The shadow ray walks (0, -z, z), and is inside the slab at its first step.
        assert_eq!(0, lights_missed(&cfg, &scene, &hit));
        assert_eq!(Pixel::new(255, 255, 255), shade_hit(&cfg, &scene, &hit));
    }

    #[test]
    fn test_light_level_with_hit_is_visible() {
        let cfg = Config::default();
        let mut scene = far_sphere();
        scene.light(Point3::new(0., 50., 100.), 1., Pixel::new(255, 255, 255));

        let hit = primary(&scene, straight_ahead());
        assert_eq!(0, lights_missed(&cfg, &scene, &hit));
        assert_eq!(Pixel::new(181, 101, 81), shade_hit(&cfg, &scene, &hit));
    }

    /// A reflective sphere hit by the ray through `(10, 0, 0)`, whose reflection ray walks
    /// `(1.49 z, 0, z)`.
    fn mirror() -> Scene {
        let mut scene = Scene::new(Point3::new(0., 0., -10.));
        scene.add(
            Object::new(Shape::Sphere, Point3::new(5., 0., 5.), 1., Pixel::new(0, 0, 255))
                .with_reflective(true),
        );
        scene
    }

    #[test]
    fn test_reflection() {
        let cfg = Config::default();
        let mut scene = mirror();
        let matte = scene.sphere(Point3::new(149., 0., 100.), 1., Pixel::new(10, 20, 30));

        let hit = primary(&scene, Point3::new(10., 0., 0.));
        assert_eq!(5., hit.depth());

        let refl = reflect(&cfg, &scene, &hit).expect("reflection hit");
        assert_eq!(matte, refl.object);
        assert_eq!(100., refl.depth());

        // No lights, so the mirror itself is black; the reflection adds its falloff and the
        // matte sphere's color.
        assert_eq!(Pixel::new(25, 35, 45), shade_hit(&cfg, &scene, &hit));
    }

    #[test]
    fn test_reflection_is_clamped() {
        let cfg = Config::default();
        let mut scene = mirror();
        scene.sphere(Point3::new(149., 0., 100.), 1., Pixel::new(250, 240, 0));

        let hit = primary(&scene, Point3::new(10., 0., 0.));
        assert_eq!(Pixel::new(255, 255, 15), shade_hit(&cfg, &scene, &hit));
    }

    #[test]
    fn test_reflection_miss() {
        let cfg = Config::default();
        let scene = mirror();

        let hit = primary(&scene, Point3::new(10., 0., 0.));
        assert!(reflect(&cfg, &scene, &hit).is_none());
        assert_eq!(Pixel::black(), shade_hit(&cfg, &scene, &hit));
    }

    #[test]
    fn test_matte_objects_ignore_reflections() {
        let cfg = Config::default();
        let mut scene = Scene::new(Point3::new(0., 0., -10.));
        scene.sphere(Point3::new(5., 0., 5.), 1., Pixel::new(0, 0, 255));
        scene.sphere(Point3::new(149., 0., 100.), 1., Pixel::new(10, 20, 30));

        let hit = primary(&scene, Point3::new(10., 0., 0.));
        assert_eq!(Pixel::black(), shade_hit(&cfg, &scene, &hit));
    }
}
