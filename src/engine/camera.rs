use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

const FOV_Y: f32 = std::f32::consts::FRAC_PI_3;
const NEAR: f32 = 1.0;
const FAR: f32 = 10_000.0;

/// Eye height above the ground and how far ahead of the world camera it looks.
const EYE_HEIGHT: f32 = 520.0;
const EYE_BEHIND: f32 = 60.0;
const LOOK_AHEAD: f32 = 320.0;

/// Chase view over the crossing: forward (+x) is up the screen, +z to the right.
pub struct SceneCamera {
    projection: Perspective3<f32>,
    view: Matrix4<f32>,
}

impl SceneCamera {
    pub fn new(aspect: f32) -> Self {
        let mut camera = SceneCamera {
            projection: Perspective3::new(aspect, FOV_Y, NEAR, FAR),
            view: Matrix4::identity(),
        };
        camera.follow(0.0);
        camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.projection.set_aspect(aspect);
    }

    pub fn follow(&mut self, world_x: f32) {
        let eye = Point3::new(world_x - EYE_BEHIND, EYE_HEIGHT, 0.0);
        let target = Point3::new(world_x + LOOK_AHEAD, 0.0, 0.0);
        self.view = Matrix4::look_at_rh(&eye, &target, &Vector3::y());
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection.as_matrix() * self.view
    }

    /// Casts a ray through a point in normalized device coordinates and returns
    /// where it meets the ground plane as (x, z).
    pub fn ground_point(&self, ndc_x: f32, ndc_y: f32) -> Option<(f32, f32)> {
        let inverse = self.view_projection().try_inverse()?;
        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));
        let direction = far - near;
        if direction.y.abs() < f32::EPSILON {
            return None;
        }
        let t = -near.y / direction.y;
        if t < 0.0 {
            return None;
        }
        let hit = near + direction * t;
        Some((hit.x, hit.z))
    }
}

/// Canvas pixel to normalized device coordinates.
pub fn to_ndc(px: f32, py: f32, width: f32, height: f32) -> (f32, f32) {
    (2.0 * px / width - 1.0, 1.0 - 2.0 * py / height)
}
