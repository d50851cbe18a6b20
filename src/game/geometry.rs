use nalgebra::Vector3;

/// Axis-aligned footprint on the ground plane (x forward, z lateral).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub center_x: f32,
    pub center_z: f32,
    pub half_x: f32,
    pub half_z: f32,
}

impl Aabb {
    pub fn around(position: &Vector3<f32>, half_x: f32, half_z: f32) -> Self {
        Aabb { center_x: position.x, center_z: position.z, half_x, half_z }
    }

    pub fn square(position: &Vector3<f32>, half: f32) -> Self {
        Aabb::around(position, half, half)
    }

    /// Touching edges count as an overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let dx = (self.center_x - other.center_x).abs();
        let dz = (self.center_z - other.center_z).abs();
        dx <= self.half_x + other.half_x && dz <= self.half_z + other.half_z
    }
}

/// Yaw that turns an actor at `from` to face `to`. Yaw 0 faces +z, PI/2 faces +x.
pub fn yaw_towards(from: &Vector3<f32>, to: &Vector3<f32>) -> Option<f32> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx == 0.0 && dz == 0.0 {
        return None;
    }
    Some(dx.atan2(dz))
}

pub fn facing(yaw: f32) -> Vector3<f32> {
    Vector3::new(yaw.sin(), 0.0, yaw.cos())
}

pub fn lane_of(x: f32, lane_width: f32) -> i32 {
    (x / lane_width).round() as i32
}

/// Ground-plane distance, ignoring height.
pub fn ground_distance(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn boxes_overlap_when_touching() {
        let a = Aabb::square(&Vector3::new(0.0, 0.0, 0.0), 10.0);
        let b = Aabb::square(&Vector3::new(20.0, 0.0, 0.0), 10.0);
        let c = Aabb::square(&Vector3::new(20.5, 0.0, 0.0), 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn overlap_needs_both_axes() {
        let car = Aabb::around(&Vector3::new(120.0, 18.0, 0.0), 25.0, 50.0);
        let same_lane = Aabb::square(&Vector3::new(120.0, 0.0, 55.0), 10.0);
        let next_lane = Aabb::square(&Vector3::new(240.0, 0.0, 0.0), 10.0);
        assert!(car.overlaps(&same_lane));
        assert!(!car.overlaps(&next_lane));
    }

    #[test]
    fn yaw_follows_axis_convention() {
        let origin = Vector3::zeros();
        assert!(close(yaw_towards(&origin, &Vector3::new(0.0, 0.0, 5.0)).unwrap(), 0.0));
        assert!(close(yaw_towards(&origin, &Vector3::new(5.0, 0.0, 0.0)).unwrap(), FRAC_PI_2));
        assert!(close(yaw_towards(&origin, &Vector3::new(-5.0, 0.0, 0.0)).unwrap(), -FRAC_PI_2));
        assert!(close(yaw_towards(&origin, &Vector3::new(0.0, 0.0, -5.0)).unwrap().abs(), PI));
        assert!(yaw_towards(&origin, &origin).is_none());
    }

    #[test]
    fn facing_matches_yaw() {
        let f = facing(FRAC_PI_2);
        assert!(close(f.x, 1.0) && close(f.z, 0.0));
        let f = facing(0.0);
        assert!(close(f.x, 0.0) && close(f.z, 1.0));
    }

    #[test]
    fn lanes_round_to_nearest() {
        assert_eq!(lane_of(0.0, 120.0), 0);
        assert_eq!(lane_of(119.0, 120.0), 1);
        assert_eq!(lane_of(-130.0, 120.0), -1);
    }
}
