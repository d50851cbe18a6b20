use std::f32::consts::{FRAC_PI_2, PI};
use nalgebra::Vector3;
use super::config::GameConfig;
use super::geometry::{facing, lane_of, yaw_towards, Aabb};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct HeldKeys {
    left: bool,
    right: bool,
    forward: bool,
    backward: bool,
}

impl HeldKeys {
    fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Forward => self.forward = down,
            Key::Backward => self.backward = down,
        }
    }

    fn axis(negative: bool, positive: bool) -> f32 {
        match (negative, positive) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// A shot requested by the player this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub position: Vector3<f32>,
    pub yaw: f32,
    pub aim: Option<Vector3<f32>>,
    pub trigger: bool,
    held: HeldKeys,
    fire_cooldown: u32,
}

impl Player {
    pub fn new() -> Self {
        Player {
            position: Vector3::zeros(),
            yaw: FRAC_PI_2,
            aim: None,
            trigger: false,
            held: HeldKeys::default(),
            fire_cooldown: 0,
        }
    }

    pub fn lane(&self, lane_width: f32) -> i32 {
        lane_of(self.position.x, lane_width)
    }

    pub fn bounds(&self, half_extent: f32) -> Aabb {
        Aabb::square(&self.position, half_extent)
    }

    pub fn press(&mut self, key: Key) {
        self.held.set(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.held.set(key, false);
    }

    pub fn release_all(&mut self) {
        self.held = HeldKeys::default();
        self.trigger = false;
    }

    /// Turns to face a movement direction. A zero direction keeps the current yaw;
    /// when both axes move, x wins.
    pub fn orient(&mut self, dx: f32, dz: f32) {
        if dz < 0.0 {
            self.yaw = PI;
        }
        if dz > 0.0 {
            self.yaw = 0.0;
        }
        if dx > 0.0 {
            self.yaw = FRAC_PI_2;
        }
        if dx < 0.0 {
            self.yaw = -FRAC_PI_2;
        }
    }

    /// One-lane hop along x. Refused past `max_lane` or behind lane 0.
    pub fn hop(&mut self, forward: bool, config: &GameConfig, max_lane: i32) -> bool {
        let current = self.lane(config.lane_width);
        let target = if forward { current + 1 } else { current - 1 };
        if target > max_lane || target < 0 {
            return false;
        }
        self.orient(if forward { 1.0 } else { -1.0 }, 0.0);
        self.position.x = config.lane_x(target);
        true
    }

    /// Crossing mode: held left/right slide the avatar across the road.
    pub fn step_crossing(&mut self, config: &GameConfig) {
        let dz = HeldKeys::axis(self.held.left, self.held.right);
        if dz == 0.0 {
            return;
        }
        self.orient(0.0, dz);
        let z = self.position.z + dz * config.lateral_step;
        self.position.z = z.clamp(config.lateral_min, config.lateral_max);
    }

    /// Survival mode: free movement from held keys, facing the aim point.
    pub fn step_survival(&mut self, config: &GameConfig, min_x: f32, max_x: f32) {
        let dx = HeldKeys::axis(self.held.backward, self.held.forward);
        let dz = HeldKeys::axis(self.held.left, self.held.right);
        if dx != 0.0 || dz != 0.0 {
            let step = Vector3::new(dx, 0.0, dz).normalize() * config.player_speed;
            self.position += step;
            self.position.z = self.position.z.clamp(config.lateral_min, config.lateral_max);
        }
        // The window scrolls under an idle player too.
        self.position.x = self.position.x.clamp(min_x, max_x.max(min_x));

        match self.aim.and_then(|aim| yaw_towards(&self.position, &aim)) {
            Some(yaw) => self.yaw = yaw,
            None => self.orient(dx, dz),
        }

        if self.fire_cooldown > 0 {
            self.fire_cooldown -= 1;
        }
    }

    pub fn aim_at(&mut self, x: f32, z: f32) {
        self.aim = Some(Vector3::new(x, 0.0, z));
    }

    /// Fires along the facing direction when the trigger is held and the gun is ready.
    pub fn try_fire(&mut self, cooldown_frames: u32) -> Option<Shot> {
        if !self.trigger || self.fire_cooldown > 0 {
            return None;
        }
        self.fire_cooldown = cooldown_frames;
        Some(Shot { origin: self.position, direction: facing(self.yaw) })
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::new()
    }
}
