use nalgebra::Vector3;
use super::geometry::Aabb;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Vehicles and zombies pass through the player.
    Shield,
    /// Everything else moves at a fraction of its speed.
    Freeze,
    /// Protection, and nearby vehicles and zombies sink into the ground.
    Moses,
}

impl PowerUpKind {
    /// Edge length of the pickup footprint.
    pub fn body_size(self) -> f32 {
        match self {
            PowerUpKind::Shield => 25.0,
            PowerUpKind::Freeze => 40.0,
            PowerUpKind::Moses => 30.0,
        }
    }

    /// Resting height of the pickup.
    pub fn height(self) -> f32 {
        match self {
            PowerUpKind::Shield => 0.0,
            PowerUpKind::Freeze => 20.0,
            PowerUpKind::Moses => 10.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub lane: i32,
    pub position: Vector3<f32>,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, lane: i32, x: f32, z: f32) -> Self {
        PowerUp { kind, lane, position: Vector3::new(x, kind.height(), z) }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(&self.position, self.kind.body_size() / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Effect {
    pub kind: PowerUpKind,
    pub frames_left: u32,
}

/// The player's timed state. Only one effect is live at a time.
#[derive(Clone, Debug, Default)]
pub struct PowerState {
    effect: Option<Effect>,
}

impl PowerState {
    /// Replaces whatever effect is running.
    pub fn activate(&mut self, kind: PowerUpKind, frames: u32) {
        self.effect = if frames == 0 { None } else { Some(Effect { kind, frames_left: frames }) };
    }

    /// Counts one frame down. Returns the kind whose effect ran out this frame.
    pub fn tick(&mut self) -> Option<PowerUpKind> {
        let effect = self.effect.as_mut()?;
        effect.frames_left -= 1;
        if effect.frames_left == 0 {
            let kind = effect.kind;
            self.effect = None;
            return Some(kind);
        }
        None
    }

    pub fn active(&self) -> Option<PowerUpKind> {
        self.effect.map(|e| e.kind)
    }

    pub fn effect(&self) -> Option<Effect> {
        self.effect
    }

    pub fn is_protected(&self) -> bool {
        matches!(self.active(), Some(PowerUpKind::Shield) | Some(PowerUpKind::Moses))
    }

    pub fn is_parting(&self) -> bool {
        self.active() == Some(PowerUpKind::Moses)
    }

    pub fn slow_divisor(&self, divisor: f32) -> f32 {
        if self.active() == Some(PowerUpKind::Freeze) { divisor } else { 1.0 }
    }
}
