use nalgebra::Vector3;
use rand::seq::index::sample;
use rand::Rng;
use super::config::GameConfig;
use super::geometry::Aabb;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    PositiveZ,
    NegativeZ,
}

impl Heading {
    pub fn sign(self) -> f32 {
        match self {
            Heading::PositiveZ => 1.0,
            Heading::NegativeZ => -1.0,
        }
    }
}

/// Where the Moses effect is parting traffic this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parting {
    pub lane: i32,
    pub z: f32,
    pub radius: f32,
}

#[derive(Clone, Debug)]
pub struct Vehicle {
    pub lane: i32,
    pub position: Vector3<f32>,
    pub heading: Heading,
    pub speed_factor: f32,
    pub sinking: bool,
}

impl Vehicle {
    pub fn new(lane: i32, position: Vector3<f32>, heading: Heading, speed_factor: f32) -> Self {
        Vehicle { lane, position, heading, speed_factor, sinking: false }
    }

    /// Length runs along z, the direction of travel.
    pub fn bounds(&self, config: &GameConfig) -> Aabb {
        Aabb::around(&self.position, config.vehicle_width / 2.0, config.vehicle_length / 2.0)
    }

    pub fn step(&mut self, config: &GameConfig, slow_divisor: f32, parting: Option<Parting>) {
        let step = config.vehicle_base_speed * self.speed_factor / slow_divisor;

        if let Some(p) = parting {
            if p.lane == self.lane && (self.position.z - p.z).abs() <= p.radius {
                self.sinking = true;
            }
        }

        self.position.z += self.heading.sign() * step;
        if self.sinking {
            self.position.y -= step;
        }

        // Past the far edge on the side it drives toward: reappear on the other side.
        let z = self.position.z;
        if z.abs() > config.vehicle_wrap && z.signum() == self.heading.sign() {
            self.position.z = -z;
            self.position.y = config.vehicle_height;
            self.sinking = false;
        }
    }
}

/// Populates a finished road. Each lane gets one heading and speed, and its vehicles
/// take distinct, evenly spaced slots.
pub fn populate_road<R: Rng>(first_lane: i32, lane_count: u32, config: &GameConfig, rng: &mut R) -> Vec<Vehicle> {
    let per_lane = config.vehicles_per_lane as usize;
    let slots = per_lane * lane_count as usize;
    let mut vehicles = Vec::with_capacity(slots);

    for lane in first_lane..first_lane + lane_count as i32 {
        let heading = if rng.gen_bool(0.5) { Heading::NegativeZ } else { Heading::PositiveZ };
        let speed_factor = if lane_count == 1 {
            config.single_lane_speed_factor
        } else {
            1.0 + config.speed_factor_step * rng.gen_range(0..config.speed_factor_steps) as f32
        };

        for slot in sample(rng, slots, per_lane.min(slots)).into_iter() {
            let offset = config.vehicle_start_offset + slot as f32 * config.vehicle_spacing;
            // Start upstream of the crossing so traffic drives toward the player.
            let z = -heading.sign() * offset;
            let position = Vector3::new(config.lane_x(lane), config.vehicle_height, z);
            vehicles.push(Vehicle::new(lane, position, heading, speed_factor));
        }
    }

    vehicles
}
