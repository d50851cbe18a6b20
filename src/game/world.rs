use log::debug;
use rand::Rng;
use super::config::GameConfig;
use super::powerup::{PowerUp, PowerUpKind};
use super::traffic::{populate_road, Vehicle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StripKind {
    Ground,
    Road,
}

/// One lane-wide band of ground or road, spanning the whole lateral extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strip {
    pub lane: i32,
    pub kind: StripKind,
}

/// One dash painted on the boundary between `lane` and `lane + 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub lane: i32,
    pub z: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub scrolling: bool,
    generated_at: f32,
}

impl Camera {
    fn new(x: f32) -> Self {
        Camera { x, scrolling: false, generated_at: x }
    }
}

/// Actors created alongside a freshly generated lane.
#[derive(Debug, Default)]
pub struct Spawned {
    pub vehicles: Vec<Vehicle>,
    pub power_ups: Vec<PowerUp>,
}

#[derive(Clone, Debug)]
pub struct World {
    pub strips: Vec<Strip>,
    pub markers: Vec<Marker>,
    pub camera: Camera,
    farthest_lane: i32,
    pending_road: u32,
}

impl World {
    /// Fixed opening layout: ground every fourth lane, three-lane roads between,
    /// and a Moses pickup on the first verge.
    pub fn new<R: Rng>(config: &GameConfig, rng: &mut R) -> (World, Spawned) {
        let mut world = World {
            strips: Vec::new(),
            markers: Vec::new(),
            camera: Camera::new(config.camera_start),
            farthest_lane: 0,
            pending_road: 0,
        };
        let mut spawned = Spawned::default();

        world.strips.push(Strip { lane: 0, kind: StripKind::Ground });
        for lane in 1..=config.initial_lanes {
            world.farthest_lane = lane;
            if lane % 4 != 0 {
                world.pending_road += 1;
                world.strips.push(Strip { lane, kind: StripKind::Road });
                continue;
            }
            world.strips.push(Strip { lane, kind: StripKind::Ground });
            spawned.vehicles.extend(world.close_road(lane, config, rng));
        }

        if config.initial_lanes >= 4 {
            spawned.power_ups.push(PowerUp::new(PowerUpKind::Moses, 4, config.lane_x(4), 0.0));
        }
        (world, spawned)
    }

    pub fn farthest_lane(&self) -> i32 {
        self.farthest_lane
    }

    /// Furthest lane the player may hop onto.
    pub fn forward_limit(&self, config: &GameConfig) -> i32 {
        self.farthest_lane - config.forward_lead_lanes
    }

    /// World x behind which everything is discarded.
    pub fn horizon(&self, config: &GameConfig) -> f32 {
        self.camera.x - config.cull_distance
    }

    /// Auto-scroll, faster when the player runs ahead.
    pub fn advance_camera(&mut self, player_x: f32, config: &GameConfig) {
        if !self.camera.scrolling {
            return;
        }
        self.camera.x += if player_x > self.camera.x + config.camera_lead {
            config.camera_catchup_speed
        } else {
            config.camera_speed
        };
    }

    /// Never lag more than `camera_lead` behind the player.
    pub fn follow(&mut self, player_x: f32, config: &GameConfig) {
        let min_x = player_x - config.camera_lead;
        if self.camera.x < min_x {
            self.camera.x = min_x;
        }
    }

    pub fn needs_lane(&self, config: &GameConfig) -> bool {
        self.camera.x >= self.camera.generated_at + config.lane_width
    }

    /// Appends one lane past the far edge. A ground lane closes the pending road,
    /// which only then receives its traffic and markers.
    pub fn generate_lane<R: Rng>(&mut self, config: &GameConfig, rng: &mut R) -> (Strip, Spawned) {
        self.camera.generated_at = (self.camera.x / config.lane_width).floor() * config.lane_width;
        self.farthest_lane += 1;
        let lane = self.farthest_lane;

        let roll = rng.gen_range(0..config.ground_roll);
        let is_ground = roll == config.ground_roll - 1 || self.pending_road >= config.max_road_lanes;
        if !is_ground {
            self.pending_road += 1;
            let strip = Strip { lane, kind: StripKind::Road };
            self.strips.push(strip);
            return (strip, Spawned::default());
        }

        let road_lanes = self.pending_road;
        let strip = Strip { lane, kind: StripKind::Ground };
        self.strips.push(strip);
        let mut spawned = Spawned { vehicles: self.close_road(lane, config, rng), power_ups: Vec::new() };

        for (kind, odds) in [
            (PowerUpKind::Shield, config.shield_odds),
            (PowerUpKind::Freeze, config.freeze_odds),
            (PowerUpKind::Moses, config.moses_odds),
        ] {
            if rng.gen_ratio(1, odds) {
                let target = lane - rng.gen_range(0..=road_lanes) as i32;
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                let z = sign * rng.gen_range(0.0..config.power_up_spread);
                debug!("{:?} power-up placed on lane {} at z {:.0}", kind, target, z);
                spawned.power_ups.push(PowerUp::new(kind, target, config.lane_x(target), z));
            }
        }

        (strip, spawned)
    }

    /// Finishes the road lanes just before `ground_lane`.
    fn close_road<R: Rng>(&mut self, ground_lane: i32, config: &GameConfig, rng: &mut R) -> Vec<Vehicle> {
        let lanes = self.pending_road;
        self.pending_road = 0;
        if lanes == 0 {
            return Vec::new();
        }

        let first = ground_lane - lanes as i32;
        for boundary in first..ground_lane - 1 {
            let mut z = config.marker_start;
            while z < config.marker_end {
                self.markers.push(Marker { lane: boundary, z });
                z += config.marker_spacing;
            }
        }
        debug!("road closed: lanes {}..{}", first, ground_lane - 1);
        populate_road(first, lanes, config, rng)
    }

    /// Drops strips and markers behind the horizon. Returns how many went.
    pub fn cull(&mut self, config: &GameConfig) -> usize {
        let horizon = self.horizon(config);
        let before = self.strips.len() + self.markers.len();
        self.strips.retain(|s| config.lane_x(s.lane) >= horizon);
        self.markers.retain(|m| config.lane_x(m.lane) >= horizon);
        before - self.strips.len() - self.markers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn fresh(seed: u64) -> (World, Spawned, GameConfig, SmallRng) {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(seed);
        let (world, spawned) = World::new(&config, &mut rng);
        (world, spawned, config, rng)
    }

    #[test]
    fn opening_layout() {
        let (world, spawned, config, _) = fresh(1);
        assert_eq!(world.strips.len(), 13);
        assert_eq!(world.farthest_lane(), 12);
        for strip in &world.strips {
            let expected = if strip.lane % 4 == 0 { StripKind::Ground } else { StripKind::Road };
            assert_eq!(strip.kind, expected, "lane {}", strip.lane);
        }
        assert_eq!(spawned.vehicles.len(), 27);
        assert_eq!(spawned.power_ups.len(), 1);
        assert_eq!(spawned.power_ups[0].kind, PowerUpKind::Moses);
        assert_eq!(spawned.power_ups[0].position.x, 480.0);
        // Three roads, two inner boundaries each, 17 dashes per boundary.
        assert_eq!(world.markers.len(), 3 * 2 * 17);
        assert_eq!(world.forward_limit(&config), 6);
        assert!(!world.camera.scrolling);
    }

    #[test]
    fn camera_waits_until_scrolling() {
        let (mut world, _, config, _) = fresh(1);
        world.advance_camera(0.0, &config);
        assert_eq!(world.camera.x, -150.0);
        world.camera.scrolling = true;
        world.advance_camera(0.0, &config);
        assert_eq!(world.camera.x, -147.5);
        world.advance_camera(1000.0, &config);
        assert_eq!(world.camera.x, -142.5);
    }

    #[test]
    fn follow_keeps_player_in_view() {
        let (mut world, _, config, _) = fresh(1);
        world.follow(1000.0, &config);
        assert_eq!(world.camera.x, 640.0);
        world.follow(0.0, &config);
        assert_eq!(world.camera.x, 640.0);
    }

    #[test]
    fn lane_needed_after_a_lane_of_scroll() {
        let (mut world, _, config, mut rng) = fresh(3);
        assert!(!world.needs_lane(&config));
        world.camera.x += 119.0;
        assert!(!world.needs_lane(&config));
        world.camera.x += 1.0;
        assert!(world.needs_lane(&config));
        let (strip, _) = world.generate_lane(&config, &mut rng);
        assert_eq!(strip.lane, 13);
        assert!(!world.needs_lane(&config));
    }

    #[test]
    fn generated_roads_respect_length_cap_and_get_traffic() {
        let (mut world, _, config, mut rng) = fresh(11);
        let mut vehicles = Vec::new();
        let mut run = 0u32;

        for _ in 0..400 {
            let (strip, spawned) = world.generate_lane(&config, &mut rng);
            match strip.kind {
                StripKind::Road => {
                    run += 1;
                    assert!(run <= config.max_road_lanes);
                    assert!(spawned.vehicles.is_empty());
                }
                StripKind::Ground => {
                    assert_eq!(spawned.vehicles.len() as u32, run * config.vehicles_per_lane);
                    for v in &spawned.vehicles {
                        assert!(v.lane < strip.lane && v.lane >= strip.lane - run as i32);
                    }
                    for p in &spawned.power_ups {
                        assert!(p.lane <= strip.lane && p.lane >= strip.lane - run as i32);
                        assert!(p.position.z.abs() < config.power_up_spread);
                    }
                    run = 0;
                }
            }
            vehicles.extend(spawned.vehicles);
        }
        assert!(!vehicles.is_empty());
        assert_eq!(world.farthest_lane(), 412);
    }

    #[test]
    fn full_length_road_is_forced_closed() {
        let config = GameConfig { ground_roll: 1_000_000, max_road_lanes: 2, ..GameConfig::default() };
        let mut rng = SmallRng::seed_from_u64(5);
        let (mut world, _) = World::new(&config, &mut rng);
        let kinds: Vec<StripKind> = (0..6).map(|_| world.generate_lane(&config, &mut rng).0.kind).collect();
        // A 1-in-a-million roll aside, roads run to the cap and then close.
        assert_eq!(kinds[2], StripKind::Ground);
        assert_eq!(kinds[5], StripKind::Ground);
    }

    #[test]
    fn cull_drops_everything_behind_horizon() {
        let (mut world, _, config, _) = fresh(2);
        assert_eq!(world.cull(&config), 0);
        world.camera.x = 2000.0;
        let removed = world.cull(&config);
        assert!(removed > 0);
        let horizon = world.horizon(&config);
        assert!(world.strips.iter().all(|s| config.lane_x(s.lane) >= horizon));
        assert!(world.markers.iter().all(|m| config.lane_x(m.lane) >= horizon));
        assert!(!world.strips.iter().any(|s| s.lane == 4));
        assert!(world.strips.iter().any(|s| s.lane == 5));
    }
}
