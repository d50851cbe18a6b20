use nalgebra::Vector3;
use rand::Rng;
use super::config::GameConfig;
use super::geometry::{ground_distance, Aabb};
use super::player::Shot;

#[derive(Clone, Debug)]
pub struct Zombie {
    pub position: Vector3<f32>,
    pub health: u32,
    pub sinking: bool,
}

impl Zombie {
    pub fn new(position: Vector3<f32>, health: u32) -> Self {
        Zombie { position, health, sinking: false }
    }

    pub fn bounds(&self, config: &GameConfig) -> Aabb {
        Aabb::square(&self.position, config.zombie_half_extent)
    }

    /// Shambles toward `target`, or sinks while the ground is parting around the player.
    pub fn step(&mut self, target: &Vector3<f32>, config: &GameConfig, slow_divisor: f32, parting: bool) {
        let speed = config.zombie_speed / slow_divisor;

        if parting && ground_distance(&self.position, target) <= config.moses_radius {
            self.sinking = true;
        }
        if self.sinking {
            self.position.y -= speed;
            return;
        }

        let mut delta = target - self.position;
        delta.y = 0.0;
        let distance = delta.norm();
        if distance <= speed {
            self.position.x = target.x;
            self.position.z = target.z;
        } else {
            self.position += delta * (speed / distance);
        }
    }

    pub fn is_buried(&self, config: &GameConfig) -> bool {
        self.position.y < -2.0 * config.zombie_half_extent
    }
}

#[derive(Clone, Debug)]
pub struct Bullet {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub travelled: f32,
}

impl Bullet {
    pub fn new(shot: Shot, speed: f32) -> Self {
        Bullet { position: shot.origin, velocity: shot.direction * speed, travelled: 0.0 }
    }

    pub fn bounds(&self, config: &GameConfig) -> Aabb {
        Aabb::square(&self.position, config.bullet_half_extent)
    }

    pub fn step(&mut self) {
        self.position += self.velocity;
        self.travelled += self.velocity.norm();
    }

    pub fn spent(&self, config: &GameConfig) -> bool {
        self.travelled > config.bullet_range
    }
}

/// Spawn timer for the horde. The gap between spawns shrinks as kills go up.
#[derive(Clone, Debug)]
pub struct Spawner {
    countdown: u32,
}

impl Spawner {
    pub fn new(config: &GameConfig) -> Self {
        Spawner { countdown: config.zombie_spawn_interval }
    }

    pub fn interval(config: &GameConfig, kills: u32) -> u32 {
        config
            .zombie_spawn_interval
            .saturating_sub(kills.saturating_mul(config.zombie_spawn_ramp))
            .max(config.zombie_spawn_min)
    }

    pub fn tick<R: Rng>(&mut self, config: &GameConfig, kills: u32, player: &Vector3<f32>, rng: &mut R) -> Option<Zombie> {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return None;
        }
        self.countdown = Spawner::interval(config, kills);

        let x = player.x + rng.gen_range(config.zombie_spawn_ahead_min..=config.zombie_spawn_ahead_max);
        let z = rng.gen_range(config.lateral_min..=config.lateral_max);
        Some(Zombie::new(Vector3::new(x, 0.0, z), config.zombie_health))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn zombie_walks_toward_target() {
        let config = GameConfig::default();
        let mut zombie = Zombie::new(Vector3::new(100.0, 0.0, 0.0), 1);
        zombie.step(&Vector3::zeros(), &config, 1.0, false);
        assert!((zombie.position.x - 98.0).abs() < 1e-4);
        assert_eq!(zombie.position.z, 0.0);
        zombie.step(&Vector3::zeros(), &config, 4.0, false);
        assert!((zombie.position.x - 97.5).abs() < 1e-4);
    }

    #[test]
    fn zombie_stops_on_target() {
        let config = GameConfig::default();
        let mut zombie = Zombie::new(Vector3::new(1.0, 0.0, 1.0), 1);
        zombie.step(&Vector3::zeros(), &config, 1.0, false);
        assert_eq!(zombie.position, Vector3::zeros());
    }

    #[test]
    fn parting_buries_nearby_zombies() {
        let config = GameConfig::default();
        let mut near = Zombie::new(Vector3::new(200.0, 0.0, 0.0), 1);
        let mut far = Zombie::new(Vector3::new(800.0, 0.0, 0.0), 1);
        near.step(&Vector3::zeros(), &config, 1.0, true);
        far.step(&Vector3::zeros(), &config, 1.0, true);
        assert!(near.sinking);
        assert_eq!(near.position.x, 200.0);
        assert!(!far.sinking);
        for _ in 0..30 {
            near.step(&Vector3::zeros(), &config, 1.0, false);
        }
        assert!(near.is_buried(&config));
    }

    #[test]
    fn bullet_runs_out_of_range() {
        let config = GameConfig { bullet_range: 50.0, ..GameConfig::default() };
        let shot = Shot { origin: Vector3::zeros(), direction: Vector3::new(0.0, 0.0, 1.0) };
        let mut bullet = Bullet::new(shot, 24.0);
        bullet.step();
        bullet.step();
        assert!(!bullet.spent(&config));
        assert_eq!(bullet.position.z, 48.0);
        bullet.step();
        assert!(bullet.spent(&config));
    }

    #[test]
    fn spawn_interval_ramps_down_to_floor() {
        let config = GameConfig::default();
        assert_eq!(Spawner::interval(&config, 0), 90);
        assert_eq!(Spawner::interval(&config, 10), 70);
        assert_eq!(Spawner::interval(&config, 1000), 30);
    }

    #[test]
    fn spawner_fires_on_schedule_ahead_of_player() {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut spawner = Spawner::new(&config);
        let player = Vector3::new(240.0, 0.0, 0.0);

        for _ in 0..89 {
            assert!(spawner.tick(&config, 0, &player, &mut rng).is_none());
        }
        let zombie = spawner.tick(&config, 0, &player, &mut rng).unwrap();
        assert!(zombie.position.x >= 840.0 && zombie.position.x <= 1140.0);
        assert!(zombie.position.z >= config.lateral_min && zombie.position.z <= config.lateral_max);
        assert_eq!(zombie.health, config.zombie_health);
        assert!(spawner.tick(&config, 0, &player, &mut rng).is_none());
    }
}
