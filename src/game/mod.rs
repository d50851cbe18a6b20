pub mod collision;
pub mod config;
pub mod driver;
pub mod geometry;
pub mod horde;
pub mod player;
pub mod powerup;
pub mod traffic;
pub mod world;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub use collision::Cause;
pub use config::{AppConfig, GameConfig, Mode, ModelConfig};
pub use player::Key;
pub use powerup::{Effect, PowerUpKind};
pub use world::StripKind;

use collision::{caught_by_zombie, collect_power_ups, resolve_bullets, struck_by_vehicle};
use horde::{Bullet, Spawner, Zombie};
use player::Player;
use powerup::{PowerState, PowerUp};
use traffic::{Parting, Vehicle};
use world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver(Cause),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    KeyDown(Key),
    KeyUp(Key),
    /// Ground-plane point under the mouse cursor.
    Aim { x: f32, z: f32 },
    Trigger(bool),
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    LaneGenerated { lane: i32, kind: StripKind },
    Culled(usize),
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    ZombieSpawned,
    ZombieKilled,
    PlayerKilled(Cause),
    NewBest(u32),
}

/// Numbers the frontend shows next to the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub best: u32,
    pub kills: u32,
    pub effect: Option<Effect>,
    pub game_over: bool,
}

pub struct Game {
    pub config: GameConfig,
    pub player: Player,
    pub world: World,
    pub vehicles: Vec<Vehicle>,
    pub power_ups: Vec<PowerUp>,
    pub zombies: Vec<Zombie>,
    pub bullets: Vec<Bullet>,
    pub power: PowerState,
    pub state: GameState,
    pub score: u32,
    pub best: u32,
    pub kills: u32,
    pub frame: u64,
    spawner: Spawner,
    seed: u64,
    rng: SmallRng,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (world, spawned) = World::new(&config, &mut rng);
        let spawner = Spawner::new(&config);

        Game {
            player: Player::new(),
            world,
            vehicles: spawned.vehicles,
            power_ups: spawned.power_ups,
            zombies: Vec::new(),
            bullets: Vec::new(),
            power: PowerState::default(),
            state: GameState::Playing,
            score: 0,
            best: 0,
            kills: 0,
            frame: 0,
            spawner,
            seed,
            rng,
            config,
        }
    }

    pub fn is_over(&self) -> bool {
        self.state != GameState::Playing
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            best: self.best,
            kills: self.kills,
            effect: self.power.effect(),
            game_over: self.is_over(),
        }
    }

    pub fn handle_input(&mut self, input: Input) {
        if input == Input::Restart {
            self.restart();
            return;
        }
        if self.is_over() {
            return;
        }

        match (input, self.config.mode) {
            (Input::KeyDown(key), Mode::Crossing) => {
                self.player.press(key);
                let limit = self.world.forward_limit(&self.config);
                match key {
                    Key::Forward => {
                        self.player.hop(true, &self.config, limit);
                    }
                    Key::Backward => {
                        self.player.hop(false, &self.config, limit);
                    }
                    Key::Left | Key::Right => {}
                }
            }
            (Input::KeyUp(key), Mode::Crossing) => {
                self.player.release(key);
                if key == Key::Forward && !self.world.camera.scrolling {
                    debug!("camera scrolling");
                    self.world.camera.scrolling = true;
                }
            }
            (Input::KeyDown(key), Mode::Survival) => {
                self.player.press(key);
                self.world.camera.scrolling = true;
            }
            (Input::KeyUp(key), Mode::Survival) => self.player.release(key),
            (Input::Aim { x, z }, _) => self.player.aim_at(x, z),
            (Input::Trigger(down), _) => self.player.trigger = down,
            (Input::Restart, _) => {}
        }
    }

    /// Advances the simulation by one frame.
    pub fn update(&mut self) -> Vec<GameEvent> {
        self.frame += 1;
        let mut events = Vec::new();
        if self.is_over() {
            return events;
        }

        self.extend_world(&mut events);
        self.move_player(&mut events);
        self.move_actors();

        if let Some(kind) = self.power.tick() {
            info!("{:?} wore off", kind);
            events.push(GameEvent::PowerUpExpired(kind));
        }

        self.detect_collisions(&mut events);
        self.update_score(&mut events);

        self.world.advance_camera(self.player.position.x, &self.config);
        if self.config.mode == Mode::Survival {
            self.world.follow(self.player.position.x, &self.config);
        }

        events
    }

    fn extend_world(&mut self, events: &mut Vec<GameEvent>) {
        if !self.world.needs_lane(&self.config) {
            return;
        }
        let (strip, spawned) = self.world.generate_lane(&self.config, &mut self.rng);
        debug!("lane {} generated as {:?}", strip.lane, strip.kind);
        events.push(GameEvent::LaneGenerated { lane: strip.lane, kind: strip.kind });
        self.vehicles.extend(spawned.vehicles);
        self.power_ups.extend(spawned.power_ups);

        let culled = self.cull();
        if culled > 0 {
            debug!("culled {} actors behind x {:.0}", culled, self.world.horizon(&self.config));
            events.push(GameEvent::Culled(culled));
        }
    }

    /// Drops everything behind the camera's horizon.
    fn cull(&mut self) -> usize {
        let horizon = self.world.horizon(&self.config);
        let before = self.vehicles.len() + self.power_ups.len() + self.zombies.len() + self.bullets.len();
        self.vehicles.retain(|v| v.position.x >= horizon);
        self.power_ups.retain(|p| p.position.x >= horizon);
        self.zombies.retain(|z| z.position.x >= horizon);
        self.bullets.retain(|b| b.position.x >= horizon);
        let after = self.vehicles.len() + self.power_ups.len() + self.zombies.len() + self.bullets.len();
        self.world.cull(&self.config) + before - after
    }

    fn move_player(&mut self, events: &mut Vec<GameEvent>) {
        match self.config.mode {
            Mode::Crossing => self.player.step_crossing(&self.config),
            Mode::Survival => {
                let min_x = self.world.camera.x;
                let max_x = self.config.lane_x(self.world.forward_limit(&self.config));
                self.player.step_survival(&self.config, min_x, max_x);

                if let Some(shot) = self.player.try_fire(self.config.fire_cooldown_frames) {
                    self.bullets.push(Bullet::new(shot, self.config.bullet_speed));
                }
                if let Some(zombie) =
                    self.spawner.tick(&self.config, self.kills, &self.player.position, &mut self.rng)
                {
                    self.zombies.push(zombie);
                    events.push(GameEvent::ZombieSpawned);
                }
            }
        }
    }

    fn move_actors(&mut self) {
        let config = &self.config;
        let slow = self.power.slow_divisor(config.slow_divisor);
        let parting = self.power.is_parting().then(|| Parting {
            lane: self.player.lane(config.lane_width),
            z: self.player.position.z,
            radius: config.moses_radius,
        });

        for vehicle in &mut self.vehicles {
            vehicle.step(config, slow, parting);
        }

        let target = self.player.position;
        for zombie in &mut self.zombies {
            zombie.step(&target, config, slow, parting.is_some());
        }
        self.zombies.retain(|z| !z.is_buried(config));

        for bullet in &mut self.bullets {
            bullet.step();
        }
        self.bullets.retain(|b| !b.spent(config));
    }

    fn detect_collisions(&mut self, events: &mut Vec<GameEvent>) {
        let body = self.player.bounds(self.config.player_half_extent);

        let killed = resolve_bullets(&mut self.bullets, &mut self.zombies, &self.config);
        if killed > 0 {
            self.kills += killed;
            events.extend(std::iter::repeat(GameEvent::ZombieKilled).take(killed as usize));
        }

        if !self.power.is_protected() {
            if struck_by_vehicle(&body, &self.vehicles, &self.config) {
                self.die(Cause::Vehicle, events);
                return;
            }
            if caught_by_zombie(&body, &self.zombies, &self.config) {
                self.die(Cause::Zombie, events);
                return;
            }
        }

        for power_up in collect_power_ups(&body, &mut self.power_ups) {
            info!("picked up {:?}", power_up.kind);
            self.power.activate(power_up.kind, self.config.effect_frames);
            events.push(GameEvent::PowerUpCollected(power_up.kind));
        }
    }

    fn die(&mut self, cause: Cause, events: &mut Vec<GameEvent>) {
        info!(
            "player killed by {:?} at lane {} after {} frames: score {}, kills {}",
            cause,
            self.player.lane(self.config.lane_width),
            self.frame,
            self.score,
            self.kills
        );
        self.state = GameState::GameOver(cause);
        self.player.release_all();
        events.push(GameEvent::PlayerKilled(cause));
    }

    fn update_score(&mut self, events: &mut Vec<GameEvent>) {
        let lane = self.player.lane(self.config.lane_width).max(0) as u32;
        if lane > self.score {
            self.score = lane;
        }
        if self.score > self.best {
            self.best = self.score;
            events.push(GameEvent::NewBest(self.best));
        }
    }

    /// Fresh world from the next seed in sequence. The best score survives.
    pub fn restart(&mut self) {
        let seed = self
            .seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let best = self.best;
        *self = Game::new(self.config.clone(), seed);
        self.best = best;
        info!("restarted with seed {}", seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use super::player::Shot;
    use super::traffic::Heading;

    fn crossing() -> Game {
        Game::new(GameConfig::default(), 1234)
    }

    fn survival() -> Game {
        let config = GameConfig { mode: Mode::Survival, ..GameConfig::default() };
        Game::new(config, 1234)
    }

    fn hop(game: &mut Game) {
        game.handle_input(Input::KeyDown(Key::Forward));
        game.handle_input(Input::KeyUp(Key::Forward));
    }

    #[test]
    fn fresh_game() {
        let game = crossing();
        assert_eq!(game.state, GameState::Playing);
        assert_eq!(game.vehicles.len(), 27);
        assert_eq!(game.power_ups.len(), 1);
        assert_eq!(game.hud(), Hud { score: 0, best: 0, kills: 0, effect: None, game_over: false });
    }

    #[test]
    fn hopping_scores_and_starts_camera() {
        let mut game = crossing();
        hop(&mut game);
        assert!(game.world.camera.scrolling);
        let events = game.update();
        assert_eq!(game.score, 1);
        assert!(events.contains(&GameEvent::NewBest(1)));
        assert_eq!(game.world.camera.x, -147.5);
    }

    #[test]
    fn hops_stop_at_forward_limit() {
        let mut game = crossing();
        for _ in 0..10 {
            game.handle_input(Input::KeyDown(Key::Forward));
        }
        assert_eq!(game.player.lane(120.0), 6);
    }

    #[test]
    fn vehicle_ends_the_game() {
        let mut game = crossing();
        game.vehicles.clear();
        game.vehicles.push(Vehicle::new(0, Vector3::new(0.0, 18.0, 30.0), Heading::NegativeZ, 1.0));

        let events = game.update();
        assert!(events.contains(&GameEvent::PlayerKilled(Cause::Vehicle)));
        assert_eq!(game.state, GameState::GameOver(Cause::Vehicle));
        assert!(game.hud().game_over);

        let frame = game.frame;
        assert!(game.update().is_empty());
        assert_eq!(game.frame, frame + 1);

        game.handle_input(Input::KeyDown(Key::Forward));
        assert_eq!(game.player.lane(120.0), 0);
    }

    #[test]
    fn shield_lets_vehicles_through() {
        let mut game = crossing();
        game.vehicles.clear();
        game.vehicles.push(Vehicle::new(0, Vector3::new(0.0, 18.0, 30.0), Heading::NegativeZ, 1.0));
        game.power.activate(PowerUpKind::Shield, 100);
        game.update();
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn moses_sinks_the_oncoming_car() {
        let mut game = crossing();
        game.vehicles.clear();
        game.vehicles.push(Vehicle::new(0, Vector3::new(0.0, 18.0, 200.0), Heading::NegativeZ, 1.0));
        game.power.activate(PowerUpKind::Moses, 100);
        game.update();
        assert!(game.vehicles[0].sinking);
        assert!(game.vehicles[0].position.y < 18.0);
    }

    #[test]
    fn picking_up_freeze_slows_traffic() {
        let mut game = crossing();
        game.vehicles.clear();
        game.vehicles.push(Vehicle::new(2, Vector3::new(240.0, 18.0, 0.0), Heading::PositiveZ, 1.0));
        game.power_ups.push(PowerUp::new(PowerUpKind::Freeze, 0, 0.0, 10.0));

        let events = game.update();
        assert!(events.contains(&GameEvent::PowerUpCollected(PowerUpKind::Freeze)));
        assert_eq!(game.power.active(), Some(PowerUpKind::Freeze));
        assert_eq!(game.power_ups.len(), 1);

        game.update();
        assert_eq!(game.vehicles[0].position.z, 7.5);
    }

    #[test]
    fn effect_expires_with_event() {
        let config = GameConfig { effect_frames: 3, ..GameConfig::default() };
        let mut game = Game::new(config, 99);
        game.power_ups.push(PowerUp::new(PowerUpKind::Shield, 0, 0.0, 0.0));
        game.update();
        assert!(game.hud().effect.is_some());
        let mut expired = Vec::new();
        for _ in 0..3 {
            expired.extend(game.update());
        }
        assert!(expired.contains(&GameEvent::PowerUpExpired(PowerUpKind::Shield)));
        assert_eq!(game.power.active(), None);
    }

    #[test]
    fn opening_moses_pickup_on_first_verge() {
        let mut game = crossing();
        game.vehicles.clear();
        for _ in 0..4 {
            game.handle_input(Input::KeyDown(Key::Forward));
        }
        let events = game.update();
        assert!(events.contains(&GameEvent::PowerUpCollected(PowerUpKind::Moses)));
        assert!(game.power.is_parting());
    }

    #[test]
    fn scrolling_generates_lanes() {
        let mut game = crossing();
        game.handle_input(Input::KeyUp(Key::Forward));
        let events: Vec<GameEvent> = (0..60).flat_map(|_| game.update()).collect();
        assert!(events.iter().any(|e| matches!(e, GameEvent::LaneGenerated { lane: 13, .. })));
        assert_eq!(game.world.farthest_lane(), 13);
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn stale_actors_are_culled() {
        let mut game = crossing();
        game.world.camera.x = 3000.0;
        let events = game.update();
        assert!(events.iter().any(|e| matches!(e, GameEvent::Culled(n) if *n > 0)));
        let horizon = game.world.horizon(&game.config);
        assert!(game.vehicles.iter().all(|v| v.position.x >= horizon));
        assert!(game.power_ups.iter().all(|p| p.position.x >= horizon));
    }

    #[test]
    fn survival_stragglers_are_culled() {
        let mut game = survival();
        game.zombies.push(Zombie::new(Vector3::new(-400.0, 0.0, 50.0), 1));
        let shot = Shot { origin: Vector3::new(-380.0, 10.0, 0.0), direction: Vector3::new(1.0, 0.0, 0.0) };
        game.bullets.push(Bullet::new(shot, 1.0));
        game.world.camera.x = 3000.0;

        let events = game.update();
        assert!(events.iter().any(|e| matches!(e, GameEvent::LaneGenerated { .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Culled(n) if *n >= 2)));
        assert!(game.zombies.is_empty());
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn idle_survivor_is_carried_by_the_camera() {
        let mut game = survival();
        game.handle_input(Input::KeyDown(Key::Right));
        game.handle_input(Input::KeyUp(Key::Right));
        game.world.camera.x = 100.0;

        for _ in 0..30 {
            game.vehicles.clear();
            let camera = game.world.camera.x;
            game.update();
            assert!(game.player.position.x >= camera);
        }
        assert_eq!(game.state, GameState::Playing);
        assert!(game.player.position.x > 100.0);
    }

    #[test]
    fn survival_shots_kill_zombies() {
        let mut game = survival();
        game.zombies.push(Zombie::new(Vector3::new(100.0, 0.0, 0.0), 1));
        game.handle_input(Input::Aim { x: 200.0, z: 0.0 });
        game.handle_input(Input::Trigger(true));

        let events: Vec<GameEvent> = (0..5).flat_map(|_| game.update()).collect();
        assert!(events.contains(&GameEvent::ZombieKilled));
        assert_eq!(game.kills, 1);
        assert_eq!(game.hud().kills, 1);
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn survival_zombie_contact_is_fatal() {
        let mut game = survival();
        game.zombies.push(Zombie::new(Vector3::new(25.0, 0.0, 0.0), 1));
        let events = game.update();
        assert!(events.contains(&GameEvent::PlayerKilled(Cause::Zombie)));
    }

    #[test]
    fn survival_horde_arrives_on_schedule() {
        let mut game = survival();
        let spawned = (0..90)
            .flat_map(|_| game.update())
            .filter(|e| *e == GameEvent::ZombieSpawned)
            .count();
        assert_eq!(spawned, 1);
        assert_eq!(game.zombies.len(), 1);
        assert!(game.zombies[0].position.x > 400.0);
    }

    #[test]
    fn survival_moves_with_held_keys() {
        let mut game = survival();
        game.handle_input(Input::KeyDown(Key::Right));
        game.update();
        game.handle_input(Input::KeyUp(Key::Right));
        game.update();
        assert_eq!(game.player.position.z, 8.0);
        assert_eq!(game.player.position.x, 0.0);
        assert!(game.world.camera.scrolling);
        assert_eq!(game.world.camera.x, -145.0);
    }

    #[test]
    fn restart_keeps_best() {
        let mut game = crossing();
        hop(&mut game);
        game.update();
        game.vehicles.push(Vehicle::new(1, Vector3::new(120.0, 18.0, 0.0), Heading::NegativeZ, 1.0));
        game.update();
        assert!(game.is_over());

        let seed = game.seed;
        game.handle_input(Input::Restart);
        assert_eq!(game.state, GameState::Playing);
        assert_eq!(game.score, 0);
        assert_eq!(game.best, 1);
        assert_ne!(game.seed, seed);
        assert_eq!(game.player.lane(120.0), 0);
    }

    #[test]
    fn same_seed_same_world() {
        let mut a = crossing();
        let mut b = crossing();
        for game in [&mut a, &mut b] {
            game.handle_input(Input::KeyUp(Key::Forward));
            for _ in 0..200 {
                game.update();
            }
        }
        assert_eq!(a.vehicles.len(), b.vehicles.len());
        for (va, vb) in a.vehicles.iter().zip(&b.vehicles) {
            assert_eq!(va.position, vb.position);
        }
        assert_eq!(a.world.strips, b.world.strips);
    }
}
