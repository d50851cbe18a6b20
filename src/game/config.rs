use serde::{Deserialize, Serialize};
use crate::error::{GameError, Result};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Hop lane by lane across the traffic.
    #[default]
    Crossing,
    /// Top-down shooter: free movement, mouse aim, zombies.
    Survival,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelConfig {
    pub path: String,
    pub scale: f32,
    pub rotation_offset_x: f32,
    pub rotation_offset_y: f32,
    pub rotation_offset_z: f32,
    pub position_offset_y: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub vehicle_model: Option<ModelConfig>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            game: GameConfig::default(),
            vehicle_model: None,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.game.validate()?;
        Ok(config)
    }
}

/// Every tunable of the simulation. Distances are world units, durations are frames.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub mode: Mode,

    pub lane_width: f32,
    pub lateral_min: f32,
    pub lateral_max: f32,
    pub lateral_step: f32,
    pub player_half_extent: f32,
    pub forward_lead_lanes: i32,

    pub initial_lanes: i32,
    pub max_road_lanes: u32,
    pub ground_roll: u32,
    pub cull_distance: f32,
    pub marker_start: f32,
    pub marker_end: f32,
    pub marker_spacing: f32,

    pub vehicle_base_speed: f32,
    pub vehicle_length: f32,
    pub vehicle_width: f32,
    pub vehicle_height: f32,
    pub vehicles_per_lane: u32,
    pub vehicle_spacing: f32,
    pub vehicle_start_offset: f32,
    pub vehicle_wrap: f32,
    pub single_lane_speed_factor: f32,
    pub speed_factor_step: f32,
    pub speed_factor_steps: u32,

    pub shield_odds: u32,
    pub freeze_odds: u32,
    pub moses_odds: u32,
    pub power_up_spread: f32,
    pub effect_frames: u32,
    pub slow_divisor: f32,
    pub moses_radius: f32,

    pub camera_start: f32,
    pub camera_speed: f32,
    pub camera_catchup_speed: f32,
    pub camera_lead: f32,

    pub player_speed: f32,
    pub bullet_speed: f32,
    pub bullet_range: f32,
    pub bullet_half_extent: f32,
    pub fire_cooldown_frames: u32,
    pub zombie_speed: f32,
    pub zombie_half_extent: f32,
    pub zombie_health: u32,
    pub zombie_spawn_interval: u32,
    pub zombie_spawn_min: u32,
    pub zombie_spawn_ramp: u32,
    pub zombie_spawn_ahead_min: f32,
    pub zombie_spawn_ahead_max: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: Mode::Crossing,

            lane_width: 120.0,
            lateral_min: -340.0,
            lateral_max: 300.0,
            lateral_step: 24.0,
            player_half_extent: 10.0,
            forward_lead_lanes: 6,

            initial_lanes: 12,
            max_road_lanes: 5,
            ground_roll: 6,
            cull_distance: 1500.0,
            marker_start: -1900.0,
            marker_end: 1900.0,
            marker_spacing: 230.0,

            vehicle_base_speed: 6.0,
            vehicle_length: 100.0,
            vehicle_width: 50.0,
            vehicle_height: 18.0,
            vehicles_per_lane: 3,
            vehicle_spacing: 200.0,
            vehicle_start_offset: 200.0,
            vehicle_wrap: 900.0,
            single_lane_speed_factor: 5.0,
            speed_factor_step: 0.1,
            speed_factor_steps: 15,

            shield_odds: 30,
            freeze_odds: 20,
            moses_odds: 40,
            power_up_spread: 200.0,
            effect_frames: 450,
            slow_divisor: 4.0,
            moses_radius: 240.0,

            camera_start: -150.0,
            camera_speed: 2.5,
            camera_catchup_speed: 5.0,
            camera_lead: 360.0,

            player_speed: 8.0,
            bullet_speed: 24.0,
            bullet_range: 1200.0,
            bullet_half_extent: 5.0,
            fire_cooldown_frames: 8,
            zombie_speed: 2.0,
            zombie_half_extent: 20.0,
            zombie_health: 2,
            zombie_spawn_interval: 90,
            zombie_spawn_min: 30,
            zombie_spawn_ramp: 2,
            zombie_spawn_ahead_min: 600.0,
            zombie_spawn_ahead_max: 900.0,
        }
    }
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("lane_width", self.lane_width),
            ("lateral_step", self.lateral_step),
            ("cull_distance", self.cull_distance),
            ("marker_spacing", self.marker_spacing),
            ("vehicle_base_speed", self.vehicle_base_speed),
            ("vehicle_length", self.vehicle_length),
            ("vehicle_width", self.vehicle_width),
            ("vehicle_spacing", self.vehicle_spacing),
            ("vehicle_wrap", self.vehicle_wrap),
            ("slow_divisor", self.slow_divisor),
            ("camera_speed", self.camera_speed),
            ("player_speed", self.player_speed),
            ("bullet_speed", self.bullet_speed),
            ("bullet_range", self.bullet_range),
            ("zombie_speed", self.zombie_speed),
            ("zombie_half_extent", self.zombie_half_extent),
            ("vehicle_height", self.vehicle_height),
            ("power_up_spread", self.power_up_spread),
            ("camera_catchup_speed", self.camera_catchup_speed),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(GameError::invalid(field, format!("must be positive, got {}", value)));
            }
        }

        let non_zero = [
            ("max_road_lanes", self.max_road_lanes),
            ("ground_roll", self.ground_roll),
            ("vehicles_per_lane", self.vehicles_per_lane),
            ("speed_factor_steps", self.speed_factor_steps),
            ("shield_odds", self.shield_odds),
            ("freeze_odds", self.freeze_odds),
            ("moses_odds", self.moses_odds),
            ("zombie_health", self.zombie_health),
            ("zombie_spawn_min", self.zombie_spawn_min),
        ];
        for (field, value) in non_zero {
            if value == 0 {
                return Err(GameError::invalid(field, "must be at least 1"));
            }
        }

        if self.lateral_min >= self.lateral_max {
            return Err(GameError::invalid(
                "lateral_min",
                format!("{} is not below lateral_max {}", self.lateral_min, self.lateral_max),
            ));
        }
        if self.marker_start >= self.marker_end {
            return Err(GameError::invalid("marker_start", "must be below marker_end"));
        }
        if self.initial_lanes < 1 {
            return Err(GameError::invalid("initial_lanes", "must be at least 1"));
        }
        if self.forward_lead_lanes < 0 {
            return Err(GameError::invalid("forward_lead_lanes", "must not be negative"));
        }
        if self.zombie_spawn_ahead_min > self.zombie_spawn_ahead_max {
            return Err(GameError::invalid(
                "zombie_spawn_ahead_min",
                "must not exceed zombie_spawn_ahead_max",
            ));
        }
        if self.zombie_spawn_interval < self.zombie_spawn_min {
            return Err(GameError::invalid(
                "zombie_spawn_interval",
                "must not be below zombie_spawn_min",
            ));
        }
        Ok(())
    }

    /// World x of a lane centre.
    pub fn lane_x(&self, lane: i32) -> f32 {
        lane as f32 * self.lane_width
    }
}
