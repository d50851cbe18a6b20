use std::f32::consts::FRAC_PI_2;
use nalgebra::{Matrix4, Vector3};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};
use crate::engine::camera::{to_ndc, SceneCamera};
use crate::engine::mesh::Mesh;
use crate::engine::renderer::{GpuMesh, Renderer};
use crate::error::Result;
use crate::game::driver::Frontend;
use crate::game::geometry::facing;
use crate::game::traffic::Heading;
use crate::game::{Effect, Game, Hud, ModelConfig, PowerUpKind, StripKind};

const SKY: [f32; 3] = [0.53, 0.81, 0.92];
const GROUND: [f32; 3] = [0.29, 0.43, 0.0];
const ROAD: [f32; 3] = [0.07, 0.13, 0.13];
const MARKER: [f32; 3] = [0.85, 0.82, 0.82];
const VEHICLE: [f32; 3] = [0.35, 0.2, 0.18];
const ZOMBIE: [f32; 3] = [0.4, 0.55, 0.3];
const BULLET: [f32; 3] = [0.77, 0.77, 0.0];

const WHITE: [f32; 3] = [0.85, 0.82, 0.82];
const GOLDEN: [f32; 3] = [1.0, 0.6, 0.0];
const LIGHT_BLUE: [f32; 3] = [0.68, 0.85, 0.9];
const GREEN: [f32; 3] = [0.4, 0.6, 0.0];

/// Lateral span drawn for each strip.
const STRIP_DEPTH: f32 = 3600.0;
const PLAYER_SIZE: f32 = 24.0;
const ZOMBIE_HEIGHT: f32 = 44.0;

pub fn effect_color(kind: Option<PowerUpKind>) -> [f32; 3] {
    match kind {
        Some(PowerUpKind::Shield) => GOLDEN,
        Some(PowerUpKind::Freeze) => LIGHT_BLUE,
        Some(PowerUpKind::Moses) => GREEN,
        None => WHITE,
    }
}

fn placed(x: f32, y: f32, z: f32, yaw: f32, size: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::new_translation(&Vector3::new(x, y, z))
        * Matrix4::from_euler_angles(0.0, yaw, 0.0)
        * Matrix4::new_nonuniform_scaling(&size)
}

struct VehicleModel {
    mesh: GpuMesh,
    scale: Vector3<f32>,
    config: ModelConfig,
}

/// Draws the game with WebGL and mirrors the HUD into the page.
pub struct WebFrontend {
    renderer: Renderer,
    camera: SceneCamera,
    vehicle_model: Option<VehicleModel>,
    score: Option<HtmlElement>,
    effect: Option<HtmlElement>,
    game_over: Option<HtmlElement>,
    size: (u32, u32),
}

impl WebFrontend {
    pub fn new(renderer: Renderer, document: &Document) -> Self {
        let element = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        };

        WebFrontend {
            camera: SceneCamera::new(1.0),
            vehicle_model: None,
            score: element("score"),
            effect: element("effect"),
            game_over: element("gameover"),
            size: (0, 0),
            renderer,
        }
    }

    /// Replaces the plain vehicle boxes with a model sized to the vehicle footprint.
    pub fn set_vehicle_model(&mut self, mesh: &Mesh, config: ModelConfig, footprint: Vector3<f32>) -> Result<()> {
        let extent = mesh.extent();
        let fit = |want: f32, have: f32| if have > 0.0 { want / have } else { 1.0 };
        // The model's length runs along its own x axis.
        let scale = Vector3::new(
            fit(footprint.z, extent.x),
            fit(footprint.y, extent.y),
            fit(footprint.x, extent.z),
        ) * config.scale;

        self.vehicle_model = Some(VehicleModel { mesh: self.renderer.upload(mesh)?, scale, config });
        Ok(())
    }

    /// Ground point under a pointer position given in client pixels.
    pub fn ground_point(&self, client_x: f32, client_y: f32) -> Option<(f32, f32)> {
        let canvas = self.renderer.canvas()?;
        let rect = canvas.get_bounding_client_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return None;
        }
        let (ndc_x, ndc_y) = to_ndc(
            client_x - rect.left() as f32,
            client_y - rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        );
        self.camera.ground_point(ndc_x, ndc_y)
    }

    fn fit_canvas(&mut self) {
        let Some(canvas) = self.renderer.canvas() else { return };
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        if self.size == (width, height) {
            return;
        }
        canvas.set_width(width);
        canvas.set_height(height);
        self.renderer.resize(width as i32, height as i32);
        self.camera.set_aspect(width as f32 / height as f32);
        self.size = (width, height);
    }

    fn draw_vehicle(&self, game: &Game, position: &Vector3<f32>, heading: Heading, view_projection: &Matrix4<f32>) {
        let config = &game.config;
        let yaw = match heading {
            Heading::PositiveZ => 0.0,
            Heading::NegativeZ => std::f32::consts::PI,
        };

        match &self.vehicle_model {
            Some(model) => {
                let offsets = &model.config;
                let transform = Matrix4::new_translation(&Vector3::new(
                    position.x,
                    position.y + offsets.position_offset_y,
                    position.z,
                )) * Matrix4::from_euler_angles(
                    offsets.rotation_offset_x,
                    yaw - FRAC_PI_2 + offsets.rotation_offset_y,
                    offsets.rotation_offset_z,
                ) * Matrix4::new_nonuniform_scaling(&model.scale);
                self.renderer.draw_mesh(&model.mesh, &transform, view_projection);
            }
            None => {
                let size = Vector3::new(config.vehicle_width, config.vehicle_height * 2.0, config.vehicle_length);
                self.renderer.draw_box(&placed(position.x, position.y, position.z, 0.0, size), view_projection, VEHICLE);
            }
        }
    }
}

impl Frontend for WebFrontend {
    fn render_frame(&mut self, game: &Game) {
        self.fit_canvas();
        self.camera.follow(game.world.camera.x);
        let vp = self.camera.view_projection();
        let config = &game.config;
        let r = &self.renderer;

        r.clear(SKY);

        for strip in &game.world.strips {
            let x = config.lane_x(strip.lane);
            let (color, height) = match strip.kind {
                StripKind::Ground => (GROUND, 20.0),
                StripKind::Road => (ROAD, 10.0),
            };
            r.draw_box(&placed(x, -10.0, 0.0, 0.0, Vector3::new(config.lane_width, height, STRIP_DEPTH)), &vp, color);
        }

        for marker in &game.world.markers {
            let x = config.lane_x(marker.lane) + config.lane_width / 2.0;
            r.draw_box(&placed(x, -4.0, marker.z, 0.0, Vector3::new(10.0, 2.0, 100.0)), &vp, MARKER);
        }

        for vehicle in &game.vehicles {
            self.draw_vehicle(game, &vehicle.position, vehicle.heading, &vp);
        }

        for power_up in &game.power_ups {
            let size = power_up.kind.body_size();
            let p = &power_up.position;
            let bob = (game.frame as f32 * 0.05).sin() * 3.0;
            r.draw_box(
                &placed(p.x, p.y + size / 2.0 + bob, p.z, game.frame as f32 * 0.03, Vector3::repeat(size)),
                &vp,
                effect_color(Some(power_up.kind)),
            );
        }

        for zombie in &game.zombies {
            let p = &zombie.position;
            let width = config.zombie_half_extent * 2.0;
            let size = Vector3::new(width, ZOMBIE_HEIGHT, width);
            r.draw_box(&placed(p.x, p.y + ZOMBIE_HEIGHT / 2.0, p.z, 0.0, size), &vp, ZOMBIE);
        }

        for bullet in &game.bullets {
            let p = &bullet.position;
            let size = Vector3::repeat(config.bullet_half_extent * 2.0);
            r.draw_box(&placed(p.x, 12.0, p.z, 0.0, size), &vp, BULLET);
        }

        let p = &game.player.position;
        let tint = effect_color(game.power.active());
        r.draw_box(
            &placed(p.x, PLAYER_SIZE / 2.0, p.z, game.player.yaw, Vector3::repeat(PLAYER_SIZE)),
            &vp,
            tint,
        );
        // Beak, so the facing direction reads on screen.
        let beak = facing(game.player.yaw) * (PLAYER_SIZE / 2.0);
        r.draw_box(
            &placed(p.x + beak.x, PLAYER_SIZE * 0.7, p.z + beak.z, game.player.yaw, Vector3::repeat(6.0)),
            &vp,
            GOLDEN,
        );
    }

    fn display_hud(&mut self, hud: &Hud) {
        if let Some(score) = &self.score {
            let text = if hud.kills > 0 {
                format!("Score: {} | Best: {} | Kills: {}", hud.score, hud.best, hud.kills)
            } else {
                format!("Score: {} | Best: {}", hud.score, hud.best)
            };
            score.set_inner_text(&text);
        }
        if let Some(effect) = &self.effect {
            effect.set_inner_text(&effect_label(hud.effect));
        }
        if let Some(game_over) = &self.game_over {
            let display = if hud.game_over { "block" } else { "none" };
            game_over.style().set_property("display", display).ok();
        }
    }
}

/// Remaining effect time in whole seconds at 60 frames per second.
pub fn effect_label(effect: Option<Effect>) -> String {
    match effect {
        Some(effect) => format!("{:?} {}s", effect.kind, (effect.frames_left + 59) / 60),
        None => String::new(),
    }
}
