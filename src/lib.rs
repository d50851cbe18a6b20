mod engine;
mod error;
pub mod game;
mod logging;

use std::cell::RefCell;
use std::rc::Rc;
use log::{info, warn};
use nalgebra::Vector3;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, Request, RequestInit, RequestMode, Response, WebGlRenderingContext, Window};
use crate::engine::frontend::WebFrontend;
use crate::engine::mesh::Mesh;
use crate::engine::renderer::Renderer;
use crate::error::GameError;
use crate::game::driver::FrameDriver;
use crate::game::{AppConfig, Game, Input, Key};

const CONFIG_PATH: &str = "/assets/config.json";

thread_local! {
    static DRIVER: RefCell<Option<FrameDriver<WebFrontend>>> = RefCell::new(None);
}

fn with_driver(f: impl FnOnce(&mut FrameDriver<WebFrontend>)) {
    DRIVER.with(|d| {
        if let Some(driver) = d.borrow_mut().as_mut() {
            f(driver);
        }
    });
}

fn send(input: Input) {
    with_driver(|driver| driver.handle_input(input));
}

#[wasm_bindgen]
pub async fn init_game() -> Result<(), JsValue> {
    logging::init("info");

    let window = web_sys::window().ok_or(GameError::Dom("window"))?;
    let document = window.document().ok_or(GameError::Dom("document"))?;
    let canvas = document
        .get_element_by_id("canvas")
        .ok_or(GameError::Dom("canvas"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| GameError::Dom("canvas"))?;

    let gl = canvas
        .get_context("webgl")
        .map_err(GameError::js)?
        .ok_or(GameError::Graphics("webgl unavailable".into()))?
        .dyn_into::<WebGlRenderingContext>()
        .map_err(|_| GameError::Graphics("not a webgl context".into()))?;

    let config = load_config(&window).await?;
    logging::init(&config.log_level);
    info!("starting in {:?} mode", config.game.mode);

    let mut frontend = WebFrontend::new(Renderer::new(gl)?, &document);
    if let Some(model) = &config.vehicle_model {
        match fetch_bytes(&window, &model.path).await.and_then(|bytes| Mesh::from_gltf(&bytes)) {
            Ok(mesh) => {
                let game = &config.game;
                let footprint = Vector3::new(game.vehicle_width, game.vehicle_height * 2.0, game.vehicle_length);
                frontend.set_vehicle_model(&mesh, model.clone(), footprint)?;
                info!("vehicle model {} loaded, {} vertices", model.path, mesh.vertex_count());
            }
            Err(err) => warn!("vehicle model {} unusable, drawing boxes: {}", model.path, err),
        }
    }

    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let game = Game::new(config.game, seed);
    DRIVER.with(|d| *d.borrow_mut() = Some(FrameDriver::new(game, frontend)));

    register_input(&window, &canvas)?;
    start_loop()?;
    Ok(())
}

/// Missing config means defaults. A config that is present but wrong is an error.
async fn load_config(window: &Window) -> Result<AppConfig, GameError> {
    let resp = match fetch(window, CONFIG_PATH).await {
        Ok(resp) => resp,
        Err(err) => {
            warn!("no config at {}, using defaults: {}", CONFIG_PATH, err);
            return Ok(AppConfig::default());
        }
    };

    let json = JsFuture::from(resp.json().map_err(GameError::js)?)
        .await
        .map_err(GameError::js)?;
    let config: AppConfig = serde_wasm_bindgen::from_value(json)
        .map_err(|err| GameError::invalid("config.json", err.to_string()))?;
    config.game.validate()?;
    Ok(config)
}

async fn fetch(window: &Window, path: &str) -> Result<Response, GameError> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(path, &opts).map_err(GameError::js)?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(GameError::js)?
        .dyn_into()
        .map_err(GameError::js)?;
    if !resp.ok() {
        return Err(GameError::Js(format!("{} returned {}", path, resp.status())));
    }
    Ok(resp)
}

async fn fetch_bytes(window: &Window, path: &str) -> Result<Vec<u8>, GameError> {
    let resp = fetch(window, path).await?;
    let buffer = JsFuture::from(resp.array_buffer().map_err(GameError::js)?)
        .await
        .map_err(GameError::js)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

fn key_of(event: &KeyboardEvent) -> Option<Key> {
    match event.key().as_str() {
        "ArrowUp" | "w" | "W" | " " => Some(Key::Forward),
        "ArrowDown" | "s" | "S" => Some(Key::Backward),
        "ArrowLeft" | "a" | "A" => Some(Key::Left),
        "ArrowRight" | "d" | "D" => Some(Key::Right),
        _ => None,
    }
}

fn register_input(window: &Window, canvas: &HtmlCanvasElement) -> Result<(), GameError> {
    let keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if let Some(key) = key_of(&event) {
            event.prevent_default();
            // Held keys repeat; only the first press counts as a hop.
            if !event.repeat() {
                send(Input::KeyDown(key));
            }
        } else if matches!(event.key().as_str(), "r" | "R") {
            send(Input::Restart);
        }
    }) as Box<dyn FnMut(_)>);

    let keyup = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if let Some(key) = key_of(&event) {
            send(Input::KeyUp(key));
        }
    }) as Box<dyn FnMut(_)>);

    let mousemove = Closure::wrap(Box::new(move |event: MouseEvent| {
        with_driver(|driver| {
            let point = driver.frontend().ground_point(event.client_x() as f32, event.client_y() as f32);
            if let Some((x, z)) = point {
                driver.handle_input(Input::Aim { x, z });
            }
        });
    }) as Box<dyn FnMut(_)>);

    let mousedown = Closure::wrap(Box::new(move |_: MouseEvent| send(Input::Trigger(true))) as Box<dyn FnMut(_)>);
    let mouseup = Closure::wrap(Box::new(move |_: MouseEvent| send(Input::Trigger(false))) as Box<dyn FnMut(_)>);

    window
        .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
        .map_err(GameError::js)?;
    window
        .add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())
        .map_err(GameError::js)?;
    canvas
        .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())
        .map_err(GameError::js)?;
    canvas
        .add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())
        .map_err(GameError::js)?;
    window
        .add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())
        .map_err(GameError::js)?;

    keydown.forget();
    keyup.forget();
    mousemove.forget();
    mousedown.forget();
    mouseup.forget();
    Ok(())
}

fn start_loop() -> Result<(), GameError> {
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        with_driver(|driver| {
            driver.tick();
        });
        if let Some(next) = f.borrow().as_ref() {
            if let Err(err) = request_animation_frame(next) {
                warn!("frame loop stopped: {}", err);
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(closure) = g.borrow().as_ref() {
        request_animation_frame(closure)?;
    }
    Ok(())
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) -> Result<i32, GameError> {
    web_sys::window()
        .ok_or(GameError::Dom("window"))?
        .request_animation_frame(f.as_ref().unchecked_ref())
        .map_err(GameError::js)
}

#[wasm_bindgen]
pub fn touch_left(pressed: bool) {
    send(if pressed { Input::KeyDown(Key::Left) } else { Input::KeyUp(Key::Left) });
}

#[wasm_bindgen]
pub fn touch_right(pressed: bool) {
    send(if pressed { Input::KeyDown(Key::Right) } else { Input::KeyUp(Key::Right) });
}

#[wasm_bindgen]
pub fn touch_forward() {
    send(Input::KeyDown(Key::Forward));
    send(Input::KeyUp(Key::Forward));
}

#[wasm_bindgen]
pub fn touch_restart() {
    send(Input::Restart);
}
