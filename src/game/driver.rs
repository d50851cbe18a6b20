use log::debug;
use super::{Game, GameEvent, Hud, Input};

/// What a frame driver needs from whatever puts the game on screen.
pub trait Frontend {
    fn render_frame(&mut self, game: &Game);
    fn display_hud(&mut self, hud: &Hud);
}

/// Runs one update-then-render cycle per display refresh.
pub struct FrameDriver<F: Frontend> {
    game: Game,
    frontend: F,
    shown: Option<Hud>,
}

impl<F: Frontend> FrameDriver<F> {
    pub fn new(game: Game, frontend: F) -> Self {
        FrameDriver { game, frontend, shown: None }
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn handle_input(&mut self, input: Input) {
        self.game.handle_input(input);
    }

    pub fn tick(&mut self) -> Vec<GameEvent> {
        let events = self.game.update();
        for event in &events {
            match event {
                GameEvent::NewBest(best) => debug!("new best {}", best),
                GameEvent::ZombieSpawned => debug!("zombie spawned, {} on the field", self.game.zombies.len()),
                _ => {}
            }
        }

        self.frontend.render_frame(&self.game);

        // The DOM only needs touching when something visible changed.
        let hud = self.game.hud();
        if self.shown != Some(hud) {
            self.frontend.display_hud(&hud);
            self.shown = Some(hud);
        }
        events
    }
}
