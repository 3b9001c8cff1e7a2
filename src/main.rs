//! Shinobi Fighter entry point
//!
//! The browser build boots on the page canvas. The native build has no window;
//! it plays a few headless matches with a simple autopilot on the player side.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = shinobi_fighter::platform::web::start() {
        log::error!("Boot failed: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shinobi Fighter (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable version");

    if let Err(e) = headless::run(3) {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use shinobi_fighter::platform::{InputState, ManualScheduler};
    use shinobi_fighter::renderer::RecordingSurface;
    use shinobi_fighter::sim::MatchPhase;
    use shinobi_fighter::{Game, Result, Settings};

    /// Give up on a match after this many frames (~3 minutes at 60 Hz)
    const MAX_FRAMES: u64 = 60 * 180;
    const DEMO_SEED: u64 = 2024;

    type HeadlessGame = Game<RecordingSurface, ManualScheduler>;

    /// Walk toward the opponent, then keep both strikes held
    fn autopilot(game: &HeadlessGame) {
        let session = game.session();
        let dx = session.opponent.center().x - session.player.center().x;
        let bindings = &game.settings().keys;
        let shared = game.input();
        let mut input = shared.borrow_mut();
        input.clear();

        let key = |list: &[String]| list.first().cloned().unwrap_or_default();
        if dx.abs() > 60.0 {
            input.press(key(if dx > 0.0 { &bindings.right } else { &bindings.left }));
        } else {
            // Step to turn around if the opponent got behind us
            if dx * session.player.facing.sign() <= 0.0 {
                input.press(key(if dx > 0.0 { &bindings.right } else { &bindings.left }));
            }
            input.press(key(&bindings.attack));
            input.press(key(&bindings.special));
        }
    }

    pub fn run(matches: u32) -> Result<()> {
        let mut game: HeadlessGame = Game::seeded(
            Settings::load(),
            RecordingSurface::new(960.0, 540.0),
            Rc::new(RefCell::new(InputState::new())),
            ManualScheduler::new(),
            DEMO_SEED,
        )?;
        game.boot();

        for round in 1..=matches {
            game.on_action_pressed()?;
            while let Some(handle) = game.scheduler_mut().pop_due() {
                if game.session().frame() >= MAX_FRAMES {
                    log::warn!("Round {} hit the frame limit", round);
                    break;
                }
                autopilot(&game);
                game.on_frame(handle)?;
            }

            let session = game.session();
            let result = match session.phase() {
                MatchPhase::Win => "win",
                MatchPhase::Lose => "lose",
                _ => "unfinished",
            };
            println!(
                "Round {}: {} after {} frames (player hp {}, opponent hp {}, score {})",
                round,
                result,
                session.frame(),
                session.player.health,
                session.opponent.health,
                session.score()
            );
            if session.phase() == MatchPhase::Playing {
                break;
            }
        }
        Ok(())
    }
}
