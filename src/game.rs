//! Session driver
//!
//! Runs one simulation frame per scheduled display frame while a match is
//! playing, draws it, feeds the HUD and switches overlays on start and on
//! match end. Holds at most one pending frame; handles it did not hand out
//! (cancelled or superseded) are dropped when they fire.

use std::cell::RefCell;
use std::rc::Rc;

use rand::RngCore;
use rand_pcg::Pcg32;

use crate::error::Result;
use crate::platform::{FrameHandle, FrameScheduler, HealthDisplay, InputState, Overlay};
use crate::renderer::{RenderSurface, draw_background, draw_fighter};
use crate::settings::{Screen, Settings};
use crate::sim::{Arena, Match, MatchPhase, Outcome, ScriptedPolicy};

pub struct Game<V, S, R = Pcg32> {
    settings: Settings,
    session: Match<R>,
    surface: V,
    player_hp: Option<Box<dyn HealthDisplay>>,
    opponent_hp: Option<Box<dyn HealthDisplay>>,
    overlay: Option<Box<dyn Overlay>>,
    input: Rc<RefCell<InputState>>,
    scheduler: S,
    pending: Option<FrameHandle>,
}

impl<V: RenderSurface, S: FrameScheduler> Game<V, S, Pcg32> {
    /// Game whose opponent is seeded from `settings.ai_seed`, or `fallback_seed`
    pub fn seeded(
        settings: Settings,
        surface: V,
        input: Rc<RefCell<InputState>>,
        scheduler: S,
        fallback_seed: u64,
    ) -> Result<Self> {
        let seed = settings.ai_seed.unwrap_or(fallback_seed);
        log::info!("Opponent seed: {}", seed);
        Self::new(settings, surface, input, scheduler, ScriptedPolicy::seeded(seed))
    }
}

impl<V: RenderSurface, S: FrameScheduler, R: RngCore> Game<V, S, R> {
    /// Build a session in the `Start` phase. Fails if the surface has no
    /// usable geometry.
    pub fn new(
        settings: Settings,
        surface: V,
        input: Rc<RefCell<InputState>>,
        scheduler: S,
        policy: ScriptedPolicy<R>,
    ) -> Result<Self> {
        let (w, h) = surface.size();
        let arena = Arena::new(w, h)?;
        Ok(Self {
            settings,
            session: Match::new(&arena, policy),
            surface,
            player_hp: None,
            opponent_hp: None,
            overlay: None,
            input,
            scheduler,
            pending: None,
        })
    }

    pub fn with_health_displays(
        mut self,
        player: Option<Box<dyn HealthDisplay>>,
        opponent: Option<Box<dyn HealthDisplay>>,
    ) -> Self {
        self.player_hp = player;
        self.opponent_hp = opponent;
        self
    }

    pub fn with_overlay(mut self, overlay: Option<Box<dyn Overlay>>) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Match<R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Match<R> {
        &mut self.session
    }

    pub fn phase(&self) -> MatchPhase {
        self.session.phase()
    }

    pub fn input(&self) -> Rc<RefCell<InputState>> {
        Rc::clone(&self.input)
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The frame this game is waiting for, if any
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Show the start screen
    pub fn boot(&mut self) {
        let start = self.settings.messages.start.clone();
        self.show(&start);
        log::info!("Waiting for start");
    }

    /// Start/restart button. Ignored while playing; otherwise respawns the
    /// fighters and replaces any outstanding frame with a fresh one.
    pub fn on_action_pressed(&mut self) -> Result<bool> {
        if !self.session.phase().accepts_restart() {
            log::debug!("action ignored while playing");
            return Ok(false);
        }
        let arena = self.arena()?;
        if !self.session.restart(&arena) {
            return Ok(false);
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.hide();
        }
        if let Some(stale) = self.pending.take() {
            self.scheduler.cancel(stale);
        }
        self.pending = Some(self.scheduler.schedule_next());
        Ok(true)
    }

    /// One display frame
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<()> {
        if self.pending != Some(handle) {
            log::warn!("Dropping stale frame {:?}", handle);
            return Ok(());
        }
        self.pending = None;
        if !self.session.is_playing() {
            return Ok(());
        }

        // Retry on the next frame
        let arena = match self.arena() {
            Ok(arena) => arena,
            Err(e) => {
                self.pending = Some(self.scheduler.schedule_next());
                return Err(e);
            }
        };
        let (w, h) = (arena.width(), arena.height());

        self.surface.clear(0.0, 0.0, w, h);
        draw_background(&mut self.surface, w, h);

        {
            let input = self.input.borrow();
            let keys = &self.settings.keys;
            self.session.step_fighters(&*input, keys, &arena);
        }

        draw_fighter(&mut self.surface, &self.session.player);
        draw_fighter(&mut self.surface, &self.session.opponent);
        self.update_hud();

        match self.session.resolve() {
            Some(Outcome::Win) => {
                let screen = self.settings.messages.win_screen(self.session.score());
                self.show(&screen);
            }
            Some(Outcome::Lose) => {
                let screen = self.settings.messages.lose.clone();
                self.show(&screen);
            }
            None => self.pending = Some(self.scheduler.schedule_next()),
        }
        Ok(())
    }

    fn arena(&self) -> Result<Arena> {
        let (w, h) = self.surface.size();
        Arena::new(w, h)
    }

    fn update_hud(&mut self) {
        if let Some(bar) = self.player_hp.as_mut() {
            bar.set_fill_ratio(self.session.player.health_ratio());
        }
        if let Some(bar) = self.opponent_hp.as_mut() {
            bar.set_fill_ratio(self.session.opponent.health_ratio());
        }
    }

    fn show(&mut self, screen: &Screen) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.show(&screen.title, &screen.message, &screen.action);
        }
    }
}
