//! Fixed-rate animation scheduler
//!
//! Owns the simulation while it runs and turns elapsed wall-clock time into
//! whole ticks. Each tick is `update` followed by a full repaint; both run to
//! completion on the caller's thread, so nothing here needs locking.

use std::time::Duration;

use glam::IVec2;

use crate::assets::AssetProvider;
use crate::audio::AudioSink;
use crate::input::InputState;
use crate::renderer::{Rect, Surface};
use crate::settings::Settings;
use crate::sim::{Extent, Simulation, Wall};

/// Most ticks a single `advance` will run before dropping the backlog
pub const MAX_CATCH_UP_TICKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

pub struct Scheduler {
    settings: Settings,
    state: RunState,
    simulation: Option<Simulation>,
    input: InputState,
    audio: Box<dyn AudioSink>,
    period: Duration,
    accumulator: Duration,
    /// Ticks fired since construction
    pub tick_count: u64,
}

impl Scheduler {
    pub fn new(settings: Settings, audio: Box<dyn AudioSink>) -> Self {
        let period = settings.tick_period();
        Self {
            settings,
            state: RunState::Stopped,
            simulation: None,
            input: InputState::new(),
            audio,
            period,
            accumulator: Duration::ZERO,
            tick_count: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current simulation; it outlives `stop` so the last frame can be repainted
    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    /// Create a fresh simulation bound to `bounds` and start ticking
    pub fn start(&mut self, bounds: Extent, provider: &dyn AssetProvider) -> Result<(), String> {
        if self.is_running() {
            log::warn!("Scheduler already running, start ignored");
            return Ok(());
        }
        let seed = self.settings.seed.unwrap_or_else(rand::random);
        let simulation = Simulation::new(bounds, provider, &self.settings, seed)?;
        log::info!(
            "Starting {} bouncers on {}x{} (seed {seed})",
            simulation.bouncers().len(),
            bounds.width,
            bounds.height
        );
        self.start_with(simulation);
        Ok(())
    }

    /// Start ticking an already built simulation
    pub fn start_with(&mut self, simulation: Simulation) {
        self.simulation = Some(simulation);
        self.accumulator = Duration::ZERO;
        self.state = RunState::Running;
        log::info!("Animation running every {:?}", self.period);
    }

    /// Cancel future ticks; an in-progress tick has already completed
    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            log::info!("Animation stopped after {} ticks", self.tick_count);
        }
        self.state = RunState::Stopped;
        self.accumulator = Duration::ZERO;
    }

    /// Fire one tick: update against the surface's current size, then repaint.
    /// Returns false (and does nothing) while stopped.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        let Some(sim) = self.simulation.as_mut() else {
            return false;
        };

        let hits = sim.update(surface.size());
        for hit in &hits {
            log::debug!("Bouncer {} crossed {:?} wall", hit.bouncer, hit.wall);
            if self.settings.wall_sounds && hit.wall == Wall::Left {
                if let Some(clip) = sim.random_sound().and_then(|id| sim.assets().sound(id)) {
                    self.audio.play(clip);
                }
            }
        }
        self.tick_count += 1;

        self.paint(surface);
        true
    }

    /// Feed elapsed time; runs as many whole ticks as it covers (capped at
    /// [`MAX_CATCH_UP_TICKS`]) and returns how many ran.
    ///
    /// Backlog beyond the cap is dropped, not queued: after a long stall the
    /// animation resumes at the normal rate instead of replaying every
    /// missed tick. `tick` itself never skips a bouncer step.
    pub fn advance(&mut self, elapsed: Duration, surface: &mut dyn Surface) -> u32 {
        if !self.is_running() {
            return 0;
        }
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.period && ticks < MAX_CATCH_UP_TICKS {
            self.accumulator -= self.period;
            self.tick(surface);
            ticks += 1;
        }
        if self.accumulator >= self.period {
            log::warn!("Dropping {:?} of animation backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    /// Clear to the background colour and draw the simulation, if any
    pub fn paint(&self, surface: &mut dyn Surface) {
        let size = surface.size();
        surface.fill_rect(
            Rect::new(0, 0, size.width, size.height),
            self.settings.background_color(),
        );
        if let Some(sim) = &self.simulation {
            sim.paint(surface);
        }
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn last_key_pressed(&self) -> &str {
        self.input.last_key_pressed()
    }

    pub fn last_mouse_position(&self) -> IVec2 {
        self.input.last_mouse_position()
    }
}
