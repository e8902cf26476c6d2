//! Bouncers - sprites wrapping around a bounded canvas at a fixed tick rate
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bouncers, wall rule, seeded RNG)
//! - `scheduler`: Stopped/Running tick driver, repaint and input snapshot
//! - `renderer`: Display surface trait and a software framebuffer
//! - `assets`: Image/sound pools loaded once per run
//! - `audio`: Sound sinks
//! - `settings`: Run configuration

pub mod assets;
pub mod audio;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use assets::{AssetPool, AssetProvider, DirectoryAssets, ProceduralAssets};
pub use scheduler::{RunState, Scheduler};
pub use settings::Settings;

/// Animation configuration constants
pub mod consts {
    /// Default canvas edge length in pixels
    pub const CANVAS_SIZE: i32 = 600;
    pub const ONE_SECOND_MS: u64 = 1000;
    /// Default tick rate (50 ms period)
    pub const FRAMES_PER_SECOND: u32 = 20;

    /// Bouncer defaults
    pub const NUMBER_TO_CREATE: usize = 5;
    pub const MIN_SIZE: i32 = 16;
    pub const MAX_SIZE: i32 = 48;
    pub const MAX_VELOCITY: i32 = 10;
}
