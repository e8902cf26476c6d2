//! Run settings
//!
//! Defaults match the classic 600x600 canvas with five bouncers at 20 ticks
//! per second. A JSON file may override any subset of fields.

use std::path::{Path, PathBuf};
use std::time::Duration;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Population;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    pub width: i32,
    pub height: i32,
    /// Background fill painted before the bouncers (RGBA)
    pub background: [u8; 4],

    // === Timing ===
    pub frames_per_second: u32,

    // === Population ===
    pub bouncer_count: usize,
    pub min_size: i32,
    pub max_size: i32,
    /// Velocity components are drawn from `[-max_velocity, max_velocity]`, never 0
    pub max_velocity: i32,
    /// Fixed RNG seed; a fresh one per start when absent
    pub seed: Option<u64>,

    // === Assets ===
    pub image_dir: PathBuf,
    pub sound_dir: PathBuf,
    /// Play a random sound whenever a bouncer leaves through the left wall
    pub wall_sounds: bool,

    // === Native host ===
    /// Ticks to run before exiting
    pub run_ticks: u64,
    /// Write the final frame here as PNG
    pub snapshot: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: CANVAS_SIZE,
            height: CANVAS_SIZE,
            background: [255, 255, 255, 255],

            frames_per_second: FRAMES_PER_SECOND,

            bouncer_count: NUMBER_TO_CREATE,
            min_size: MIN_SIZE,
            max_size: MAX_SIZE,
            max_velocity: MAX_VELOCITY,
            seed: None,

            image_dir: PathBuf::from("images"),
            sound_dir: PathBuf::from("sounds"),
            wall_sounds: false,

            run_ticks: 200,
            snapshot: None,
        }
    }
}

impl Settings {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, String> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| format!("Invalid settings: {e}"))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from a JSON file, falling back to defaults on any problem
    pub fn load(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {e}", path.display()))
            .and_then(|json| Self::from_json(&json));
        match loaded {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        Population::from(self).validate()?;
        if self.frames_per_second == 0 || self.frames_per_second > 1000 {
            return Err(format!(
                "frames_per_second must be in 1..=1000, got {}",
                self.frames_per_second
            ));
        }
        if self.width < self.max_size || self.height < self.max_size {
            return Err(format!(
                "Canvas {}x{} cannot hold a bouncer of size {}",
                self.width, self.height, self.max_size
            ));
        }
        Ok(())
    }

    /// Interval between ticks (1000 / fps milliseconds)
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(ONE_SECOND_MS / self.frames_per_second.max(1) as u64)
    }

    pub fn background_color(&self) -> Rgba<u8> {
        Rgba(self.background)
    }
}
