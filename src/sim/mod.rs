//! Deterministic simulation module
//!
//! All motion logic lives here. This module must stay deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - Drawing goes through the `Surface` trait, never a platform API

pub mod collision;
pub mod random;
pub mod state;
pub mod tick;

pub use collision::{Wall, Wrap, wrap_to_bounds};
pub use random::RandomRange;
pub use state::{Bouncer, Extent, ImageId, PLACEHOLDER_COLOR, Population, Simulation, SoundId};
pub use tick::{WallHit, tick};
