//! Simulation state and core entity types

use glam::IVec2;
use image::Rgba;
use serde::{Deserialize, Serialize};

use super::collision::{Wrap, rect_contains, wrap_to_bounds};
use super::random::RandomRange;
use crate::assets::{AssetPool, AssetProvider};
use crate::renderer::{Rect, Surface};
use crate::settings::Settings;

/// Fill used for a bouncer that has no sprite to draw
pub const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([70, 130, 180, 255]);

/// Integer width/height pair (canvas bounds, sprite size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: i32) -> Self {
        Self::new(side, side)
    }

    /// Both dimensions strictly positive
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Index into the image half of an [`AssetPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub usize);

/// Index into the sound half of an [`AssetPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundId(pub usize);

/// A rectangular sprite moving across the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bouncer {
    center: IVec2,
    size: Extent,
    velocity: IVec2,
    image: Option<ImageId>,
}

impl Bouncer {
    pub fn new(center: IVec2, size: Extent, velocity: IVec2, image: Option<ImageId>) -> Self {
        debug_assert!(size.is_positive(), "bouncer size must be positive");
        Self {
            center,
            size,
            velocity,
            image,
        }
    }

    pub fn center(&self) -> IVec2 {
        self.center
    }

    /// Any center is accepted; the next `update` pulls it back inside the wall
    /// rule. The step itself wraps on `i32` overflow.
    pub fn set_center(&mut self, center: IVec2) {
        self.center = center;
    }

    pub fn size(&self) -> Extent {
        self.size
    }

    pub fn set_size(&mut self, size: Extent) {
        debug_assert!(size.is_positive(), "bouncer size must be positive");
        self.size = size;
    }

    pub fn velocity(&self) -> IVec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: IVec2) {
        self.velocity = velocity;
    }

    pub fn image(&self) -> Option<ImageId> {
        self.image
    }

    pub fn set_image(&mut self, image: Option<ImageId>) {
        self.image = image;
    }

    pub fn left(&self) -> i32 {
        self.center.x - self.size.width / 2
    }

    pub fn top(&self) -> i32 {
        self.center.y - self.size.height / 2
    }

    pub fn right(&self) -> i32 {
        self.center.x + self.size.width / 2
    }

    pub fn bottom(&self) -> i32 {
        self.center.y + self.size.height / 2
    }

    /// Screen rectangle the sprite is drawn into
    pub fn bounds_rect(&self) -> Rect {
        Rect::new(self.left(), self.top(), self.size.width, self.size.height)
    }

    /// True if `point` lies in the inclusive bounding rectangle
    pub fn intersects(&self, point: IVec2) -> bool {
        rect_contains(self.left(), self.top(), self.right(), self.bottom(), point)
    }

    /// Move by one step of velocity, then apply the wall rule against `bounds`.
    /// Size and velocity never change here.
    pub fn update(&mut self, bounds: Extent) -> Wrap {
        let wrap = wrap_to_bounds(self.center.wrapping_add(self.velocity), self.size, bounds);
        self.center = wrap.center;
        wrap
    }

    pub fn paint(&self, surface: &mut dyn Surface, assets: &AssetPool) {
        let rect = self.bounds_rect();
        match self.image.and_then(|id| assets.image(id)) {
            Some(sprite) => surface.draw_image(sprite, rect),
            None => surface.fill_rect(rect, PLACEHOLDER_COLOR),
        }
    }
}

/// Population parameters pulled out of [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Population {
    pub count: usize,
    pub min_size: i32,
    pub max_size: i32,
    pub max_velocity: i32,
}

impl From<&Settings> for Population {
    fn from(settings: &Settings) -> Self {
        Self {
            count: settings.bouncer_count,
            min_size: settings.min_size,
            max_size: settings.max_size,
            max_velocity: settings.max_velocity,
        }
    }
}

impl Population {
    /// Reject parameters that leave no value to draw from
    pub fn validate(&self) -> Result<(), String> {
        if self.min_size <= 0 {
            return Err(format!("min_size must be positive, got {}", self.min_size));
        }
        if self.min_size > self.max_size {
            return Err(format!(
                "min_size ({}) is larger than max_size ({})",
                self.min_size, self.max_size
            ));
        }
        if self.max_velocity < 1 {
            return Err(format!(
                "max_velocity must be at least 1, got {}",
                self.max_velocity
            ));
        }
        Ok(())
    }
}

impl Default for Population {
    fn default() -> Self {
        Population::from(&Settings::default())
    }
}

/// The running set of bouncers plus everything they draw from
#[derive(Debug)]
pub struct Simulation {
    bouncers: Vec<Bouncer>,
    assets: AssetPool,
    rng: RandomRange,
    /// Ticks advanced since construction
    pub time_ticks: u64,
}

impl Simulation {
    /// Load assets through `provider` and create the initial population
    pub fn new(
        bounds: Extent,
        provider: &dyn AssetProvider,
        settings: &Settings,
        seed: u64,
    ) -> Result<Self, String> {
        let assets = AssetPool::load(provider);
        Self::with_assets(
            bounds,
            assets,
            Population::from(settings),
            RandomRange::new(seed),
        )
    }

    /// Create the initial population from an already loaded pool
    pub fn with_assets(
        bounds: Extent,
        assets: AssetPool,
        population: Population,
        rng: RandomRange,
    ) -> Result<Self, String> {
        population.validate()?;
        if bounds.width < population.max_size || bounds.height < population.max_size {
            return Err(format!(
                "Canvas {}x{} is smaller than the largest bouncer ({})",
                bounds.width, bounds.height, population.max_size
            ));
        }
        if assets.images().is_empty() {
            log::warn!("Image pool is empty, bouncers will be drawn as plain rectangles");
        }

        let mut sim = Self {
            bouncers: Vec::with_capacity(population.count),
            assets,
            rng,
            time_ticks: 0,
        };
        sim.create_bouncers(&population, bounds);
        Ok(sim)
    }

    /// Wrap an explicit population (fixed from here on)
    pub fn from_bouncers(bouncers: Vec<Bouncer>, assets: AssetPool, rng: RandomRange) -> Self {
        Self {
            bouncers,
            assets,
            rng,
            time_ticks: 0,
        }
    }

    fn create_bouncers(&mut self, population: &Population, bounds: Extent) {
        for _ in 0..population.count {
            let size = self
                .rng
                .next_in_range(population.min_size, population.max_size);
            let center = IVec2::new(
                self.rng.next_in_range(size / 2, bounds.width - size / 2),
                self.rng.next_in_range(size / 2, bounds.height - size / 2),
            );
            let velocity = IVec2::new(
                self.rng
                    .next_non_zero_in_range(-population.max_velocity, population.max_velocity),
                self.rng
                    .next_non_zero_in_range(-population.max_velocity, population.max_velocity),
            );
            let image = self.random_image();
            self.bouncers
                .push(Bouncer::new(center, Extent::square(size), velocity, image));
        }
    }

    pub fn bouncers(&self) -> &[Bouncer] {
        &self.bouncers
    }

    pub(crate) fn bouncers_mut(&mut self) -> &mut [Bouncer] {
        &mut self.bouncers
    }

    pub fn assets(&self) -> &AssetPool {
        &self.assets
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Uniformly chosen image, `None` if the pool has none
    pub fn random_image(&mut self) -> Option<ImageId> {
        self.rng.pick(self.assets.images().len()).map(ImageId)
    }

    /// Uniformly chosen sound, `None` if the pool has none
    pub fn random_sound(&mut self) -> Option<SoundId> {
        self.rng.pick(self.assets.sounds().len()).map(SoundId)
    }

    /// Index of the topmost (last painted) bouncer containing `point`
    pub fn bouncer_at(&self, point: IVec2) -> Option<usize> {
        self.bouncers.iter().rposition(|b| b.intersects(point))
    }

    /// Draw every bouncer in collection order
    pub fn paint(&self, surface: &mut dyn Surface) {
        for bouncer in &self.bouncers {
            bouncer.paint(surface, &self.assets);
        }
    }
}
