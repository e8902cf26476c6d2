//! Fixed timestep simulation tick
//!
//! One tick moves every bouncer once against the current canvas bounds.

use serde::{Deserialize, Serialize};

use super::collision::Wall;
use super::state::{Extent, Simulation};

/// A bouncer crossed a canvas edge during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallHit {
    /// Index of the bouncer in collection order
    pub bouncer: usize,
    pub wall: Wall,
}

/// Advance every bouncer by one step, in collection order.
///
/// Bouncers do not interact, so the resulting state does not depend on the
/// order; only the order of the returned events does.
pub fn tick(sim: &mut Simulation, bounds: Extent) -> Vec<WallHit> {
    let mut hits = Vec::new();
    for (index, bouncer) in sim.bouncers_mut().iter_mut().enumerate() {
        let wrap = bouncer.update(bounds);
        if !wrap.hit() {
            continue;
        }
        hits.extend(wrap.walls.iter().flatten().map(|&wall| WallHit {
            bouncer: index,
            wall,
        }));
    }
    sim.time_ticks += 1;
    hits
}

impl Simulation {
    /// Advance one tick against `bounds`, see [`tick`]
    pub fn update(&mut self, bounds: Extent) -> Vec<WallHit> {
        tick(self, bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetPool;
    use crate::sim::random::RandomRange;
    use crate::sim::state::{Bouncer, Population};
    use glam::IVec2;
    use proptest::prelude::*;

    const CANVAS: Extent = Extent::new(600, 600);

    fn single(center: IVec2, size: i32, velocity: IVec2) -> Simulation {
        Simulation::from_bouncers(
            vec![Bouncer::new(center, Extent::square(size), velocity, None)],
            AssetPool::default(),
            RandomRange::new(0),
        )
    }

    #[test]
    fn test_one_step_translates() {
        let mut sim = single(IVec2::new(300, 300), 40, IVec2::new(5, 5));
        let hits = sim.update(CANVAS);
        assert!(hits.is_empty());
        assert_eq!(sim.bouncers()[0].center(), IVec2::new(305, 305));
        assert_eq!(sim.time_ticks, 1);
    }

    #[test]
    fn test_left_exit_wraps_to_width_minus_21() {
        let mut sim = single(IVec2::new(300, 300), 40, IVec2::new(-5, 0));
        // 56 steps land exactly on the radius (still inside), the 57th drops below it
        for _ in 0..56 {
            assert!(sim.update(CANVAS).is_empty());
        }
        assert_eq!(sim.bouncers()[0].center().x, 20);
        let hits = sim.update(CANVAS);
        assert_eq!(sim.bouncers()[0].center().x, 579);
        assert_eq!(
            hits,
            vec![WallHit {
                bouncer: 0,
                wall: Wall::Left
            }]
        );
    }

    #[test]
    fn test_velocity_and_size_survive_wrap() {
        let mut sim = single(IVec2::new(22, 22), 40, IVec2::new(-7, -9));
        sim.update(CANVAS);
        let b = &sim.bouncers()[0];
        assert_eq!(b.velocity(), IVec2::new(-7, -9));
        assert_eq!(b.size(), Extent::square(40));
        assert_eq!(b.center(), IVec2::new(579, 621));
    }

    #[test]
    fn test_shrinking_canvas_is_picked_up() {
        let mut sim = single(IVec2::new(500, 100), 20, IVec2::new(1, 1));
        sim.update(Extent::new(400, 400));
        assert_eq!(sim.bouncers()[0].center(), IVec2::new(11, 101));
    }

    #[test]
    fn test_determinism() {
        let make = || {
            Simulation::with_assets(
                CANVAS,
                AssetPool::default(),
                Population::default(),
                RandomRange::new(31337),
            )
            .unwrap()
        };
        let mut a = make();
        let mut b = make();
        for _ in 0..500 {
            assert_eq!(a.update(CANVAS), b.update(CANVAS));
        }
        assert_eq!(a.bouncers(), b.bouncers());
    }

    proptest! {
        #[test]
        fn prop_wrap_envelope(
            seed in any::<u64>(),
            width in 100i32..1200,
            height in 100i32..1200,
            steps in 1usize..400,
        ) {
            let bounds = Extent::new(width, height);
            let mut sim = Simulation::with_assets(
                bounds,
                AssetPool::default(),
                Population::default(),
                RandomRange::new(seed),
            )
            .unwrap();
            let before: Vec<_> = sim.bouncers().iter().map(|b| (b.size(), b.velocity())).collect();

            for _ in 0..steps {
                sim.update(bounds);
                for (b, (size, velocity)) in sim.bouncers().iter().zip(&before) {
                    prop_assert_eq!(b.size(), *size);
                    prop_assert_eq!(b.velocity(), *velocity);

                    let rx = size.width / 2;
                    let ry = size.height / 2;
                    let c = b.center();
                    prop_assert!(c.x >= rx && c.x <= width - rx);
                    prop_assert!((c.y >= ry && c.y <= height - ry) || c.y == height + ry + 1);
                }
            }
        }
    }
}
