//! Wall handling for bouncers
//!
//! A bouncer that crosses a canvas edge is repositioned, its velocity is left
//! alone. The rule is applied per axis on the already-translated center.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::state::Extent;

/// Canvas edge a bouncer crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

/// Result of applying the wall rule to a center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrap {
    pub center: IVec2,
    /// Walls crossed this step (horizontal, vertical)
    pub walls: [Option<Wall>; 2],
}

impl Wrap {
    pub fn hit(&self) -> bool {
        self.walls.iter().any(Option::is_some)
    }

    #[cfg(test)]
    pub fn crossed(&self, wall: Wall) -> bool {
        self.walls.contains(&Some(wall))
    }
}

/// Reposition `center` of a sprite of `size` against `bounds`.
///
/// Horizontal: left of `radius` lands at `width - radius - 1`, right of
/// `width - radius` lands at `radius + 1`.
/// Vertical: above `radius` lands at `height + radius + 1` (just past the
/// bottom edge, it is picked up by the bottom rule next step), below
/// `height - radius` lands at `radius + 1`.
pub fn wrap_to_bounds(center: IVec2, size: Extent, bounds: Extent) -> Wrap {
    let mut out = center;

    let radius = size.width / 2;
    let horizontal = if out.x < radius {
        out.x = bounds.width - radius - 1;
        Some(Wall::Left)
    } else if out.x > bounds.width - radius {
        out.x = radius + 1;
        Some(Wall::Right)
    } else {
        None
    };

    let radius = size.height / 2;
    let vertical = if out.y < radius {
        out.y = bounds.height + radius + 1;
        Some(Wall::Top)
    } else if out.y > bounds.height - radius {
        out.y = radius + 1;
        Some(Wall::Bottom)
    } else {
        None
    };

    Wrap {
        center: out,
        walls: [horizontal, vertical],
    }
}

/// Inclusive point-in-rectangle test on edge coordinates
#[inline]
pub fn rect_contains(left: i32, top: i32, right: i32, bottom: i32, point: IVec2) -> bool {
    left <= point.x && point.x <= right && top <= point.y && point.y <= bottom
}
