use glam::Vec3;

use super::grid::Zmap;

#[derive(Debug, Clone, Copy)]
pub struct NavigationConfig {
    /// Highest ledge a mover steps up, and deepest drop it follows down.
    pub max_step: f32,
    /// Headroom the mover needs between floor and ceiling.
    pub min_gap: f32,
    /// Width probed sideways when the direct path is blocked.
    pub clearance_width: f32,
    pub max_iterations: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_step: 0.2,
            min_gap: 1.8,
            clearance_width: 0.5,
            max_iterations: 3,
        }
    }
}

impl NavigationConfig {
    pub fn new(max_step: f32, min_gap: f32) -> Self {
        Self {
            max_step,
            min_gap,
            ..Default::default()
        }
    }

    pub fn with_clearance_width(mut self, width: f32) -> Self {
        self.clearance_width = width;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }
}

/// Result of [`Zmap::find_max_travel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Travel {
    pub position: Vec3,
    pub iterations: u32,
    /// At least one halved step was rejected.
    pub blocked: bool,
}

/// Result of [`Zmap::new_position`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavStep {
    pub position: Vec3,
    /// No floor within `max_step` below the destination; height was kept.
    pub freefall: bool,
    /// The direct move was blocked and the result comes from side probes.
    pub deflected: bool,
}

impl NavStep {
    fn stay(position: Vec3) -> Self {
        Self {
            position,
            freefall: false,
            deflected: false,
        }
    }
}

impl Zmap {
    fn walkable(&self, point: Vec3, config: &NavigationConfig) -> Option<f32> {
        let bracket = self.z_data(point, config.max_step);
        (bracket.floor.has_room() && bracket.gap() >= config.min_gap).then_some(bracket.floor.z)
    }

    /// Walks `delta` in halving steps: half, then a quarter, and so on for
    /// `max_iterations` steps. Each accepted step snaps to the floor; a
    /// rejected one is skipped and the next, shorter step is tried from the
    /// same place.
    pub fn find_max_travel(&self, current: Vec3, delta: Vec3, config: &NavigationConfig) -> Travel {
        let mut position = current;
        let mut step = delta;
        let mut blocked = false;
        for _ in 0..config.max_iterations {
            step *= 0.5;
            match self.walkable(position + step, config) {
                Some(floor) => {
                    position = Vec3::new(position.x + step.x, floor, position.z + step.z);
                }
                None => blocked = true,
            }
        }
        Travel {
            position,
            iterations: config.max_iterations,
            blocked,
        }
    }

    /// One navigation step from `current` by the horizontal `delta`.
    ///
    /// A walkable destination is taken directly and snapped to its floor,
    /// unless that floor lies more than `max_step` below, in which case the
    /// height is kept and the step is flagged as freefall. A blocked
    /// destination probes half the clearance width to each side and blends
    /// the two results, steering the mover off walls.
    pub fn new_position(&self, current: Vec3, delta: Vec3, config: &NavigationConfig) -> NavStep {
        if delta.length_squared() == 0.0 {
            return NavStep::stay(current);
        }

        if let Some(floor) = self.walkable(current + delta, config) {
            let freefall = current.y - config.max_step > floor;
            if freefall {
                log::debug!("no floor within {} below {current}", config.max_step);
            }
            let y = if freefall { current.y } else { floor };
            return NavStep {
                position: Vec3::new(current.x + delta.x, y, current.z + delta.z),
                freefall,
                deflected: false,
            };
        }

        let perp = Vec3::new(-delta.z, 0.0, delta.x);
        let reach = perp.length();
        if reach == 0.0 || config.clearance_width <= 0.0 {
            return NavStep::stay(current);
        }
        let probe = perp * (0.5 * config.clearance_width / reach);
        let left = self.find_max_travel(current, probe, config).position;
        let right = self.find_max_travel(current, -probe, config).position;
        NavStep {
            position: (left + right - 2.0 * current) * reach / config.clearance_width + current,
            freefall: false,
            deflected: true,
        }
    }
}
