use glam::{Vec2, Vec3};

use super::producer::{decode_samples, HeightPassProducer};
use super::zdata::{Bracket, ZData, NO_ROOM};
use crate::error::{ZmapError, ZmapResult};
use crate::surface::{Aabb, Region, Surface};

/// Fraction of the bounds added around the mapped area.
pub const DEFAULT_PADDING: f32 = 0.1;

/// Quantization levels of a height sample within one pass.
const HEIGHT_LEVELS: f32 = 255.0;

/// Multi-layer height field over a grid on the world XZ plane (Y is up).
///
/// Each cell holds the layers captured from the producer, sorted by height.
/// Built once, then only read.
#[derive(Debug, Clone)]
pub struct Zmap {
    x_res: usize,
    y_res: usize,
    width: f32,
    depth: f32,
    center: Vec2,
    columns: Vec<Vec<ZData>>,
}

impl Zmap {
    /// Grid of `x_res × y_res` cells covering `width` (world X) by `depth`
    /// (world Z) around the origin, each grown by `padding`.
    pub fn new(x_res: usize, y_res: usize, width: f32, depth: f32, padding: f32) -> ZmapResult<Self> {
        if x_res == 0 || y_res == 0 {
            return Err(ZmapError::InvalidResolution { x: x_res, y: y_res });
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(width) || !positive(depth) || !positive(1.0 + padding) {
            return Err(ZmapError::InvalidExtent { width, depth });
        }
        Ok(Self {
            x_res,
            y_res,
            width: width * (1.0 + padding),
            depth: depth * (1.0 + padding),
            center: Vec2::ZERO,
            columns: vec![Vec::new(); x_res * y_res],
        })
    }

    /// Grid sized and centered on a model's bounding box.
    pub fn from_bounds(x_res: usize, y_res: usize, bounds: &Aabb, padding: f32) -> ZmapResult<Self> {
        let extents = bounds.extents();
        let center = bounds.center();
        Ok(Self::new(x_res, y_res, extents.x, extents.z, padding)?
            .with_center(Vec2::new(center.x, center.z)))
    }

    pub fn with_center(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.x_res, self.y_res)
    }

    /// Padded extents along world X and Z.
    pub fn extents(&self) -> Vec2 {
        Vec2::new(self.width, self.depth)
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(self.width / self.x_res as f32, self.depth / self.y_res as f32)
    }

    /// World point of the middle of cell `(xi, yi)` at height `y`.
    pub fn cell_center(&self, xi: usize, yi: usize, y: f32) -> Vec3 {
        let cell = self.cell_size();
        let x = self.center.x - 0.5 * self.width + (xi as f32 + 0.5) * cell.x;
        let z = self.center.y - 0.5 * self.depth + (yi as f32 + 0.5) * cell.y;
        Vec3::new(x, y, z)
    }

    /// Fractional grid coordinates of a world point.
    pub fn grid_coords(&self, point: Vec3) -> Vec2 {
        Vec2::new(
            self.x_res as f32 * ((point.x - self.center.x) / self.width + 0.5),
            self.y_res as f32 * ((point.z - self.center.y) / self.depth + 0.5),
        )
    }

    pub fn column(&self, xi: i64, yi: i64) -> Option<&[ZData]> {
        if xi < 0 || yi < 0 || xi as usize >= self.x_res || yi as usize >= self.y_res {
            return None;
        }
        self.columns
            .get(yi as usize * self.x_res + xi as usize)
            .map(Vec::as_slice)
    }

    pub fn layer_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Ingests one height pass covering `frame_z - z_step ..= frame_z`.
    /// Returns the number of layers added.
    ///
    /// Room-0 samples are dropped, as are samples within one quantization
    /// step of a layer already in their column.
    pub fn add_layer(&mut self, feed: &[u8], frame_z: f32, z_step: f32) -> ZmapResult<usize> {
        let samples = decode_samples(feed)?;
        if samples.len() != self.columns.len() {
            return Err(ZmapError::FeedSize {
                expected: self.columns.len(),
                got: samples.len(),
            });
        }

        let voxel = z_step / HEIGHT_LEVELS;
        let mut added = 0;
        for (column, sample) in self.columns.iter_mut().zip(samples) {
            if sample.room_id == NO_ROOM {
                continue;
            }
            let z = z_step * f32::from(sample.height) / HEIGHT_LEVELS + frame_z - z_step;
            let at = column.partition_point(|l| l.z < z);
            let near = |l: &ZData| (l.z - z).abs() <= voxel;
            if at.checked_sub(1).and_then(|i| column.get(i)).is_some_and(near)
                || column.get(at).is_some_and(near)
            {
                continue;
            }
            column.insert(at, ZData::new(z, sample.room_id));
            added += 1;
        }
        log::debug!("height pass at z={frame_z}: {added} layers added");
        Ok(added)
    }

    /// Captures `n_steps` passes bottom-up over `z_min..=z_max`.
    pub fn populate<P: HeightPassProducer + ?Sized>(
        &mut self,
        producer: &mut P,
        z_min: f32,
        z_max: f32,
        n_steps: u32,
    ) -> ZmapResult<usize> {
        if n_steps == 0 {
            return Ok(0);
        }
        let z_step = (z_max - z_min) / n_steps as f32;
        let mut total = 0;
        for i in 1..=n_steps {
            let frame_z = z_min + i as f32 * z_step;
            let feed = producer.capture(frame_z, z_step);
            total += self.add_layer(&feed, frame_z, z_step)?;
        }
        log::debug!(
            "zmap {}x{} populated with {total} layers",
            self.x_res,
            self.y_res
        );
        Ok(total)
    }

    /// Floor at or below `height + step` and the ceiling above it, in one
    /// cell. Out-of-grid and empty cells give the sentinel pair.
    pub fn z_data_discrete(&self, height: f32, xi: i64, yi: i64, step: f32) -> Bracket {
        let Some(column) = self.column(xi, yi) else {
            return Bracket::unbounded();
        };
        let level = height + step;
        let above = column.partition_point(|l| l.z <= level);
        let floor = above
            .checked_sub(1)
            .map_or(ZData::floor(), |i| column[i]);
        let ceiling = column.get(above).copied().unwrap_or(ZData::ceiling());
        Bracket::new(floor, ceiling)
    }

    /// Interpolated floor and ceiling under a world point. Room ids come from
    /// the cell containing the point.
    pub fn z_data(&self, point: Vec3, step: f32) -> Bracket {
        let grid = self.grid_coords(point);
        // the base cell must be in the grid, or one to its left/front
        let span = Vec2::new(self.x_res as f32, self.y_res as f32);
        if !grid.is_finite() || grid.cmplt(Vec2::splat(-1.0)).any() || grid.cmpge(span).any() {
            return Bracket::unbounded();
        }
        let base = grid.floor();
        let (fx, fy) = (grid.x - base.x, grid.y - base.y);
        let (x0, y0) = (base.x as i64, base.y as i64);
        let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

        let b11 = self.z_data_discrete(point.y, x0, y0, step);
        let b21 = self.z_data_discrete(point.y, x1, y0, step);
        let b12 = self.z_data_discrete(point.y, x0, y1, step);
        let b22 = self.z_data_discrete(point.y, x1, y1, step);

        let floor = quad_interpolate(fx, fy, [b11.floor.z, b21.floor.z, b12.floor.z, b22.floor.z]);
        let ceiling = quad_interpolate(
            fx,
            fy,
            [b11.ceiling.z, b21.ceiling.z, b12.ceiling.z, b22.ceiling.z],
        );
        Bracket::new(
            ZData::new(floor, b11.floor.room_id),
            ZData::new(ceiling, b11.ceiling.room_id),
        )
    }

    pub fn room(&self, point: Vec3) -> u8 {
        self.z_data(point, 0.0).floor.room_id
    }
}

/// Height on the plane through three corners of a unit quad.
///
/// Corners are `[z11, z21, z12, z22]` at `(0,0)`, `(1,0)`, `(0,1)`, `(1,1)`.
/// The quad is split along its diagonal; `x > y` uses the lower-right
/// triangle. Sentinel corners take the value of `z11`, and a sentinel `z11`
/// is returned as is.
fn quad_interpolate(x: f32, y: f32, corners: [f32; 4]) -> f32 {
    let z11 = corners[0];
    if !z11.is_finite() {
        return z11;
    }
    let [_, z21, z12, z22] = corners.map(|z| if z.is_finite() { z } else { z11 });
    if x > y {
        z11 + (z21 - z11) * x + (z22 - z21) * y
    } else {
        z11 + (z22 - z12) * x + (z12 - z11) * y
    }
}

impl Surface for Zmap {
    /// The move is split into a horizontal leg at the start height and a
    /// vertical leg at the destination. Blocked when either end has no
    /// room, when the horizontal leg changes room, or when moving vertically
    /// at either end column changes the floor underfoot.
    fn crosses_surface(&self, first: Vec3, second: Vec3) -> bool {
        let start = self.z_data(first, 0.0).floor;
        let end = self.z_data(second, 0.0).floor;
        if !start.has_room() || !end.has_room() {
            return true;
        }
        let across = self.z_data(Vec3::new(second.x, first.y, second.z), 0.0).floor;
        let lifted = self.z_data(Vec3::new(first.x, second.y, first.z), 0.0).floor;
        across.room_id != start.room_id || across != end || lifted != start
    }

    fn kind(&self) -> &'static str {
        "zmap"
    }
}

impl Region for Zmap {
    fn inside_region(&self, point: Vec3) -> bool {
        self.room(point) != NO_ROOM
    }
}
