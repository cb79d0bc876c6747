use glam::Vec3;
use std::fmt::Debug;

/// Halvings used by [`Surface::crossing_location`]; 1/256 of the segment.
const CROSSING_REFINEMENTS: u32 = 8;

/// A stateless boundary answering whether a straight segment crosses it.
/// Points are in the surface's local frame.
pub trait Surface: Send + Sync + Debug {
    fn crosses_surface(&self, first: Vec3, second: Vec3) -> bool;

    /// Fraction along `first → second` where the segment first crosses, or
    /// `None` when it does not. Found by bisecting the segment parameter.
    fn crossing_location(&self, first: Vec3, second: Vec3) -> Option<f32> {
        if !self.crosses_surface(first, second) {
            return None;
        }
        let (mut clear, mut blocked) = (0.0_f32, 1.0_f32);
        for _ in 0..CROSSING_REFINEMENTS {
            let mid = 0.5 * (clear + blocked);
            if self.crosses_surface(first, first.lerp(second, mid)) {
                blocked = mid;
            } else {
                clear = mid;
            }
        }
        Some(blocked)
    }

    fn kind(&self) -> &'static str;

    /// Whether this surface can be the fixed side of a pairwise test.
    fn is_boundary(&self) -> bool {
        true
    }
}

/// A surface that splits space into inside and outside.
pub trait Region: Surface {
    fn inside_region(&self, point: Vec3) -> bool;
}

/// Crossing rule shared by regions: the endpoints disagree on membership.
pub fn region_crossing<R: Region + ?Sized>(region: &R, first: Vec3, second: Vec3) -> bool {
    region.inside_region(first) != region.inside_region(second)
}
