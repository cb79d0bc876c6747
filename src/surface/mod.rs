mod mesh;
mod primitives;
mod region;

pub use mesh::{Aabb, MeshSurface, ModelSource, TriangleMesh};
pub use primitives::{Ellipsoid, HalfSpace};
pub use region::{region_crossing, Region, Surface};
