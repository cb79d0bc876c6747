//! Layered height field for floor, ceiling and room queries.
//!
//! The map is filled once from rasterized height passes and read-only
//! afterwards. Lookups outside the grid or over empty cells never fail; they
//! answer with the floor/ceiling sentinels and room [`NO_ROOM`].

mod grid;
mod navigation;
mod producer;
mod zdata;

pub use grid::{Zmap, DEFAULT_PADDING};
pub use navigation::{NavStep, NavigationConfig, Travel};
pub use producer::{decode_samples, encode_samples, HeightPassProducer, HeightSample};
pub use zdata::{Bracket, ZData, NO_ROOM};
