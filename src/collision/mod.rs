mod info;
mod pair;
mod tracker;

pub use info::{CollisionInfo, EdgeCollision};
pub use pair::{CollisionPair, PairwiseCollision};
pub use tracker::{CollisionEvent, CollisionTracker};
