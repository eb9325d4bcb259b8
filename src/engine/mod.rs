//! Numeric core: rays, portal traversal, projection and shading.

pub mod math;
pub mod projection;
pub mod ray;
pub mod shading;
pub mod visibility;

pub use projection::{Extent, Screen};
pub use ray::{EDGE_LIM, Intersection, Ray};
pub use visibility::{Hit, WallHit, first_hit, nearest_wall};
