pub mod bounds;
pub mod coords;
pub mod geo;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use coords::*;
pub use geo::*;
pub use time::*;
