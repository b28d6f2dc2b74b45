pub mod config;
pub mod layout;
pub mod measure;

pub use config::*;
pub use layout::*;
pub use measure::*;
