pub mod cache;
pub mod config;
pub mod error;
pub mod provider;
pub mod queue;
pub mod resolver;

pub use cache::*;
pub use config::*;
pub use error::*;
pub use provider::*;
pub use queue::*;
pub use resolver::*;
