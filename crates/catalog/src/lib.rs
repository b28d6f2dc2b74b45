pub mod error;
pub mod load;
pub mod photo;
pub mod storage;
pub mod story;

pub use error::*;
pub use load::*;
pub use photo::*;
pub use storage::*;
pub use story::*;
