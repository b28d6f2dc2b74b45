pub mod highlight;
pub mod lightbox;
pub mod luck;
pub mod map;
pub mod markdown;
pub mod scroll;
pub mod session;
pub mod template;
pub mod window;

pub use highlight::*;
pub use lightbox::*;
pub use luck::*;
pub use map::*;
pub use markdown::*;
pub use scroll::*;
pub use session::*;
pub use template::*;
pub use window::*;
