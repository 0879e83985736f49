pub mod phase;
pub mod reading;
pub mod window;

pub use phase::*;
pub use reading::*;
pub use window::*;
