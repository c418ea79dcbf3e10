pub mod library;
pub mod surface;

pub use library::show_library;
pub use surface::{SurfaceTextures, show_surface};
