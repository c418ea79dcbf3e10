pub mod compositor;
pub mod constants;
mod library;
mod session;
mod surface;
mod transform;
mod types;

#[cfg(test)]
mod testutil;

pub use compositor::{page_count, stamp_all_pages, stamp_page};
pub use library::{StampAsset, StampId, StampLibrary};
pub use session::{DocumentHandle, EditSession, PlacementRecord};
pub use surface::{PlacedStamp, SurfaceController};
pub use transform::{clamp_to_page, default_placement, to_page_space};
pub use types::*;
