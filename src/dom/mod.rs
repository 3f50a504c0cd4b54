//! Browser DOM utilities.

mod scrollable;

pub use scrollable::{mask_image, EdgeArrival, ScrollMetrics, DEFAULT_FADE_THICKNESS};

#[cfg(target_arch = "wasm32")]
pub use scrollable::Scrollable;
