//! HTTP handlers.

mod fallback;
mod predict;
mod status;

pub use fallback::{not_found_handler, panic_response, rewrite_rejections};
pub use predict::{batch_handler, predict_handler};
pub use status::{index_handler, init_handler, status_handler};
