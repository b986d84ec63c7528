//! Command handlers for CLI subcommands
//!
//! Each subcommand lives in its own module.

mod completions;
mod decode;
mod describe;
mod render;
pub mod utils;
mod validate;

pub use completions::handle_completions;
pub use decode::handle_decode;
pub use describe::handle_describe;
pub use render::handle_render;
pub use validate::handle_validate;
