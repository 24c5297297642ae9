//! TOML config file loading and rendering.

mod loader;
mod render;


pub use loader::{default_config_path, load_default, load_from_path, load_or_default};
pub use render::to_toml;
