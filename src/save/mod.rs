pub mod json;

pub use json::{load_or_create, load_player, save_path, save_player};
