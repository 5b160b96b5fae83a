//! Text rendering of the game grid

pub mod text;

pub use text::render_text;
