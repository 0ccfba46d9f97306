pub mod render;
pub mod select;

pub use render::draw;
