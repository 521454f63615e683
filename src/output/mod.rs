// Output generation module

pub mod dot;
pub mod render;

pub use dot::*;
pub use render::*;
