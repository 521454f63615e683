// Diagram model and the DrugCheck architecture definition

pub mod architecture;
pub mod graph;
pub mod style;

pub use architecture::drugcheck_architecture;
pub use graph::*;
pub use style::{Attrs, Shape, Stereotype};
