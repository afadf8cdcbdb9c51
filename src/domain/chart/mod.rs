//! Chart aggregate: render configuration, trace model, layout and the
//! renderer capability.

pub mod layout;
pub mod renderer;
pub mod traces;
pub mod value_objects;

pub use layout::*;
pub use renderer::*;
pub use traces::*;
pub use value_objects::*;
