pub mod clauses;
pub mod compose;
pub mod contracts;
pub mod registry;
pub mod render;
pub mod validate;

pub use clauses::*;
pub use compose::*;
pub use contracts::*;
pub use registry::*;
pub use render::*;
pub use validate::*;
