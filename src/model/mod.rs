pub mod clause;
pub mod common;
pub mod contract;
pub mod document;
pub mod field;
pub mod template;

pub use clause::*;
pub use common::*;
pub use contract::*;
pub use document::*;
pub use field::*;
pub use template::*;
