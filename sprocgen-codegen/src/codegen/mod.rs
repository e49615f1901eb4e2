//! C# entity class generation

mod block;
mod entity_generator;
pub mod method_generator;
mod naming;
pub mod prefix_handler;
pub mod property_generator;
pub mod relationship_generator;
mod type_mapper;

pub use block::Block;
pub use entity_generator::*;
pub use naming::*;
pub use relationship_generator::{NavigationKind, NavigationProperty};
pub use type_mapper::*;
