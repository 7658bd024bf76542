//! Heroes and their attributes.

pub mod attributes;
pub mod hero;

pub use attributes::{AttributeType, Attributes};
pub use hero::{Hero, HeroClass, HeroTemplate};
