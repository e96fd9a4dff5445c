//! Projecting bones from one hierarchy onto another.

pub mod description;
pub mod path_matcher;

pub use description::resolve_description;
pub use path_matcher::{find_by_path, find_equivalent};
