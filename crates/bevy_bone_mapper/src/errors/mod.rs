mod asset_error;
mod mapping_error;

pub use asset_error::*;
pub use mapping_error::*;
