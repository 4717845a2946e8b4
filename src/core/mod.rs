/*!
# Core Module

Core functionality shared by every stage: error types, property paths
and file helpers used by the fragment and configuration loaders.
*/

pub mod errors;
pub mod fs_utils;
pub mod path;

pub use errors::{LensError, LensResult};
pub use fs_utils::{read_data_file, read_text_file, DataFormat};
pub use path::{PathRoot, PropertyPath};
