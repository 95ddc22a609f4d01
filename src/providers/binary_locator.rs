use std::path::PathBuf;

use crate::{error::LocatorError, models::binary_descriptor::BinaryDescriptor};

pub trait BinaryLocator {
    /// Path and URL for the current platform, whether or not a binary exists yet.
    fn descriptor(&self) -> &BinaryDescriptor;

    /// With `validate`, fails unless a usable binary is already at the path.
    fn get_binary_path(&self, validate: bool) -> Result<PathBuf, LocatorError>;
}
