//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Environment variable holding the root directory of the drive software.
///
/// Parameter files, scripts, trajectories and sessions are all found relative
/// to this directory.
pub const SW_ROOT_ENV_VAR: &str = "DRIVE_SW_ROOT";

/// Get the software root directory.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
