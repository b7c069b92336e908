//! Pneumatics module
//!
//! Owns the two compressors (each behind a current fault supervisor), the
//! cannon valve solenoid and the pressure indicator light.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;
use crate::fault_sup::FaultSupError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur in the pneumatics module.
#[derive(Debug, thiserror::Error)]
pub enum PneumaticsError {
    #[error("Fire time must be positive, got {0} s")]
    InvalidFireTime(f64),

    #[error("Light flash period must be positive, got {0} s")]
    InvalidFlashPeriod(f64),

    #[error("Invalid compressor supervisor: {0}")]
    FaultSupError(#[from] FaultSupError),

    #[error("Cannot fire while the previous shot is still in progress")]
    AlreadyFiring,
}
