//! # Communications interface crate.
//!
//! Provides the interfaces shared between the drive executable and whatever
//! commands it: telecommands going in, equipment demands going out to the
//! actuation layer.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod tc;

/// Demand and sensor data definitions for equipment (drive motors, pneumatics)
pub mod eqpt;
