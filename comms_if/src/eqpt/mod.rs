//! # Equipment Interface
//!
//! This module defines the interface structures which are sent to, and received from, the
//! actuation layer.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod drive;
pub mod pneu;
