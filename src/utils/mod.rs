//! # Utilities Module
//!
//! Vector math, polygon overlap and time sources shared by the simulation.

pub mod clock;
pub mod math;

pub use clock::*;
pub use math::*;
