//! Shared configuration handling.
//!
//! Hosts the pieces used by whichever front end drives the core: loading a
//! link parameter file from disk and validating a parameter set before it is
//! handed to the physics engine.

pub mod config;

pub use config::{ConfigLoadError, load_parameters, validate_parameters};
