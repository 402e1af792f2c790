//! Link parameter loading, parsing, and validation.
//!
//! Parameter files are JSON documents deserializing into
//! [`LinkParameters`]. Loading validates before returning: values the
//! physics formulas cannot accept (zero or negative conductivity,
//! frequency, distance, geometry, capacity) are hard errors, while values
//! merely outside the recommended operating envelope are accepted with a
//! warning, since the formulas remain defined there.

use anyhow::Context;
use std::fs;
use std::ops::RangeInclusive;

use crate::simulation::types::LinkParameters;

/// Error type for parameter-file loading failures.
#[derive(Debug)]
pub enum ConfigLoadError {
    FileReadError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::FileReadError(msg) => write!(f, "Failed to read file: {}", msg),
            ConfigLoadError::ParseError(msg) => write!(f, "Failed to parse JSON: {}", msg),
            ConfigLoadError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigLoadError {}

// Recommended operating envelope. Matches the ranges the parameter controls
// expose; outside them the model is extrapolating and results get a warning.
const FREQUENCY_ENVELOPE_HZ: RangeInclusive<f64> = 5_000.0..=50_000.0;
const CONDUCTIVITY_ENVELOPE: RangeInclusive<f64> = 0.05..=2.0;
const DISTANCE_ENVELOPE_M: RangeInclusive<f64> = 0.5..=3.0;
const TX_CURRENT_ENVELOPE_A: RangeInclusive<f64> = 0.1..=2.0;
const TX_DIAMETER_ENVELOPE_CM: RangeInclusive<f64> = 10.0..=50.0;
const RX_DIAMETER_ENVELOPE_CM: RangeInclusive<f64> = 10.0..=60.0;
const TX_TURNS_ENVELOPE: RangeInclusive<u32> = 5..=40;
const RX_TURNS_ENVELOPE: RangeInclusive<u32> = 10..=60;

/// Load and validate a link parameter file.
///
/// # Parameters
///
/// * `path` - Path to the parameter JSON file
///
/// # Returns
///
/// Parsed and validated parameters or an error describing what failed.
pub fn load_parameters(path: &str) -> Result<LinkParameters, ConfigLoadError> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path))
        .map_err(|e| ConfigLoadError::FileReadError(e.to_string()))?;

    let params: LinkParameters = serde_json::from_str(&data)
        .context("Invalid JSON format")
        .map_err(|e| ConfigLoadError::ParseError(e.to_string()))?;

    validate_parameters(&params).map_err(ConfigLoadError::ValidationError)?;

    Ok(params)
}

/// Validate a parameter set before evaluation.
///
/// Enforces the physics engine's preconditions: every continuous input must
/// be strictly positive and finite, and both windings need at least one
/// turn. Unknown wire gauges pass validation; the wire table substitutes the
/// fallback entry for them at evaluation time.
///
/// # Returns
///
/// `Ok(())` if the set is evaluable, `Err(String)` naming the offending
/// field and value otherwise.
pub fn validate_parameters(params: &LinkParameters) -> Result<(), String> {
    let positive_fields = [
        ("ground_conductivity", params.ground_conductivity),
        ("carrier_frequency", params.carrier_frequency),
        ("tx_current", params.tx_current),
        ("separation_distance", params.separation_distance),
        ("target_bit_rate", params.target_bit_rate),
        ("tx_loop_diameter", params.tx_loop_diameter),
        ("rx_loop_diameter", params.rx_loop_diameter),
        ("battery_capacity", params.battery_capacity),
    ];
    for (name, value) in positive_fields {
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("Field '{}' must be strictly positive, got {}", name, value));
        }
    }

    if params.tx_turns == 0 {
        return Err("Field 'tx_turns' must be at least 1".to_string());
    }
    if params.rx_turns == 0 {
        return Err("Field 'rx_turns' must be at least 1".to_string());
    }

    warn_outside_envelope(params);

    Ok(())
}

// Accepted-but-extrapolating checks, logged so an implausible file is
// visible without rejecting it.
fn warn_outside_envelope(params: &LinkParameters) {
    if !FREQUENCY_ENVELOPE_HZ.contains(&params.carrier_frequency) {
        log::warn!(
            "carrier_frequency {} Hz outside recommended envelope ({} to {} Hz)",
            params.carrier_frequency,
            FREQUENCY_ENVELOPE_HZ.start(),
            FREQUENCY_ENVELOPE_HZ.end()
        );
    }
    if !CONDUCTIVITY_ENVELOPE.contains(&params.ground_conductivity) {
        log::warn!(
            "ground_conductivity {} S/m outside recommended envelope ({} to {} S/m)",
            params.ground_conductivity,
            CONDUCTIVITY_ENVELOPE.start(),
            CONDUCTIVITY_ENVELOPE.end()
        );
    }
    if !DISTANCE_ENVELOPE_M.contains(&params.separation_distance) {
        log::warn!(
            "separation_distance {} m outside recommended envelope ({} to {} m)",
            params.separation_distance,
            DISTANCE_ENVELOPE_M.start(),
            DISTANCE_ENVELOPE_M.end()
        );
    }
    if !TX_CURRENT_ENVELOPE_A.contains(&params.tx_current) {
        log::warn!(
            "tx_current {} A outside recommended envelope ({} to {} A)",
            params.tx_current,
            TX_CURRENT_ENVELOPE_A.start(),
            TX_CURRENT_ENVELOPE_A.end()
        );
    }
    if !TX_DIAMETER_ENVELOPE_CM.contains(&params.tx_loop_diameter) {
        log::warn!("tx_loop_diameter {} cm outside recommended envelope", params.tx_loop_diameter);
    }
    if !RX_DIAMETER_ENVELOPE_CM.contains(&params.rx_loop_diameter) {
        log::warn!("rx_loop_diameter {} cm outside recommended envelope", params.rx_loop_diameter);
    }
    if !TX_TURNS_ENVELOPE.contains(&params.tx_turns) {
        log::warn!("tx_turns {} outside recommended envelope", params.tx_turns);
    }
    if !RX_TURNS_ENVELOPE.contains(&params.rx_turns) {
        log::warn!("rx_turns {} outside recommended envelope", params.rx_turns);
    }
}
