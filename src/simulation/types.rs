//! Type definitions for the simulation.
//!
//! Contains all data structures shared across the simulation core:
//! - Link parameters (the full physical and geometric input set)
//! - Derived link-budget metrics and per-loop electrical metrics
//! - Node operational states for the duty-cycle model
//! - Link viability verdicts

use serde::{Deserialize, Serialize};

/// Minimum SNR (dB) at which the FSK demodulator can decode the target
/// modulation. Link margin is reported relative to this threshold.
pub const DECODE_THRESHOLD_DB: f64 = 12.0;

/// SNR (dB) above which the link is considered solid rather than marginal.
pub const SOLID_THRESHOLD_DB: f64 = 20.0;

/// Complete input set for one link-budget evaluation.
///
/// The struct is an immutable snapshot: the control layer replaces it
/// wholesale on every edit and the engine derives everything else from it.
/// Equality over all fields is the cache key used by
/// [`LinkSimulation`](crate::simulation::engine::LinkSimulation) to decide
/// whether a re-evaluation is needed.
///
/// All values must be validated before evaluation, see
/// [`validate_parameters`](crate::common::config::validate_parameters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkParameters {
    /// Electrical conductivity of the muck gap in siemens per meter.
    /// Wet soil is typically 0.05 to 2.0 S/m.
    pub ground_conductivity: f64,
    /// Carrier frequency in hertz. The operating envelope is 5 to 50 kHz;
    /// lower frequencies penetrate the conductive gap better.
    pub carrier_frequency: f64,
    /// Peak transmit loop current in amperes. Also used as the proxy for
    /// transmit power draw in the battery model.
    pub tx_current: f64,
    /// Separation between transmit and receive loops in meters.
    pub separation_distance: f64,
    /// Target data rate in bits per second. Informational only; it feeds no
    /// physics formula and is carried for the presentation layer.
    pub target_bit_rate: f64,
    /// Transmit loop diameter in centimeters.
    pub tx_loop_diameter: f64,
    /// Receive loop diameter in centimeters.
    pub rx_loop_diameter: f64,
    /// Number of turns on the transmit loop.
    pub tx_turns: u32,
    /// Number of turns on the receive loop.
    pub rx_turns: u32,
    /// AWG wire gauge code for both loops. Codes outside the wire table
    /// resolve to the AWG 18 entry.
    pub wire_gauge: u32,
    /// Battery capacity in milliamp-hours.
    pub battery_capacity: f64,
}

impl Default for LinkParameters {
    /// The reference configuration: a 25 kHz link through 1.5 m of wet muck
    /// with matched 30 cm air-core loops and an 18650 cell.
    fn default() -> Self {
        Self {
            ground_conductivity: 0.5,
            carrier_frequency: 25_000.0,
            tx_current: 0.5,
            separation_distance: 1.5,
            target_bit_rate: 250.0,
            tx_loop_diameter: 30.0,
            rx_loop_diameter: 30.0,
            tx_turns: 20,
            rx_turns: 30,
            wire_gauge: 18,
            battery_capacity: 3500.0,
        }
    }
}

/// Electrical model of a single air-core loop antenna at the carrier
/// frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoopMetrics {
    /// Enclosed loop area in square meters.
    pub area: f64,
    /// DC winding resistance in ohms.
    pub dc_resistance: f64,
    /// AC resistance in ohms, including the conductor skin-effect correction.
    pub ac_resistance: f64,
    /// Self-inductance in henries (single-layer air-core approximation).
    pub inductance: f64,
    /// Unloaded quality factor at the carrier frequency.
    pub quality_factor: f64,
    /// Capacitance in farads that resonates the loop at the carrier frequency.
    pub resonant_capacitance: f64,
}

/// Everything the engine derives from one [`LinkParameters`] snapshot.
///
/// Purely a function of the input set: identical parameters always produce
/// identical metrics. Nothing here is persisted; the presentation layer reads
/// what it needs and discards the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkBudget {
    /// Skin depth of the muck gap in meters.
    pub skin_depth: f64,
    /// Linear field attenuation over the gap, in (0, 1].
    pub attenuation_factor: f64,
    /// The same attenuation expressed in dB (always <= 0).
    pub attenuation_db: f64,
    /// Electrical model of the transmit loop.
    pub tx_loop: LoopMetrics,
    /// Electrical model of the receive loop.
    pub rx_loop: LoopMetrics,
    /// Transmit magnetic dipole moment in ampere square meters.
    pub magnetic_moment: f64,
    /// Magnetic field strength at the receiver in A/m, after gap attenuation.
    pub field_at_receiver: f64,
    /// Magnetic flux density at the receiver in teslas.
    pub flux_density: f64,
    /// EMF induced in the receive loop in volts (Faraday's law).
    pub induced_voltage: f64,
    /// Receive quality factor actually applied for resonant gain, clamped to
    /// the tank ceiling.
    pub effective_q: f64,
    /// Receive voltage after resonant magnification in volts.
    pub resonant_voltage: f64,
    /// Duty-cycled average supply current in microamperes.
    pub average_current_ua: f64,
    /// Projected battery life in hours.
    pub battery_life_hours: f64,
    /// Projected battery life in years.
    pub battery_life_years: f64,
    /// Signal-to-noise ratio in dB against the receiver noise floor.
    pub snr_db: f64,
    /// SNR margin in dB above the decode threshold.
    pub link_margin_db: f64,
}

impl LinkBudget {
    /// Whether the demodulator can decode at all (SNR at or above the
    /// decode threshold).
    pub fn is_viable(&self) -> bool {
        self.snr_db >= DECODE_THRESHOLD_DB
    }

    /// Classify the link quality for status reporting.
    pub fn verdict(&self) -> LinkVerdict {
        if self.snr_db < DECODE_THRESHOLD_DB {
            LinkVerdict::Failed
        } else if self.snr_db < SOLID_THRESHOLD_DB {
            LinkVerdict::Marginal
        } else {
            LinkVerdict::Solid
        }
    }
}

/// Link viability classification derived from the SNR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkVerdict {
    /// SNR below the decode threshold; the link will fail.
    Failed,
    /// Decodable but with less than 8 dB of headroom over the threshold.
    Marginal,
    /// Comfortable margin; the link is reliable across the operating envelope.
    Solid,
}

/// Operational state of the duty-cycled transmitter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeOperationalState {
    /// MCU and oscillator powered down; only the wake timer runs.
    Sleep,
    /// Oscillator and PLL settling before the burst.
    Wake,
    /// H-bridge driving the transmit loop.
    Transmit,
    /// Listening window before returning to sleep.
    Receive,
}

impl std::fmt::Display for NodeOperationalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NodeOperationalState::Sleep => "sleep",
            NodeOperationalState::Wake => "wake",
            NodeOperationalState::Transmit => "tx",
            NodeOperationalState::Receive => "rx",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget_with_snr(snr_db: f64) -> LinkBudget {
        let zero_loop = LoopMetrics {
            area: 0.0,
            dc_resistance: 0.0,
            ac_resistance: 0.0,
            inductance: 0.0,
            quality_factor: 0.0,
            resonant_capacitance: 0.0,
        };
        LinkBudget {
            skin_depth: 0.0,
            attenuation_factor: 1.0,
            attenuation_db: 0.0,
            tx_loop: zero_loop,
            rx_loop: zero_loop,
            magnetic_moment: 0.0,
            field_at_receiver: 0.0,
            flux_density: 0.0,
            induced_voltage: 0.0,
            effective_q: 0.0,
            resonant_voltage: 0.0,
            average_current_ua: 0.0,
            battery_life_hours: 0.0,
            battery_life_years: 0.0,
            snr_db,
            link_margin_db: snr_db - DECODE_THRESHOLD_DB,
        }
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(budget_with_snr(11.9).verdict(), LinkVerdict::Failed);
        assert_eq!(budget_with_snr(12.0).verdict(), LinkVerdict::Marginal);
        assert_eq!(budget_with_snr(19.9).verdict(), LinkVerdict::Marginal);
        assert_eq!(budget_with_snr(20.0).verdict(), LinkVerdict::Solid);
        assert!(!budget_with_snr(11.9).is_viable());
        assert!(budget_with_snr(12.0).is_viable());
    }

    #[test]
    fn parameters_json_round_trip() {
        let params = LinkParameters::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: LinkParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn node_state_labels_match_display() {
        assert_eq!(NodeOperationalState::Sleep.to_string(), "sleep");
        assert_eq!(NodeOperationalState::Transmit.to_string(), "tx");
    }
}
