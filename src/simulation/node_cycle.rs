//! Duty-cycle state machine for the transmitter node.
//!
//! The node runs one communication cycle per second: 20 frames at the
//! nominal 20 Hz tick rate. Most of the cycle is spent asleep, then the
//! oscillator wakes and settles, a short burst is transmitted with a smooth
//! envelope, and the node listens briefly before sleeping again.
//!
//! The whole machine is a pure function of the frame index, so restarting
//! from frame 0 replays the identical sequence and the driving clock can be
//! paused and resumed without any hidden state to reconcile.

use super::types::NodeOperationalState;

/// Frames per communication cycle.
pub const CYCLE_LENGTH: u64 = 20;

// Cycle band boundaries (frames within the cycle).
const SLEEP_END: u64 = 14;
const WAKE_END: u64 = 16;
const TRANSMIT_END: u64 = 19;

/// Operational state and signal-strength indicator for one frame.
///
/// The strength is a per-frame link activity level in [0, 1] consumed by the
/// presentation layer: zero while asleep, a settling level during wake, a
/// sinusoidal burst envelope while transmitting, and a low listening level
/// during receive.
pub fn phase(frame_index: u64) -> (NodeOperationalState, f64) {
    let cycle = frame_index % CYCLE_LENGTH;
    if cycle < SLEEP_END {
        (NodeOperationalState::Sleep, 0.0)
    } else if cycle < WAKE_END {
        (NodeOperationalState::Wake, 0.3)
    } else if cycle < TRANSMIT_END {
        let envelope = ((cycle - WAKE_END) as f64).sin() * 0.5 + 0.5;
        (NodeOperationalState::Transmit, envelope)
    } else {
        (NodeOperationalState::Receive, 0.2)
    }
}
