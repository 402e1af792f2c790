//! AWG magnet-wire property lookup.
//!
//! Both loops are wound from the same gauge of magnet wire, so one table
//! entry covers the DC resistance and skin-effect model of both. The table is
//! fixed, process-wide constant data.

/// Resistance and conductor geometry for one AWG gauge of copper magnet wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireProperties {
    /// Conductor resistance in ohms per meter at DC.
    pub resistance_per_meter: f64,
    /// Bare conductor diameter in meters.
    pub diameter: f64,
}

/// Gauge substituted for codes outside the table.
pub const FALLBACK_GAUGE: u32 = 18;

/// Look up wire properties for an AWG gauge code.
///
/// Total over all codes: gauges outside {14, 16, 18, 20, 22, 24} resolve to
/// the AWG 18 entry instead of failing, so a misconfigured parameter file
/// degrades to a reasonable default loop. The substitution is logged.
pub fn lookup(gauge: u32) -> WireProperties {
    match gauge {
        14 => WireProperties {
            resistance_per_meter: 0.00828,
            diameter: 1.63e-3,
        },
        16 => WireProperties {
            resistance_per_meter: 0.0132,
            diameter: 1.29e-3,
        },
        18 => WireProperties {
            resistance_per_meter: 0.0210,
            diameter: 1.02e-3,
        },
        20 => WireProperties {
            resistance_per_meter: 0.0333,
            diameter: 0.81e-3,
        },
        22 => WireProperties {
            resistance_per_meter: 0.0530,
            diameter: 0.64e-3,
        },
        24 => WireProperties {
            resistance_per_meter: 0.0842,
            diameter: 0.51e-3,
        },
        other => {
            log::warn!("Unknown wire gauge {}, substituting AWG {}", other, FALLBACK_GAUGE);
            lookup(FALLBACK_GAUGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_gauge_falls_back_to_awg_18() {
        assert_eq!(lookup(99), lookup(18));
        assert_eq!(lookup(0), lookup(FALLBACK_GAUGE));
    }

    #[test]
    fn known_entries_match_wire_tables() {
        let awg18 = lookup(18);
        assert!((awg18.resistance_per_meter - 0.0210).abs() < 1e-12);
        assert!((awg18.diameter - 1.02e-3).abs() < 1e-12);
    }

    #[test]
    fn thinner_wire_has_higher_resistance_and_smaller_diameter() {
        let gauges = [14, 16, 18, 20, 22, 24];
        for pair in gauges.windows(2) {
            let coarse = lookup(pair[0]);
            let fine = lookup(pair[1]);
            assert!(fine.resistance_per_meter > coarse.resistance_per_meter);
            assert!(fine.diameter < coarse.diameter);
        }
    }
}
