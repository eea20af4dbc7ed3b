// GateState - the only state the gate carries across ticks
//
// Everything else the gate touches per tick (motion score, admission
// outcome, engine mutations) is recomputed or delegated; these two fields
// are the whole cross-tick memory of the admission policy.

/// Cross-tick gate state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateState {
    /// Whether admission is enabled (externally toggled, e.g. user pause)
    pub active: bool,
    /// Timestamp of the last successful admission+calibration cycle, in
    /// seconds. Starts at negative infinity so the very first still frame
    /// is eligible regardless of the configured interval.
    pub last_accepted_time: f64,
}

impl GateState {
    pub fn new() -> Self {
        Self {
            active: true,
            last_accepted_time: f64::NEG_INFINITY,
        }
    }
}

impl Default for GateState {
    fn default() -> Self {
        Self::new()
    }
}
