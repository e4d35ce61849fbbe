/// Fixed handling cost per package, in seconds.
pub const SECONDS_PER_PACKAGE: u32 = 40;

/// Flat surcharge applied when a delivery arrives on a non-conforming pallet.
pub const PALLET_PENALTY_SECONDS: u32 = 1200;

/// Processing duration for a delivery, in seconds.
///
/// `packages * 40`, plus a 20-minute penalty when the pallet condition is not
/// ok, plus any manual delay entered by the planner. Pure and total: the
/// inputs are unsigned, so the result can never go below zero.
pub fn processing_seconds(packages: u32, pallet_condition_ok: bool, manual_delay_minutes: u32) -> u32 {
    let base = packages * SECONDS_PER_PACKAGE;
    let penalty = if pallet_condition_ok {
        0
    } else {
        PALLET_PENALTY_SECONDS
    };
    base + penalty + manual_delay_minutes * 60
}
