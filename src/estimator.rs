//! # Solar Estimation Engine
//!
//! Pure sizing and payback arithmetic: roof area in, panel count, production,
//! cost and ROI out. No I/O, no state, no side effects. Every other part of
//! the service (wizard, report assembly, API) builds on this function.

use crate::domain::{EstimationConfig, EstimationResult, RoofGeometry};

/// Footprint of a single panel in m² (standard residential module).
pub const PANEL_SIZE_M2: f64 = 1.75;

/// Fraction of the drawn roof actually available for panels after setbacks,
/// vents and obstructions.
pub const ROOF_UTILIZATION_FACTOR: f64 = 0.85;

/// Combined derate for inverter, wiring, soiling and temperature losses.
/// Applied to production only, never to sizing.
pub const SYSTEM_EFFICIENCY_LOSS: f64 = 0.85;

/// Compute a solar estimate for a roof under the given assumptions.
///
/// The pipeline discretizes to whole panels first and derives every
/// downstream figure from that integral count:
///
/// 1. usable area = drawn area × utilization factor
/// 2. panel count = floor(usable area / panel footprint)
/// 3. system size (kW) = panel count × wattage / 1000
/// 4. annual production (kWh) = size × sun hours × 365 × efficiency loss
/// 5. cost = panel count × cost per panel
/// 6. savings = production × electricity rate (monthly uses production / 12)
/// 7. ROI years = cost / annual savings, or 0 when there are no savings
///
/// The function is total over validated input: a zero area, rate, or sun-hour
/// figure yields zeros, never an error. Callers are expected to have run
/// [`validator::Validate`] on the inputs; negative or NaN values are out of
/// domain here.
pub fn compute_estimate(roof: &RoofGeometry, config: &EstimationConfig) -> EstimationResult {
    let usable_area = roof.area_m2 * ROOF_UTILIZATION_FACTOR;

    // Whole panels only. The cast saturates for absurdly large roofs rather
    // than wrapping.
    let panel_count = (usable_area / PANEL_SIZE_M2).floor() as u32;

    let system_size_kw = (panel_count as f64 * config.panel_wattage) / 1000.0;

    // First-year approximation: no seasonality, shading, or degradation.
    let annual_production_kwh =
        system_size_kw * config.avg_sun_hours * 365.0 * SYSTEM_EFFICIENCY_LOSS;

    let total_cost = panel_count as f64 * config.cost_per_panel;

    let monthly_savings = (annual_production_kwh / 12.0) * config.electricity_rate;
    let annual_savings = annual_production_kwh * config.electricity_rate;

    // A system that saves nothing reports 0 years, not infinity. "Pays back
    // instantly" and "never pays back" share the sentinel; consumers treat 0
    // as "not applicable".
    let roi_years = if annual_savings > 0.0 {
        total_cost / annual_savings
    } else {
        0.0
    };

    EstimationResult {
        system_size_kw,
        panel_count,
        total_cost,
        annual_production_kwh,
        monthly_savings,
        roi_years: round_one_decimal(roi_years),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
