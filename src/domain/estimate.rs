use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_finite;

/// User-adjustable assumptions feeding the estimation formula.
///
/// Defaults match common US residential figures: 400 W panels at $1200
/// installed, $0.25/kWh retail electricity, 4.5 peak sun hours per day.
/// `panel_efficiency` is accepted and carried but the current formula does
/// not consume it; sizing is wattage-driven.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EstimationConfig {
    /// Nameplate panel rating in watts.
    #[validate(range(exclusive_min = 0.0), custom(function = validate_finite))]
    pub panel_wattage: f64,
    /// Module conversion efficiency, fraction of incident irradiance.
    #[validate(range(min = 0.0, max = 1.0), custom(function = validate_finite))]
    pub panel_efficiency: f64,
    /// Retail electricity price, $/kWh.
    #[validate(range(min = 0.0), custom(function = validate_finite))]
    pub electricity_rate: f64,
    /// Installed cost per panel, $.
    #[validate(range(min = 0.0), custom(function = validate_finite))]
    pub cost_per_panel: f64,
    /// Average daily peak sun hours at the site.
    #[validate(range(min = 0.0), custom(function = validate_finite))]
    pub avg_sun_hours: f64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            panel_wattage: 400.0,
            panel_efficiency: 0.18,
            electricity_rate: 0.25,
            cost_per_panel: 1200.0,
            avg_sun_hours: 4.5,
        }
    }
}

/// Engine output. A fresh value per invocation; nothing here is mutated
/// after construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EstimationResult {
    /// DC system size in kW, from the integral panel count.
    pub system_size_kw: f64,
    /// Whole panels that fit the usable roof area.
    pub panel_count: u32,
    /// Gross installed cost, $.
    pub total_cost: f64,
    /// First-year production estimate, kWh.
    pub annual_production_kwh: f64,
    /// Average monthly bill offset, $.
    pub monthly_savings: f64,
    /// Simple payback period in years, rounded to one decimal.
    /// Zero when the system saves nothing (no payback ever).
    pub roi_years: f64,
}
