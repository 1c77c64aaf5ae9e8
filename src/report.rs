//! # Report Assembly
//!
//! Everything the results page showed beyond the raw estimate: cumulative
//! savings projections, the federal tax-credit split, environmental
//! equivalents, and the AI narrative. All derivations are pure; only the
//! narrative call suspends, and it runs strictly after the estimate is
//! computed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{EstimationConfig, EstimationResult, RoofGeometry};
use crate::estimator::compute_estimate;
use crate::narrative::{NarrativeGenerator, ANALYSIS_FALLBACK};

/// Federal investment tax credit rate applied to the gross system cost.
pub const TAX_CREDIT_RATE: f64 = 0.30;

/// Milestone years shown on the savings chart.
pub const PROJECTION_YEARS: [u32; 4] = [1, 5, 10, 20];

/// Grid carbon intensity assumed for avoided emissions, kg CO₂ per kWh.
pub const CO2_KG_PER_KWH: f64 = 0.7;

/// Annual CO₂ uptake of one planted tree expressed in offset kWh.
pub const KWH_PER_TREE_YEAR: f64 = 40.0;

/// Cumulative savings reached by the end of a milestone year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub year: u32,
    pub cumulative_savings: f64,
}

/// Gross cost split into the tax credit and what the owner actually pays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialBreakdown {
    pub gross_cost: f64,
    pub tax_credit: f64,
    pub net_investment: f64,
}

/// First-year environmental equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub co2_avoided_tons_per_year: f64,
    pub tree_equivalent: u32,
}

/// The full quote document returned by the report endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteReport {
    pub quote_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub roof: RoofGeometry,
    pub config: EstimationConfig,
    pub estimate: EstimationResult,
    pub projections: Vec<SavingsProjection>,
    pub breakdown: FinancialBreakdown,
    pub impact: ImpactSummary,
    /// Consultant prose, or a fixed apology when the generator failed.
    pub analysis: String,
}

/// Savings accumulated by each milestone year, linear in the monthly figure.
pub fn savings_projection(result: &EstimationResult) -> Vec<SavingsProjection> {
    PROJECTION_YEARS
        .iter()
        .map(|&year| SavingsProjection {
            year,
            cumulative_savings: result.monthly_savings * 12.0 * year as f64,
        })
        .collect()
}

pub fn financial_breakdown(result: &EstimationResult) -> FinancialBreakdown {
    FinancialBreakdown {
        gross_cost: result.total_cost,
        tax_credit: result.total_cost * TAX_CREDIT_RATE,
        net_investment: result.total_cost * (1.0 - TAX_CREDIT_RATE),
    }
}

pub fn impact_summary(result: &EstimationResult) -> ImpactSummary {
    ImpactSummary {
        co2_avoided_tons_per_year: result.annual_production_kwh * CO2_KG_PER_KWH / 1000.0,
        tree_equivalent: (result.annual_production_kwh / KWH_PER_TREE_YEAR).round() as u32,
    }
}

/// Assemble the full report for a roof under the given assumptions.
///
/// The estimate is computed before the narrative call so the prompt sees
/// final figures. A failing generator degrades to [`ANALYSIS_FALLBACK`];
/// the report itself always succeeds.
pub async fn build_report(
    roof: &RoofGeometry,
    config: &EstimationConfig,
    generator: &dyn NarrativeGenerator,
) -> QuoteReport {
    let estimate = compute_estimate(roof, config);

    let analysis = match generator.analysis(roof, config, &estimate).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Narrative generation failed, falling back to static analysis");
            ANALYSIS_FALLBACK.to_string()
        }
    };

    QuoteReport {
        quote_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        roof: roof.clone(),
        config: *config,
        estimate,
        projections: savings_projection(&estimate),
        breakdown: financial_breakdown(&estimate),
        impact: impact_summary(&estimate),
        analysis,
    }
}
