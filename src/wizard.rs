//! # Quote Wizard
//!
//! Explicit state machine for the five-step quote flow:
//! `Welcome → Location → Drawing → Config → Results`. Each transition takes
//! the data captured at that step; out-of-order calls fail with a typed error
//! and leave the state untouched. The machine owns no I/O; callers bring
//! their own geocoding and drawing.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::domain::{EstimationConfig, EstimationResult, Location, RoofGeometry};
use crate::estimator::compute_estimate;

/// One stage of the quote flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Welcome,
    Location,
    Drawing,
    Config,
    Results,
}

impl WizardStep {
    /// All steps in flow order.
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Welcome,
        WizardStep::Location,
        WizardStep::Drawing,
        WizardStep::Config,
        WizardStep::Results,
    ];

    /// Stable identifier used on the wire.
    pub fn id(&self) -> &'static str {
        match self {
            WizardStep::Welcome => "welcome",
            WizardStep::Location => "location",
            WizardStep::Drawing => "drawing",
            WizardStep::Config => "config",
            WizardStep::Results => "results",
        }
    }

    /// Short label shown on the progress indicator.
    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Welcome => "Start",
            WizardStep::Location => "Location",
            WizardStep::Drawing => "Roof Area",
            WizardStep::Config => "Rates",
            WizardStep::Results => "Report",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for WizardStep {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "welcome" => Ok(WizardStep::Welcome),
            "location" => Ok(WizardStep::Location),
            "drawing" => Ok(WizardStep::Drawing),
            "config" => Ok(WizardStep::Config),
            "results" => Ok(WizardStep::Results),
            _ => Err("unknown wizard step"),
        }
    }
}

/// Step id/label pair for progress displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepMetadata {
    pub id: &'static str,
    pub label: &'static str,
}

/// The full step table in flow order.
pub fn step_metadata() -> Vec<StepMetadata> {
    WizardStep::ALL
        .iter()
        .map(|s| StepMetadata {
            id: s.id(),
            label: s.label(),
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Step out of order: expected {expected}, currently at {actual}")]
    InvalidTransition {
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("No roof area captured; outline the roof before continuing")]
    EmptyRoof,

    #[error("Invalid input: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Drives one homeowner through the quote flow.
///
/// Construct with [`QuoteWizard::new`] (stock assumptions) or
/// [`QuoteWizard::with_config`] (service-configured assumptions), then call
/// the transition methods in step order.
#[derive(Debug, Clone)]
pub struct QuoteWizard {
    step: WizardStep,
    defaults: EstimationConfig,
    location: Option<Location>,
    roof: Option<RoofGeometry>,
    config: EstimationConfig,
    result: Option<EstimationResult>,
}

impl QuoteWizard {
    pub fn new() -> Self {
        Self::with_config(EstimationConfig::default())
    }

    /// Start the flow with custom default assumptions. `restart` returns to
    /// these, not to the stock defaults.
    pub fn with_config(defaults: EstimationConfig) -> Self {
        Self {
            step: WizardStep::Welcome,
            defaults,
            location: None,
            roof: None,
            config: defaults,
            result: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn roof(&self) -> Option<&RoofGeometry> {
        self.roof.as_ref()
    }

    pub fn config(&self) -> &EstimationConfig {
        &self.config
    }

    pub fn result(&self) -> Option<&EstimationResult> {
        self.result.as_ref()
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition {
                expected,
                actual: self.step,
            })
        }
    }

    /// Welcome → Location.
    pub fn start(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Welcome)?;
        self.step = WizardStep::Location;
        Ok(())
    }

    /// Location → Drawing. The location may come from an address lookup or
    /// straight from device coordinates; only the coordinates are required.
    pub fn submit_location(&mut self, location: Location) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Location)?;
        location.validate()?;
        self.location = Some(location);
        self.step = WizardStep::Drawing;
        Ok(())
    }

    /// Drawing → Config. An undrawn roof (zero area) cannot be confirmed.
    pub fn confirm_roof(&mut self, roof: RoofGeometry) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Drawing)?;
        roof.validate()?;
        if roof.area_m2 == 0.0 {
            return Err(WizardError::EmptyRoof);
        }
        self.roof = Some(roof);
        self.step = WizardStep::Config;
        Ok(())
    }

    /// Replace the assumptions while on the Config step.
    pub fn update_config(&mut self, config: EstimationConfig) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Config)?;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Config → Results. Validates the captured inputs, runs the estimation,
    /// and stores the result.
    pub fn calculate(&mut self) -> Result<EstimationResult, WizardError> {
        self.expect_step(WizardStep::Config)?;
        let roof = self.roof.as_ref().ok_or(WizardError::EmptyRoof)?;
        roof.validate()?;
        self.config.validate()?;

        let result = compute_estimate(roof, &self.config);
        self.result = Some(result);
        self.step = WizardStep::Results;
        Ok(result)
    }

    /// Back to Welcome from anywhere, dropping everything captured so far.
    pub fn restart(&mut self) {
        *self = Self::with_config(self.defaults);
    }
}

impl Default for QuoteWizard {
    fn default() -> Self {
        Self::new()
    }
}
