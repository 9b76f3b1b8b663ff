//! Emission profiles and the profile catalog.
//!
//! A profile describes a greenhouse-gas mix: a baseline emission level that
//! actual emissions are measured against, and a composite GWP multiplier for
//! the gases involved. Lenders select a profile from a small fixed catalog;
//! the catalog itself is configuration data and can be replaced at runtime.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CarbonLoanError;
use crate::types::Tonnes;
use crate::CarbonLoanResult;

/// Lower bound of the actual-emissions domain, as a multiple of baseline.
const EMISSIONS_RANGE_LOW: Decimal = dec!(0.3);
/// Upper bound of the actual-emissions domain, as a multiple of baseline.
const EMISSIONS_RANGE_HIGH: Decimal = dec!(2.5);

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Emission tier label. Ordering is for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmissionTier {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium-Low")]
    MediumLow,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "High")]
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl EmissionTier {
    pub const ALL: [EmissionTier; 5] = [
        EmissionTier::Low,
        EmissionTier::MediumLow,
        EmissionTier::Medium,
        EmissionTier::High,
        EmissionTier::VeryHigh,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EmissionTier::Low => "Low",
            EmissionTier::MediumLow => "Medium-Low",
            EmissionTier::Medium => "Medium",
            EmissionTier::High => "High",
            EmissionTier::VeryHigh => "Very High",
        }
    }

    /// Parse a tier label leniently: case, spaces, hyphens and underscores
    /// are ignored, so "Medium-Low", "medium_low" and "MEDIUM LOW" all match.
    pub fn from_label(label: &str) -> CarbonLoanResult<Self> {
        let wanted = normalise_label(label);
        Self::ALL
            .into_iter()
            .find(|tier| normalise_label(tier.label()) == wanted)
            .ok_or_else(|| CarbonLoanError::UnknownProfile(label.to_string()))
    }
}

impl fmt::Display for EmissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn normalise_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A predefined carbon-emission profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionProfile {
    pub tier: EmissionTier,
    /// Gas composition, e.g. "CO₂ + CH₄ + N₂O".
    #[serde(default)]
    pub gas_type: String,
    /// Reference emissions in tonnes CO2e. Must be positive.
    pub baseline_emissions: Tonnes,
    /// Composite Global Warming Potential weighting, nominally >= 1.0.
    pub gwp_multiplier: Decimal,
    #[serde(default)]
    pub description: String,
}

/// Domain of actual emissions offered for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionsRange {
    pub min: Tonnes,
    pub max: Tonnes,
}

impl EmissionProfile {
    /// Check the baseline the rate model divides by.
    pub fn validate(&self) -> CarbonLoanResult<()> {
        if self.baseline_emissions <= Decimal::ZERO {
            return Err(CarbonLoanError::InvalidInput {
                field: "baseline_emissions".into(),
                reason: format!(
                    "Baseline emissions for profile '{}' must be positive",
                    self.tier
                ),
            });
        }
        Ok(())
    }

    /// Actual-emissions domain, 0.3x to 2.5x the baseline. Informational only;
    /// the rate model accepts any non-negative value.
    pub fn emissions_range(&self) -> EmissionsRange {
        EmissionsRange {
            min: self.baseline_emissions * EMISSIONS_RANGE_LOW,
            max: self.baseline_emissions * EMISSIONS_RANGE_HIGH,
        }
    }
}

fn profile(
    tier: EmissionTier,
    gas_type: &str,
    baseline_emissions: Decimal,
    gwp_multiplier: Decimal,
    description: &str,
) -> EmissionProfile {
    EmissionProfile {
        tier,
        gas_type: gas_type.into(),
        baseline_emissions,
        gwp_multiplier,
        description: description.into(),
    }
}

/// The five built-in profiles, ordered from lowest to highest tier.
pub fn default_profiles() -> Vec<EmissionProfile> {
    vec![
        profile(
            EmissionTier::Low,
            "CO₂",
            dec!(500),
            dec!(1.0),
            "Low emissions - CO₂ only",
        ),
        profile(
            EmissionTier::MediumLow,
            "CO₂ + N₂O",
            dec!(1500),
            dec!(1.25),
            "Moderate emissions with nitrous oxide",
        ),
        profile(
            EmissionTier::Medium,
            "CO₂ + CH₄ + N₂O",
            dec!(3000),
            dec!(1.5),
            "Mixed greenhouse gases (methane & nitrous oxide)",
        ),
        profile(
            EmissionTier::High,
            "CH₄ Heavy",
            dec!(5000),
            dec!(2.0),
            "High methane emissions (28x warming potential)",
        ),
        profile(
            EmissionTier::VeryHigh,
            "Multiple with F-gases",
            dec!(8000),
            dec!(3.0),
            "Includes fluorinated gases (very high GWP)",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A validated set of profiles, at most one per tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCatalog {
    profiles: Vec<EmissionProfile>,
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
        }
    }
}

impl ProfileCatalog {
    /// Build a catalog. Rejects an empty set, duplicate tiers, and profiles
    /// without a positive baseline and GWP multiplier.
    pub fn new(profiles: Vec<EmissionProfile>) -> CarbonLoanResult<Self> {
        if profiles.is_empty() {
            return Err(CarbonLoanError::InvalidInput {
                field: "profiles".into(),
                reason: "Catalog must contain at least one profile".into(),
            });
        }
        for (i, p) in profiles.iter().enumerate() {
            p.validate()?;
            if p.gwp_multiplier <= Decimal::ZERO {
                return Err(CarbonLoanError::InvalidInput {
                    field: "gwp_multiplier".into(),
                    reason: format!("GWP multiplier for profile '{}' must be positive", p.tier),
                });
            }
            if profiles[..i].iter().any(|q| q.tier == p.tier) {
                return Err(CarbonLoanError::InvalidInput {
                    field: "profiles".into(),
                    reason: format!("Duplicate profile for tier '{}'", p.tier),
                });
            }
        }
        Ok(Self { profiles })
    }

    /// Parse a catalog from JSON, either a bare array of profiles or an
    /// object with a `profiles` array.
    pub fn from_json(json: &str) -> CarbonLoanResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> CarbonLoanResult<Self> {
        let profiles: Vec<EmissionProfile> = match value {
            serde_json::Value::Array(_) => serde_json::from_value(value)?,
            serde_json::Value::Object(mut map) => match map.remove("profiles") {
                Some(list) => serde_json::from_value(list)?,
                None => {
                    return Err(CarbonLoanError::InvalidInput {
                        field: "profiles".into(),
                        reason: "Catalog object must contain a 'profiles' array".into(),
                    })
                }
            },
            _ => {
                return Err(CarbonLoanError::InvalidInput {
                    field: "profiles".into(),
                    reason: "Catalog must be an array or an object".into(),
                })
            }
        };
        Self::new(profiles)
    }

    pub fn profiles(&self) -> &[EmissionProfile] {
        &self.profiles
    }

    pub fn get(&self, tier: EmissionTier) -> CarbonLoanResult<&EmissionProfile> {
        self.profiles
            .iter()
            .find(|p| p.tier == tier)
            .ok_or_else(|| CarbonLoanError::UnknownProfile(tier.label().to_string()))
    }

    pub fn find_by_label(&self, label: &str) -> CarbonLoanResult<&EmissionProfile> {
        self.get(EmissionTier::from_label(label)?)
    }

    /// The profile selected when none is given: Medium when present,
    /// otherwise the first entry.
    pub fn default_profile(&self) -> &EmissionProfile {
        self.profiles
            .iter()
            .find(|p| p.tier == EmissionTier::Medium)
            .unwrap_or(&self.profiles[0])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
