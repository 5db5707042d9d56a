//! Chlorine absorbed while showering.

use serde::{Deserialize, Serialize};

use super::constants::{
    BLEACH_CONCENTRATION_MG_PER_LITER, DAYS_PER_WEEK, DAYS_PER_YEAR, DERMAL_ABSORPTION_FRACTION,
    INHALATION_ABSORPTION_FRACTION, SHOWER_FLOW_LITERS_PER_MINUTE, VOLATILIZATION_FRACTION,
};

/// Chlorine quantities derived from one daily shower.
///
/// Masses are in milligrams, bleach equivalents in liters of household bleach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShowerChlorineData {
    pub total_shower_water_liters: f64,
    pub total_chlorine_in_shower: f64,
    pub chlorine_vaporized: f64,
    pub chlorine_inhaled: f64,
    pub chlorine_absorbed_skin: f64,
    pub total_chlorine_absorbed: f64,
    pub daily_bleach_equivalent: f64,
    pub weekly_bleach_equivalent: f64,
    pub yearly_bleach_equivalent: f64,
}

/// Computes shower absorption for already-validated inputs.
///
/// Inhalation only draws from the vaporized share and skin only from the
/// share left in the water, so nothing is counted twice.
pub(crate) fn absorption(shower_minutes: f64, chlorine_ppm: f64) -> ShowerChlorineData {
    let total_shower_water_liters = shower_minutes * SHOWER_FLOW_LITERS_PER_MINUTE;
    let total_chlorine_in_shower = total_shower_water_liters * chlorine_ppm;

    let chlorine_vaporized = total_chlorine_in_shower * VOLATILIZATION_FRACTION;
    let chlorine_remaining = total_chlorine_in_shower * (1.0 - VOLATILIZATION_FRACTION);

    let chlorine_inhaled = chlorine_vaporized * INHALATION_ABSORPTION_FRACTION;
    let chlorine_absorbed_skin = chlorine_remaining * DERMAL_ABSORPTION_FRACTION;
    let total_chlorine_absorbed = chlorine_inhaled + chlorine_absorbed_skin;

    ShowerChlorineData {
        total_shower_water_liters,
        total_chlorine_in_shower,
        chlorine_vaporized,
        chlorine_inhaled,
        chlorine_absorbed_skin,
        total_chlorine_absorbed,
        daily_bleach_equivalent: total_chlorine_absorbed / BLEACH_CONCENTRATION_MG_PER_LITER,
        weekly_bleach_equivalent: total_chlorine_absorbed * DAYS_PER_WEEK
            / BLEACH_CONCENTRATION_MG_PER_LITER,
        yearly_bleach_equivalent: total_chlorine_absorbed * DAYS_PER_YEAR
            / BLEACH_CONCENTRATION_MG_PER_LITER,
    }
}

/// Coarse rating of how much a shower length adds to exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowerImpact {
    Low,
    Moderate,
    Higher,
    High,
}

impl ShowerImpact {
    /// Buckets: up to 5 minutes, up to 10, up to 15, anything longer.
    pub fn from_minutes(minutes: f64) -> Self {
        if minutes <= 5.0 {
            Self::Low
        } else if minutes <= 10.0 {
            Self::Moderate
        } else if minutes <= 15.0 {
            Self::Higher
        } else {
            Self::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Impact",
            Self::Moderate => "Moderate Impact",
            Self::Higher => "Higher Impact",
            Self::High => "High Impact",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Low => "Quick showers minimize chlorine exposure",
            Self::Moderate => "Average shower duration with moderate exposure",
            Self::Higher => "Longer showers increase chlorine absorption significantly",
            Self::High => "Extended showers maximize chlorine exposure through skin and lungs",
        }
    }
}
