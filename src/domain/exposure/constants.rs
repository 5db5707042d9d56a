//! Physical and product constants behind the exposure estimate.
//!
//! Every figure the estimator multiplies or divides by lives here, so the
//! calculation code never carries bare literals.
//!
//! # Sources
//!
//! - Shower flow rate: EPA WaterSense average (2.1 gal/min)
//! - Volatilization: Jo et al. (1990), *Water Research*
//! - Dermal absorption: Brown et al. (1984), *Regulatory Toxicology and Pharmacology*
//! - Inhalation absorption: EPA Risk Assessment Guidelines (1991)
//! - Bleach strength: household bleach at 5.25% sodium hypochlorite

/// Days used to annualize a daily figure.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Days used to scale a daily figure to a week.
pub const DAYS_PER_WEEK: f64 = 7.0;

pub const LITERS_PER_GALLON: f64 = 3.785;

/// Average shower head flow rate in US gallons per minute.
pub const SHOWER_FLOW_GALLONS_PER_MINUTE: f64 = 2.1;

/// Average shower head flow rate in liters per minute.
pub const SHOWER_FLOW_LITERS_PER_MINUTE: f64 = SHOWER_FLOW_GALLONS_PER_MINUTE * LITERS_PER_GALLON;

/// Share of the chlorine in shower water that volatilizes into the air.
pub const VOLATILIZATION_FRACTION: f64 = 0.56;

/// Share of the volatilized chlorine absorbed through the lungs.
pub const INHALATION_ABSORPTION_FRACTION: f64 = 0.70;

/// Share of the non-volatilized chlorine absorbed through the skin.
pub const DERMAL_ABSORPTION_FRACTION: f64 = 0.05;

/// Chlorine content of standard household bleach, in mg per liter.
pub const BLEACH_CONCENTRATION_MG_PER_LITER: f64 = 52_500.0;

pub const LITERS_PER_CUP: f64 = 0.236_588;

pub const LITERS_PER_TEASPOON: f64 = 0.004_928_92;

/// Glass size assumed when the caller does not give one (8 US fl oz).
pub const DEFAULT_GLASS_VOLUME_LITERS: f64 = 0.236_588;
