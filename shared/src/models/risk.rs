//! Tree failure risk model
//!
//! Converts tree biometrics and the active wind speed into a failure
//! probability in `[0.01, 0.99]`, and derives a status label from it.
//! Every function here is pure.

use serde::{Deserialize, Serialize};

use super::tree::TreeBiometrics;

/// Brittleness used for species missing from the table
pub const DEFAULT_BRITTLENESS: f64 = 0.4;

/// Lower bound of the reported probability
pub const MIN_FAILURE_PROBABILITY: f64 = 0.01;

/// Upper bound of the reported probability
pub const MAX_FAILURE_PROBABILITY: f64 = 0.99;

/// Calibration applied to the raw load before clamping
const RISK_SCALE: f64 = 0.6;

const CRITICAL_THRESHOLD: f64 = 0.8;
const MEDIUM_THRESHOLD: f64 = 0.5;
const WATCHING_THRESHOLD: f64 = 0.3;

/// Brittleness coefficients by common name (0.1 = resilient, 0.9 = brittle)
pub const SPECIES_BRITTLENESS: &[(&str, f64)] = &[
    ("English Oak", 0.2),
    ("Silver Birch", 0.5),
    ("Common Ash", 0.4),
    ("Lombardy Poplar", 0.8),
    ("Cedar", 0.3),
];

/// Status label derived from a failure probability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    Healthy,
    Watching,
    Medium,
    Critical,
}

impl RiskStatus {
    pub fn from_probability(probability: f64) -> Self {
        if probability > CRITICAL_THRESHOLD {
            RiskStatus::Critical
        } else if probability > MEDIUM_THRESHOLD {
            RiskStatus::Medium
        } else if probability > WATCHING_THRESHOLD {
            RiskStatus::Watching
        } else {
            RiskStatus::Healthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::Healthy => "HEALTHY",
            RiskStatus::Watching => "WATCHING",
            RiskStatus::Medium => "MEDIUM",
            RiskStatus::Critical => "CRITICAL",
        }
    }

    /// Canopy vigour proxy shown alongside the status
    pub fn ndvi_score(&self) -> f64 {
        match self {
            RiskStatus::Critical => 0.35,
            RiskStatus::Medium => 0.55,
            RiskStatus::Watching | RiskStatus::Healthy => 0.85,
        }
    }
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single evaluation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskResult {
    pub failure_probability: f64,
    pub status: RiskStatus,
}

/// Brittleness for a species. Lookup is exact and case-sensitive.
pub fn species_factor(species: &str) -> f64 {
    SPECIES_BRITTLENESS
        .iter()
        .find(|(name, _)| *name == species)
        .map(|(_, factor)| *factor)
        .unwrap_or(DEFAULT_BRITTLENESS)
}

/// Taller trees catch proportionally more wind; 10 m = 1.0
pub fn height_factor(height_meters: f64) -> f64 {
    height_meters / 10.0
}

/// Piecewise wind severity
pub fn wind_load(wind_speed_mph: f64) -> f64 {
    if wind_speed_mph < 30.0 {
        0.1
    } else if wind_speed_mph < 50.0 {
        0.4 + ((wind_speed_mph - 30.0) / 20.0) * 0.3
    } else {
        // Not capped: extreme gusts push the load past 1.0
        0.8 + ((wind_speed_mph - 50.0) / 50.0) * 0.2
    }
}

/// Failure probability for a tree under the given wind speed
pub fn failure_probability(tree: &TreeBiometrics, wind_speed_mph: f64) -> f64 {
    let structural = species_factor(&tree.species) * height_factor(tree.height_meters) * 0.5;
    let raw_risk = structural + wind_load(wind_speed_mph) * 0.8;

    (raw_risk * RISK_SCALE).clamp(MIN_FAILURE_PROBABILITY, MAX_FAILURE_PROBABILITY)
}

/// Evaluate a tree: probability plus derived status
pub fn evaluate_risk(tree: &TreeBiometrics, wind_speed_mph: f64) -> RiskResult {
    let failure_probability = failure_probability(tree, wind_speed_mph);
    RiskResult {
        failure_probability,
        status: RiskStatus::from_probability(failure_probability),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(species: &str, height_meters: f64) -> TreeBiometrics {
        TreeBiometrics {
            species: species.to_string(),
            height_meters,
            dbh_centimeters: 30.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_species_table() {
        assert_eq!(species_factor("English Oak"), 0.2);
        assert_eq!(species_factor("Silver Birch"), 0.5);
        assert_eq!(species_factor("Common Ash"), 0.4);
        assert_eq!(species_factor("Lombardy Poplar"), 0.8);
        assert_eq!(species_factor("Cedar"), 0.3);
    }

    #[test]
    fn test_species_lookup_is_exact() {
        assert_eq!(species_factor("Baobab"), DEFAULT_BRITTLENESS);
        assert_eq!(species_factor("english oak"), DEFAULT_BRITTLENESS);
        assert_eq!(species_factor("English Oak (Quercus robur)"), DEFAULT_BRITTLENESS);
        assert_eq!(species_factor(" Cedar"), DEFAULT_BRITTLENESS);
    }

    #[test]
    fn test_wind_load_bands() {
        assert_eq!(wind_load(0.0), 0.1);
        assert_eq!(wind_load(-12.0), 0.1);
        assert_eq!(wind_load(29.99), 0.1);
        assert!(approx(wind_load(30.0), 0.4));
        assert!(approx(wind_load(40.0), 0.55));
        assert!(approx(wind_load(50.0), 0.8));
        assert!(approx(wind_load(100.0), 1.0));
        assert!(wind_load(150.0) > 1.0);
    }

    #[test]
    fn test_calm_oak_is_healthy() {
        let result = evaluate_risk(&tree("English Oak", 20.0), 10.0);
        assert!(approx(result.failure_probability, 0.168));
        assert_eq!(result.status, RiskStatus::Healthy);
    }

    #[test]
    fn test_storm_poplar_is_clamped_critical() {
        let result = evaluate_risk(&tree("Lombardy Poplar", 25.0), 80.0);
        assert_eq!(result.failure_probability, MAX_FAILURE_PROBABILITY);
        assert_eq!(result.status, RiskStatus::Critical);
    }

    #[test]
    fn test_unknown_species_in_gale_is_watching() {
        let result = evaluate_risk(&tree("Baobab", 15.0), 35.0);
        assert!(approx(result.failure_probability, 0.408));
        assert_eq!(result.status, RiskStatus::Watching);
    }

    #[test]
    fn test_lower_clamp() {
        let result = evaluate_risk(&tree("Cedar", 0.0), 0.0);
        // 0.1 * 0.8 * 0.6 = 0.048, above the floor
        assert!(approx(result.failure_probability, 0.048));

        let tiny = evaluate_risk(&tree("Cedar", -1000.0), 0.0);
        assert_eq!(tiny.failure_probability, MIN_FAILURE_PROBABILITY);
    }

    #[test]
    fn test_status_thresholds_are_exclusive() {
        assert_eq!(RiskStatus::from_probability(0.3), RiskStatus::Healthy);
        assert_eq!(RiskStatus::from_probability(0.31), RiskStatus::Watching);
        assert_eq!(RiskStatus::from_probability(0.5), RiskStatus::Watching);
        assert_eq!(RiskStatus::from_probability(0.51), RiskStatus::Medium);
        assert_eq!(RiskStatus::from_probability(0.8), RiskStatus::Medium);
        assert_eq!(RiskStatus::from_probability(0.81), RiskStatus::Critical);
    }

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_string(&RiskStatus::Watching).unwrap();
        assert_eq!(json, "\"WATCHING\"");
        assert_eq!(RiskStatus::Critical.to_string(), "CRITICAL");
    }
}
