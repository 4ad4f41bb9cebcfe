//! WebAssembly module for the Arbor tree-asset registry
//!
//! Provides client-side computation for:
//! - Failure probability and risk status previews
//! - Root Protection Area geometry
//! - Lenient parsing of survey measurements
//! - Weather code labels

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Failure probability for a tree under the given wind speed.
///
/// `height` accepts anything a survey record may hold ("18m", "18", "");
/// unusable values fall back to the model default.
#[wasm_bindgen]
pub fn calculate_failure_probability(species: &str, height: &str, wind_speed_mph: f64) -> f64 {
    let height = Measurement::Text(height.to_string());
    let tree = TreeBiometrics::new(species, Some(&height), None);
    failure_probability(&tree, wind_speed_mph)
}

/// Status label for a failure probability
#[wasm_bindgen]
pub fn classify_risk_status(probability: f64) -> String {
    RiskStatus::from_probability(probability).to_string()
}

/// Full evaluation of a tree record given as JSON
#[wasm_bindgen]
pub fn evaluate_tree(tree_json: &str, wind_speed_mph: f64) -> Result<String, JsValue> {
    let tree: TreeAsset = serde_json::from_str(tree_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid tree JSON: {}", e)))?;

    let assessed = AssessedTree::assess(tree, wind_speed_mph);
    serde_json::to_string(&assessed).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// RPA radius in metres for a DBH such as "85cm"
#[wasm_bindgen]
pub fn calculate_rpa_radius(dbh: &str) -> f64 {
    match parse_leading_number(dbh) {
        Ok(cm) if cm > 0.0 => RootProtectionArea::from_dbh(cm).radius_m,
        _ => 0.0,
    }
}

/// RPA area in square metres for a DBH such as "85cm"
#[wasm_bindgen]
pub fn calculate_rpa_area(dbh: &str) -> f64 {
    match parse_leading_number(dbh) {
        Ok(cm) if cm > 0.0 => RootProtectionArea::from_dbh(cm).area_m2,
        _ => 0.0,
    }
}

/// Leading number of a measurement string, or NaN
#[wasm_bindgen]
pub fn parse_measurement(value: &str) -> f64 {
    parse_leading_number(value).unwrap_or(f64::NAN)
}

/// Label for a WMO weather code
#[wasm_bindgen]
pub fn weather_code_label(code: i32) -> String {
    describe_weather_code(code).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_probability_with_units() {
        let p = calculate_failure_probability("English Oak", "20m", 10.0);
        assert!((p - 0.168).abs() < 1e-9);

        let defaulted = calculate_failure_probability("Baobab", "", 35.0);
        assert!((defaulted - 0.408).abs() < 1e-9);
    }

    #[test]
    fn test_classify_risk_status() {
        assert_eq!(classify_risk_status(0.168), "HEALTHY");
        assert_eq!(classify_risk_status(0.408), "WATCHING");
        assert_eq!(classify_risk_status(0.6), "MEDIUM");
        assert_eq!(classify_risk_status(0.99), "CRITICAL");
    }

    #[test]
    fn test_rpa_geometry() {
        assert!((calculate_rpa_radius("85cm") - 10.2).abs() < 1e-9);
        assert_eq!(calculate_rpa_radius("unknown"), 0.0);
        assert!(calculate_rpa_area("50") > 113.0);
    }

    #[test]
    fn test_parse_measurement() {
        assert_eq!(parse_measurement("15m"), 15.0);
        assert!(parse_measurement("tall").is_nan());
    }

    #[test]
    fn test_evaluate_tree_scores_and_drops_stale_fields() {
        let tree = serde_json::json!({
            "id": "0b9f6c1e-55c4-4f8e-9a51-3f1f6a0e2b11",
            "asset_id": "POP-4404",
            "species": "Lombardy Poplar",
            "height": "25m",
            "status": "HEALTHY",
            "lat": 53.1241,
            "long": -3.4601,
            "created_at": "2026-01-13T09:00:00Z",
            "ndvi_score": 0.99
        });

        let out = evaluate_tree(&tree.to_string(), 80.0).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(json["status"], "CRITICAL");
        assert_eq!(json["risk_score"], 0.99);
        assert_eq!(json["ndvi_score"], 0.35);
        assert_eq!(out.matches("\"ndvi_score\"").count(), 1);
    }

    #[test]
    fn test_weather_code_label() {
        assert_eq!(weather_code_label(95), "Thunderstorm");
    }
}
