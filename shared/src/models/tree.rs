//! Tree asset models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::risk::{evaluate_risk, RiskResult};
use crate::types::{GpsCoordinates, Measurement};

/// Height assumed when a record has no usable height
pub const DEFAULT_HEIGHT_METERS: f64 = 15.0;

/// Stem diameter assumed when a record has no usable DBH
pub const DEFAULT_DBH_CENTIMETERS: f64 = 30.0;

/// BS5837: RPA radius is 12 x stem diameter
const RPA_RADIUS_PER_DBH_CM: f64 = 0.12;

/// Keys produced by the record or by an assessment. A passthrough attribute
/// with one of these names would shadow the real value in serialized output.
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "asset_id",
    "species",
    "height",
    "dbh",
    "status",
    "risk_score",
    "lidar_mesh_id",
    "lat",
    "long",
    "created_at",
    "ndvi_score",
    "carbon_ledger",
    "root_protection_area",
];

// The carbon ledger predates the biometric defaults and keeps its own
const LEDGER_DEFAULT_HEIGHT_METERS: f64 = 10.0;
const LEDGER_DEFAULT_DBH_CENTIMETERS: f64 = 20.0;

/// A surveyed tree as held by the asset store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeAsset {
    pub id: Uuid,
    pub asset_id: String,
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbh: Option<Measurement>,
    pub status: String,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lidar_mesh_id: Option<String>,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "long")]
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    /// Survey fields the registry does not interpret (spread, condition, TPO refs...)
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl TreeAsset {
    pub fn coordinates(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.latitude, self.longitude)
    }

    /// Drop passthrough attributes that collide with record or assessment keys
    pub fn strip_reserved_attributes(&mut self) {
        strip_reserved(&mut self.attributes);
    }
}

/// Remove every reserved key from a passthrough attribute map
pub fn strip_reserved(attributes: &mut serde_json::Map<String, serde_json::Value>) {
    attributes.retain(|key, _| !RESERVED_FIELDS.contains(&key.as_str()));
}

/// The inputs the risk model reads from a tree record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeBiometrics {
    pub species: String,
    pub height_meters: f64,
    pub dbh_centimeters: f64,
}

impl TreeBiometrics {
    pub fn new(species: &str, height: Option<&Measurement>, dbh: Option<&Measurement>) -> Self {
        Self {
            species: species.to_string(),
            height_meters: Measurement::positive_or(height, DEFAULT_HEIGHT_METERS),
            dbh_centimeters: Measurement::positive_or(dbh, DEFAULT_DBH_CENTIMETERS),
        }
    }

    pub fn from_asset(asset: &TreeAsset) -> Self {
        Self::new(&asset.species, asset.height.as_ref(), asset.dbh.as_ref())
    }
}

/// Root Protection Area around the stem
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RootProtectionArea {
    pub radius_m: f64,
    pub area_m2: f64,
}

impl RootProtectionArea {
    pub fn from_dbh(dbh_centimeters: f64) -> Self {
        let radius_m = dbh_centimeters * RPA_RADIUS_PER_DBH_CM;
        Self {
            radius_m,
            area_m2: std::f64::consts::PI * radius_m * radius_m,
        }
    }
}

/// Rough carbon figures shown on the asset card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarbonLedger {
    pub sequestration_rate: String,
    pub stored_carbon: String,
}

impl CarbonLedger {
    pub fn estimate(height: Option<&Measurement>, dbh: Option<&Measurement>) -> Self {
        let height_m = Measurement::positive_or(height, LEDGER_DEFAULT_HEIGHT_METERS);
        let dbh_cm = Measurement::positive_or(dbh, LEDGER_DEFAULT_DBH_CENTIMETERS);

        Self {
            sequestration_rate: format!("{:.2} kg/yr", dbh_cm * 0.5),
            stored_carbon: format!("{:.2} kg", height_m * dbh_cm * 0.1),
        }
    }
}

/// A tree record augmented with live risk, as returned by asset listings.
///
/// `status` and `risk_score` on the inner asset are replaced by the values
/// computed for the current wind; the stored record is left untouched.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssessedTree {
    #[serde(flatten)]
    pub asset: TreeAsset,
    pub ndvi_score: f64,
    pub carbon_ledger: CarbonLedger,
    pub root_protection_area: RootProtectionArea,
}

impl AssessedTree {
    pub fn assess(mut asset: TreeAsset, wind_speed_mph: f64) -> Self {
        let biometrics = TreeBiometrics::from_asset(&asset);
        let RiskResult {
            failure_probability,
            status,
        } = evaluate_risk(&biometrics, wind_speed_mph);

        asset.strip_reserved_attributes();
        asset.status = status.to_string();
        asset.risk_score = failure_probability;
        if asset.lidar_mesh_id.is_none() {
            asset.lidar_mesh_id = Some(format!("mesh-{}", asset.id));
        }

        let carbon_ledger = CarbonLedger::estimate(asset.height.as_ref(), asset.dbh.as_ref());

        Self {
            asset,
            ndvi_score: status.ndvi_score(),
            carbon_ledger,
            root_protection_area: RootProtectionArea::from_dbh(biometrics.dbh_centimeters),
        }
    }
}
