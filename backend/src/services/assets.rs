//! Tree asset service
//!
//! Document persistence belongs to an external store; this service keeps the
//! registry in memory and applies live risk on every read. Computed scores
//! are never written back.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use serde::Deserialize;
use shared::{strip_reserved, AssessedTree, Measurement, RiskStatus, TreeAsset, WeatherSnapshot};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

const DEFAULT_LATITUDE: f64 = 53.1240;
const DEFAULT_LONGITUDE: f64 = -3.4570;
const INITIAL_RISK_SCORE: f64 = 0.1;
const MAX_HEIGHT_METERS: f64 = 150.0;
const MAX_DBH_CENTIMETERS: f64 = 2000.0;

/// Input for registering a tree
///
/// Survey forms submit blank strings for untouched fields, and number inputs
/// arrive as strings, so biometrics accept either form.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTreeInput {
    #[validate(length(min = 1, max = 40, message = "Asset ID must be 1-40 characters"))]
    pub asset_id: Option<String>,
    #[validate(length(min = 1, max = 120, message = "Species is required"))]
    pub species: String,
    /// Height in metres
    pub height: Option<Measurement>,
    /// Stem diameter in centimetres
    pub dbh: Option<Measurement>,
    pub status: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub long: Option<f64>,
    /// Survey fields stored as given
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl CreateTreeInput {
    /// Treat blank strings as absent
    fn normalize(&mut self) {
        if self.asset_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            self.asset_id = None;
        }
        if self.status.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.status = None;
        }
        for measurement in [&mut self.height, &mut self.dbh] {
            if matches!(measurement, Some(Measurement::Text(text)) if text.trim().is_empty()) {
                *measurement = None;
            }
        }
    }
}

/// Numeric value of an optional measurement, bounded to `0..=max`
fn measurement_value(
    field: &str,
    measurement: Option<&Measurement>,
    max: f64,
    message: &str,
) -> AppResult<Option<f64>> {
    let Some(measurement) = measurement else {
        return Ok(None);
    };

    match measurement.value() {
        Some(value) if value.is_finite() && (0.0..=max).contains(&value) => Ok(Some(value)),
        _ => Err(AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }),
    }
}

/// Asset service for the tree registry
#[derive(Clone, Default)]
pub struct AssetService {
    trees: Arc<RwLock<Vec<TreeAsset>>>,
}

impl AssetService {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the given trees
    pub fn with_trees(trees: Vec<TreeAsset>) -> Self {
        Self {
            trees: Arc::new(RwLock::new(trees)),
        }
    }

    /// Stored records, without live risk
    pub fn list(&self) -> Vec<TreeAsset> {
        self.trees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stored record by ID
    pub fn get(&self, id: Uuid) -> AppResult<TreeAsset> {
        self.trees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Tree asset".to_string()))
    }

    /// All trees with risk computed against one weather snapshot
    pub fn list_with_risk(&self, weather: &WeatherSnapshot) -> Vec<AssessedTree> {
        let trees = self.list();
        tracing::debug!(
            count = trees.len(),
            wind_speed_mph = weather.wind_speed_mph,
            simulation = weather.is_simulation,
            "Evaluating tree risk"
        );

        assess_all(trees, weather)
    }

    /// One tree with risk computed against the snapshot
    pub fn get_with_risk(&self, id: Uuid, weather: &WeatherSnapshot) -> AppResult<AssessedTree> {
        let tree = self.get(id)?;
        Ok(AssessedTree::assess(tree, weather.wind_speed_mph))
    }

    /// Register a tree
    pub fn create(&self, mut input: CreateTreeInput) -> AppResult<TreeAsset> {
        input.normalize();
        input.validate()?;

        if input.species.trim().is_empty() {
            return Err(AppError::Validation {
                field: "species".to_string(),
                message: "Species is required".to_string(),
            });
        }

        let height = measurement_value(
            "height",
            input.height.as_ref(),
            MAX_HEIGHT_METERS,
            "Height must be 0-150 m",
        )?;
        let dbh = measurement_value(
            "dbh",
            input.dbh.as_ref(),
            MAX_DBH_CENTIMETERS,
            "DBH must be 0-2000 cm",
        )?;

        let mut trees = self.trees.write().unwrap_or_else(PoisonError::into_inner);

        let asset_id = match input.asset_id {
            Some(asset_id) => {
                if trees.iter().any(|t| t.asset_id == asset_id) {
                    return Err(AppError::Validation {
                        field: "asset_id".to_string(),
                        message: format!("Asset ID {} is already registered", asset_id),
                    });
                }
                asset_id
            }
            None => next_free_asset_id(&trees),
        };

        let mut attributes = input.attributes;
        strip_reserved(&mut attributes);

        let tree = TreeAsset {
            id: Uuid::new_v4(),
            asset_id,
            species: input.species,
            height: height.map(|h| Measurement::Text(format!("{}m", h))),
            dbh: dbh.map(|d| Measurement::Text(format!("{}cm", d))),
            status: input
                .status
                .unwrap_or_else(|| RiskStatus::Healthy.to_string()),
            risk_score: INITIAL_RISK_SCORE,
            lidar_mesh_id: None,
            latitude: input.lat.unwrap_or(DEFAULT_LATITUDE),
            longitude: input.long.unwrap_or(DEFAULT_LONGITUDE),
            created_at: Utc::now(),
            attributes,
        };

        trees.push(tree.clone());
        tracing::info!(asset_id = %tree.asset_id, species = %tree.species, "Tree registered");

        Ok(tree)
    }
}

/// First `TREE-NNNN` code, counting up from the registry size, not already taken
fn next_free_asset_id(trees: &[TreeAsset]) -> String {
    (trees.len() + 1..)
        .map(|n| format!("TREE-{:04}", n))
        .find(|candidate| trees.iter().all(|t| &t.asset_id != candidate))
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Evaluate every tree against the same wind. Trees are independent.
pub fn assess_all(trees: Vec<TreeAsset>, weather: &WeatherSnapshot) -> Vec<AssessedTree> {
    trees
        .into_iter()
        .map(|tree| AssessedTree::assess(tree, weather.wind_speed_mph))
        .collect()
}

/// Demo trees for development
pub fn demo_trees() -> Vec<TreeAsset> {
    let demo = [
        ("OAK-4401", "English Oak", "18m", "85cm", 53.1234, -3.4567),
        ("BIR-4402", "Silver Birch", "12m", "30cm", 53.1250, -3.4580),
        ("ASH-4403", "Common Ash", "15m", "50cm", 53.1220, -3.4520),
        ("POP-4404", "Lombardy Poplar", "25m", "60cm", 53.1241, -3.4601),
        ("CED-4405", "Cedar", "20m", "95cm", 53.1262, -3.4549),
    ];

    demo.into_iter()
        .map(|(asset_id, species, height, dbh, latitude, longitude)| TreeAsset {
            id: Uuid::new_v4(),
            asset_id: asset_id.to_string(),
            species: species.to_string(),
            height: Some(Measurement::from(height)),
            dbh: Some(Measurement::from(dbh)),
            status: RiskStatus::Healthy.to_string(),
            risk_score: INITIAL_RISK_SCORE,
            lidar_mesh_id: None,
            latitude,
            longitude,
            created_at: Utc::now(),
            attributes: serde_json::Map::new(),
        })
        .collect()
}
