use anyhow::Result;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::FleetResult;
use crate::movement::Kinematics;

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub ship: ShipConfigData,
    #[serde(default)]
    pub arrow: ArrowConfigData,
    #[serde(default)]
    pub demo: DemoConfigData,
}

impl FleetConfig {
    /// Load configuration from JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: FleetConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file with pretty formatting
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|err| {
            log::info!("Using default configuration ({}): {err}", path.display());
            let config = Self::default();
            // Try to save the default config
            if let Err(err) = config.save(path) {
                log::warn!("Could not write default configuration: {err}");
            }
            config
        })
    }
}

/// Ship speed limits (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfigData {
    /// Units per second
    pub linear_speed: f64,
    /// Degrees per second
    pub angular_speed: f64,
}

impl Default for ShipConfigData {
    fn default() -> Self {
        Self {
            linear_speed: 4.0,
            angular_speed: 4.0,
        }
    }
}

impl ShipConfigData {
    pub fn kinematics(&self) -> FleetResult<Kinematics> {
        Kinematics::new(self.linear_speed, self.angular_speed)
    }
}

/// Order arrow dimensions (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrowConfigData {
    pub base_length: f64,
    pub head_length: f64,
    pub line_height: f64,
}

impl Default for ArrowConfigData {
    fn default() -> Self {
        Self {
            base_length: 1.0,
            head_length: 0.2,
            line_height: 0.0,
        }
    }
}

/// Headless demo scenario (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfigData {
    #[serde(with = "dvec3_serde")]
    pub player_spawn: DVec3,

    #[serde(with = "dvec3_serde")]
    pub enemy_spawn: DVec3,

    /// Directional orders queued on the enemy at spawn
    pub patrol_orders: u32,

    /// Patrol points are drawn from [-x, x] by [-z, z] on the XZ plane
    pub patrol_half_extent_x: f64,
    pub patrol_half_extent_z: f64,

    pub seed: u64,
    pub tick_rate: f64,
    pub duration_secs: f64,
}

impl Default for DemoConfigData {
    fn default() -> Self {
        Self {
            player_spawn: DVec3::new(0.0, 0.0, -6.0),
            enemy_spawn: DVec3::new(0.0, 0.0, 6.0),
            patrol_orders: 100,
            patrol_half_extent_x: 10.0,
            patrol_half_extent_z: 8.0,
            seed: 7,
            tick_rate: 60.0,
            duration_secs: 60.0,
        }
    }
}

/// Custom serialization for DVec3
mod dvec3_serde {
    use glam::DVec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Vec3Data {
        x: f64,
        y: f64,
        z: f64,
    }

    pub fn serialize<S>(vec: &DVec3, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Vec3Data {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DVec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = Vec3Data::deserialize(deserializer)?;
        Ok(DVec3::new(data.x, data.y, data.z))
    }
}
