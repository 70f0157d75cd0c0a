use serde::{Deserialize, Serialize};
use std::path::Path;
use voxelkit_ecs::MovementConfig;
use voxelkit_interact::InteractionConfig;
use voxelkit_kernel::{GenerateError, GeneratorConfig};

/// Top-level engine configuration. Every field has a default, so a partial
/// JSON document (or `{}`) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub generator: GeneratorConfig,
    pub movement: MovementConfig,
    pub interaction: InteractionConfig,
    /// Initial eye position.
    pub spawn: [f32; 3],
    /// Simulation ticks per second.
    pub tick_rate: f32,
    /// Radians of rotation per unit of pointer motion.
    pub look_sensitivity: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            movement: MovementConfig::default(),
            interaction: InteractionConfig::default(),
            spawn: [0.0, 10.0, 0.0],
            tick_rate: 60.0,
            look_sensitivity: 0.002,
        }
    }
}

/// Errors while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("generator config: {0}")]
    Generator(#[from] GenerateError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl EngineConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Seconds per simulation tick.
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generator.validate()?;

        let m = &self.movement;
        positive("movement.speed", m.speed)?;
        positive("movement.gravity", m.gravity)?;
        positive("movement.jump_speed", m.jump_speed)?;
        positive("movement.eye_height", m.eye_height)?;

        let i = &self.interaction;
        positive("interaction.reach", i.reach)?;
        if i.break_ticks == 0 {
            return Err(ConfigError::Invalid(
                "interaction.break_ticks must be at least 1".into(),
            ));
        }
        for (axis, v) in ["x", "y", "z"].iter().zip(i.footprint_half_extents) {
            if !(v.is_finite() && v >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "interaction.footprint_half_extents.{axis} must be non-negative, got {v}"
                )));
            }
        }

        positive("tick_rate", self.tick_rate)?;
        positive("look_sensitivity", self.look_sensitivity)?;
        if self.spawn.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "spawn must be finite, got {:?}",
                self.spawn
            )));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must be positive, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelkit_kernel::TerrainPolicy;

    #[test]
    fn defaults_validate() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.movement.gravity, 30.0);
        assert_eq!(config.interaction.break_ticks, 11);
        assert!((config.tick_dt() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn empty_json_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_json_overrides() {
        let json = r#"{
            "generator": { "policy": { "kind": "flat", "half_extent": 3, "height": 2, "post_height": 1 }, "seed": 7 },
            "movement": { "speed": 4.0 },
            "spawn": [1.0, 20.0, -1.0]
        }"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.generator.seed, 7);
        assert!(matches!(
            config.generator.policy,
            TerrainPolicy::Flat { half_extent: 3, .. }
        ));
        assert_eq!(config.movement.speed, 4.0);
        assert_eq!(config.movement.gravity, 30.0);
        assert_eq!(config.spawn, [1.0, 20.0, -1.0]);
    }

    #[test]
    fn round_trips_through_json() {
        let config = EngineConfig::default();
        let text = config.to_json_pretty().unwrap();
        assert_eq!(EngineConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn rejects_bad_physics() {
        let mut config = EngineConfig::default();
        config.movement.gravity = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("gravity")));
    }

    #[test]
    fn rejects_zero_break_ticks() {
        let mut config = EngineConfig::default();
        config.interaction.break_ticks = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn generator_errors_convert() {
        let json = r#"{ "generator": { "policy": {
            "kind": "height_field", "half_extent": 0, "min_height": 3,
            "max_height": 8, "frequency": 0.1, "tree_chance": 0.0
        } } }"#;
        let err = EngineConfig::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Generator(GenerateError::InvalidExtent(0))
        ));
    }

    #[test]
    fn malformed_json_is_json_error() {
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            EngineConfig::load("/nonexistent/voxelkit.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
