//! Tuning constants for the platformer scene.
//!
//! Every field has a default, so a config file only needs to list the
//! values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vec2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Complete configuration of the platformer scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub movement: MovementConfig,
    pub jump: JumpConfig,
    pub wall: WallConfig,
    pub camera: CameraConfig,
    pub feedback: FeedbackConfig,
    pub player: PlayerConfig,
    pub level: LevelConfig,
    pub physics: PhysicsConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal acceleration while a direction is held (px/s²).
    pub acceleration: f32,
    /// Linear drag once input is released (px/s²). Below `acceleration` gives an icy slide.
    pub drag: f32,
    /// Horizontal speed cap (px/s).
    pub max_speed: f32,
    /// Distance from the camera edge at which movement toward it stops.
    pub edge_margin: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            acceleration: 1000.0,
            drag: 1000.0,
            max_speed: 600.0,
            edge_margin: 16.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Vertical velocity set on a ground jump (negative is up).
    pub velocity: f32,
    /// Time before releasing the jump key can cut the jump short.
    pub min_jump_time_ms: f32,
    /// Factor applied to the rising velocity when the jump is cut.
    pub cutoff_damping: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            velocity: -650.0,
            min_jump_time_ms: 100.0,
            cutoff_damping: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Maximum fall speed while sliding down a wall.
    pub slide_speed: f32,
    /// Horizontal speed away from the wall on a wall jump.
    pub jump_x: f32,
    /// Vertical velocity of a wall jump.
    pub jump_y: f32,
    /// Horizontal sprite scale factor while sliding.
    pub squash: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            slide_speed: 100.0,
            jump_x: 500.0,
            jump_y: -650.0,
            squash: 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub viewport: Vec2,
    pub zoom: f32,
    /// Lookahead distance in the direction of travel.
    pub lookahead: f32,
    /// Horizontal speed at which the lookahead kicks in.
    pub lookahead_threshold: f32,
    /// Per-frame smoothing of the lookahead offset.
    pub lookahead_lerp: f32,
    /// Per-frame smoothing of the camera scroll.
    pub scroll_lerp: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(1440.0, 900.0),
            zoom: 1.125,
            lookahead: 200.0,
            lookahead_threshold: 500.0,
            lookahead_lerp: 0.1,
            scroll_lerp: 0.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub jump_volume: f32,
    pub coin_volume: f32,
    pub footstep_volume: f32,
    pub footstep_interval_ms: f32,
    /// Speed of the walking and wall-slide dust.
    pub particle_velocity: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            jump_volume: 1.2,
            coin_volume: 3.0,
            footstep_volume: 0.5,
            footstep_interval_ms: 150.0,
            particle_velocity: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Spawn point of the player's center.
    pub spawn: Vec2,
    /// Unscaled sprite size.
    pub size: Vec2,
    pub scale: f32,
}

impl PlayerConfig {
    /// Size of the player on screen and of its body.
    pub fn display_size(&self) -> Vec2 {
        self.size * self.scale
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: Vec2::new(30.0, 345.0),
            size: Vec2::new(24.0, 24.0),
            scale: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub background_layer: String,
    pub ground_layer: String,
    pub object_layer: String,
    pub coin_name: String,
    pub flag_name: String,
    /// Coin hitbox size relative to the coin object, centered on it.
    pub coin_hitbox_scale: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            background_layer: "Layer 0".into(),
            ground_layer: "Layer 1".into(),
            object_layer: "Objects".into(),
            coin_name: "coin".into(),
            flag_name: "flag".into(),
            coin_hitbox_scale: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity in px/s² (positive y is down).
    pub gravity: Vec2,
    /// World scale handed to the physics solver.
    pub pixels_per_meter: f32,
    /// Fixed physics steps per second.
    pub fixed_rate: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 1500.0),
            pixels_per_meter: 64.0,
            fixed_rate: 60.0,
        }
    }
}

impl PlatformerConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("movement.acceleration", self.movement.acceleration)?;
        non_negative("movement.drag", self.movement.drag)?;
        positive("movement.max_speed", self.movement.max_speed)?;
        non_negative("movement.edge_margin", self.movement.edge_margin)?;

        non_negative("jump.min_jump_time_ms", self.jump.min_jump_time_ms)?;
        fraction("jump.cutoff_damping", self.jump.cutoff_damping)?;

        non_negative("wall.slide_speed", self.wall.slide_speed)?;
        positive("wall.squash", self.wall.squash)?;

        positive("camera.viewport.x", self.camera.viewport.x)?;
        positive("camera.viewport.y", self.camera.viewport.y)?;
        positive("camera.zoom", self.camera.zoom)?;
        positive("camera.lookahead_threshold", self.camera.lookahead_threshold)?;
        fraction("camera.lookahead_lerp", self.camera.lookahead_lerp)?;
        fraction("camera.scroll_lerp", self.camera.scroll_lerp)?;

        non_negative("feedback.footstep_interval_ms", self.feedback.footstep_interval_ms)?;

        positive("player.size.x", self.player.size.x)?;
        positive("player.size.y", self.player.size.y)?;
        positive("player.scale", self.player.scale)?;

        fraction("level.coin_hitbox_scale", self.level.coin_hitbox_scale)?;

        positive("physics.pixels_per_meter", self.physics.pixels_per_meter)?;
        positive("physics.fixed_rate", self.physics.fixed_rate)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected zero or more, got {value}"),
        })
    }
}

fn fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a value in (0, 1], got {value}"),
        })
    }
}
