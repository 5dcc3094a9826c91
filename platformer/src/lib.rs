//! A 2D side-scrolling platformer scene.
//!
//! Level geometry comes from Tiled maps, bodies are simulated with rapier,
//! and the player is driven by [`PlayerController`]: acceleration and drag,
//! variable-height and wall jumps, wall sliding, footsteps and a camera
//! with directional lookahead.

pub mod audio;
pub mod camera;
pub mod config;
pub mod controller;
pub mod engine;
pub mod hud;
pub mod input;
pub mod level;
pub mod math;
pub mod particles;
pub mod physics;
pub mod scene;
pub mod tilemap;
pub mod world;

pub use crate::audio::{AudioSystem, Sound, SoundLog, SoundPlayer};
pub use crate::camera::CameraFollow;
pub use crate::config::{ConfigError, PlatformerConfig};
pub use crate::controller::{
    Direction, Feedback, JumpPhase, PlayerAnimation, PlayerBody, PlayerController, PlayerState,
};
pub use crate::engine::{Engine, EngineConfig, Game, GameClock, ScriptedFrame};
pub use crate::hud::{HudLayer, HudText};
pub use crate::input::{Action, ActionSnapshot, BoundInput, Controls, InputMap, InputState};
pub use crate::level::{Level, LevelError};
pub use crate::math::{Camera2D, Rect, Vec2};
pub use crate::particles::{Effect, ParticleEffects};
pub use crate::physics::{ArcadeBody, Blocked, PhysicsEvent, PhysicsWorld};
pub use crate::scene::PlatformerScene;
pub use crate::world::{EntityId, EntityKind, World};
pub use winit::keyboard::KeyCode;
