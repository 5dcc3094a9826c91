//! The playable level: static ground, coins, the goal flag and the player.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::audio::{Sound, SoundPlayer};
use crate::config::PlatformerConfig;
use crate::controller::{Feedback, PlayerController, PlayerState};
use crate::engine::{Game, GameClock};
use crate::hud::{HudId, HudLayer, HudText};
use crate::input::{Action, Controls};
use crate::level::Level;
use crate::math::{Camera2D, Rect, Vec2};
use crate::particles::{Effect, ParticleEffects};
use crate::physics::{ArcadeBody, DebugShape, PhysicsWorld, RigidBodyType};
use crate::world::{EntityId, EntityKind, World};

/// Vertical offset of the win banner above the view center.
const WIN_TEXT_RISE: f32 = 130.0;

/// Routes controller feedback to the particle effects and a sound player.
struct SceneFeedback<'a, 'p> {
    effects: &'a mut ParticleEffects,
    audio: &'a mut (dyn SoundPlayer + 'p),
}

impl Feedback for SceneFeedback<'_, '_> {
    fn start_effect(&mut self, effect: Effect, at: Vec2, velocity: Vec2) {
        self.effects.start(effect, at, velocity);
    }

    fn stop_effect(&mut self, effect: Effect) {
        self.effects.stop(effect);
    }

    fn explode_effect(&mut self, effect: Effect, at: Vec2) {
        self.effects.explode(effect, at);
    }

    fn play_sound(&mut self, sound: Sound, volume: f32) {
        self.audio.play(sound, volume);
    }
}

pub struct PlatformerScene {
    config: PlatformerConfig,
    level: Level,

    world: World,
    physics: PhysicsWorld,
    clock: GameClock,
    camera: Camera2D,
    effects: ParticleEffects,
    hud: HudLayer,
    controller: PlayerController,

    player: EntityId,
    /// Coin and flag areas in world units, keyed by entity.
    markers: BTreeMap<EntityId, Rect>,
    ground: Vec<Rect>,

    won: bool,
    win_text: Option<HudId>,
    last_state: Option<PlayerState>,
}

impl PlatformerScene {
    /// Build the scene from a validated config and a loaded level.
    pub fn new(config: PlatformerConfig, level: Level) -> Result<Self> {
        config.validate().context("Invalid platformer config")?;

        let names = &config.level;
        if level.map.layer(&names.background_layer).is_none() {
            bail!("Level has no background layer `{}`", names.background_layer);
        }
        let ground = level
            .collision_rects(&names.ground_layer)
            .context("Failed to build ground colliders")?;

        let mut world = World::new();
        let mut physics = PhysicsWorld::new(&config.physics);

        for rect in &ground {
            let entity = world.spawn(EntityKind::Terrain);
            physics.create_body(entity, RigidBodyType::Fixed, rect.center())?;
            physics.add_box_collider(entity, rect.size() / 2.0, Vec2::ZERO, 0.0, 0.0)?;
        }

        let mut markers = BTreeMap::new();
        for object in level.objects_named(&names.object_layer, &names.coin_name) {
            let entity = world.spawn(EntityKind::Coin);
            physics.create_body(entity, RigidBodyType::Fixed, object.rect.center())?;
            // The hitbox is a centered fraction of the coin.
            let half = object.rect.size() * (names.coin_hitbox_scale / 2.0);
            physics.add_box_sensor(entity, half, Vec2::ZERO)?;
            markers.insert(entity, object.rect);
        }
        for object in level.objects_named(&names.object_layer, &names.flag_name) {
            let entity = world.spawn(EntityKind::Flag);
            physics.create_body(entity, RigidBodyType::Fixed, object.rect.center())?;
            physics.add_box_sensor(entity, object.rect.size() / 2.0, Vec2::ZERO)?;
            markers.insert(entity, object.rect);
        }

        let player = world.spawn(EntityKind::Player);
        physics.create_body(player, RigidBodyType::Dynamic, config.player.spawn)?;
        physics.add_box_collider(
            player,
            config.player.display_size() / 2.0,
            Vec2::ZERO,
            0.0,
            0.0,
        )?;
        physics.lock_rotations(player, true);

        let camera = Camera2D::new(Vec2::ZERO, config.camera.viewport)
            .with_zoom(config.camera.zoom)
            .with_bounds(level.bounds());

        log::info!(
            "Scene ready: {} ground colliders, {} coins, {} flags",
            ground.len(),
            world.count(EntityKind::Coin),
            world.count(EntityKind::Flag)
        );

        Ok(Self {
            clock: GameClock::new(config.physics.fixed_rate),
            controller: PlayerController::new(&config),
            config,
            level,
            world,
            physics,
            camera,
            effects: ParticleEffects::new(),
            hud: HudLayer::new(),
            player,
            markers,
            ground,
            won: false,
            win_text: None,
            last_state: None,
        })
    }

    /// Advance the scene by one frame.
    pub fn update(
        &mut self,
        controls: &dyn Controls,
        audio: &mut dyn SoundPlayer,
        dt: Duration,
    ) -> Result<()> {
        if controls.just_pressed(Action::Restart) {
            return self.restart();
        }
        if controls.just_pressed(Action::DebugToggle) {
            let enabled = !self.physics.debug_draw();
            self.physics.set_debug_draw(enabled);
            log::debug!("Physics debug drawing {}", if enabled { "on" } else { "off" });
        }

        let delta = self.clock.advance(dt);
        let step = self.clock.fixed_delta_time().as_secs_f32();
        while self.clock.should_run_fixed_update() {
            self.physics.step(step);
            self.handle_overlaps(audio);
        }

        let mut body = ArcadeBody::new(
            &mut self.physics,
            self.player,
            self.config.player.display_size(),
        );
        let mut feedback = SceneFeedback {
            effects: &mut self.effects,
            audio,
        };
        let state = self.controller.update(
            controls,
            &mut body,
            &mut self.camera,
            &mut feedback,
            delta,
        );
        self.last_state = Some(state);

        self.effects.update(delta.as_secs_f32());
        Ok(())
    }

    /// Rebuild the scene from its level and config: coins come back, the
    /// player respawns and a won game is unpaused.
    pub fn restart(&mut self) -> Result<()> {
        log::info!("Restarting scene");
        *self = Self::new(self.config.clone(), self.level.clone())?;
        Ok(())
    }

    fn handle_overlaps(&mut self, audio: &mut dyn SoundPlayer) {
        for event in self.physics.drain_events() {
            let Some(other) = event.trigger_partner(self.player) else {
                continue;
            };
            match self.world.kind(other) {
                Some(EntityKind::Coin) => self.collect_coin(other, audio),
                Some(EntityKind::Flag) => self.reach_flag(),
                _ => {}
            }
        }
    }

    fn collect_coin(&mut self, coin: EntityId, audio: &mut dyn SoundPlayer) {
        self.physics.remove_body(coin);
        self.world.despawn(coin);
        self.markers.remove(&coin);
        audio.play(Sound::Coin, self.config.feedback.coin_volume);
        log::debug!("Collected coin {}", coin.to_u32());
    }

    fn reach_flag(&mut self) {
        if !self.won {
            self.won = true;
            let mid = self.camera.mid_point();
            let banner = HudText::win_banner(Vec2::new(mid.x, mid.y - WIN_TEXT_RISE));
            self.win_text = Some(self.hud.add_text(banner));
            log::info!("Level complete");
        }
        self.physics.pause();
        self.clock.pause();
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn effects(&self) -> &ParticleEffects {
        &self.effects
    }

    pub fn hud(&self) -> &HudLayer {
        &self.hud
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Center of the player body.
    pub fn player_position(&self) -> Vec2 {
        self.physics.body_position(self.player).unwrap_or_default()
    }

    pub fn player_velocity(&self) -> Vec2 {
        self.physics.linear_velocity(self.player).unwrap_or_default()
    }

    /// Result of the last controller update.
    pub fn player_state(&self) -> Option<PlayerState> {
        self.last_state
    }

    /// The win banner, once the flag is reached.
    pub fn win_text(&self) -> Option<&HudText> {
        self.win_text.and_then(|id| self.hud.get(id))
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Physics and time are halted (after a win).
    pub fn is_paused(&self) -> bool {
        self.physics.is_paused()
    }

    /// Areas of the coins not yet collected.
    pub fn coins(&self) -> Vec<Rect> {
        self.markers_of(EntityKind::Coin)
    }

    pub fn flags(&self) -> Vec<Rect> {
        self.markers_of(EntityKind::Flag)
    }

    fn markers_of(&self, kind: EntityKind) -> Vec<Rect> {
        self.markers
            .iter()
            .filter(|(&e, _)| self.world.kind(e) == Some(kind))
            .map(|(_, &r)| r)
            .collect()
    }

    /// Solid level geometry.
    pub fn ground(&self) -> &[Rect] {
        &self.ground
    }

    /// Collider outlines while debug drawing is on.
    pub fn debug_shapes(&self) -> Vec<DebugShape> {
        if self.physics.debug_draw() {
            self.physics.debug_shapes()
        } else {
            Vec::new()
        }
    }
}

impl Game for PlatformerScene {
    fn update(
        &mut self,
        controls: &dyn Controls,
        audio: &mut dyn SoundPlayer,
        delta: Duration,
    ) -> Result<()> {
        PlatformerScene::update(self, controls, audio, delta)
    }
}
