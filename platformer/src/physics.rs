use anyhow::{anyhow, Result};
use std::collections::HashMap;

use crate::config::PhysicsConfig;
use crate::controller::PlayerBody;
use crate::math::{Rect, Vec2};
use crate::world::EntityId;

use rapier2d::prelude::*;

/// How a body takes part in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RigidBodyType {
    Dynamic,
    Fixed,
}

/// Contact or overlap change between two entities, reported once per change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicsEvent {
    CollisionEnter { a: EntityId, b: EntityId },
    CollisionExit { a: EntityId, b: EntityId },
    TriggerEnter { a: EntityId, b: EntityId },
    TriggerExit { a: EntityId, b: EntityId },
}

impl PhysicsEvent {
    /// For a trigger-enter involving `entity`, the other entity.
    pub fn trigger_partner(&self, entity: EntityId) -> Option<EntityId> {
        match *self {
            PhysicsEvent::TriggerEnter { a, b } if a == entity => Some(b),
            PhysicsEvent::TriggerEnter { a, b } if b == entity => Some(a),
            _ => None,
        }
    }
}

/// Sides of a body that are pressed against solid geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blocked {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Blocked {
    /// Record a contact whose obstacle lies in direction `toward` from the body.
    fn absorb(&mut self, toward: Vec2) {
        const SIDE: f32 = 0.5;
        self.down |= toward.y > SIDE;
        self.up |= toward.y < -SIDE;
        self.right |= toward.x > SIDE;
        self.left |= toward.x < -SIDE;
    }
}

/// Kind of a collider, for debug drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugShapeKind {
    Static,
    Dynamic,
    Sensor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugShape {
    pub rect: Rect,
    pub kind: DebugShapeKind,
}

/// Arcade-style velocity controls of a dynamic body, in px/s².
#[derive(Clone, Copy, Debug, Default)]
struct ArcadeMotion {
    acceleration: Vec2,
    drag: Vec2,
}

/// One axis of Arcade velocity integration: acceleration wins, otherwise
/// linear drag slows the body toward zero without reversing it.
fn arcade_axis(velocity: f32, acceleration: f32, drag: f32, dt: f32) -> f32 {
    if acceleration != 0.0 {
        velocity + acceleration * dt
    } else if drag > 0.0 {
        let slow = drag * dt;
        if velocity - slow > 0.0 {
            velocity - slow
        } else if velocity + slow < 0.0 {
            velocity + slow
        } else {
            0.0
        }
    } else {
        velocity
    }
}

/// Rigid-body world in pixel units.
///
/// Positions are body centers in pixels; the solver works in meters using
/// `pixels_per_meter`.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,

    collision_rx: crossbeam_channel::Receiver<CollisionEvent>,
    force_rx: crossbeam_channel::Receiver<ContactForceEvent>,
    collector: ChannelEventCollector,

    bodies: HashMap<EntityId, RigidBodyHandle>,
    owners: HashMap<RigidBodyHandle, EntityId>,

    motion: HashMap<EntityId, ArcadeMotion>,
    blocked: HashMap<EntityId, Blocked>,

    gravity: Vec2,
    pixels_per_meter: f32,
    paused: bool,
    debug_draw: bool,

    events: Vec<PhysicsEvent>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    pub fn new(config: &PhysicsConfig) -> Self {
        let (collision_tx, collision_rx) = crossbeam_channel::unbounded();
        let (force_tx, force_rx) = crossbeam_channel::unbounded();
        let collector = ChannelEventCollector::new(collision_tx, force_tx);

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),

            collision_rx,
            force_rx,
            collector,

            bodies: HashMap::new(),
            owners: HashMap::new(),

            motion: HashMap::new(),
            blocked: HashMap::new(),

            gravity: config.gravity,
            pixels_per_meter: config.pixels_per_meter,
            paused: false,
            debug_draw: false,
            events: Vec::new(),
        }
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Stop simulating; `step` does nothing until `resume`.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_debug_draw(&mut self, enabled: bool) {
        self.debug_draw = enabled;
    }

    pub fn debug_draw(&self) -> bool {
        self.debug_draw
    }

    /// Create the entity's body centered at `position`, replacing any previous one.
    pub fn create_body(
        &mut self,
        entity: EntityId,
        body_type: RigidBodyType,
        position: Vec2,
    ) -> Result<()> {
        self.remove_body(entity);

        let translation = self.to_solver(position);
        let builder = match body_type {
            RigidBodyType::Fixed => RigidBodyBuilder::fixed().translation(translation),
            RigidBodyType::Dynamic => {
                self.motion.insert(entity, ArcadeMotion::default());
                self.blocked.insert(entity, Blocked::default());
                // Fast falls must not skip through thin ledges.
                RigidBodyBuilder::dynamic()
                    .translation(translation)
                    .ccd_enabled(true)
                    .can_sleep(false)
            }
        };
        let handle = self.rigid_bodies.insert(builder.build());
        self.bodies.insert(entity, handle);
        self.owners.insert(handle, entity);
        Ok(())
    }

    /// Remove the entity's body with its colliders.
    pub fn remove_body(&mut self, entity: EntityId) -> bool {
        self.motion.remove(&entity);
        self.blocked.remove(&entity);
        let Some(handle) = self.bodies.remove(&entity) else {
            return false;
        };
        self.owners.remove(&handle);
        self.rigid_bodies
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Add a solid box collider with material properties.
    pub fn add_box_collider(
        &mut self,
        entity: EntityId,
        half_extents: Vec2,
        offset: Vec2,
        friction: f32,
        restitution: f32,
    ) -> Result<()> {
        let body = self.body_handle(entity)?;

        let half = self.to_solver(half_extents);
        let collider = ColliderBuilder::new(SharedShape::cuboid(half.x, half.y))
            .translation(self.to_solver(offset))
            .friction(friction)
            .restitution(restitution)
            .sensor(false)
            .build();

        self.colliders
            .insert_with_parent(collider, body, &mut self.rigid_bodies);

        Ok(())
    }

    /// Add a box sensor (trigger volume).
    pub fn add_box_sensor(
        &mut self,
        entity: EntityId,
        half_extents: Vec2,
        offset: Vec2,
    ) -> Result<()> {
        let body = self.body_handle(entity)?;

        let half = self.to_solver(half_extents);
        let collider = ColliderBuilder::new(SharedShape::cuboid(half.x, half.y))
            .translation(self.to_solver(offset))
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        self.colliders
            .insert_with_parent(collider, body, &mut self.rigid_bodies);

        Ok(())
    }

    /// Step simulation by fixed dt (seconds). Does nothing while paused.
    pub fn step(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        self.apply_motion(dt);
        self.integration_parameters.dt = dt;

        let gravity = self.to_solver(self.gravity);
        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &self.collector,
        );

        self.update_blocked();
        self.collect_events();
    }

    /// Take the events reported since the last drain.
    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        std::mem::take(&mut self.events)
    }

    /// Center of the entity's body.
    pub fn body_position(&self, entity: EntityId) -> Option<Vec2> {
        self.body(entity).map(|b| self.from_solver(b.translation()))
    }

    pub fn set_body_position(&mut self, entity: EntityId, pos: Vec2) {
        let translation = self.to_solver(pos);
        if let Some(body) = self.body_mut(entity) {
            body.set_translation(translation, true);
        }
    }

    /// Velocity in px/s.
    pub fn linear_velocity(&self, entity: EntityId) -> Option<Vec2> {
        self.body(entity).map(|b| self.from_solver(b.linvel()))
    }

    pub fn set_linear_velocity(&mut self, entity: EntityId, vel: Vec2) {
        let linvel = self.to_solver(vel);
        if let Some(body) = self.body_mut(entity) {
            body.set_linvel(linvel, true);
        }
    }

    pub fn lock_rotations(&mut self, entity: EntityId, locked: bool) {
        if let Some(body) = self.body_mut(entity) {
            body.lock_rotations(locked, true);
        }
    }

    /// Constant acceleration applied before every step (px/s²).
    pub fn set_acceleration(&mut self, entity: EntityId, acceleration: Vec2) {
        if let Some(motion) = self.motion.get_mut(&entity) {
            motion.acceleration = acceleration;
        }
    }

    pub fn acceleration(&self, entity: EntityId) -> Vec2 {
        self.motion
            .get(&entity)
            .map(|m| m.acceleration)
            .unwrap_or_default()
    }

    /// Linear drag applied on axes without acceleration (px/s²).
    pub fn set_drag(&mut self, entity: EntityId, drag: Vec2) {
        if let Some(motion) = self.motion.get_mut(&entity) {
            motion.drag = drag;
        }
    }

    pub fn drag(&self, entity: EntityId) -> Vec2 {
        self.motion.get(&entity).map(|m| m.drag).unwrap_or_default()
    }

    /// Contact sides of a dynamic body as of the last step.
    pub fn blocked(&self, entity: EntityId) -> Blocked {
        self.blocked.get(&entity).copied().unwrap_or_default()
    }

    pub fn has_body(&self, entity: EntityId) -> bool {
        self.bodies.contains_key(&entity)
    }

    /// Number of bodies in the world.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// World-space bounding boxes of every collider.
    pub fn debug_shapes(&self) -> Vec<DebugShape> {
        let ppm = self.pixels_per_meter;
        self.colliders
            .iter()
            .map(|(_, collider)| {
                let aabb = collider.compute_aabb();
                let kind = if collider.is_sensor() {
                    DebugShapeKind::Sensor
                } else if collider
                    .parent()
                    .and_then(|h| self.rigid_bodies.get(h))
                    .map_or(false, |b| b.is_dynamic())
                {
                    DebugShapeKind::Dynamic
                } else {
                    DebugShapeKind::Static
                };
                DebugShape {
                    rect: Rect::new(
                        aabb.mins.x * ppm,
                        aabb.mins.y * ppm,
                        (aabb.maxs.x - aabb.mins.x) * ppm,
                        (aabb.maxs.y - aabb.mins.y) * ppm,
                    ),
                    kind,
                }
            })
            .collect()
    }

    fn body_handle(&self, entity: EntityId) -> Result<RigidBodyHandle> {
        match self.bodies.get(&entity) {
            Some(&handle) => Ok(handle),
            None => Err(anyhow!("no body for entity {}", entity.to_u32())),
        }
    }

    fn body(&self, entity: EntityId) -> Option<&RigidBody> {
        self.rigid_bodies.get(*self.bodies.get(&entity)?)
    }

    fn body_mut(&mut self, entity: EntityId) -> Option<&mut RigidBody> {
        self.rigid_bodies.get_mut(*self.bodies.get(&entity)?)
    }

    fn to_solver(&self, v: Vec2) -> Vector<Real> {
        vector![v.x / self.pixels_per_meter, v.y / self.pixels_per_meter]
    }

    fn from_solver(&self, v: &Vector<Real>) -> Vec2 {
        Vec2::new(v.x * self.pixels_per_meter, v.y * self.pixels_per_meter)
    }

    fn apply_motion(&mut self, dt: f32) {
        let ppm = self.pixels_per_meter;
        for (entity, motion) in &self.motion {
            let Some(&handle) = self.bodies.get(entity) else {
                continue;
            };
            let Some(body) = self.rigid_bodies.get_mut(handle) else {
                continue;
            };
            let v = *body.linvel();
            let vx = arcade_axis(v.x * ppm, motion.acceleration.x, motion.drag.x, dt);
            let vy = arcade_axis(v.y * ppm, motion.acceleration.y, motion.drag.y, dt);
            body.set_linvel(vector![vx / ppm, vy / ppm], true);
        }
    }

    fn update_blocked(&mut self) {
        for blocked in self.blocked.values_mut() {
            *blocked = Blocked::default();
        }

        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let (Some(c1), Some(c2)) = (
                self.colliders.get(pair.collider1),
                self.colliders.get(pair.collider2),
            ) else {
                continue;
            };
            let (Some(b1), Some(b2)) = (c1.parent(), c2.parent()) else {
                continue;
            };

            for manifold in &pair.manifolds {
                if manifold.points.is_empty() {
                    continue;
                }
                // The normal points from collider1 toward collider2.
                let n = Vec2::new(manifold.data.normal.x, manifold.data.normal.y);
                for (body, toward) in [(b1, n), (b2, -n)] {
                    let Some(entity) = self.owners.get(&body) else {
                        continue;
                    };
                    if let Some(blocked) = self.blocked.get_mut(entity) {
                        blocked.absorb(toward);
                    }
                }
            }
        }
    }

    fn collect_events(&mut self) {
        while let Ok(event) = self.collision_rx.try_recv() {
            let (c1, c2, started) = match event {
                CollisionEvent::Started(c1, c2, _) => (c1, c2, true),
                CollisionEvent::Stopped(c1, c2, _) => (c1, c2, false),
            };
            let Some((a, b, sensor)) = self.pair_entities(c1, c2) else {
                continue;
            };
            self.events.push(match (sensor, started) {
                (true, true) => PhysicsEvent::TriggerEnter { a, b },
                (true, false) => PhysicsEvent::TriggerExit { a, b },
                (false, true) => PhysicsEvent::CollisionEnter { a, b },
                (false, false) => PhysicsEvent::CollisionExit { a, b },
            });
        }
        // Force events are never enabled.
        while self.force_rx.try_recv().is_ok() {}
    }

    /// Owning entities of two colliders and whether either is a sensor.
    fn pair_entities(
        &self,
        c1: ColliderHandle,
        c2: ColliderHandle,
    ) -> Option<(EntityId, EntityId, bool)> {
        let owner = |handle: ColliderHandle| {
            let collider = self.colliders.get(handle)?;
            let entity = *self.owners.get(&collider.parent()?)?;
            Some((entity, collider.is_sensor()))
        };
        let (a, a_sensor) = owner(c1)?;
        let (b, b_sensor) = owner(c2)?;
        Some((a, b, a_sensor || b_sensor))
    }
}

/// A dynamic body seen through the controller's `PlayerBody` interface.
///
/// Positions are the top-left corner of a body of `size` pixels.
pub struct ArcadeBody<'w> {
    physics: &'w mut PhysicsWorld,
    entity: EntityId,
    size: Vec2,
}

impl<'w> ArcadeBody<'w> {
    pub fn new(physics: &'w mut PhysicsWorld, entity: EntityId, size: Vec2) -> Self {
        Self {
            physics,
            entity,
            size,
        }
    }

    fn center(&self) -> Vec2 {
        self.physics.body_position(self.entity).unwrap_or_default()
    }
}

impl PlayerBody for ArcadeBody<'_> {
    fn position(&self) -> Vec2 {
        self.center() - self.size / 2.0
    }

    fn set_position_x(&mut self, x: f32) {
        let center = self.center();
        self.physics
            .set_body_position(self.entity, Vec2::new(x + self.size.x / 2.0, center.y));
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn velocity(&self) -> Vec2 {
        self.physics
            .linear_velocity(self.entity)
            .unwrap_or_default()
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.physics.set_linear_velocity(self.entity, velocity);
    }

    fn set_acceleration_x(&mut self, ax: f32) {
        let ay = self.physics.acceleration(self.entity).y;
        self.physics.set_acceleration(self.entity, Vec2::new(ax, ay));
    }

    fn set_drag_x(&mut self, drag: f32) {
        let dy = self.physics.drag(self.entity).y;
        self.physics.set_drag(self.entity, Vec2::new(drag, dy));
    }

    fn blocked(&self) -> Blocked {
        self.physics.blocked(self.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{EntityKind, World};

    const DT: f32 = 1.0 / 60.0;

    struct Fixture {
        physics: PhysicsWorld,
        player: EntityId,
        ground: EntityId,
    }

    /// A 24px player above a wide floor whose top edge is at y = 84.
    fn fixture(world: &mut World) -> Fixture {
        let mut physics = PhysicsWorld::default();
        let ground = world.spawn(EntityKind::Terrain);
        physics
            .create_body(ground, RigidBodyType::Fixed, Vec2::new(0.0, 100.0))
            .unwrap();
        physics
            .add_box_collider(ground, Vec2::new(400.0, 16.0), Vec2::ZERO, 0.0, 0.0)
            .unwrap();

        let player = world.spawn(EntityKind::Player);
        physics
            .create_body(player, RigidBodyType::Dynamic, Vec2::new(0.0, 0.0))
            .unwrap();
        physics
            .add_box_collider(player, Vec2::new(12.0, 12.0), Vec2::ZERO, 0.0, 0.0)
            .unwrap();
        physics.lock_rotations(player, true);

        Fixture {
            physics,
            player,
            ground,
        }
    }

    #[test]
    fn arcade_acceleration_beats_drag() {
        assert_eq!(arcade_axis(10.0, 600.0, 1000.0, 0.5), 310.0);
    }

    #[test]
    fn arcade_drag_stops_without_reversing() {
        assert_eq!(arcade_axis(100.0, 0.0, 1000.0, 0.05), 50.0);
        assert_eq!(arcade_axis(-100.0, 0.0, 1000.0, 0.05), -50.0);
        assert_eq!(arcade_axis(30.0, 0.0, 1000.0, 0.05), 0.0);
        assert_eq!(arcade_axis(30.0, 0.0, 0.0, 0.05), 30.0);
    }

    #[test]
    fn falling_body_lands_and_reports_blocked_down() {
        let mut world = World::new();
        let mut f = fixture(&mut world);
        assert_eq!(f.physics.blocked(f.player), Blocked::default());

        for _ in 0..120 {
            f.physics.step(DT);
        }

        let blocked = f.physics.blocked(f.player);
        assert!(blocked.down, "expected ground contact, got {blocked:?}");
        assert!(!blocked.left && !blocked.right && !blocked.up);

        let pos = f.physics.body_position(f.player).unwrap();
        assert!((pos.y - 72.0).abs() < 1.0, "resting center y = {}", pos.y);
        assert!(f.physics.linear_velocity(f.player).unwrap().y.abs() < 5.0);
        // Fixed bodies never track contact sides.
        assert_eq!(f.physics.blocked(f.ground), Blocked::default());
    }

    fn add_wall(physics: &mut PhysicsWorld, world: &mut World, center: Vec2, half: Vec2) {
        let wall = world.spawn(EntityKind::Terrain);
        physics.create_body(wall, RigidBodyType::Fixed, center).unwrap();
        physics
            .add_box_collider(wall, half, Vec2::ZERO, 0.0, 0.0)
            .unwrap();
    }

    #[test]
    fn pushing_into_walls_reports_the_touched_side() {
        let mut world = World::new();
        let mut f = fixture(&mut world);
        add_wall(&mut f.physics, &mut world, Vec2::new(100.0, 60.0), Vec2::new(8.0, 40.0));
        add_wall(&mut f.physics, &mut world, Vec2::new(-100.0, 60.0), Vec2::new(8.0, 40.0));
        for _ in 0..60 {
            f.physics.step(DT);
        }

        f.physics.set_acceleration(f.player, Vec2::new(600.0, 0.0));
        for _ in 0..90 {
            f.physics.step(DT);
        }
        let blocked = f.physics.blocked(f.player);
        assert!(blocked.right && blocked.down, "got {blocked:?}");
        assert!(!blocked.left && !blocked.up);
        let pos = f.physics.body_position(f.player).unwrap();
        assert!((pos.x - 80.0).abs() < 1.0, "center x = {}", pos.x);

        f.physics.set_linear_velocity(f.player, Vec2::ZERO);
        f.physics.set_acceleration(f.player, Vec2::new(-600.0, 0.0));
        for _ in 0..120 {
            f.physics.step(DT);
        }
        let blocked = f.physics.blocked(f.player);
        assert!(blocked.left && blocked.down, "got {blocked:?}");
        assert!(!blocked.right && !blocked.up);
    }

    #[test]
    fn rising_into_a_ceiling_reports_blocked_up() {
        let mut world = World::new();
        let mut f = fixture(&mut world);
        add_wall(&mut f.physics, &mut world, Vec2::new(0.0, -100.0), Vec2::new(400.0, 16.0));
        f.physics.set_gravity(Vec2::new(0.0, -1500.0));
        for _ in 0..120 {
            f.physics.step(DT);
        }
        let blocked = f.physics.blocked(f.player);
        assert!(blocked.up, "got {blocked:?}");
        assert!(!blocked.down && !blocked.left && !blocked.right);
    }

    #[test]
    fn acceleration_then_drag_on_frictionless_floor() {
        let mut world = World::new();
        let mut f = fixture(&mut world);
        for _ in 0..60 {
            f.physics.step(DT);
        }

        f.physics.set_acceleration(f.player, Vec2::new(600.0, 0.0));
        for _ in 0..30 {
            f.physics.step(DT);
        }
        let vx = f.physics.linear_velocity(f.player).unwrap().x;
        assert!((vx - 300.0).abs() < 5.0, "vx after half a second = {vx}");

        f.physics.set_acceleration(f.player, Vec2::ZERO);
        f.physics.set_drag(f.player, Vec2::new(1000.0, 0.0));
        for _ in 0..30 {
            f.physics.step(DT);
        }
        assert_eq!(f.physics.linear_velocity(f.player).unwrap().x, 0.0);
    }

    #[test]
    fn sensor_overlap_emits_trigger_enter() {
        let mut world = World::new();
        let mut f = fixture(&mut world);
        let coin = world.spawn(EntityKind::Coin);
        f.physics
            .create_body(coin, RigidBodyType::Fixed, Vec2::new(0.0, 50.0))
            .unwrap();
        f.physics
            .add_box_sensor(coin, Vec2::new(8.0, 8.0), Vec2::ZERO)
            .unwrap();

        let mut events = Vec::new();
        for _ in 0..60 {
            f.physics.step(DT);
            events.extend(f.physics.drain_events());
        }

        let partners: Vec<EntityId> = events
            .iter()
            .filter_map(|e| e.trigger_partner(f.player))
            .collect();
        assert_eq!(partners, vec![coin]);
    }

    #[test]
    fn paused_world_does_not_move() {
        let mut world = World::new();
        let mut f = fixture(&mut world);
        f.physics.pause();
        for _ in 0..10 {
            f.physics.step(DT);
        }
        assert_eq!(f.physics.body_position(f.player), Some(Vec2::ZERO));

        f.physics.resume();
        f.physics.step(DT);
        assert!(f.physics.body_position(f.player).unwrap().y > 0.0);
    }

    #[test]
    fn arcade_body_uses_top_left_positions() {
        let mut world = World::new();
        let mut f = fixture(&mut world);
        let mut body = ArcadeBody::new(&mut f.physics, f.player, Vec2::new(24.0, 24.0));
        assert_eq!(body.position(), Vec2::new(-12.0, -12.0));

        body.set_position_x(100.0);
        body.set_acceleration_x(-50.0);
        body.set_drag_x(20.0);
        assert_eq!(body.position(), Vec2::new(100.0, -12.0));
        assert_eq!(f.physics.acceleration(f.player), Vec2::new(-50.0, 0.0));
        assert_eq!(f.physics.drag(f.player), Vec2::new(20.0, 0.0));
    }

    #[test]
    fn removing_a_body_forgets_it() {
        let mut world = World::new();
        let mut f = fixture(&mut world);
        assert!(f.physics.remove_body(f.ground));
        assert!(!f.physics.remove_body(f.ground));
        assert!(!f.physics.has_body(f.ground));
        assert_eq!(f.physics.body_count(), 1);
        assert_eq!(f.physics.debug_shapes().len(), 1);
        assert_eq!(f.physics.debug_shapes()[0].kind, DebugShapeKind::Dynamic);
    }
}
