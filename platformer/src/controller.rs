//! Per-frame player control: running, wall sliding, jumping, footsteps and
//! the camera follow.
//!
//! The controller never talks to the physics world, the particle system or
//! the audio device directly. It reads and writes the player body through
//! [`PlayerBody`], reads input through [`Controls`] and requests effects
//! and sounds through [`Feedback`], so it runs the same against the rapier
//! world and against the simple bodies used in tests.

use std::time::Duration;

use crate::audio::Sound;
use crate::camera::CameraFollow;
use crate::config::{FeedbackConfig, JumpConfig, MovementConfig, PlatformerConfig, WallConfig};
use crate::input::{Action, Controls};
use crate::math::{Camera2D, Vec2};
use crate::particles::Effect;
use crate::physics::Blocked;

/// The player's physics body as the controller sees it.
pub trait PlayerBody {
    /// Top-left corner of the body.
    fn position(&self) -> Vec2;

    /// Move the body horizontally so its left edge is at `x`.
    fn set_position_x(&mut self, x: f32);

    fn size(&self) -> Vec2;

    fn velocity(&self) -> Vec2;

    fn set_velocity(&mut self, velocity: Vec2);

    /// Constant horizontal acceleration applied by the physics step.
    fn set_acceleration_x(&mut self, ax: f32);

    /// Horizontal drag, effective while the acceleration is zero.
    fn set_drag_x(&mut self, drag: f32);

    /// Sides touching solid geometry after the last physics step.
    fn blocked(&self) -> Blocked;

    fn center(&self) -> Vec2 {
        self.position() + self.size() / 2.0
    }
}

/// Visual and audio side effects requested by the controller.
pub trait Feedback {
    /// Start (or keep running) a continuous effect anchored at `at`.
    fn start_effect(&mut self, effect: Effect, at: Vec2, velocity: Vec2);

    fn stop_effect(&mut self, effect: Effect);

    /// Emit a one-shot burst.
    fn explode_effect(&mut self, effect: Effect, at: Vec2);

    fn play_sound(&mut self, sound: Sound, volume: f32);
}

/// Horizontal input direction that resulted in movement this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    Ascending,
    Falling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAnimation {
    Idle,
    Walk,
    Jump,
}

/// What the renderer needs to draw the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSprite {
    pub scale: Vec2,
    /// The sprite sheet faces left; running right flips it.
    pub flip_x: bool,
    pub animation: PlayerAnimation,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpState {
    pub phase: JumpPhase,
    /// Time since the jump started. Only advances while ascending.
    pub elapsed_ms: f32,
}

impl JumpState {
    pub fn is_jumping(&self) -> bool {
        self.phase == JumpPhase::Ascending
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootstepState {
    pub cooldown_ms: f32,
    /// Index into [`FOOTSTEPS`] of the next step sound.
    pub next_index: usize,
}

/// Footstep sounds, played alternately.
pub const FOOTSTEPS: [Sound; 2] = [Sound::Footstep1, Sound::Footstep2];

/// Snapshot of the player after a controller update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerState {
    pub direction: Direction,
    pub on_ground: bool,
    pub touching_left_wall: bool,
    pub touching_right_wall: bool,
    pub vertical_velocity: f32,
    pub is_jumping: bool,
    pub jump_elapsed_ms: f32,
    pub wall_sliding: bool,
    pub phase: JumpPhase,
}

pub struct PlayerController {
    movement: MovementConfig,
    jump_config: JumpConfig,
    wall: WallConfig,
    feedback: FeedbackConfig,
    scale: f32,

    jump: JumpState,
    footsteps: FootstepState,
    sprite: PlayerSprite,
    camera_follow: CameraFollow,
}

impl PlayerController {
    pub fn new(config: &PlatformerConfig) -> Self {
        let scale = config.player.scale;
        Self {
            movement: config.movement.clone(),
            jump_config: config.jump.clone(),
            wall: config.wall.clone(),
            feedback: config.feedback.clone(),
            scale,
            jump: JumpState {
                phase: JumpPhase::Grounded,
                elapsed_ms: 0.0,
            },
            footsteps: FootstepState {
                cooldown_ms: 0.0,
                next_index: 0,
            },
            sprite: PlayerSprite {
                scale: Vec2::new(scale, scale),
                flip_x: false,
                animation: PlayerAnimation::Idle,
            },
            camera_follow: CameraFollow::new(&config.camera),
        }
    }

    pub fn jump(&self) -> &JumpState {
        &self.jump
    }

    pub fn footsteps(&self) -> &FootstepState {
        &self.footsteps
    }

    pub fn sprite(&self) -> &PlayerSprite {
        &self.sprite
    }

    pub fn camera_follow(&self) -> &CameraFollow {
        &self.camera_follow
    }

    /// Run one frame of player control.
    ///
    /// `camera` is read for the visible span before it is scrolled toward
    /// the player at the end of the frame. `dt` drives the jump timer and
    /// the footstep cooldown.
    pub fn update(
        &mut self,
        controls: &dyn Controls,
        body: &mut dyn PlayerBody,
        camera: &mut Camera2D,
        feedback: &mut dyn Feedback,
        dt: Duration,
    ) -> PlayerState {
        let dt_ms = dt.as_secs_f32() * 1000.0;
        let view = camera.world_view();
        let (camera_left, camera_right) = (view.x, view.right());

        let left = controls.held(Action::Left);
        let right = controls.held(Action::Right);
        let blocked = body.blocked();
        let size = body.size();
        let position = body.position();

        // Horizontal movement
        let margin = self.movement.edge_margin;
        let direction = if left && position.x - margin > camera_left {
            Direction::Left
        } else if right && position.x + size.x + margin < camera_right {
            Direction::Right
        } else {
            Direction::None
        };

        match direction {
            Direction::Left | Direction::Right => {
                let (sign, dust_x) = if direction == Direction::Left {
                    (-1.0, size.x / 2.0 - 10.0)
                } else {
                    (1.0, size.x / 2.0 - 35.0)
                };
                body.set_acceleration_x(sign * self.movement.acceleration);
                self.sprite.flip_x = direction == Direction::Right;
                self.sprite.animation = PlayerAnimation::Walk;

                if blocked.down {
                    feedback.start_effect(
                        Effect::Walking,
                        body.center() + Vec2::new(dust_x, size.y / 2.0 - 5.0),
                        Vec2::new(self.feedback.particle_velocity, 0.0),
                    );
                } else {
                    feedback.stop_effect(Effect::Walking);
                }
            }
            Direction::None => {
                body.set_acceleration_x(0.0);
                body.set_drag_x(self.movement.drag);
                self.sprite.animation = PlayerAnimation::Idle;
                feedback.stop_effect(Effect::Walking);
            }
        }

        // Wall slide
        let airborne = !blocked.down;
        let mut velocity = body.velocity();
        let on_left_wall = blocked.left && left;
        let on_right_wall = blocked.right && right;
        let wall_sliding = airborne && velocity.y > 0.0 && (on_left_wall || on_right_wall);

        if wall_sliding {
            velocity.y = velocity.y.min(self.wall.slide_speed);
            body.set_velocity(velocity);
            self.sprite.scale = Vec2::new(self.scale * self.wall.squash, self.scale);
            feedback.start_effect(
                Effect::WallSlide,
                body.center() + Vec2::new(size.x / 2.0 - 20.0, size.y / 2.0),
                Vec2::new(0.0, self.feedback.particle_velocity),
            );
        } else {
            self.sprite.scale = Vec2::new(self.scale, self.scale);
            feedback.stop_effect(Effect::WallSlide);
        }

        if airborne {
            self.sprite.animation = PlayerAnimation::Jump;
        }

        // Jumps
        let jump_pressed = controls.jump_pressed();
        let mut jumped = false;
        if jump_pressed && blocked.down {
            velocity.y = self.jump_config.velocity;
            body.set_velocity(velocity);
            jumped = true;
            log::debug!("Jump");
        } else if jump_pressed && wall_sliding {
            // Push off the wall being slid on.
            let away = if on_left_wall { 1.0 } else { -1.0 };
            velocity = Vec2::new(away * self.wall.jump_x, self.wall.jump_y);
            body.set_velocity(velocity);
            jumped = true;
            log::debug!("Wall jump off the {} wall", if on_left_wall { "left" } else { "right" });
        }

        if jumped {
            self.jump = JumpState {
                phase: JumpPhase::Ascending,
                elapsed_ms: 0.0,
            };
            feedback.explode_effect(
                Effect::Jump,
                body.center() + Vec2::new(size.x / 2.0 - 20.0, size.y / 2.0 - 35.0),
            );
            feedback.play_sound(Sound::Jump, self.feedback.jump_volume);
        } else if self.jump.is_jumping() {
            self.jump.elapsed_ms += dt_ms;

            if self.jump.elapsed_ms >= self.jump_config.min_jump_time_ms
                && !controls.jump_held()
                && velocity.y < 0.0
            {
                velocity.y *= self.jump_config.cutoff_damping;
                body.set_velocity(velocity);
                self.jump.phase = JumpPhase::Falling;
            }
            if velocity.y >= 0.0 {
                self.jump.phase = JumpPhase::Falling;
            }
        }

        if !self.jump.is_jumping() {
            self.jump.phase = if blocked.down {
                JumpPhase::Grounded
            } else {
                JumpPhase::Falling
            };
        }

        // Keep the player on screen and under the speed cap.
        let position = body.position();
        let clamped_x = position.x.clamp(camera_left, (camera_right - size.x).max(camera_left));
        if clamped_x != position.x {
            body.set_position_x(clamped_x);
        }
        let max_speed = self.movement.max_speed;
        let mut velocity = body.velocity();
        if velocity.x.abs() > max_speed {
            velocity.x = velocity.x.clamp(-max_speed, max_speed);
            body.set_velocity(velocity);
        }

        // Camera lookahead
        let center = body.center();
        if self.camera_follow.update(camera, center, velocity.x) {
            feedback.start_effect(
                Effect::Trail,
                center + Vec2::new(size.x / 2.0 - 20.0, size.y / 2.0 - 20.0),
                Vec2::ZERO,
            );
        } else {
            feedback.stop_effect(Effect::Trail);
        }

        // Footsteps
        self.footsteps.cooldown_ms -= dt_ms;
        if (left || right) && blocked.down && self.footsteps.cooldown_ms <= 0.0 {
            feedback.play_sound(
                FOOTSTEPS[self.footsteps.next_index],
                self.feedback.footstep_volume,
            );
            self.footsteps.next_index = (self.footsteps.next_index + 1) % FOOTSTEPS.len();
            self.footsteps.cooldown_ms = self.feedback.footstep_interval_ms;
        }

        PlayerState {
            direction,
            on_ground: blocked.down,
            touching_left_wall: blocked.left,
            touching_right_wall: blocked.right,
            vertical_velocity: velocity.y,
            is_jumping: self.jump.is_jumping(),
            jump_elapsed_ms: self.jump.elapsed_ms,
            wall_sliding,
            phase: self.jump.phase,
        }
    }
}
