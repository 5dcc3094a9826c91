//! Camera follow with directional lookahead.
//!
//! Two smoothing stages: the lookahead offset eases toward its target,
//! then the camera scroll eases toward the offset focus point.

use crate::config::CameraConfig;
use crate::math::{linear, Camera2D, Vec2};

/// Lookahead state of the camera follow.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraFollow {
    /// Horizontal offset currently applied to the focus point.
    pub current_lookahead: f32,
    /// Offset the current lookahead eases toward.
    pub lookahead_target: f32,
    config: CameraConfig,
}

impl CameraFollow {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            current_lookahead: 0.0,
            lookahead_target: 0.0,
            config: config.clone(),
        }
    }

    /// Pick the lookahead target from the horizontal speed.
    ///
    /// Returns whether the player is fast enough for lookahead.
    pub fn track_speed(&mut self, vx: f32) -> bool {
        let fast = vx.abs() >= self.config.lookahead_threshold;
        self.lookahead_target = if fast && vx != 0.0 {
            vx.signum() * self.config.lookahead
        } else {
            0.0
        };
        self.current_lookahead = linear(
            self.current_lookahead,
            self.lookahead_target,
            self.config.lookahead_lerp,
        );
        fast
    }

    /// Ease the camera scroll toward `focus` shifted by the current lookahead.
    pub fn scroll(&self, camera: &mut Camera2D, focus: Vec2) {
        let half_view = camera.view_size() / 2.0;
        let target = Vec2::new(
            focus.x + self.current_lookahead - half_view.x,
            focus.y - half_view.y,
        );
        camera.position = camera.position.lerp(target, self.config.scroll_lerp);
        camera.clamp_to_bounds();
    }

    /// Run both smoothing stages for one frame. Returns whether lookahead is active.
    pub fn update(&mut self, camera: &mut Camera2D, focus: Vec2, vx: f32) -> bool {
        let fast = self.track_speed(vx);
        self.scroll(camera, focus);
        fast
    }
}
