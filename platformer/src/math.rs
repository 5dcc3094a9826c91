use glam::{Mat4, Vec2 as GlamVec2, Vec3};
use serde::{Deserialize, Serialize};

/// 2D vector type used throughout the platformer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn to_glam(&self) -> GlamVec2 {
        GlamVec2::new(self.x, self.y)
    }

    /// Linearly interpolates between two vectors, per component.
    pub fn lerp(self, rhs: Self, t: f32) -> Self {
        Self::new(linear(self.x, rhs.x, t), linear(self.y, rhs.y, t))
    }

    /// Returns a vector with component-wise absolute values.
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from(value: (f32, f32)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f32> for Vec2 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

/// Linear interpolation from `from` toward `to` by factor `t`.
pub fn linear(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Axis-aligned rectangle in world units, anchored at its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Camera describing the visible part of the world.
///
/// `position` is the scroll offset: the world point shown at the top-left
/// corner of the viewport. Zoom scales around that corner, so the visible
/// world span is `viewport / zoom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
    /// Viewport size in screen pixels.
    pub viewport: Vec2,
    /// World area the view is kept inside of, if any.
    pub bounds: Option<Rect>,
}

impl Camera2D {
    pub fn new(position: Vec2, viewport: Vec2) -> Self {
        Self {
            position,
            zoom: 1.0,
            viewport,
            bounds: None,
        }
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Size of the visible world area.
    pub fn view_size(&self) -> Vec2 {
        self.viewport / self.zoom
    }

    /// The visible world rectangle.
    pub fn world_view(&self) -> Rect {
        let size = self.view_size();
        Rect::new(self.position.x, self.position.y, size.x, size.y)
    }

    /// Center of the visible world rectangle.
    pub fn mid_point(&self) -> Vec2 {
        self.world_view().center()
    }

    /// Keep the view inside `bounds`; a view larger than the bounds is centered on them.
    pub fn clamp_to_bounds(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let view = self.view_size();
        self.position.x = clamp_axis(self.position.x, bounds.x, bounds.w, view.x);
        self.position.y = clamp_axis(self.position.y, bounds.y, bounds.h, view.y);
    }

    pub fn view_projection(&self) -> Mat4 {
        let projection =
            Mat4::orthographic_rh_gl(0.0, self.viewport.x, self.viewport.y, 0.0, -1.0, 1.0);

        let translation =
            Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0));
        let zoom = Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0));

        projection * zoom * translation
    }

    /// Converts screen coordinates to world coordinates using this camera.
    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        Vec2::new(
            screen_pos.x / self.zoom + self.position.x,
            screen_pos.y / self.zoom + self.position.y,
        )
    }

    /// Converts world coordinates to screen coordinates using this camera.
    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        Vec2::new(
            (world_pos.x - self.position.x) * self.zoom,
            (world_pos.y - self.position.y) * self.zoom,
        )
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::new(1280.0, 720.0))
    }
}

fn clamp_axis(scroll: f32, start: f32, extent: f32, view: f32) -> f32 {
    if view >= extent {
        start + (extent - view) / 2.0
    } else {
        scroll.clamp(start, start + extent - view)
    }
}
