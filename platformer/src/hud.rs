use crate::math::Vec2;

/// Message shown once the flag is reached.
pub const WIN_MESSAGE: &str = "YOU WIN! \n Press R to restart!";

/// Horizontal alignment of the lines of a multi-line text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Text element placed in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct HudText {
    pub text: String,
    /// World position of the text's anchor.
    pub position: Vec2,
    /// Anchor within the text box; (0.5, 0.5) centers the box on `position`.
    pub origin: Vec2,
    pub font_family: String,
    pub font_size: f32,
    pub color: [f32; 4],
    pub background: Option<[f32; 4]>,
    /// Space between the text and the edge of its background (x, y).
    pub padding: Vec2,
    pub align: TextAlign,
}

impl HudText {
    pub fn new(text: impl Into<String>, position: Vec2) -> Self {
        Self {
            text: text.into(),
            position,
            origin: Vec2::ZERO,
            font_family: "sans-serif".into(),
            font_size: 16.0,
            color: [1.0, 1.0, 1.0, 1.0],
            background: None,
            padding: Vec2::ZERO,
            align: TextAlign::Left,
        }
    }

    /// The win banner, centered on `position`.
    pub fn win_banner(position: Vec2) -> Self {
        Self {
            origin: Vec2::new(0.5, 0.5),
            font_family: "Arial".into(),
            font_size: 48.0,
            color: color_from_hex("#ffffff").unwrap_or([1.0; 4]),
            background: color_from_hex("#000000"),
            padding: Vec2::new(20.0, 10.0),
            align: TextAlign::Center,
            ..Self::new(WIN_MESSAGE, position)
        }
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` into an RGBA color.
pub fn color_from_hex(hex: &str) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#')?;
    if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}

/// Handle to a text added to a `HudLayer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HudId(u32);

/// Texts drawn on top of the world.
#[derive(Debug, Default)]
pub struct HudLayer {
    elements: Vec<(HudId, HudText)>,
    next_id: u32,
}

impl HudLayer {
    /// Create an empty HUD layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text element to the HUD.
    pub fn add_text(&mut self, text: HudText) -> HudId {
        let id = HudId(self.next_id);
        self.next_id += 1;
        self.elements.push((id, text));
        id
    }

    pub fn get(&self, id: HudId) -> Option<&HudText> {
        self.elements.iter().find(|(e, _)| *e == id).map(|(_, t)| t)
    }

    /// Texts in the order they were added.
    pub fn texts(&self) -> impl Iterator<Item = &HudText> {
        self.elements.iter().map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
