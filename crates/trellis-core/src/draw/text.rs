//! Text styling and measurement.
//!
//! Composition only needs the bounding box of a label. That box comes from a
//! [`TextMeasure`] implementation supplied by the host:
//!
//! - [`CosmicTextMeasure`] shapes text with real fonts through cosmic-text.
//! - [`MonospaceMeasure`] uses fixed per-character metrics, for headless
//!   hosts and reproducible tests.

use std::sync::Mutex;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{debug, info};

use crate::{color::Color, geometry::Size};

/// Font and color of a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: f32,
    color: Option<Color>,
}

impl TextDefinition {
    pub fn new(font_family: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            color: None,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Font size in points.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.font_family = family.into();
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self::new("Arial", 15.0)
    }
}

/// Text content together with its style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    content: String,
    style: TextDefinition,
}

impl StyledText {
    pub fn new(content: impl Into<String>, style: TextDefinition) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn style(&self) -> &TextDefinition {
        &self.style
    }
}

/// Measures the unscaled bounding box of a piece of styled text.
///
/// Implementations must be deterministic: the same text and style always
/// measure the same.
pub trait TextMeasure {
    fn measure(&self, text: &StyledText) -> Size;
}

/// Measures text by shaping it with system fonts.
///
/// Each instance owns its `FontSystem`; loading fonts is expensive, so hosts
/// should create one measurer and reuse it across compilations.
pub struct CosmicTextMeasure {
    font_system: Mutex<FontSystem>,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CosmicTextMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicTextMeasure").finish_non_exhaustive()
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn measure(&self, text: &StyledText) -> Size {
        let content = text.content();
        if content.is_empty() {
            return Size::default();
        }

        // A poisoned lock only means another measurement panicked; the font
        // database itself is still usable.
        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Points to pixels at standard DPI.
        let font_size_px = text.style().font_size() * 1.33;
        let metrics = Metrics::new(font_size_px, font_size_px * 1.15);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(text.style().font_family()));
        buffer.set_size(None, None);
        buffer.set_text(content, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        let mut runs = 0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
            runs += 1;
        }

        if runs == 0 {
            debug!(content; "No layout runs, falling back to estimated width");
            max_width = content.chars().count() as f32 * font_size_px * 0.55;
            total_height = metrics.line_height;
        }

        Size::new(max_width, total_height)
    }
}

/// Measures text with fixed metrics expressed as multiples of the font size.
///
/// Width is the longest line's character count times `advance`, height is
/// the line count times `line_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    advance: f32,
    line_height: f32,
}

impl MonospaceMeasure {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(0.6, 1.2)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &StyledText) -> Size {
        let content = text.content();
        if content.is_empty() {
            return Size::default();
        }
        let font_size = text.style().font_size();
        let longest = content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let lines = content.lines().count().max(1);
        Size::new(
            longest as f32 * font_size * self.advance,
            lines as f32 * font_size * self.line_height,
        )
    }
}
