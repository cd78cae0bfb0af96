//! Surface that records draw calls instead of rasterizing them.

use crate::renderer::{StrokeStyle, Surface};
use kurbo::{Point, Rect, Size, Vec2};
use tacticboard_core::shapes::SerializableColor;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Size),
    SetStrokeStyle(StrokeStyle),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    ClosePath,
    Ellipse { center: Point, radii: Vec2 },
    Rect(Rect),
    Stroke,
    FillText {
        text: String,
        position: Point,
        font_size: f64,
        color: SerializableColor,
    },
}

/// Records the calls of the last frame.
///
/// `clear` drops earlier commands, so the log always describes what is on
/// screen. Hosts can replay it into another backend or an exporter.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    available: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            available: true,
        }
    }

    /// A surface that reports itself unavailable (e.g. a detached canvas).
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `Stroke` calls recorded.
    pub fn stroke_count(&self) -> usize {
        self.commands.iter().filter(|c| **c == DrawCommand::Stroke).count()
    }
}

impl Surface for RecordingSurface {
    fn is_available(&self) -> bool {
        self.available
    }

    fn clear(&mut self, size: Size) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(size));
    }

    fn set_stroke_style(&mut self, style: &StrokeStyle) {
        self.commands.push(DrawCommand::SetStrokeStyle(style.clone()));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, point: Point) {
        self.commands.push(DrawCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.commands.push(DrawCommand::LineTo(point));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn ellipse(&mut self, center: Point, radii: Vec2) {
        self.commands.push(DrawCommand::Ellipse { center, radii });
    }

    fn rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Rect(rect));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_text(&mut self, text: &str, position: Point, font_size: f64, color: SerializableColor) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            position,
            font_size,
            color,
        });
    }
}
