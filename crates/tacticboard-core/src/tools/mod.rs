//! Drawing tools and the gesture state machine.

use crate::geometry::{interpolate, smooth_path};
use crate::shapes::{Figure, Freehand, SerializableColor, Shape, Text};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Pen,
    Dashed,
    Circle,
    Square,
    Triangle,
    Eraser,
    Text,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Dashed => "dashed",
            ToolKind::Circle => "circle",
            ToolKind::Square => "square",
            ToolKind::Triangle => "triangle",
            ToolKind::Eraser => "eraser",
            ToolKind::Text => "text",
        }
    }

    /// Pen and dashed line accumulate pointer samples.
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Dashed)
    }

    /// Circle, square and triangle are dragged out as a box.
    pub fn is_figure(self) -> bool {
        matches!(self, ToolKind::Circle | ToolKind::Square | ToolKind::Triangle)
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// Waiting for a pointer press.
    #[default]
    Idle,
    /// A gesture is in progress.
    Active {
        /// Where the gesture started.
        start: Point,
        /// Latest pointer position.
        current: Point,
        /// Previous pointer position, used for eraser sweeps.
        last: Point,
        /// Shape shown while drawing.
        preview: Option<Shape>,
    },
}

/// Manages the current tool and its gesture.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool; `None` disables drawing.
    pub current_tool: Option<ToolKind>,
    /// Current state of the gesture.
    pub state: ToolState,
    /// Color applied to new shapes.
    pub color: SerializableColor,
    /// Content placed by the text tool.
    pending_text: String,
    /// Raw pointer samples for pen/dashed gestures.
    freehand_points: Vec<Point>,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: None,
            state: ToolState::Idle,
            color: SerializableColor::black(),
            pending_text: String::new(),
            freehand_points: Vec::new(),
        }
    }
}

impl ToolManager {
    /// Create a new tool manager with no tool selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: Option<ToolKind>) {
        self.current_tool = tool;
        self.cancel();
    }

    pub fn set_pending_text(&mut self, text: impl Into<String>) {
        self.pending_text = text.into();
    }

    pub fn pending_text(&self) -> &str {
        &self.pending_text
    }

    /// Begin a gesture.
    ///
    /// Returns the points the eraser should test right away (the press point
    /// for the eraser, nothing for other tools).
    pub fn begin(&mut self, point: Point) -> Vec<Point> {
        let Some(tool) = self.current_tool else {
            return Vec::new();
        };

        self.freehand_points.clear();
        let mut preview = None;
        if tool.is_freehand() {
            self.freehand_points.push(point);
            preview = self.freehand_preview(tool);
        }

        self.state = ToolState::Active {
            start: point,
            current: point,
            last: point,
            preview,
        };

        if tool == ToolKind::Eraser {
            vec![point]
        } else {
            Vec::new()
        }
    }

    /// Update the gesture with a new pointer position.
    ///
    /// Returns the interpolated eraser samples between the previous and the
    /// new position (at most `MAX_SWEEP_STEPS + 1`); empty for other tools.
    pub fn update(&mut self, point: Point) -> Vec<Point> {
        let Some(tool) = self.current_tool else {
            return Vec::new();
        };
        if tool.is_freehand() && self.is_active() {
            self.freehand_points.push(point);
        }
        let freehand_preview = if tool.is_freehand() {
            self.freehand_preview(tool)
        } else {
            None
        };
        let color = self.color;

        let ToolState::Active {
            start,
            current,
            last,
            preview,
        } = &mut self.state
        else {
            return Vec::new();
        };

        *current = point;
        let mut samples = Vec::new();
        match tool {
            ToolKind::Pen | ToolKind::Dashed => *preview = freehand_preview,
            ToolKind::Circle | ToolKind::Square | ToolKind::Triangle => {
                *preview = Some(figure_shape(tool, Figure::from_drag(*start, point, color)));
            }
            ToolKind::Eraser => samples = interpolate(*last, point).collect(),
            ToolKind::Text => {}
        }
        *last = point;
        samples
    }

    /// End the gesture and return the shape to commit, if any.
    pub fn end(&mut self) -> Option<Shape> {
        let state = std::mem::take(&mut self.state);
        let points = std::mem::take(&mut self.freehand_points);
        let (ToolState::Active { start, preview, .. }, Some(tool)) = (state, self.current_tool)
        else {
            return None;
        };

        let mut shape = match tool {
            ToolKind::Pen | ToolKind::Dashed => {
                let stroke = Freehand::from_samples(&points, self.color);
                if stroke.is_none() {
                    log::debug!("Discarded {} stroke with {} point(s)", tool.name(), points.len());
                }
                stroke.map(|s| freehand_shape(tool, s))
            }
            ToolKind::Circle | ToolKind::Square | ToolKind::Triangle => preview,
            ToolKind::Eraser => None,
            ToolKind::Text if self.pending_text.is_empty() => None,
            ToolKind::Text => Some(Shape::Text(Text::new(
                start,
                self.pending_text.clone(),
                self.color,
            ))),
        }?;

        shape.regenerate_id();
        log::debug!("Committed {} shape {}", shape.kind().name(), shape.id());
        Some(shape)
    }

    /// Abandon the gesture without committing anything.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
        self.freehand_points.clear();
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Get the preview shape for the current gesture.
    pub fn preview_shape(&self) -> Option<&Shape> {
        match &self.state {
            ToolState::Active { preview, .. } => preview.as_ref(),
            ToolState::Idle => None,
        }
    }

    /// Get the raw samples of the current pen/dashed gesture.
    pub fn freehand_points(&self) -> &[Point] {
        &self.freehand_points
    }

    fn freehand_preview(&self, tool: ToolKind) -> Option<Shape> {
        if self.freehand_points.is_empty() {
            return None;
        }
        let stroke = Freehand::new(smooth_path(&self.freehand_points), self.color);
        Some(freehand_shape(tool, stroke))
    }
}

fn freehand_shape(tool: ToolKind, stroke: Freehand) -> Shape {
    match tool {
        ToolKind::Dashed => Shape::Dashed(stroke),
        _ => Shape::Pen(stroke),
    }
}

fn figure_shape(tool: ToolKind, figure: Figure) -> Shape {
    match tool {
        ToolKind::Square => Shape::Square(figure),
        ToolKind::Triangle => Shape::Triangle(figure),
        _ => Shape::Circle(figure),
    }
}
