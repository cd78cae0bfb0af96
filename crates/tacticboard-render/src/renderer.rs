//! Surface abstraction and frame rendering.

use kurbo::{Point, Rect, Size, Vec2};
use tacticboard_core::canvas::Canvas;
use tacticboard_core::shapes::{SerializableColor, Shape};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Drawing surface unavailable")]
    SurfaceUnavailable,
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Stroke parameters. Caps and joins are always round.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: SerializableColor,
    pub width: f64,
    /// Dash lengths; empty for a solid line.
    pub dashes: Vec<f64>,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 2.0,
            dashes: Vec::new(),
        }
    }
}

/// Immediate-mode 2D drawing target.
///
/// Paths are built with `begin_path` followed by segment calls and drawn with
/// `stroke` using the last style set.
pub trait Surface {
    /// Whether the surface can be drawn to right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Erase everything and size the surface to `size`.
    fn clear(&mut self, size: Size);

    fn set_stroke_style(&mut self, style: &StrokeStyle);

    fn begin_path(&mut self);

    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    fn close_path(&mut self);

    /// Add an axis-aligned ellipse to the current path.
    fn ellipse(&mut self, center: Point, radii: Vec2);

    /// Add a rectangle to the current path.
    fn rect(&mut self, rect: Rect);

    /// Stroke the current path.
    fn stroke(&mut self);

    /// Fill `text` with its top-left corner at `position`.
    fn fill_text(&mut self, text: &str, position: Point, font_size: f64, color: SerializableColor);
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    /// Committed drawings, bottom to top.
    pub drawings: &'a [Shape],
    /// Shape being drawn, rendered above the drawings.
    pub preview: Option<&'a Shape>,
    /// Canvas size in pixels.
    pub size: Size,
    pub stroke_width: f64,
    /// Dash lengths for dashed lines.
    pub dash_pattern: &'a [f64],
    /// Font size for text, in pixels.
    pub font_size: f64,
}

impl<'a> RenderContext<'a> {
    /// Context for the canvas's current board, preview and config.
    pub fn new(canvas: &'a Canvas) -> Self {
        let config = canvas.config();
        Self {
            drawings: &canvas.board().drawings,
            preview: canvas.preview_shape(),
            size: canvas.size(),
            stroke_width: config.stroke_width,
            dash_pattern: &config.dash_pattern,
            font_size: config.font_size,
        }
    }

    /// Context for a bare list of drawings with default styling.
    pub fn from_drawings(drawings: &'a [Shape], size: Size) -> Self {
        Self {
            drawings,
            preview: None,
            size,
            stroke_width: 2.0,
            dash_pattern: &[5.0, 5.0],
            font_size: 16.0,
        }
    }

    pub fn with_preview(mut self, preview: Option<&'a Shape>) -> Self {
        self.preview = preview;
        self
    }
}

/// Draw a full frame: clear, committed drawings in order, then the preview.
pub fn render_frame<S: Surface + ?Sized>(surface: &mut S, ctx: &RenderContext) -> RenderResult<()> {
    if !surface.is_available() {
        return Err(RendererError::SurfaceUnavailable);
    }
    if !(ctx.size.width.is_finite() && ctx.size.height.is_finite()) {
        return Err(RendererError::RenderFailed(format!(
            "invalid canvas size {}x{}",
            ctx.size.width, ctx.size.height
        )));
    }

    surface.clear(ctx.size);
    for shape in ctx.drawings {
        render_shape(surface, shape, ctx);
    }
    if let Some(preview) = ctx.preview {
        render_shape(surface, preview, ctx);
    }
    Ok(())
}

/// Like [`render_frame`], but a failed frame is logged and skipped.
pub fn render_frame_or_skip<S: Surface + ?Sized>(surface: &mut S, ctx: &RenderContext) {
    if let Err(e) = render_frame(surface, ctx) {
        log::debug!("Skipping frame: {}", e);
    }
}

/// Draw a single shape.
pub fn render_shape<S: Surface + ?Sized>(surface: &mut S, shape: &Shape, ctx: &RenderContext) {
    let dashes = match shape {
        Shape::Dashed(_) => ctx.dash_pattern.to_vec(),
        _ => Vec::new(),
    };
    surface.set_stroke_style(&StrokeStyle {
        color: shape.color(),
        width: ctx.stroke_width,
        dashes,
    });

    match shape {
        Shape::Pen(stroke) | Shape::Dashed(stroke) => {
            let Some((first, rest)) = stroke.points.split_first() else {
                return;
            };
            surface.begin_path();
            surface.move_to(*first);
            for point in rest {
                surface.line_to(*point);
            }
            surface.stroke();
        }
        Shape::Circle(figure) => {
            surface.begin_path();
            surface.ellipse(figure.center, Vec2::new(figure.width / 2.0, figure.height / 2.0));
            surface.stroke();
        }
        Shape::Square(figure) => {
            surface.begin_path();
            surface.rect(figure.as_rect());
            surface.stroke();
        }
        Shape::Triangle(figure) => {
            let [apex, right, left] = figure.triangle_vertices();
            surface.begin_path();
            surface.move_to(apex);
            surface.line_to(right);
            surface.line_to(left);
            surface.close_path();
            surface.stroke();
        }
        Shape::Text(text) => {
            surface.fill_text(&text.content, text.position, ctx.font_size, text.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use tacticboard_core::shapes::{Figure, Freehand, Text};
    use tacticboard_core::tools::ToolKind;
    use tacticboard_core::input::{PointerEvent, PointerTarget};

    fn black() -> SerializableColor {
        SerializableColor::black()
    }

    fn size() -> Size {
        Size::new(600.0, 400.0)
    }

    #[test]
    fn test_frame_order() {
        let drawings = vec![
            Shape::Square(Figure::new(Point::new(10.0, 10.0), 4.0, 4.0, black())),
            Shape::Circle(Figure::new(Point::new(50.0, 50.0), 20.0, 10.0, black())),
        ];
        let preview = Shape::Pen(Freehand::new(
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            black(),
        ));
        let ctx = RenderContext::from_drawings(&drawings, size()).with_preview(Some(&preview));

        let mut surface = RecordingSurface::new();
        render_frame(&mut surface, &ctx).unwrap();

        let commands = surface.commands();
        assert_eq!(commands[0], DrawCommand::Clear(size()));
        let strokes: Vec<usize> = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == DrawCommand::Stroke)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(strokes.len(), 3);
        let rect_at = commands.iter().position(|c| matches!(c, DrawCommand::Rect(_))).unwrap();
        let ellipse_at = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Ellipse { .. }))
            .unwrap();
        let line_at = commands.iter().position(|c| matches!(c, DrawCommand::LineTo(_))).unwrap();
        assert!(rect_at < ellipse_at && ellipse_at < line_at);
    }

    #[test]
    fn test_circle_uses_half_extents() {
        let drawings = vec![Shape::Circle(Figure::new(
            Point::new(50.0, 50.0),
            20.0,
            10.0,
            black(),
        ))];
        let mut surface = RecordingSurface::new();
        render_frame(&mut surface, &RenderContext::from_drawings(&drawings, size())).unwrap();
        assert!(surface.commands().contains(&DrawCommand::Ellipse {
            center: Point::new(50.0, 50.0),
            radii: Vec2::new(10.0, 5.0),
        }));
    }

    #[test]
    fn test_square_is_centered() {
        let drawings = vec![Shape::Square(Figure::new(
            Point::new(50.0, 50.0),
            20.0,
            10.0,
            black(),
        ))];
        let mut surface = RecordingSurface::new();
        render_frame(&mut surface, &RenderContext::from_drawings(&drawings, size())).unwrap();
        assert!(surface.commands().contains(&DrawCommand::Rect(Rect::new(40.0, 45.0, 60.0, 55.0))));
    }

    #[test]
    fn test_triangle_path() {
        let drawings = vec![Shape::Triangle(Figure::new(
            Point::new(10.0, 10.0),
            20.0,
            10.0,
            black(),
        ))];
        let mut surface = RecordingSurface::new();
        render_frame(&mut surface, &RenderContext::from_drawings(&drawings, size())).unwrap();
        let path: Vec<&DrawCommand> = surface
            .commands()
            .iter()
            .skip_while(|c| **c != DrawCommand::BeginPath)
            .collect();
        assert_eq!(
            path,
            vec![
                &DrawCommand::BeginPath,
                &DrawCommand::MoveTo(Point::new(10.0, 5.0)),
                &DrawCommand::LineTo(Point::new(20.0, 15.0)),
                &DrawCommand::LineTo(Point::new(0.0, 15.0)),
                &DrawCommand::ClosePath,
                &DrawCommand::Stroke,
            ]
        );
    }

    #[test]
    fn test_only_dashed_gets_dashes() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let drawings = vec![
            Shape::Pen(Freehand::new(points.clone(), black())),
            Shape::Dashed(Freehand::new(points, black())),
        ];
        let mut surface = RecordingSurface::new();
        render_frame(&mut surface, &RenderContext::from_drawings(&drawings, size())).unwrap();

        let styles: Vec<&StrokeStyle> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetStrokeStyle(style) => Some(style),
                _ => None,
            })
            .collect();
        assert!(styles[0].dashes.is_empty());
        assert_eq!(styles[1].dashes, vec![5.0, 5.0]);
        assert!(styles.iter().all(|s| (s.width - 2.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_text_command() {
        let color = SerializableColor::new(255, 0, 0, 255);
        let drawings = vec![Shape::Text(Text::new(
            Point::new(3.0, 4.0),
            "Switch".to_string(),
            color,
        ))];
        let mut surface = RecordingSurface::new();
        render_frame(&mut surface, &RenderContext::from_drawings(&drawings, size())).unwrap();
        assert!(surface.commands().contains(&DrawCommand::FillText {
            text: "Switch".to_string(),
            position: Point::new(3.0, 4.0),
            font_size: 16.0,
            color,
        }));
    }

    #[test]
    fn test_empty_stroke_draws_nothing() {
        let drawings = vec![Shape::Pen(Freehand::new(Vec::new(), black()))];
        let mut surface = RecordingSurface::new();
        render_frame(&mut surface, &RenderContext::from_drawings(&drawings, size())).unwrap();
        assert!(!surface.commands().contains(&DrawCommand::Stroke));
    }

    #[test]
    fn test_unavailable_surface() {
        let mut surface = RecordingSurface::unavailable();
        let ctx = RenderContext::from_drawings(&[], size());
        assert!(matches!(
            render_frame(&mut surface, &ctx),
            Err(RendererError::SurfaceUnavailable)
        ));
        render_frame_or_skip(&mut surface, &ctx);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_invalid_size_fails() {
        let mut surface = RecordingSurface::new();
        let ctx = RenderContext::from_drawings(&[], Size::new(f64::NAN, 10.0));
        assert!(matches!(
            render_frame(&mut surface, &ctx),
            Err(RendererError::RenderFailed(_))
        ));
    }

    #[test]
    fn test_context_from_canvas_includes_preview() {
        let mut canvas = Canvas::new();
        canvas.resize(300.0, 200.0);
        canvas.select_tool(Some(ToolKind::Circle));
        canvas.handle_pointer_event(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            target: PointerTarget::Canvas,
        });
        canvas.handle_pointer_event(PointerEvent::Move { position: Point::new(20.0, 20.0) });

        let ctx = RenderContext::new(&canvas);
        assert!(ctx.drawings.is_empty());
        assert!(ctx.preview.is_some());

        let mut surface = RecordingSurface::new();
        render_frame(&mut surface, &ctx).unwrap();
        assert_eq!(surface.commands()[0], DrawCommand::Clear(Size::new(300.0, 200.0)));
        assert!(surface.commands().contains(&DrawCommand::Stroke));
    }
}
