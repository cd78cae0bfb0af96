//! Vello-backed surface.

use crate::renderer::{StrokeStyle, Surface};
use kurbo::{
    Affine, BezPath, Cap, Ellipse, Join, Point, Rect, Shape as KurboShape, Size, Stroke, Vec2,
};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use tacticboard_core::shapes::SerializableColor;
use vello::Scene;

/// Path flattening tolerance for ellipses and rectangles.
const PATH_TOLERANCE: f64 = 0.1;

/// Builds a [`vello::Scene`] from surface calls.
///
/// Text uses the system sans-serif font through parley.
pub struct VelloSurface {
    scene: Scene,
    size: Size,
    path: BezPath,
    style: StrokeStyle,
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSurface {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            size: Size::ZERO,
            path: BezPath::new(),
            style: StrokeStyle::default(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Size passed to the last `clear`.
    pub fn size(&self) -> Size {
        self.size
    }

    fn kurbo_stroke(&self) -> Stroke {
        let stroke = Stroke::new(self.style.width)
            .with_caps(Cap::Round)
            .with_join(Join::Round);
        if self.style.dashes.is_empty() {
            stroke
        } else {
            stroke.with_dashes(0.0, &self.style.dashes)
        }
    }
}

impl Surface for VelloSurface {
    fn clear(&mut self, size: Size) {
        self.scene.reset();
        self.path = BezPath::new();
        self.size = size;
    }

    fn set_stroke_style(&mut self, style: &StrokeStyle) {
        self.style = style.clone();
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point);
    }

    fn line_to(&mut self, point: Point) {
        self.path.line_to(point);
    }

    fn close_path(&mut self) {
        self.path.close_path();
    }

    fn ellipse(&mut self, center: Point, radii: Vec2) {
        let ellipse = Ellipse::new(center, radii, 0.0);
        self.path.extend(ellipse.path_elements(PATH_TOLERANCE));
    }

    fn rect(&mut self, rect: Rect) {
        self.path.extend(rect.path_elements(PATH_TOLERANCE));
    }

    fn stroke(&mut self) {
        let color: Color = self.style.color.into();
        let stroke = self.kurbo_stroke();
        self.scene.stroke(&stroke, Affine::IDENTITY, color, None, &self.path);
    }

    fn fill_text(&mut self, text: &str, position: Point, font_size: f64, color: SerializableColor) {
        if text.is_empty() {
            return;
        }
        let brush = Brush::Solid(color.into());

        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
            "sans-serif".into(),
        )));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        // Parley puts y=0 at the top of the first line, so `position` is the top-left.
        let transform = Affine::translate((position.x, position.y));
        let mut glyph_count = 0usize;

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let glyph_xform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph { id: glyph.id, x: gx, y: gy }
                    })
                    .collect();
                glyph_count += glyphs.len();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(run.font())
                        .brush(&brush)
                        .hint(true)
                        .transform(transform)
                        .glyph_transform(glyph_xform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        if glyph_count == 0 {
            log::warn!("No font available for text {:?}", text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RenderContext, render_frame};
    use tacticboard_core::shapes::{Figure, Freehand, Shape};

    fn drawings() -> Vec<Shape> {
        let color = SerializableColor::black();
        vec![
            Shape::Square(Figure::new(Point::new(100.0, 100.0), 40.0, 30.0, color)),
            Shape::Dashed(Freehand::new(
                vec![Point::new(0.0, 0.0), Point::new(50.0, 20.0)],
                color,
            )),
        ]
    }

    #[test]
    fn test_surface_creation() {
        let surface = VelloSurface::new();
        assert!(surface.scene().encoding().is_empty());
        assert_eq!(surface.size(), Size::ZERO);
    }

    #[test]
    fn test_render_frame_builds_scene() {
        let mut surface = VelloSurface::new();
        let shapes = drawings();
        let ctx = RenderContext::from_drawings(&shapes, Size::new(600.0, 400.0));
        render_frame(&mut surface, &ctx).unwrap();

        assert_eq!(surface.size(), Size::new(600.0, 400.0));
        assert!(!surface.scene().encoding().is_empty());

        let scene = surface.take_scene();
        assert!(!scene.encoding().is_empty());
        assert!(surface.scene().encoding().is_empty());
    }

    #[test]
    fn test_clear_resets_scene() {
        let mut surface = VelloSurface::new();
        let shapes = drawings();
        let ctx = RenderContext::from_drawings(&shapes, Size::new(600.0, 400.0));
        render_frame(&mut surface, &ctx).unwrap();
        assert!(!surface.scene().encoding().is_empty());

        surface.clear(Size::new(300.0, 200.0));
        assert!(surface.scene().encoding().is_empty());
        assert_eq!(surface.size(), Size::new(300.0, 200.0));
    }
}
