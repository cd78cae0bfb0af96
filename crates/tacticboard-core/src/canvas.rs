//! Canvas controller: routes pointer input to tools and records board changes.

use crate::board::{BoardState, FieldKind, PlayerMarker, Team};
use crate::config::BoardConfig;
use crate::history::History;
use crate::input::{CanvasViewport, PointerEvent};
use crate::shapes::{SerializableColor, Shape};
use crate::storage::{LAST_BOARD_KEY, Storage, StorageResult};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Size};
use uuid::Uuid;

/// When a requested redraw should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawRequest {
    /// Before control returns to the host's event loop.
    Immediate,
    /// On the next animation frame.
    NextFrame,
}

/// Holds at most one pending redraw.
///
/// Requests are coalesced: an immediate request upgrades a pending
/// next-frame one, never the other way round.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    pending: Option<RedrawRequest>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, request: RedrawRequest) {
        self.pending = match (self.pending, request) {
            (Some(RedrawRequest::Immediate), _) | (_, RedrawRequest::Immediate) => {
                Some(RedrawRequest::Immediate)
            }
            _ => Some(RedrawRequest::NextFrame),
        };
    }

    /// Take a pending immediate redraw. Next-frame requests stay queued.
    pub fn take_immediate(&mut self) -> bool {
        if self.pending == Some(RedrawRequest::Immediate) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Frame tick: take whatever redraw is pending.
    pub fn on_frame(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<RedrawRequest> {
        self.pending
    }
}

/// The drawing surface controller.
///
/// Owns the board history, the active tool and the canvas placement. Every
/// board change goes through [`History::set_state`], so each committed shape,
/// erase hit or board action is one undo step.
#[derive(Debug, Clone)]
pub struct Canvas {
    history: History<BoardState>,
    tools: ToolManager,
    viewport: CanvasViewport,
    config: BoardConfig,
    redraw: RedrawScheduler,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a canvas with an empty board and default config.
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Self {
        Self::with_board(BoardState::new(), config)
    }

    /// Create a canvas whose history is rooted at `board`.
    pub fn with_board(board: BoardState, config: BoardConfig) -> Self {
        let mut tools = ToolManager::new();
        tools.color = config.initial_color();
        Self {
            history: History::with_limit(board, config.history_limit),
            tools,
            viewport: CanvasViewport::default(),
            config,
            redraw: RedrawScheduler::new(),
        }
    }

    /// The current board.
    pub fn board(&self) -> &BoardState {
        self.history.present()
    }

    pub fn history(&self) -> &History<BoardState> {
        &self.history
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn viewport(&self) -> &CanvasViewport {
        &self.viewport
    }

    pub fn size(&self) -> Size {
        self.viewport.size
    }

    /// Move the canvas within the client area.
    pub fn set_origin(&mut self, origin: Point) {
        self.viewport.origin = origin;
    }

    /// Resize the canvas. Pixels are not preserved; the board is redrawn on
    /// the next frame.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.size = Size::new(width.max(0.0), height.max(0.0));
        log::debug!("Canvas resized to {}x{}", self.viewport.size.width, self.viewport.size.height);
        self.redraw.request(RedrawRequest::NextFrame);
    }

    // --- tools ---

    /// Select a tool (`None` disables drawing). Any gesture in progress is dropped.
    pub fn select_tool(&mut self, tool: Option<ToolKind>) {
        let was_active = self.tools.is_active();
        self.tools.set_tool(tool);
        if was_active {
            self.redraw.request(RedrawRequest::Immediate);
        }
    }

    pub fn current_tool(&self) -> Option<ToolKind> {
        self.tools.current_tool
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.tools.color = color;
    }

    pub fn color(&self) -> SerializableColor {
        self.tools.color
    }

    /// Set the content the text tool places on release.
    pub fn set_pending_text(&mut self, text: impl Into<String>) {
        self.tools.set_pending_text(text);
    }

    /// Shape being drawn, if any.
    pub fn preview_shape(&self) -> Option<&Shape> {
        self.tools.preview_shape()
    }

    pub fn is_drawing(&self) -> bool {
        self.tools.is_active()
    }

    // --- input ---

    /// Feed a pointer event in client coordinates.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        let local = self.viewport.to_local(event.position());
        match event {
            PointerEvent::Down { target, .. } => {
                if !target.starts_gesture() {
                    if self.tools.is_active() {
                        self.tools.cancel();
                        self.redraw.request(RedrawRequest::Immediate);
                    }
                    return;
                }
                if self.tools.current_tool.is_none() {
                    return;
                }
                let samples = self.tools.begin(local);
                self.apply_erase(&samples);
                self.redraw.request(RedrawRequest::Immediate);
            }
            PointerEvent::Move { .. } => {
                if !self.tools.is_active() {
                    return;
                }
                let samples = self.tools.update(local);
                self.apply_erase(&samples);
                let request = self.move_redraw();
                self.redraw.request(request);
            }
            PointerEvent::Up { .. } | PointerEvent::Leave { .. } => {
                if !self.tools.is_active() {
                    return;
                }
                if let Some(shape) = self.tools.end() {
                    let next = self.board().with_drawing(shape);
                    self.history.set_state(next);
                }
                self.redraw.request(RedrawRequest::Immediate);
            }
        }
    }

    fn move_redraw(&self) -> RedrawRequest {
        if self.config.coalesce_pointer_moves {
            RedrawRequest::NextFrame
        } else {
            RedrawRequest::Immediate
        }
    }

    /// Hit-test every eraser sample; each sample that removes something is
    /// its own undo step.
    fn apply_erase(&mut self, samples: &[Point]) {
        for &sample in samples {
            if let Some(next) = self.board().with_erased_at(sample, self.config.eraser_radius) {
                log::debug!(
                    "Eraser at ({:.1}, {:.1}) removed {} drawing(s)",
                    sample.x,
                    sample.y,
                    self.board().drawings.len() - next.drawings.len()
                );
                self.history.set_state(next);
            }
        }
    }

    // --- redraw ---

    /// Take a pending immediate redraw; the host renders right away when true.
    pub fn take_immediate_redraw(&mut self) -> bool {
        self.redraw.take_immediate()
    }

    /// Frame tick; the host renders when true.
    pub fn on_frame(&mut self) -> bool {
        self.redraw.on_frame()
    }

    pub fn redraw_pending(&self) -> Option<RedrawRequest> {
        self.redraw.pending()
    }

    // --- history ---

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo();
        if changed {
            self.redraw.request(RedrawRequest::Immediate);
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo();
        if changed {
            self.redraw.request(RedrawRequest::Immediate);
        }
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- board actions ---

    fn commit(&mut self, next: BoardState) {
        self.history.set_state(next);
        self.redraw.request(RedrawRequest::Immediate);
    }

    pub fn select_field(&mut self, field: FieldKind) {
        let next = self.board().with_field(field);
        self.commit(next);
    }

    /// Add a player token. Returns false when the team is already full.
    pub fn add_player(&mut self, team: Team, marker: PlayerMarker, number: Option<u32>) -> bool {
        match self.board().with_player_added(team, marker, number) {
            Some(next) => {
                self.commit(next);
                true
            }
            None => {
                log::debug!("Team {:?} is full", team);
                false
            }
        }
    }

    /// Remove the team's most recently added token. Returns false when it has none.
    pub fn remove_player(&mut self, team: Team) -> bool {
        match self.board().with_player_removed(team) {
            Some(next) => {
                self.commit(next);
                true
            }
            None => false,
        }
    }

    /// Move a token to a canvas-local position. Returns false for an unknown id.
    pub fn move_player(&mut self, id: Uuid, position: Point) -> bool {
        match self.board().with_player_moved(id, position) {
            Some(next) => {
                self.commit(next);
                true
            }
            None => false,
        }
    }

    /// Clear tokens and drawings, keeping the field. Undoable.
    pub fn reset(&mut self) {
        self.tools.cancel();
        let next = self.board().cleared();
        self.commit(next);
    }

    // --- persistence ---

    /// Save the board under `id` and as the last-used board.
    pub async fn save(&self, storage: &dyn Storage, id: &str) -> StorageResult<()> {
        storage.save(id, self.board()).await?;
        storage.save(LAST_BOARD_KEY, self.board()).await
    }

    /// Replace the board with the one stored under `id`, starting a fresh history.
    pub async fn restore(&mut self, storage: &dyn Storage, id: &str) -> StorageResult<()> {
        let board = storage.load(id).await?;
        self.tools.cancel();
        self.history.reset_to(board);
        self.redraw.request(RedrawRequest::Immediate);
        Ok(())
    }

    /// Restore the last saved board.
    pub async fn restore_last(&mut self, storage: &dyn Storage) -> StorageResult<()> {
        self.restore(storage, LAST_BOARD_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerTarget;
    use crate::shapes::{Figure, Freehand, ShapeKind};
    use crate::storage::{MemoryStorage, StorageError, block_on};

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            target: PointerTarget::Canvas,
        }
    }

    fn mv(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move { position: Point::new(x, y) }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up { position: Point::new(x, y) }
    }

    fn drag(canvas: &mut Canvas, points: &[(f64, f64)]) {
        let (x0, y0) = points[0];
        canvas.handle_pointer_event(down(x0, y0));
        for &(x, y) in &points[1..] {
            canvas.handle_pointer_event(mv(x, y));
        }
        let (xn, yn) = points[points.len() - 1];
        canvas.handle_pointer_event(up(xn, yn));
    }

    fn circle_at(x: f64, y: f64) -> Shape {
        Shape::Circle(Figure::new(Point::new(x, y), 20.0, 20.0, SerializableColor::black()))
    }

    #[test]
    fn test_pen_gesture_commits_one_stroke() {
        let mut canvas = Canvas::new();
        canvas.select_tool(Some(ToolKind::Pen));
        drag(&mut canvas, &[(0.0, 0.0), (5.0, 2.0), (10.0, 4.0), (15.0, 2.0), (20.0, 0.0)]);

        let drawings = &canvas.board().drawings;
        assert_eq!(drawings.len(), 1);
        assert_eq!(drawings[0].kind(), ShapeKind::Pen);
        assert_eq!(drawings[0].as_freehand().map(Freehand::len), Some(5));
        assert!(!canvas.is_drawing());
        assert!(canvas.preview_shape().is_none());
        assert_eq!(canvas.history().past_len(), 1);
    }

    #[test]
    fn test_eraser_removes_only_hit_shape() {
        let board = BoardState::new()
            .with_drawing(circle_at(50.0, 50.0))
            .with_drawing(circle_at(300.0, 300.0));
        let survivor = board.drawings[1].clone();
        let mut canvas = Canvas::with_board(board, BoardConfig::default());
        canvas.select_tool(Some(ToolKind::Eraser));

        drag(&mut canvas, &[(30.0, 50.0), (50.0, 50.0), (70.0, 50.0)]);

        assert_eq!(canvas.board().drawings, vec![survivor]);
        // One removal, one undo step.
        assert_eq!(canvas.history().past_len(), 1);
        assert!(canvas.undo());
        assert_eq!(canvas.board().drawings.len(), 2);
    }

    #[test]
    fn test_eraser_miss_records_nothing() {
        let board = BoardState::new().with_drawing(circle_at(50.0, 50.0));
        let mut canvas = Canvas::with_board(board, BoardConfig::default());
        canvas.select_tool(Some(ToolKind::Eraser));
        drag(&mut canvas, &[(200.0, 200.0), (220.0, 200.0)]);
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_client_positions_are_translated() {
        let mut canvas = Canvas::new();
        canvas.set_origin(Point::new(100.0, 50.0));
        canvas.select_tool(Some(ToolKind::Square));
        drag(&mut canvas, &[(110.0, 60.0), (150.0, 100.0)]);

        let figure = canvas.board().drawings[0].as_figure().cloned().unwrap();
        assert_eq!(figure.center, Point::new(30.0, 30.0));
        assert!((figure.width - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_tool_ignores_input() {
        let mut canvas = Canvas::new();
        drag(&mut canvas, &[(0.0, 0.0), (10.0, 10.0), (20.0, 20.0)]);
        assert!(canvas.board().drawings.is_empty());
        assert!(canvas.redraw_pending().is_none());
    }

    #[test]
    fn test_down_on_player_or_control_ignored() {
        let mut canvas = Canvas::new();
        canvas.select_tool(Some(ToolKind::Pen));
        canvas.handle_pointer_event(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            target: PointerTarget::Player(Uuid::new_v4()),
        });
        assert!(!canvas.is_drawing());

        canvas.handle_pointer_event(down(0.0, 0.0));
        canvas.handle_pointer_event(mv(10.0, 0.0));
        canvas.handle_pointer_event(PointerEvent::Down {
            position: Point::new(10.0, 0.0),
            target: PointerTarget::Control,
        });
        assert!(!canvas.is_drawing());
        canvas.handle_pointer_event(up(10.0, 0.0));
        assert!(canvas.board().drawings.is_empty());
    }

    #[test]
    fn test_leave_ends_gesture() {
        let mut canvas = Canvas::new();
        canvas.select_tool(Some(ToolKind::Dashed));
        canvas.handle_pointer_event(down(0.0, 0.0));
        canvas.handle_pointer_event(mv(10.0, 10.0));
        canvas.handle_pointer_event(PointerEvent::Leave { position: Point::new(10.0, 10.0) });

        assert!(!canvas.is_drawing());
        assert_eq!(canvas.board().drawings[0].kind(), ShapeKind::Dashed);
    }

    #[test]
    fn test_single_click_commits_nothing() {
        let mut canvas = Canvas::new();
        for tool in [ToolKind::Pen, ToolKind::Circle, ToolKind::Text] {
            canvas.select_tool(Some(tool));
            drag(&mut canvas, &[(5.0, 5.0)]);
        }
        assert!(canvas.board().drawings.is_empty());
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_text_tool_places_pending_text() {
        let mut canvas = Canvas::new();
        canvas.set_color(SerializableColor::new(0, 0, 255, 255));
        canvas.select_tool(Some(ToolKind::Text));
        canvas.set_pending_text("Overlap");
        drag(&mut canvas, &[(40.0, 60.0)]);

        match &canvas.board().drawings[0] {
            Shape::Text(text) => {
                assert_eq!(text.content, "Overlap");
                assert_eq!(text.position, Point::new(40.0, 60.0));
                assert_eq!(text.color, SerializableColor::new(0, 0, 255, 255));
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_redraw_scheduling() {
        let mut canvas = Canvas::new();
        canvas.select_tool(Some(ToolKind::Pen));
        canvas.handle_pointer_event(down(0.0, 0.0));
        assert!(canvas.take_immediate_redraw());
        assert!(!canvas.take_immediate_redraw());

        canvas.resize(800.0, 600.0);
        assert_eq!(canvas.size(), Size::new(800.0, 600.0));
        assert!(!canvas.take_immediate_redraw());
        assert!(canvas.on_frame());
        assert!(!canvas.on_frame());
    }

    #[test]
    fn test_coalesced_moves_wait_for_frame() {
        let config = BoardConfig {
            coalesce_pointer_moves: true,
            ..BoardConfig::default()
        };
        let mut canvas = Canvas::with_config(config);
        canvas.select_tool(Some(ToolKind::Pen));
        canvas.handle_pointer_event(down(0.0, 0.0));
        canvas.take_immediate_redraw();

        canvas.handle_pointer_event(mv(5.0, 5.0));
        canvas.handle_pointer_event(mv(6.0, 6.0));
        assert_eq!(canvas.redraw_pending(), Some(RedrawRequest::NextFrame));
        assert!(!canvas.take_immediate_redraw());
        assert!(canvas.on_frame());
    }

    #[test]
    fn test_coalesced_eraser_sweep_still_erases() {
        let config = BoardConfig {
            coalesce_pointer_moves: true,
            ..BoardConfig::default()
        };
        let board = BoardState::new().with_drawing(circle_at(100.0, 100.0));
        let mut canvas = Canvas::with_board(board, config);
        canvas.select_tool(Some(ToolKind::Eraser));
        canvas.handle_pointer_event(down(60.0, 100.0));
        assert_eq!(canvas.board().drawings.len(), 1);
        canvas.take_immediate_redraw();

        // One move jumps across the circle; the samples in between must hit it.
        canvas.handle_pointer_event(mv(140.0, 100.0));
        assert!(canvas.board().drawings.is_empty());
        assert_eq!(canvas.redraw_pending(), Some(RedrawRequest::NextFrame));
    }

    #[test]
    fn test_eraser_huge_jump_is_bounded() {
        let board = BoardState::new().with_drawing(circle_at(300.0, 300.0));
        let mut canvas = Canvas::with_board(board, BoardConfig::default());
        canvas.select_tool(Some(ToolKind::Eraser));
        canvas.handle_pointer_event(down(0.0, 0.0));
        canvas.handle_pointer_event(mv(1e20, 0.0));
        canvas.handle_pointer_event(mv(1e9, 1e9));

        assert!(canvas.is_drawing());
        assert_eq!(canvas.board().drawings.len(), 1);
        canvas.handle_pointer_event(up(1e9, 1e9));
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_scheduler_immediate_wins() {
        let mut scheduler = RedrawScheduler::new();
        scheduler.request(RedrawRequest::Immediate);
        scheduler.request(RedrawRequest::NextFrame);
        assert_eq!(scheduler.pending(), Some(RedrawRequest::Immediate));
        assert!(scheduler.on_frame());
        assert_eq!(scheduler.pending(), None);
    }

    #[test]
    fn test_undo_redo_drawing() {
        let mut canvas = Canvas::new();
        canvas.select_tool(Some(ToolKind::Circle));
        drag(&mut canvas, &[(0.0, 0.0), (20.0, 20.0)]);
        drag(&mut canvas, &[(100.0, 100.0), (120.0, 120.0)]);
        assert_eq!(canvas.board().drawings.len(), 2);

        assert!(canvas.undo());
        assert_eq!(canvas.board().drawings.len(), 1);
        assert!(canvas.redo());
        assert_eq!(canvas.board().drawings.len(), 2);
        assert!(!canvas.redo());
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = BoardConfig {
            history_limit: Some(2),
            ..BoardConfig::default()
        };
        let mut canvas = Canvas::with_config(config);
        for field in [FieldKind::Court, FieldKind::Court2, FieldKind::Baseball] {
            canvas.select_field(field);
        }
        assert!(canvas.undo());
        assert!(canvas.undo());
        assert!(!canvas.undo());
        assert_eq!(canvas.board().selected_field, FieldKind::Court);
    }

    #[test]
    fn test_board_actions_are_undoable() {
        let mut canvas = Canvas::new();
        assert!(canvas.add_player(Team::Red, PlayerMarker::Circle, Some(1)));
        assert!(canvas.add_player(Team::Ball, PlayerMarker::Circle, None));
        let id = canvas.board().players[0].id;
        assert!(canvas.move_player(id, Point::new(10.0, 10.0)));
        assert!(!canvas.move_player(Uuid::new_v4(), Point::ZERO));
        assert!(canvas.remove_player(Team::Ball));
        assert!(!canvas.remove_player(Team::Ball));

        canvas.reset();
        assert!(canvas.board().players.is_empty());
        assert!(canvas.undo());
        assert_eq!(canvas.board().players[0].position, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_add_player_full_team() {
        let mut canvas = Canvas::new();
        for _ in 0..crate::board::MAX_PLAYERS_PER_TEAM {
            assert!(canvas.add_player(Team::Yellow, PlayerMarker::Triangle, None));
        }
        assert!(!canvas.add_player(Team::Yellow, PlayerMarker::Triangle, None));
    }

    #[test]
    fn test_save_and_restore() {
        let storage = MemoryStorage::new();
        let mut canvas = Canvas::new();
        canvas.select_field(FieldKind::Volleyball);
        canvas.add_player(Team::Blue, PlayerMarker::Square, Some(3));
        block_on(canvas.save(&storage, "drill")).unwrap();
        assert!(block_on(storage.exists(LAST_BOARD_KEY)).unwrap());

        let mut other = Canvas::new();
        block_on(other.restore(&storage, "drill")).unwrap();
        assert_eq!(other.board(), canvas.board());
        assert!(!other.can_undo());

        let mut last = Canvas::new();
        block_on(last.restore_last(&storage)).unwrap();
        assert_eq!(last.board().selected_field, FieldKind::Volleyball);

        let result = block_on(other.restore(&storage, "unknown"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
        assert_eq!(other.board(), canvas.board());
    }
}
