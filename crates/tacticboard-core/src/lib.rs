//! Tactics Board Core Library
//!
//! Platform-agnostic drawing, erasing and undo/redo engine for the tactics
//! board: shapes, gestures, board state and persistence.

pub mod board;
pub mod canvas;
pub mod config;
pub mod eraser;
pub mod geometry;
pub mod history;
pub mod input;
pub mod shapes;
pub mod storage;
pub mod tools;

pub use board::{
    BoardState, FieldKind, MAX_PLAYERS_PER_TEAM, Player, PlayerMarker, Team, TeamCounts,
    initial_position, is_max_players_reached,
};
pub use canvas::{Canvas, RedrawRequest, RedrawScheduler};
pub use config::{BoardConfig, ConfigError, ConfigResult};
pub use eraser::{ERASER_RADIUS, erase_at, should_erase};
pub use geometry::{MAX_SWEEP_STEPS, interpolate, line_distance, smooth_path};
pub use history::History;
pub use input::{CanvasViewport, PointerEvent, PointerTarget};
pub use shapes::{Figure, Freehand, SerializableColor, Shape, ShapeId, ShapeKind, ShapeTrait, Text};
pub use tools::{ToolKind, ToolManager, ToolState};
