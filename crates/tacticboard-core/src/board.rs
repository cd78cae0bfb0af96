//! Board state: field layout, player tokens and drawings.
//!
//! Every operation returns a new [`BoardState`] instead of editing in place,
//! so each result can be handed straight to the undo history.

use crate::eraser;
use crate::shapes::Shape;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of tokens per team.
pub const MAX_PLAYERS_PER_TEAM: usize = 10;

/// Reference field size used for initial token placement.
const BASE_FIELD_WIDTH: f64 = 600.0;
const BASE_FIELD_HEIGHT: f64 = 400.0;
/// Distance between neighbouring tokens of one team.
const PLAYER_SPACING: f64 = 48.0;
const PLAYERS_PER_ROW: usize = 3;

/// Field or court drawn under the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Soccer,
    Basketball,
    Basketball2,
    Basketball3,
    Volleyball,
    Baseball,
    Court,
    Court2,
}

impl FieldKind {
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Soccer,
        FieldKind::Basketball,
        FieldKind::Basketball2,
        FieldKind::Basketball3,
        FieldKind::Volleyball,
        FieldKind::Baseball,
        FieldKind::Court,
        FieldKind::Court2,
    ];
}

/// Token team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
    Yellow,
    Ball,
}

impl Team {
    /// Relative anchor of the team on the reference field (0..1 on both axes).
    fn anchor(self) -> (f64, f64) {
        match self {
            Team::Red => (0.25, 0.5),
            Team::Blue => (0.5, 0.5),
            Team::Yellow => (0.75, 0.5),
            Team::Ball => (0.5, 0.75),
        }
    }
}

/// Outline of a player token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerMarker {
    #[default]
    Circle,
    Square,
    Triangle,
}

/// A draggable token on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub position: Point,
    pub team: Team,
    pub marker: PlayerMarker,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

/// Number of tokens placed per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamCounts {
    pub red: usize,
    pub blue: usize,
    pub yellow: usize,
    pub ball: usize,
}

impl TeamCounts {
    pub fn get(&self, team: Team) -> usize {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
            Team::Yellow => self.yellow,
            Team::Ball => self.ball,
        }
    }

    fn slot_mut(&mut self, team: Team) -> &mut usize {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
            Team::Yellow => &mut self.yellow,
            Team::Ball => &mut self.ball,
        }
    }
}

/// Whether a team already holds the maximum number of tokens.
pub fn is_max_players_reached(count: usize) -> bool {
    count >= MAX_PLAYERS_PER_TEAM
}

/// Where the `index`-th token of `team` is placed when added.
///
/// The ball goes to its anchor; other teams fill rows of three around theirs.
/// The layout does not depend on the field kind.
pub fn initial_position(team: Team, index: usize, _field: FieldKind) -> Point {
    let (ax, ay) = team.anchor();
    let base_x = BASE_FIELD_WIDTH * ax;
    let base_y = BASE_FIELD_HEIGHT * ay;
    if team == Team::Ball {
        return Point::new(base_x, base_y);
    }

    let row = (index / PLAYERS_PER_ROW) as f64;
    let col = (index % PLAYERS_PER_ROW) as f64;
    Point::new(
        base_x + col * PLAYER_SPACING - PLAYER_SPACING,
        base_y + row * PLAYER_SPACING - PLAYER_SPACING,
    )
}

/// Everything the undo history snapshots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardState {
    pub selected_field: FieldKind,
    pub players: Vec<Player>,
    pub team_counts: TeamCounts,
    /// Committed drawings in z-order (later entries on top).
    pub drawings: Vec<Shape>,
}

impl BoardState {
    /// Create an empty board on the default field.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(&self, field: FieldKind) -> Self {
        Self {
            selected_field: field,
            ..self.clone()
        }
    }

    /// Add a token for `team`; `None` when the team is full.
    pub fn with_player_added(
        &self,
        team: Team,
        marker: PlayerMarker,
        number: Option<u32>,
    ) -> Option<Self> {
        let count = self.team_counts.get(team);
        if is_max_players_reached(count) {
            return None;
        }

        let mut next = self.clone();
        next.players.push(Player {
            id: Uuid::new_v4(),
            position: initial_position(team, count, self.selected_field),
            team,
            marker,
            number,
        });
        *next.team_counts.slot_mut(team) += 1;
        Some(next)
    }

    /// Remove the most recently added token of `team`; `None` when it has none.
    pub fn with_player_removed(&self, team: Team) -> Option<Self> {
        if self.team_counts.get(team) == 0 {
            return None;
        }
        let index = self.players.iter().rposition(|p| p.team == team)?;

        let mut next = self.clone();
        next.players.remove(index);
        *next.team_counts.slot_mut(team) -= 1;
        Some(next)
    }

    /// Move a token; `None` for an unknown id.
    pub fn with_player_moved(&self, id: Uuid, position: Point) -> Option<Self> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let mut next = self.clone();
        next.players[index].position = position;
        Some(next)
    }

    /// Clear tokens, counts and drawings; the field stays selected.
    pub fn cleared(&self) -> Self {
        Self {
            selected_field: self.selected_field,
            ..Self::default()
        }
    }

    /// Append a committed drawing on top of the others.
    pub fn with_drawing(&self, shape: Shape) -> Self {
        let mut next = self.clone();
        next.drawings.push(shape);
        next
    }

    /// Erase drawings touched at `point`; `None` when nothing was hit.
    pub fn with_erased_at(&self, point: Point, radius: f64) -> Option<Self> {
        if !eraser::hits_any(&self.drawings, point, radius) {
            return None;
        }
        Some(Self {
            drawings: eraser::erase_at(&self.drawings, point, radius),
            ..self.clone()
        })
    }

    /// Serialize the board to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a board from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
