//! Request and response bodies.

use noughts_engine::{Game, GameId, HistoryEntry, MoveResult, Player, Symbol};
use serde::{Deserialize, Serialize};

/// `POST /users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Unique name.
    pub user_name: String,
    /// Optional notification address.
    #[serde(default)]
    pub email: Option<String>,
}

/// `POST /games`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameRequest {
    /// Name of the player taking X.
    pub user_x: String,
    /// Name of the player taking O.
    pub user_o: String,
}

/// `POST /games/{id}/moves`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Name of the moving player.
    pub user: String,
    /// Target row.
    pub row: usize,
    /// Target column.
    pub col: usize,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    /// Human-readable text.
    pub message: String,
}

impl MessageView {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A game as clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Game id.
    pub id: GameId,
    /// Name of the X player.
    pub user_x: String,
    /// Name of the O player.
    pub user_o: String,
    /// Board rows, e.g. `["X__", "_O_", "___"]`.
    pub rows: [String; 3],
    /// Accepted moves so far.
    pub turns_played: u32,
    /// Name of the player to move; absent once the game is over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_turn: Option<String>,
    /// Whether the game ended in a win or a draw.
    pub game_ended: bool,
    /// Whether it ended in a draw.
    pub draw: bool,
    /// Name of the winner, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    /// Outcome message for the request that produced this view.
    pub message: String,
}

impl GameView {
    /// Renders `game` with the seat names resolved.
    pub fn new(
        id: GameId,
        game: &Game,
        user_x: &str,
        user_o: &str,
        message: impl Into<String>,
    ) -> Self {
        let name_of = |symbol: Symbol| match symbol {
            Symbol::X => user_x.to_string(),
            Symbol::O => user_o.to_string(),
        };
        let seat = |player| game.symbol_of(player).map(name_of);
        Self {
            id,
            user_x: user_x.to_string(),
            user_o: user_o.to_string(),
            rows: game.board().rows(),
            turns_played: *game.turns_played(),
            next_turn: game.next_turn().and_then(seat),
            game_ended: game.game_ended(),
            draw: game.draw(),
            winner: game.winner().and_then(seat),
            message: message.into(),
        }
    }
}

/// One line of a game's move list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryView {
    /// 1-based move number.
    pub sequence: u32,
    /// Name of the mover.
    pub user: String,
    /// `"row,col"`.
    #[serde(rename = "move")]
    pub play: String,
    /// `""`, `"{name} won !"` or `"Game drawn"`.
    pub result: String,
}

impl HistoryView {
    /// Renders `entry` made by `user`.
    pub fn new(entry: &HistoryEntry, user: &str) -> Self {
        let result = match entry.result() {
            MoveResult::Pending => String::new(),
            MoveResult::Won => format!("{user} won !"),
            MoveResult::Drawn => "Game drawn".to_string(),
        };
        Self {
            sequence: *entry.sequence(),
            user: user.to_string(),
            play: entry.move_label(),
            result,
        }
    }
}

/// Public profile with counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Unique name.
    pub name: String,
    /// Notification address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Unfinished games.
    pub games_in_progress: i32,
    /// Finished games.
    pub games_completed: i32,
    /// Wins.
    pub games_won: i32,
    /// Draws.
    pub games_drawn: i32,
}

impl From<Player> for PlayerView {
    fn from(player: Player) -> Self {
        Self {
            games_in_progress: *player.games_in_progress(),
            games_completed: *player.games_completed(),
            games_won: *player.games_won(),
            games_drawn: *player.games_drawn(),
            email: player.email().clone(),
            name: player.name().clone(),
        }
    }
}

/// An unfinished game from one participant's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveGameView {
    /// Game id.
    pub game_id: GameId,
    /// The participant's mark, `"X"` or `"O"`.
    pub symbol: Symbol,
    /// Name of the other participant.
    pub opponent: String,
}
