//! Player records and the counter changes games apply to them.

use crate::PlayerId;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A registered player and their game counters.
///
/// The engine never holds these; games carry [`PlayerId`]s and hand back
/// [`StatDelta`]s for the owner of the records to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Player {
    /// Identifier.
    id: PlayerId,
    /// Unique display name.
    name: String,
    /// Address for notifications.
    email: Option<String>,
    /// Games started and not yet finished or cancelled.
    games_in_progress: i32,
    /// Games that ended in a win or a draw.
    games_completed: i32,
    /// Games won.
    games_won: i32,
    /// Games drawn.
    games_drawn: i32,
}

impl Player {
    /// Creates a player with zeroed counters.
    pub fn new(id: PlayerId, name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email,
            games_in_progress: 0,
            games_completed: 0,
            games_won: 0,
            games_drawn: 0,
        }
    }

    /// Rebuilds a player from stored counters.
    pub fn from_parts(
        id: PlayerId,
        name: String,
        email: Option<String>,
        games_in_progress: i32,
        games_completed: i32,
        games_won: i32,
        games_drawn: i32,
    ) -> Self {
        Self {
            id,
            name,
            email,
            games_in_progress,
            games_completed,
            games_won,
            games_drawn,
        }
    }

    /// Completed games that were neither won nor drawn.
    pub fn games_lost(&self) -> i32 {
        self.games_completed - self.games_won - self.games_drawn
    }

    /// Applies a delta addressed to this player.
    ///
    /// Deltas for other players are ignored and reported with `false`.
    #[instrument(skip(self), fields(player = %self.id))]
    pub fn apply(&mut self, delta: &StatDelta) -> bool {
        if delta.player != self.id {
            return false;
        }
        self.games_in_progress += delta.in_progress;
        self.games_completed += delta.completed;
        self.games_won += delta.won;
        self.games_drawn += delta.drawn;
        true
    }
}

/// Signed change to one player's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct StatDelta {
    /// Target player.
    player: PlayerId,
    /// Change to `games_in_progress`.
    #[getter(rename = "in_progress_delta")]
    in_progress: i32,
    /// Change to `games_completed`.
    #[getter(rename = "completed_delta")]
    completed: i32,
    /// Change to `games_won`.
    #[getter(rename = "won_delta")]
    won: i32,
    /// Change to `games_drawn`.
    #[getter(rename = "drawn_delta")]
    drawn: i32,
}

impl StatDelta {
    /// A new game involving `player` has started.
    pub fn started(player: PlayerId) -> Self {
        Self::zero(player).with_in_progress(1)
    }

    /// A game involving `player` was cancelled before it ended.
    pub fn cancelled(player: PlayerId) -> Self {
        Self::zero(player).with_in_progress(-1)
    }

    /// `player` won a game.
    pub fn won(player: PlayerId) -> Self {
        Self {
            won: 1,
            ..Self::completed(player)
        }
    }

    /// `player` lost a game.
    pub fn lost(player: PlayerId) -> Self {
        Self::completed(player)
    }

    /// `player` drew a game.
    pub fn drawn(player: PlayerId) -> Self {
        Self {
            drawn: 1,
            ..Self::completed(player)
        }
    }

    fn completed(player: PlayerId) -> Self {
        Self {
            completed: 1,
            ..Self::zero(player).with_in_progress(-1)
        }
    }

    fn zero(player: PlayerId) -> Self {
        Self {
            player,
            in_progress: 0,
            completed: 0,
            won: 0,
            drawn: 0,
        }
    }

    fn with_in_progress(mut self, in_progress: i32) -> Self {
        self.in_progress = in_progress;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Player {
        Player::new(PlayerId::new(1), "alice", Some("alice@example.com".into()))
    }

    #[test]
    fn test_full_lifecycle_counters() {
        let mut player = alice();
        let id = *player.id();

        assert!(player.apply(&StatDelta::started(id)));
        assert_eq!(*player.games_in_progress(), 1);

        assert!(player.apply(&StatDelta::won(id)));
        assert_eq!(*player.games_in_progress(), 0);
        assert_eq!(*player.games_completed(), 1);
        assert_eq!(*player.games_won(), 1);
        assert_eq!(player.games_lost(), 0);
    }

    #[test]
    fn test_delta_getters_report_each_counter() {
        let id = PlayerId::new(7);
        let won = StatDelta::won(id);
        assert_eq!(*won.player(), id);
        assert_eq!(*won.in_progress_delta(), -1);
        assert_eq!(*won.completed_delta(), 1);
        assert_eq!(*won.won_delta(), 1);
        assert_eq!(*won.drawn_delta(), 0);

        let drawn = StatDelta::drawn(id);
        assert_eq!(*drawn.drawn_delta(), 1);
        assert_eq!(*drawn.won_delta(), 0);

        let lost = StatDelta::lost(id);
        assert_eq!(*lost.completed_delta(), 1);
        assert_eq!(*lost.won_delta(), 0);

        assert_eq!(*StatDelta::started(id).in_progress_delta(), 1);
        assert_eq!(*StatDelta::cancelled(id).completed_delta(), 0);
    }

    #[test]
    fn test_loss_is_derived() {
        let mut player = alice();
        let id = *player.id();
        player.apply(&StatDelta::started(id));
        player.apply(&StatDelta::lost(id));
        player.apply(&StatDelta::started(id));
        player.apply(&StatDelta::drawn(id));
        assert_eq!(*player.games_completed(), 2);
        assert_eq!(*player.games_drawn(), 1);
        assert_eq!(player.games_lost(), 1);
    }

    #[test]
    fn test_cancel_only_touches_in_progress() {
        let mut player = alice();
        let id = *player.id();
        player.apply(&StatDelta::started(id));
        player.apply(&StatDelta::cancelled(id));
        assert_eq!(player, alice());
    }

    #[test]
    fn test_delta_for_other_player_is_ignored() {
        let mut player = alice();
        assert!(!player.apply(&StatDelta::won(PlayerId::new(2))));
        assert_eq!(player, alice());
    }
}
