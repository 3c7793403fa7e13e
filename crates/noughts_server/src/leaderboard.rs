//! Player rankings by win/loss ratio.

use std::cmp::Ordering;

use derive_getters::Getters;
use noughts_engine::Player;
use serde::Serialize;
use tracing::instrument;

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct Ranking {
    /// 1-based position.
    rank: usize,
    /// Player name.
    name: String,
    /// Games won.
    wins: i32,
    /// Completed games neither won nor drawn.
    losses: i32,
    /// Games drawn.
    draws: i32,
    /// Wins per loss; losses are floored at one.
    ratio: f64,
}

fn ratio(wins: i32, losses: i32) -> f64 {
    f64::from(wins) / f64::from(losses.max(1))
}

/// Orders players by ratio, then wins, then name.
#[instrument(skip_all, fields(players = players.len()))]
pub fn rank_players(players: &[Player]) -> Vec<Ranking> {
    let mut lines: Vec<_> = players
        .iter()
        .map(|p| {
            let losses = p.games_lost();
            (p, losses, ratio(*p.games_won(), losses))
        })
        .collect();

    lines.sort_by(|(a, _, ra), (b, _, rb)| {
        rb.partial_cmp(ra)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.games_won().cmp(a.games_won()))
            .then_with(|| a.name().cmp(b.name()))
    });

    lines
        .into_iter()
        .enumerate()
        .map(|(i, (p, losses, ratio))| Ranking {
            rank: i + 1,
            name: p.name().clone(),
            wins: *p.games_won(),
            losses,
            draws: *p.games_drawn(),
            ratio,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_engine::PlayerId;

    fn player(id: i32, name: &str, completed: i32, won: i32, drawn: i32) -> Player {
        Player::from_parts(PlayerId::new(id), name.into(), None, 0, completed, won, drawn)
    }

    #[test]
    fn test_orders_by_ratio() {
        let players = [
            player(1, "low", 4, 1, 0),   // 1/3
            player(2, "high", 3, 2, 0),  // 2/1
            player(3, "mid", 2, 1, 0),   // 1/1
        ];
        let names: Vec<_> = rank_players(&players)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["high", "mid", "low"]);
    }

    #[test]
    fn test_undefeated_ratio_is_win_count() {
        let ranked = rank_players(&[player(1, "ace", 3, 3, 0)]);
        assert_eq!(ranked[0].ratio, 3.0);
        assert_eq!(ranked[0].losses, 0);
    }

    #[test]
    fn test_ties_break_on_wins_then_name() {
        let players = [
            player(1, "bravo", 2, 1, 0),
            player(2, "alpha", 2, 1, 0),
            player(3, "charlie", 4, 2, 0),
        ];
        let ranked = rank_players(&players);
        let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["charlie", "alpha", "bravo"]);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn test_draws_are_not_losses() {
        let ranked = rank_players(&[player(1, "d", 3, 0, 3)]);
        assert_eq!(ranked[0].losses, 0);
        assert_eq!(ranked[0].draws, 3);
    }

    #[test]
    fn test_empty() {
        assert!(rank_players(&[]).is_empty());
    }
}
