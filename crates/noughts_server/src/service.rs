//! Game operations over a [`Store`] and a [`NotificationSink`].

use noughts_engine::{Game, GameError, GameId, MoveOutcome, Player, PlayerId, Symbol};
use tracing::{debug, info, instrument, warn};

use crate::{
    ActiveGameView, GameRecord, GameView, HistoryView, MessageView, Notification,
    NotificationKind, NotificationSink, PlayerView, Ranking, ServiceError, Store,
    rank_players,
};

/// Service layer for players and games.
///
/// Reads a game, runs the engine transition on it, and commits the new
/// snapshot together with the player counter changes. Notifications go out
/// only after a successful commit.
#[derive(Debug)]
pub struct GameService<S, N> {
    store: S,
    notifier: N,
}

impl<S: Store, N: NotificationSink> GameService<S, N> {
    /// Creates a service.
    #[instrument(skip_all)]
    pub fn new(store: S, notifier: N) -> Self {
        info!("Creating GameService");
        Self { store, notifier }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────
    //  Players
    // ─────────────────────────────────────────────────────────────

    /// Registers a player.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Conflict`] if the name is taken.
    #[instrument(skip(self))]
    pub fn create_user(
        &self,
        name: &str,
        email: Option<&str>,
    ) -> Result<MessageView, ServiceError> {
        let player = self.store.create_player(name, email)?;
        info!(player_id = %player.id(), "User registered");
        Ok(MessageView::new(format!("User {name} created!")))
    }

    /// All players with their counters.
    #[instrument(skip(self))]
    pub fn list_users(&self) -> Result<Vec<PlayerView>, ServiceError> {
        let players = self.store.list_players()?;
        Ok(players.into_iter().map(PlayerView::from).collect())
    }

    fn player_named(&self, name: &str) -> Result<Player, ServiceError> {
        self.store
            .player_by_name(name)?
            .ok_or_else(|| ServiceError::user_not_found(name))
    }

    fn player_with_id(&self, id: PlayerId) -> Result<Player, ServiceError> {
        self.store
            .player(id)?
            .ok_or_else(|| ServiceError::user_not_found(id.to_string()))
    }

    fn seats(&self, game: &Game) -> Result<(Player, Player), ServiceError> {
        Ok((
            self.player_with_id(*game.player_x())?,
            self.player_with_id(*game.player_o())?,
        ))
    }

    fn load(&self, id: GameId) -> Result<GameRecord, ServiceError> {
        self.store
            .game(id)?
            .ok_or_else(|| ServiceError::game_not_found(id))
    }

    fn view(
        &self,
        record: &GameRecord,
        message: impl Into<String>,
    ) -> Result<GameView, ServiceError> {
        let (x, o) = self.seats(record.game())?;
        Ok(GameView::new(
            *record.id(),
            record.game(),
            x.name(),
            o.name(),
            message,
        ))
    }

    // ─────────────────────────────────────────────────────────────
    //  Games
    // ─────────────────────────────────────────────────────────────

    /// Starts a game; `user_x` moves first.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] for an unknown name,
    /// [`GameError::SamePlayer`] if both names are the same player.
    #[instrument(skip(self))]
    pub fn new_game(&self, user_x: &str, user_o: &str) -> Result<GameView, ServiceError> {
        let x = self.player_named(user_x)?;
        let o = self.player_named(user_o)?;

        let (game, started) = Game::new(*x.id(), *o.id())?;
        let record = self.store.insert_game(&game, &started)?;
        info!(game_id = %record.id(), "Game created");

        Ok(GameView::new(
            *record.id(),
            record.game(),
            x.name(),
            o.name(),
            format!("Game created. {} to play first", x.name()),
        ))
    }

    /// Current state of a game.
    #[instrument(skip(self))]
    pub fn game(&self, id: GameId) -> Result<GameView, ServiceError> {
        let record = self.load(id)?;
        self.view(&record, "Game details")
    }

    /// Moves of a game in order.
    #[instrument(skip(self))]
    pub fn history(&self, id: GameId) -> Result<Vec<HistoryView>, ServiceError> {
        let record = self.load(id)?;
        let (x, o) = self.seats(record.game())?;
        let name_of = |player: PlayerId| {
            if player == *x.id() {
                x.name().as_str()
            } else {
                o.name().as_str()
            }
        };
        Ok(record
            .game()
            .history()
            .iter()
            .map(|entry| HistoryView::new(entry, name_of(*entry.player())))
            .collect())
    }

    /// Unfinished games of a player, those played as X first.
    #[instrument(skip(self))]
    pub fn active_games(&self, user_name: &str) -> Result<Vec<ActiveGameView>, ServiceError> {
        let player = self.player_named(user_name)?;
        let records = self.store.active_games_for(*player.id())?;

        let mut views = Vec::with_capacity(records.len());
        for symbol in [Symbol::X, Symbol::O] {
            for record in &records {
                if record.game().symbol_of(*player.id()) != Some(symbol) {
                    continue;
                }
                let Some(opponent) = record.game().opponent_of(*player.id()) else {
                    continue;
                };
                views.push(ActiveGameView {
                    game_id: *record.id(),
                    symbol,
                    opponent: self.player_with_id(opponent)?.name().clone(),
                });
            }
        }
        debug!(count = views.len(), "Active games listed");
        Ok(views)
    }

    /// Plays a move for `user_name` and notifies the opponent.
    ///
    /// A finished game is rejected before the mover's name is resolved.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] for an unknown game or user,
    /// [`ServiceError::NotYourTurn`] when `user_name` is not the player to
    /// move, [`ServiceError::Game`] for the remaining engine rejections, and
    /// [`ServiceError::Conflict`] if the game changed concurrently.
    #[instrument(skip(self))]
    pub fn make_move(
        &self,
        id: GameId,
        user_name: &str,
        row: usize,
        col: usize,
    ) -> Result<GameView, ServiceError> {
        let mut record = self.load(id)?;
        if record.game().status().is_terminal() {
            debug!(game_id = %id, "Move on finished game rejected");
            return Err(GameError::GameAlreadyEnded.into());
        }
        let mover = self.player_named(user_name)?;
        let (x, o) = self.seats(record.game())?;

        let report = match record.game_mut().apply_move(*mover.id(), row, col) {
            Ok(report) => report,
            Err(GameError::WrongTurn { expected }) => {
                let expected = if expected == *x.id() { x.name() } else { o.name() };
                warn!(user = user_name, expected = %expected, "Move out of turn");
                return Err(ServiceError::NotYourTurn {
                    expected: expected.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let committed = self.store.commit_game(&record, report.deltas())?;

        let name_of = |player: PlayerId| if player == *x.id() { &x } else { &o };
        let (message, kind) = match *report.outcome() {
            MoveOutcome::Won { winner, .. } => {
                let winner = name_of(winner).name();
                (
                    format!("Game over, {winner} wins !"),
                    NotificationKind::Win {
                        winner_name: winner.clone(),
                    },
                )
            }
            MoveOutcome::Drawn => (
                "It is a Draw ! Well Played both".to_string(),
                NotificationKind::Draw,
            ),
            MoveOutcome::InProgress { next } => (
                format!("Nice move ! {} to play next", name_of(next).name()),
                NotificationKind::YourTurn,
            ),
        };

        if let Some(opponent) = committed.game().opponent_of(*mover.id()) {
            let recipient = name_of(opponent);
            self.notifier.notify(Notification::new(
                recipient.name().clone(),
                recipient.email().clone(),
                kind,
            ));
        }

        info!(game_id = %id, outcome = ?report.outcome(), "Move committed");
        Ok(GameView::new(
            *committed.id(),
            committed.game(),
            x.name(),
            o.name(),
            message,
        ))
    }

    /// Deletes an unfinished game and releases both players' in-progress
    /// counters.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] for an unknown game,
    /// [`GameError::GameAlreadyEnded`] if it has already ended.
    #[instrument(skip(self))]
    pub fn cancel_game(&self, id: GameId) -> Result<MessageView, ServiceError> {
        let mut record = self.load(id)?;
        let released = record.game_mut().cancel()?;
        self.store.delete_game(&record, &released)?;
        info!(game_id = %id, "Game cancelled");
        Ok(MessageView::new("Game deleted !"))
    }

    /// Leaderboard of all players.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NoPlayers`] if nobody is registered.
    #[instrument(skip(self))]
    pub fn rankings(&self) -> Result<Vec<Ranking>, ServiceError> {
        let players = self.store.list_players()?;
        if players.is_empty() {
            return Err(ServiceError::NoPlayers);
        }
        Ok(rank_players(&players))
    }
}

