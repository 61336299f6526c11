//! Game state manager: the public entry point for one game.
//!
//! `Game` owns the current [`GameState`] and, while scoring, the dead-stone
//! marks. Every accessor hands out an owned copy, so nothing a caller does to
//! a returned value can reach the engine's own state.

use tracing::{info, warn};

use crate::error::{MoveError, PhaseError, SettingsError, StateError};
use crate::point::{Player, Point, PointSet};
use crate::rules::{MoveOutcome, apply_move};
use crate::scoring::{GameScore, ScoringState};
use crate::state::{
    CapturedStones, GamePhase, GameSettings, GameSettingsOverrides, GameState, Move, MoveType,
    validate_game_state,
};

/// One game of Go.
#[derive(Debug, Clone)]
pub struct Game {
    settings: GameSettings,
    state: GameState,
    /// Present iff the phase is `Scoring`.
    scoring: Option<ScoringState>,
}

impl Game {
    pub fn new(settings: GameSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let state = GameState::new(&settings);
        info!(
            game.id = %state.id,
            board_size = settings.board_size,
            komi = settings.komi,
            "New game"
        );
        Ok(Self {
            settings,
            state,
            scoring: None,
        })
    }

    /// Start a fresh, independent game with this game's settings, replacing
    /// whatever `overrides` sets.
    pub fn new_game(&self, overrides: GameSettingsOverrides) -> Result<Game, SettingsError> {
        Game::new(overrides.apply(&self.settings))
    }

    /// Play, pass or resign for `player`.
    ///
    /// A rejected move leaves the game exactly as it was.
    pub fn make_move(
        &mut self,
        player: Player,
        move_type: MoveType,
        point: Option<Point>,
    ) -> Result<MoveOutcome, MoveError> {
        let (next, outcome) = apply_move(&self.state, player, move_type, point)?;
        if next.phase == GamePhase::Scoring && self.state.phase != GamePhase::Scoring {
            self.scoring = Some(ScoringState::new());
        }
        self.state = next;
        Ok(outcome)
    }

    pub fn game_state(&self) -> GameState {
        self.state.clone()
    }

    pub fn settings(&self) -> GameSettings {
        self.settings.clone()
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn move_history(&self) -> Vec<Move> {
        self.state.move_history.clone()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.state.move_history.last().cloned()
    }

    pub fn is_finished(&self) -> bool {
        self.state.phase == GamePhase::Finished
    }

    pub fn captured_stones(&self) -> CapturedStones {
        self.state.captured_stones.clone()
    }

    /// Toggle the dead mark on the group at `point`.
    ///
    /// Returns false outside the scoring phase or when `point` is empty.
    pub fn mark_dead_stones(&mut self, point: Point) -> bool {
        match self.scoring.as_mut() {
            Some(scoring) if self.state.phase == GamePhase::Scoring => {
                scoring.toggle(&self.state.board, point)
            }
            _ => false,
        }
    }

    /// Points currently marked dead. Empty outside the scoring phase.
    pub fn dead_stones(&self) -> PointSet {
        self.scoring
            .as_ref()
            .map(|s| s.dead_stones().clone())
            .unwrap_or_default()
    }

    /// Leave scoring and continue play. Dead marks and the pass count reset.
    pub fn resume_playing(&mut self) -> Result<(), PhaseError> {
        if self.state.phase != GamePhase::Scoring {
            return Err(PhaseError::NotScoringForResume);
        }
        let mut next = self.state.clone();
        next.phase = GamePhase::Playing;
        next.pass_count = 0;
        self.state = next;
        self.scoring = None;
        info!(game.id = %self.state.id, "Resumed play from scoring");
        Ok(())
    }

    /// Freeze the score with the current dead marks and finish the game.
    pub fn finalize_game(&mut self) -> Result<GameScore, PhaseError> {
        if self.state.phase != GamePhase::Scoring {
            return Err(PhaseError::NotScoringForFinalize);
        }
        let scoring = self.scoring.take().unwrap_or_default();
        let score = scoring.score(&self.state);

        let mut next = self.state.clone();
        next.phase = GamePhase::Finished;
        next.final_score = Some(score.clone());
        self.state = next;
        info!(game.id = %self.state.id, result = %score.summary(), "Game finalized");
        Ok(score)
    }

    /// Live preview while scoring, the frozen score once finished, `None`
    /// during play.
    pub fn current_score(&self) -> Option<GameScore> {
        match self.state.phase {
            GamePhase::Playing => None,
            GamePhase::Scoring => Some(
                self.scoring
                    .as_ref()
                    .map(|s| s.score(&self.state))
                    .unwrap_or_else(|| ScoringState::new().score(&self.state)),
            ),
            GamePhase::Finished => self.state.final_score.clone(),
        }
    }

    /// Structural self-check of the held state.
    pub fn validate_game_state(&self) -> Result<(), StateError> {
        validate_game_state(&self.state)
    }

    /// Replace the game with an externally supplied state.
    ///
    /// The state is validated first; on error nothing changes. Settings follow
    /// the loaded board size, komi and time settings. A state loaded in the
    /// scoring phase starts with no dead marks.
    pub fn load_game_state(&mut self, state: GameState) -> Result<(), StateError> {
        if let Err(err) = validate_game_state(&state) {
            warn!(game.id = %state.id, error = %err, "Rejected game state");
            return Err(err);
        }
        self.settings = GameSettings {
            board_size: state.board_size,
            komi: state.komi,
            time_settings: state.time_settings,
            players: self.settings.players.clone(),
        };
        self.scoring = (state.phase == GamePhase::Scoring).then(ScoringState::new);
        info!(
            game.id = %state.id,
            moves = state.move_history.len(),
            phase = state.phase.as_str(),
            "Loaded game state"
        );
        self.state = state;
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        let settings = GameSettings::default();
        let state = GameState::new(&settings);
        Self {
            settings,
            state,
            scoring: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_KOMI;
    use crate::state::{Players, TimeSettings};

    fn p(x: usize, y: usize) -> Point {
        Point::new(x, y)
    }

    fn game9() -> Game {
        Game::new(GameSettings::with_size(9)).unwrap()
    }

    fn pass_twice(game: &mut Game) {
        let first = game.current_player();
        game.make_move(first, MoveType::Pass, None).unwrap();
        game.make_move(first.opponent(), MoveType::Pass, None).unwrap();
    }

    #[test]
    fn test_new_game_defaults() {
        let game = game9();
        assert_eq!(game.current_player(), Player::Black);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.move_history().is_empty());
        assert!(game.last_move().is_none());
        assert!(!game.is_finished());
        assert_eq!(game.current_score(), None);
        assert!(game.validate_game_state().is_ok());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(Game::new(GameSettings::with_size(30)).is_err());
    }

    #[test]
    fn test_rejected_move_leaves_state_unchanged() {
        let mut game = game9();
        game.make_move(Player::Black, MoveType::PlaceStone, Some(p(4, 4)))
            .unwrap();
        let before = game.game_state();
        assert_eq!(
            game.make_move(Player::White, MoveType::PlaceStone, Some(p(4, 4))),
            Err(MoveError::PositionOccupied(p(4, 4)))
        );
        assert_eq!(
            game.make_move(Player::Black, MoveType::Pass, None),
            Err(MoveError::WrongTurn(Player::Black))
        );
        assert_eq!(game.game_state(), before);
    }

    #[test]
    fn test_snapshots_are_independent() {
        let mut game = game9();
        game.make_move(Player::Black, MoveType::PlaceStone, Some(p(2, 2)))
            .unwrap();

        let mut snapshot = game.game_state();
        snapshot.board = snapshot.board.with_stone(p(2, 2), None).unwrap();
        snapshot.move_history.clear();
        snapshot.captured_stones.black.push(p(0, 0));

        let fresh = game.game_state();
        assert_eq!(fresh.board.player_at(p(2, 2)), Some(Player::Black));
        assert_eq!(fresh.move_history.len(), 1);
        assert!(fresh.captured_stones.black.is_empty());

        let mut history = game.move_history();
        history.clear();
        assert_eq!(game.move_history().len(), 1);
    }

    #[test]
    fn test_scoring_flow_mark_resume_finalize() {
        let mut game = game9();
        assert!(!game.mark_dead_stones(p(0, 0)));
        assert_eq!(game.resume_playing(), Err(PhaseError::NotScoringForResume));
        assert_eq!(game.finalize_game(), Err(PhaseError::NotScoringForFinalize));

        game.make_move(Player::Black, MoveType::PlaceStone, Some(p(0, 0)))
            .unwrap();
        game.make_move(Player::White, MoveType::PlaceStone, Some(p(8, 8)))
            .unwrap();
        pass_twice(&mut game);
        assert_eq!(game.phase(), GamePhase::Scoring);

        assert!(!game.mark_dead_stones(p(4, 4)));
        assert!(game.mark_dead_stones(p(8, 8)));
        assert!(game.dead_stones().contains(&p(8, 8)));
        let preview = game.current_score().unwrap();
        assert_eq!(preview.black.captures, 1);

        game.resume_playing().unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.dead_stones().is_empty());
        assert_eq!(game.game_state().pass_count, 0);
        assert!(game.validate_game_state().is_ok());

        pass_twice(&mut game);
        assert!(game.validate_game_state().is_ok());
        assert!(game.dead_stones().is_empty());
        let score = game.finalize_game().unwrap();
        assert!(game.is_finished());
        assert_eq!(game.current_score(), Some(score));
        assert!(game.dead_stones().is_empty());
        assert_eq!(
            game.make_move(game.current_player(), MoveType::Pass, None),
            Err(MoveError::GameFinished)
        );
    }

    #[test]
    fn test_load_round_trip_and_rejection() {
        let mut game = game9();
        game.make_move(Player::Black, MoveType::PlaceStone, Some(p(3, 3)))
            .unwrap();
        let saved = game.game_state();

        let mut other = game9();
        other.load_game_state(saved.clone()).unwrap();
        assert_eq!(other.game_state(), saved);
        assert_eq!(other.current_player(), Player::White);

        let mut broken = saved.clone();
        broken.current_player = Player::Black;
        assert!(other.load_game_state(broken).is_err());
        assert_eq!(other.game_state(), saved);

        // One pass away from scoring with no pass in the history.
        let mut phantom_pass = saved.clone();
        phantom_pass.pass_count = 1;
        assert_eq!(
            other.load_game_state(phantom_pass),
            Err(StateError::PassHistory {
                pass_count: 1,
                trailing: 0
            })
        );
        assert_eq!(other.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_load_rejects_resignation_still_playing() {
        let mut game = game9();
        game.make_move(Player::Black, MoveType::Resign, None).unwrap();
        let mut reopened = game.game_state();
        reopened.phase = GamePhase::Playing;
        reopened.final_score = None;

        let mut other = game9();
        assert_eq!(
            other.load_game_state(reopened),
            Err(StateError::ResignNotFinished("PLAYING"))
        );
        assert!(other.move_history().is_empty());
    }

    #[test]
    fn test_new_game_carries_settings() {
        let settings = GameSettings {
            board_size: 13,
            komi: 0.5,
            time_settings: Some(TimeSettings {
                main_time_secs: 300,
                byo_yomi_secs: 10,
                byo_yomi_periods: 3,
            }),
            players: Some(Players {
                black: "alice".into(),
                white: "bob".into(),
            }),
        };
        let mut game = Game::new(settings.clone()).unwrap();
        game.make_move(Player::Black, MoveType::PlaceStone, Some(p(1, 1)))
            .unwrap();

        let fresh = game.new_game(GameSettingsOverrides::default()).unwrap();
        assert_eq!(fresh.settings(), settings);
        assert!(fresh.move_history().is_empty());
        assert_ne!(fresh.game_state().id, game.game_state().id);
        assert_eq!(game.move_history().len(), 1);

        let resized = game
            .new_game(GameSettingsOverrides {
                board_size: Some(9),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(resized.game_state().board_size, 9);
        assert_eq!(resized.settings().komi, 0.5);
    }

    #[test]
    fn test_default_game() {
        let game = Game::default();
        assert_eq!(game.game_state().board_size, 19);
        assert_eq!(game.game_state().komi, DEFAULT_KOMI);
    }
}
