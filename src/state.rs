//! Pure game state and its transitions.
//!
//! A [`GameState`] is a plain value. Transitions return a new value and never
//! touch the original, so whoever owns the current state (a sodium cell, a
//! UI loop, a test) decides when to swap it in.

use crate::board::{Board, Mark, Outcome};

/// Board plus whose turn it is. The outcome is always recomputed from the
/// board rather than stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    turn: Mark,
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            board: Board::new(),
            turn: Mark::X,
        }
    }

    pub fn reset() -> Self {
        Self::new()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn is_x_next(&self) -> bool {
        self.turn == Mark::X
    }

    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }

    pub fn winner(&self) -> Option<Mark> {
        self.outcome().winner()
    }

    pub fn winning_line(&self) -> Option<[usize; 3]> {
        self.outcome().winning_line()
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_over()
    }

    /// Places the current mark at `index` if the game is still running and
    /// the square is empty. Returns `None` when the click should be ignored:
    /// game over, square taken, or index outside `0..9`.
    pub fn try_move(&self, index: usize) -> Option<GameState> {
        if self.is_over() || !self.board.is_valid_move(index) {
            return None;
        }

        let next = GameState {
            board: self.board.mark(index, self.turn),
            turn: self.turn.swap(),
        };
        debug_assert_eq!(next.turn, next.board.next_mark());
        Some(next)
    }

    /// Like [`GameState::try_move`], but an ignored click yields an
    /// unchanged copy of the current state.
    pub fn apply_move(&self, index: usize) -> GameState {
        self.try_move(index).unwrap_or(*self)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[usize]) -> GameState {
        moves
            .iter()
            .fold(GameState::new(), |state, index| state.apply_move(*index))
    }

    #[test]
    fn initializes_with_default_state() {
        let state = GameState::new();
        assert_eq!(state.board().squares(), &[None; 9]);
        assert!(state.is_x_next());
        assert_eq!(state.outcome(), Outcome::InProgress);
        assert_eq!(state.winner(), None);
        assert_eq!(state.winning_line(), None);
    }

    #[test]
    fn handles_moves() {
        let state = GameState::new().apply_move(0);
        assert_eq!(state.board().get(0), Some(Mark::X));
        assert!(!state.is_x_next());

        let state = state.apply_move(1);
        assert_eq!(state.board().get(1), Some(Mark::O));
        assert!(state.is_x_next());
    }

    #[test]
    fn detects_a_winner() {
        let state = play(&[0, 3, 1, 4, 2]);
        assert_eq!(state.winner(), Some(Mark::X));
        assert_eq!(state.winning_line(), Some([0, 1, 2]));
    }

    #[test]
    fn detects_a_win_for_o() {
        let state = play(&[0, 2, 1, 4, 8, 6]);
        assert_eq!(
            state.outcome(),
            Outcome::Won {
                mark: Mark::O,
                line: [2, 4, 6]
            }
        );
    }

    #[test]
    fn detects_a_draw() {
        let state = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(state.outcome(), Outcome::Draw);
        assert_eq!(state.winner(), None);
        assert_eq!(state.winning_line(), None);
    }

    #[test]
    fn ignores_occupied_square() {
        let state = play(&[0]);
        let again = state.apply_move(0);
        assert_eq!(again, state);
        assert_eq!(again.board().get(0), Some(Mark::X));
        assert!(!again.is_x_next());
        assert_eq!(state.try_move(0), None);
    }

    #[test]
    fn ignores_moves_after_game_over() {
        let state = play(&[0, 3, 1, 4, 2]);
        assert_eq!(state.winner(), Some(Mark::X));

        let after = state.apply_move(8);
        assert_eq!(after.board().get(8), None);
        assert_eq!(after, state);
    }

    #[test]
    fn ignores_out_of_range_index() {
        let state = play(&[4]);
        assert_eq!(state.try_move(9), None);
        assert_eq!(state.apply_move(usize::MAX), state);
    }

    #[test]
    fn resets_the_game() {
        let state = play(&[0, 3, 1]);
        assert_ne!(state, GameState::new());
        assert_eq!(GameState::reset(), GameState::new());
        assert_eq!(GameState::reset(), GameState::default());
    }

    #[test]
    fn apply_move_leaves_original_untouched() {
        let before = GameState::new();
        let after = before.apply_move(4);
        assert_eq!(before.board().get(4), None);
        assert_eq!(after.board().get(4), Some(Mark::X));
    }
}
