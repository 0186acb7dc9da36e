use std::num::ParseIntError;

use thiserror::Error;

mod board;
mod game;
mod input;
mod state;

pub use board::{Board, Mark, Outcome, SQUARE_COUNT, WIN_SEQUENCES};
pub use game::TicTacToe;
pub use input::{Command, CommandRouter};
pub use state::GameState;

/// Problems with what a player typed. The game itself never errors: a move
/// it cannot take is simply ignored.
#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("invalid square: {0}, pick 1 to 9!")]
    InvalidIndex(usize),

    #[error("invalid input: {0}!")]
    InvalidInteger(ParseIntError),

    #[error("nothing entered!")]
    EmptyInput,
}
