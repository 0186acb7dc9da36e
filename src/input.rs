use std::str::FromStr;

use sodium::Stream;

use crate::board::SQUARE_COUNT;
use crate::Error;

/// What a player can type at the prompt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Zero-based cell index.
    Place(usize),
    Reset,
    Quit,
}

impl Command {
    pub fn cell_index(&self) -> Option<usize> {
        match self {
            Command::Place(index) => Some(*index),
            _ => None,
        }
    }
}

impl FromStr for Command {
    type Err = Error;

    /// Squares are typed as keys 1 to 9, matching the numbers shown on the
    /// board.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(Error::EmptyInput);
        }

        match line.to_ascii_lowercase().as_str() {
            "r" | "reset" => return Ok(Command::Reset),
            "q" | "quit" => return Ok(Command::Quit),
            _ => {}
        }

        let key = line.parse::<usize>().map_err(Error::InvalidInteger)?;
        if (1..=SQUARE_COUNT).contains(&key) {
            Ok(Command::Place(key - 1))
        } else {
            Err(Error::InvalidIndex(key))
        }
    }
}

/// Splits a stream of typed lines by what they ask for.
pub struct CommandRouter {
    pub clicks: Stream<usize>,
    pub resets: Stream<()>,
    pub quit: Stream<()>,
    pub errors: Stream<Error>,
}

impl CommandRouter {
    pub fn new(input_stream: &Stream<String>) -> CommandRouter {
        let (command_stream, error_stream) = input_stream
            .map(|line: &String| line.parse::<Command>())
            .split_res();

        let click_stream = command_stream
            .map(|command: &Command| command.cell_index())
            .filter_option();
        let reset_stream = command_stream
            .filter(|command: &Command| *command == Command::Reset)
            .map(|_: &Command| ());
        let quit_stream = command_stream
            .filter(|command: &Command| *command == Command::Quit)
            .map(|_: &Command| ());

        CommandRouter {
            clicks: click_stream,
            resets: reset_stream,
            quit: quit_stream,
            errors: error_stream,
        }
    }
}
