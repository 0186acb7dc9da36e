use std::fmt;

pub const WIN_SEQUENCES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

pub const SQUARE_COUNT: usize = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn swap(&self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won { mark: Mark, line: [usize; 3] },
    Draw,
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Won { mark, .. } => Some(*mark),
            _ => None,
        }
    }

    /// Present only for a win; a draw has no line.
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        match self {
            Outcome::Won { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InProgress => f.write_str("in progress"),
            Outcome::Won { mark, line } => write!(
                f,
                "{} wins on squares {}, {} and {}",
                mark,
                line[0] + 1,
                line[1] + 1,
                line[2] + 1
            ),
            Outcome::Draw => f.write_str("draw"),
        }
    }
}

/// Nine squares in row-major order: 0, 1, 2 is the top row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Mark>; SQUARE_COUNT],
}

impl Board {
    pub fn new() -> Self {
        let squares = [None; SQUARE_COUNT];
        Self { squares }
    }

    pub fn squares(&self) -> &[Option<Mark>; SQUARE_COUNT] {
        &self.squares
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.squares.get(index).copied().flatten()
    }

    /// An out-of-range index leaves the copy untouched.
    pub fn mark(&self, index: usize, mark: Mark) -> Board {
        let mut new_board = *self;
        if let Some(square) = new_board.squares.get_mut(index) {
            *square = Some(mark);
        }
        new_board
    }

    pub fn is_valid_move(&self, index: usize) -> bool {
        matches!(self.squares.get(index), Some(None))
    }

    pub fn is_full(&self) -> bool {
        self.squares.iter().all(Option::is_some)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.squares.iter().filter(|sq| **sq == Some(mark)).count()
    }

    pub fn next_mark(&self) -> Mark {
        if self.count(Mark::X) > self.count(Mark::O) {
            Mark::O
        } else {
            Mark::X
        }
    }

    pub fn outcome(&self) -> Outcome {
        for line in WIN_SEQUENCES {
            let first = self.squares[line[0]];
            if let Some(mark) = first {
                if line.iter().all(|i| self.squares[*i] == first) {
                    return Outcome::Won { mark, line };
                }
            }
        }
        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    fn display_squares(&self) -> [String; SQUARE_COUNT] {
        std::array::from_fn(|i| match self.squares[i] {
            Some(mark) => mark.to_string(),
            None => (i + 1).to_string(),
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ds = self.display_squares();
        for (row, chunk) in ds.chunks(3).enumerate() {
            if row > 0 {
                f.write_str("---+---+---\n")?;
            }
            writeln!(f, " {} | {} | {}", chunk[0], chunk[1], chunk[2])?;
        }
        Ok(())
    }
}
