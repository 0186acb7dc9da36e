use std::{env, fs::File, io, sync::Mutex};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use sodium as na;
use tictactoe_state::{GameState, Mark, Outcome, TicTacToe, SQUARE_COUNT};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame, Terminal,
};

fn main() -> io::Result<()> {
    // The terminal is in raw mode, so only log when pointed at a file.
    if let Ok(path) = env::var("TTT_TUI_LOG") {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let ctx = na::SodiumCtx::new();

    let (clicks, resets, game, _listeners) = ctx.transaction(|| {
        let clicks: na::StreamSink<usize> = ctx.new_stream_sink();
        let resets: na::StreamSink<()> = ctx.new_stream_sink();

        let game = TicTacToe::new(&ctx, &clicks.stream(), &resets.stream());

        let listeners = vec![
            game.moves.listen(|(index, mark): &(usize, Mark)| {
                debug!(index, %mark, "move accepted");
            }),
            game.ignored.listen(|index: &usize| {
                debug!(index, "move ignored");
            }),
            game.finished.listen(|outcome: &Outcome| {
                info!(%outcome, "game finished");
            }),
        ];

        (clicks, resets, game, listeners)
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let ui = Ui { state: game.state };
    let result = run(&mut terminal, &ui, &clicks, &resets);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    ui: &Ui,
    clicks: &na::StreamSink<usize>,
    resets: &na::StreamSink<()>,
) -> io::Result<()> {
    loop {
        let mut squares = [Rect::default(); SQUARE_COUNT];
        terminal.draw(|f| squares = ui.draw(f))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('r') => resets.send(()),
                KeyCode::Char(c @ '1'..='9') => {
                    if let Some(key) = c.to_digit(10) {
                        clicks.send(key as usize - 1);
                    }
                }
                _ => {}
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = square_at(&squares, mouse.column, mouse.row) {
                    clicks.send(index);
                }
            }
            _ => {}
        }
    }
}

fn square_at(squares: &[Rect], column: u16, row: u16) -> Option<usize> {
    squares.iter().position(|area| {
        column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height
    })
}

struct Ui {
    state: na::Cell<GameState>,
}

impl Ui {
    /// Draws the whole screen and returns where each square ended up.
    fn draw<B: Backend>(&self, f: &mut Frame<B>) -> [Rect; SQUARE_COUNT] {
        let state = self.state.sample();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .margin(2)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)].as_ref())
            .split(f.size());

        let block = Block::default().title("Board").borders(Borders::ALL);
        let squares = self.draw_board(f, &state, block.inner(chunks[0]));
        f.render_widget(block, chunks[0]);

        let info = Paragraph::new(info_lines(&state))
            .block(Block::default().title("Game Info").borders(Borders::ALL));
        f.render_widget(info, chunks[1]);

        squares
    }

    fn draw_board<B: Backend>(
        &self,
        f: &mut Frame<B>,
        state: &GameState,
        area: Rect,
    ) -> [Rect; SQUARE_COUNT] {
        let thirds = [
            Constraint::Percentage(5),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(5),
        ];
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(thirds.as_ref())
            .split(area);

        let mut squares = [Rect::default(); SQUARE_COUNT];
        for (row, row_area) in rows[1..4].iter().enumerate() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .horizontal_margin(3)
                .constraints(thirds.as_ref())
                .split(*row_area);
            for col in 0..3 {
                squares[row * 3 + col] = columns[col + 1];
            }
        }

        let line = state.winning_line();
        let highlighted = |index: usize| line.map_or(false, |line| line.contains(&index));

        for (index, chunk) in squares.iter().enumerate() {
            let style = if highlighted(index) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(Span::styled(
                    format!("{}", index + 1),
                    Style::default().fg(Color::DarkGray),
                ));
            f.render_widget(
                RenderMark {
                    mark: state.board().get(index),
                    style,
                },
                block.inner(*chunk),
            );
            f.render_widget(block, *chunk);
        }

        squares
    }
}

fn info_lines(state: &GameState) -> Vec<Spans<'static>> {
    let status = match state.outcome() {
        Outcome::InProgress => format!("{} to play", state.turn()),
        Outcome::Won { mark, .. } => format!("{} wins!", mark),
        Outcome::Draw => "It's a draw!".to_string(),
    };
    vec![
        Spans::from(Span::styled(
            status,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(""),
        Spans::from("1-9 / click: place"),
        Spans::from("r: new game"),
        Spans::from("q: quit"),
    ]
}

struct RenderMark {
    mark: Option<Mark>,
    style: Style,
}

impl Widget for RenderMark {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }
        match self.mark {
            Some(Mark::X) => render_x(area, buf, self.style),
            Some(Mark::O) => render_o(area, buf, self.style),
            None => {}
        }
    }
}

fn render_x(area: Rect, buf: &mut Buffer, style: Style) {
    let size = area.width.min(area.height * 2);
    let x0 = area.x + (area.width - size) / 2;
    let rows = (size / 2).max(1);
    let y0 = area.y + (area.height - rows) / 2;

    for y in 0..rows {
        // Two columns per row keeps the strokes roughly at 45 degrees.
        let dx = (y * 2).min(size - 1);
        buf.set_string(x0 + dx, y0 + y, "\\", style);
        buf.set_string(x0 + size - 1 - dx, y0 + y, "/", style);
    }
}

fn render_o(area: Rect, buf: &mut Buffer, style: Style) {
    let radius_y = (area.height.saturating_sub(1) / 2).max(1) as f32;
    let radius_x = (radius_y * 2.0).min(area.width.saturating_sub(1) as f32 / 2.0);
    let center_x = area.x as f32 + area.width as f32 / 2.0;
    let center_y = area.y as f32 + area.height as f32 / 2.0;

    let steps = 64;
    for step in 0..steps {
        let angle = step as f32 / steps as f32 * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        let x = (center_x + radius_x * cos).round() as u16;
        let y = (center_y + radius_y * sin).round() as u16;
        if x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height {
            buf.get_mut(x, y).set_char('@').set_style(style);
        }
    }
}
