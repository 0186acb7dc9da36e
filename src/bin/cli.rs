use std::io::{self, BufRead};

use sodium::{SodiumCtx, StreamSink};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tictactoe_state::{CommandRouter, Error, GameState, Mark, Outcome, TicTacToe};

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let ctx = SodiumCtx::new();

    let (kb_input, quitting, game, _listeners) = ctx.transaction(|| {
        let mut listeners = Vec::new();

        let kb_input: StreamSink<String> = ctx.new_stream_sink();
        let router = CommandRouter::new(&kb_input.stream());
        let game = TicTacToe::new(&ctx, &router.clicks, &router.resets);

        let quitting = router.quit.map(|_: &()| true).hold(false);

        listeners.push(router.errors.listen(|err: &Error| println!("{}", err)));

        listeners.push(router.resets.listen(|_: &()| {
            info!("game reset");
            println!("\nNew game!");
        }));

        listeners.push(game.moves.listen(|(index, mark): &(usize, Mark)| {
            debug!(index, %mark, "move accepted");
            println!("\n{}s took square {}:", mark, index + 1)
        }));

        listeners.push(game.ignored.listen(|index: &usize| {
            debug!(index, "move ignored");
        }));

        listeners.push(game.state.updates().listen(|state: &GameState| {
            println!("{}", state.board());
            if !state.is_over() {
                println!("{} to play.", state.turn());
            }
        }));

        listeners.push(game.finished.listen(|outcome: &Outcome| {
            info!(%outcome, "game finished");
            match outcome {
                Outcome::Won { .. } => println!("{}!", outcome),
                _ => println!("It's a draw!"),
            }
            println!("Type r to play again or q to quit.");
        }));

        (kb_input, quitting, game, listeners)
    });

    println!("Welcome to Tic Tac Toe!\n");
    let state = game.state.sample();
    println!("{}", state.board());
    println!("{} plays first!", state.turn());

    let stdin = io::stdin().lock();
    for line in stdin.lines() {
        kb_input.send(line?);
        if quitting.sample() {
            break;
        }
    }

    Ok(())
}
