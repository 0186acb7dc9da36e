use sodium::{Cell, CellLoop, SodiumCtx, Stream};

use crate::board::{Mark, Outcome};
use crate::state::GameState;

/// A live game wired into a sodium network.
///
/// Clicks and resets go in; the current state and what happened come out.
/// Every transition is delegated to [`GameState`], so the network only
/// decides which state is current.
pub struct TicTacToe {
    pub state: Cell<GameState>,
    /// Cell index and the mark that was placed there.
    pub moves: Stream<(usize, Mark)>,
    /// Clicks absorbed without effect: square taken, game over or no such square.
    pub ignored: Stream<usize>,
    pub finished: Stream<Outcome>,
}

impl TicTacToe {
    pub fn new(ctx: &SodiumCtx, clicks: &Stream<usize>, resets: &Stream<()>) -> TicTacToe {
        ctx.transaction(|| {
            let state_cell_loop: CellLoop<GameState> = ctx.new_cell_loop();
            let state_cell_fwd = state_cell_loop.cell();

            let accepted_stream = clicks
                .snapshot(&state_cell_fwd, |index: &usize, state: &GameState| {
                    state
                        .try_move(*index)
                        .map(|next| (*index, state.turn(), next))
                })
                .filter_option();

            let state = state_cell_fwd.clone();
            let ignored_stream =
                clicks.filter(move |index: &usize| state.sample().try_move(*index).is_none());

            // None is a reset. A reset cancels any click in the same transaction.
            let transition_stream = resets
                .map(|_: &()| None::<(usize, Mark, GameState)>)
                .or_else(&accepted_stream.map(|accepted: &(usize, Mark, GameState)| {
                    Some(*accepted)
                }));
            let committed_stream = transition_stream.filter_option();

            let state_stream =
                transition_stream.map(|transition: &Option<(usize, Mark, GameState)>| {
                    transition.map_or_else(GameState::reset, |(_, _, next)| next)
                });
            let state_cell = state_stream.hold(GameState::new());
            state_cell_loop.loop_(&state_cell);

            let move_stream = committed_stream
                .map(|(index, mark, _): &(usize, Mark, GameState)| (*index, *mark));

            let finished_stream = committed_stream
                .map(|(_, _, next): &(usize, Mark, GameState)| next.outcome())
                .filter(|outcome: &Outcome| outcome.is_over());

            TicTacToe {
                state: state_cell,
                moves: move_stream,
                ignored: ignored_stream,
                finished: finished_stream,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use sodium::{SodiumCtx, StreamSink};

    use super::*;

    struct Harness {
        clicks: StreamSink<usize>,
        resets: StreamSink<()>,
        game: TicTacToe,
    }

    fn harness(ctx: &SodiumCtx) -> Harness {
        ctx.transaction(|| {
            let clicks: StreamSink<usize> = ctx.new_stream_sink();
            let resets: StreamSink<()> = ctx.new_stream_sink();
            let game = TicTacToe::new(ctx, &clicks.stream(), &resets.stream());
            Harness {
                clicks,
                resets,
                game,
            }
        })
    }

    #[test]
    fn clicks_drive_the_state() {
        let ctx = SodiumCtx::new();
        let h = harness(&ctx);

        h.clicks.send(4);
        let state = h.game.state.sample();
        assert_eq!(state.board().get(4), Some(Mark::X));
        assert!(!state.is_x_next());
    }

    #[test]
    fn ignored_clicks_are_reported_and_change_nothing() {
        let ctx = SodiumCtx::new();
        let h = harness(&ctx);
        let ignored = Arc::new(Mutex::new(Vec::new()));
        let _listener = h.game.ignored.listen({
            let ignored = ignored.clone();
            move |index: &usize| ignored.lock().unwrap().push(*index)
        });

        h.clicks.send(0);
        let before = h.game.state.sample();
        h.clicks.send(0);
        h.clicks.send(9);

        assert_eq!(h.game.state.sample(), before);
        assert_eq!(*ignored.lock().unwrap(), vec![0, 9]);
    }

    #[test]
    fn moves_report_the_mark_placed() {
        let ctx = SodiumCtx::new();
        let h = harness(&ctx);
        let moves = Arc::new(Mutex::new(Vec::new()));
        let _listener = h.game.moves.listen({
            let moves = moves.clone();
            move |m: &(usize, Mark)| moves.lock().unwrap().push(*m)
        });

        for index in [0, 0, 1, 2] {
            h.clicks.send(index);
        }

        assert_eq!(
            *moves.lock().unwrap(),
            vec![(0, Mark::X), (1, Mark::O), (2, Mark::X)]
        );
    }

    #[test]
    fn finished_fires_once_with_the_outcome() {
        let ctx = SodiumCtx::new();
        let h = harness(&ctx);
        let finished = Arc::new(Mutex::new(Vec::new()));
        let _listener = h.game.finished.listen({
            let finished = finished.clone();
            move |outcome: &Outcome| finished.lock().unwrap().push(*outcome)
        });

        for index in [0, 3, 1, 4, 2, 8] {
            h.clicks.send(index);
        }

        assert_eq!(
            *finished.lock().unwrap(),
            vec![Outcome::Won {
                mark: Mark::X,
                line: [0, 1, 2]
            }]
        );
        assert_eq!(h.game.state.sample().board().get(8), None);
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let ctx = SodiumCtx::new();
        let h = harness(&ctx);

        for index in [0, 3, 1] {
            h.clicks.send(index);
        }
        h.resets.send(());

        assert_eq!(h.game.state.sample(), GameState::new());

        h.clicks.send(3);
        assert_eq!(h.game.state.sample().board().get(3), Some(Mark::X));
    }

    #[test]
    fn reset_wins_over_a_click_in_the_same_transaction() {
        let ctx = SodiumCtx::new();
        let h = harness(&ctx);
        let moves = Arc::new(Mutex::new(Vec::new()));
        let _listener = h.game.moves.listen({
            let moves = moves.clone();
            move |m: &(usize, Mark)| moves.lock().unwrap().push(*m)
        });

        ctx.transaction(|| {
            h.clicks.send(0);
            h.resets.send(());
        });

        assert_eq!(h.game.state.sample(), GameState::new());
        assert!(moves.lock().unwrap().is_empty());
    }

    #[test]
    fn reset_cancels_a_winning_click_in_the_same_transaction() {
        let ctx = SodiumCtx::new();
        let h = harness(&ctx);
        let finished = Arc::new(Mutex::new(Vec::new()));
        let _listener = h.game.finished.listen({
            let finished = finished.clone();
            move |outcome: &Outcome| finished.lock().unwrap().push(*outcome)
        });

        for index in [0, 3, 1, 4] {
            h.clicks.send(index);
        }
        ctx.transaction(|| {
            h.clicks.send(2);
            h.resets.send(());
        });

        assert_eq!(h.game.state.sample(), GameState::new());
        assert!(finished.lock().unwrap().is_empty());
    }
}
