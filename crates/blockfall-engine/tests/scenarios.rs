use std::time::Duration;

use blockfall_engine::{
    Board, Command, CommandError, Engine, EngineConfig, PieceKind, PieceSeed, Position,
    RotationDirection, SessionState, Unshuffled,
};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn unshuffled() -> Engine<Unshuffled> {
    Engine::with_source(EngineConfig::default(), Unshuffled)
}

#[test]
fn single_clear_then_no_clear_lock() {
    let mut engine = unshuffled();
    engine.set_board(Board::from_ascii("III....III"));

    engine.try_move(0, 20).unwrap();
    engine.hard_drop();
    engine.tick(ms(16));
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.score, 110);
    assert_eq!(snapshot.lines, 1);
    assert_eq!(snapshot.combo, 1);

    // O piece, no clear.
    engine.try_move(0, 20).unwrap();
    engine.hard_drop();
    engine.tick(ms(16));
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.score, 110);
    assert_eq!(snapshot.combo, 0);
    assert_eq!(snapshot.lines, 1);
}

#[test]
fn double_clear_scores_330() {
    let mut engine = unshuffled();
    engine.set_board(Board::from_ascii(
        "
        ZZZZ.ZZZZZ
        ZZZZ.ZZZZZ
        ",
    ));
    // I stood up in column 4 fills both gaps.
    engine.try_rotate(RotationDirection::Clockwise).unwrap();
    engine.try_move(-1, 0).unwrap();
    assert_eq!(engine.current().cells().map(|c| c.x).max(), Some(4));

    let distance = engine.try_hard_drop().unwrap();
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.lines, 2);
    assert_eq!(snapshot.score, 330 + u64::from(distance) * 2);
    // The two blocks above the cleared rows shift down.
    assert_eq!(
        engine.board(),
        &Board::from_ascii(
            "
            ....I.....
            ....I.....
            "
        )
    );
}

#[test]
fn hard_drop_through_empty_rows() {
    let mut engine = unshuffled();
    engine.try_move(0, 15).unwrap();
    assert_eq!(engine.try_hard_drop(), Ok(5));
    assert_eq!(engine.snapshot().score, 10);
    assert_eq!(engine.snapshot().lines, 0);
}

#[test]
fn rejected_swap_leaves_session_unchanged() {
    let mut engine = unshuffled();
    engine.set_board(Board::from_ascii(
        "
        .....Z....
        ..........
        ..........
        ",
    ));
    engine.try_move(0, 19).unwrap();
    let before = engine.snapshot();

    engine.swap_hold();
    engine.tick(ms(1));
    let after = engine.snapshot();
    assert_eq!(after.current, before.current);
    assert_eq!(after.next, before.next);
    assert_eq!(after.score, before.score);
    assert_eq!(after.board, before.board);
}

#[test]
fn level_up_speeds_up_gravity() {
    let mut engine = unshuffled();
    // Ten single clears with no-clear locks in between.
    for _ in 0..10 {
        engine.set_board(Board::from_ascii("III....III"));
        assert_eq!(engine.current().kind(), PieceKind::I, "bag order drifted");
        engine.try_move(0, 20).unwrap();
        engine.try_hard_drop().unwrap();
        // Drop the rest of the bag on an empty board.
        while engine.current().kind() != PieceKind::I {
            engine.set_board(Board::EMPTY);
            engine.try_hard_drop().unwrap();
        }
    }
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.lines, 10);
    assert_eq!(snapshot.level, 2);
    assert_eq!(snapshot.drop_interval_ms, 740);
}

#[test]
fn pause_and_restart() {
    let mut engine = Engine::with_seed(PieceSeed::from(99_u128));
    engine.try_hard_drop().unwrap();
    engine.toggle_pause();
    assert_eq!(engine.state(), SessionState::Paused);
    assert_eq!(engine.try_hard_drop(), Err(CommandError::Paused));

    engine.press(Command::HardDrop);
    engine.tick(ms(2000));
    assert_eq!(engine.stats().completed_pieces(), 1);

    engine.restart();
    let snapshot = engine.snapshot();
    assert_eq!(engine.state(), SessionState::Running);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.lines, 0);
    assert_eq!(snapshot.combo, 0);
    assert_eq!(snapshot.drop_interval_ms, 800);
    assert_eq!(snapshot.board, Board::EMPTY);
    assert_eq!(snapshot.current.anchor, Position::SPAWN);
}

#[test]
fn same_seed_same_game() {
    let seed = PieceSeed::from(0xdead_beef_u128);
    let mut a = Engine::with_seed(seed);
    let mut b = Engine::with_seed(seed);
    for step in 0..200_u32 {
        for engine in [&mut a, &mut b] {
            match step % 5 {
                0 => engine.move_left(),
                1 => engine.rotate(RotationDirection::Clockwise),
                2 => engine.set_soft_drop(step % 3 == 0),
                3 => engine.move_right(),
                _ => engine.hard_drop(),
            }
            engine.tick(ms(50));
        }
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn game_over_is_terminal_until_restart() {
    let config = EngineConfig {
        spawn_anchor: Position::new(3, 0),
        ..EngineConfig::default()
    };
    let mut engine = Engine::with_source(config, Unshuffled);
    while !engine.is_game_over() {
        engine.hard_drop();
        engine.tick(ms(16));
    }
    let snapshot = engine.snapshot();
    assert!(snapshot.game_over);

    engine.toggle_pause();
    engine.toggle_pause();
    engine.tick(ms(5000));
    assert_eq!(engine.snapshot(), snapshot);

    engine.restart();
    assert!(!engine.snapshot().game_over);
    assert_eq!(engine.board().filled_cells(), 0);
}

#[test]
fn lock_above_board_spawns_next_piece() {
    let mut engine = unshuffled();
    engine.set_board(Board::from_ascii(&"...IIII...\n".repeat(Board::HEIGHT)));

    engine.hard_drop();
    engine.tick(ms(16));
    let snapshot = engine.snapshot();
    assert!(!snapshot.game_over);
    assert_eq!(snapshot.current.kind, PieceKind::O);
    assert_eq!(snapshot.completed_pieces, 1);
    assert_eq!(engine.board().filled_cells(), 4 * Board::HEIGHT);
}
