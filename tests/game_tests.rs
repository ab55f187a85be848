use minesweeper::engine::{Minefield, Position, RevealOutcome, Size};
use minesweeper::{Action, Minesweeper};

fn game(w: usize, h: usize, mines: &[Position]) -> Minesweeper {
    Minesweeper::new(Minefield::with_mines(Position::default(), Size::new(w, h), mines).expect("field"))
}

#[test]
fn new_game_is_not_finished() {
    let g = game(3, 3, &[Position::new(2, 2)]);
    assert!(!g.is_game_over());
    assert!(!g.is_victory());
    assert!(!g.is_finished());
}

#[test]
fn flood_to_victory() {
    let mut g = game(3, 3, &[Position::new(2, 2)]);
    g.reveal_cell(Position::new(0, 0)).unwrap();
    assert!(g.is_victory());
    assert!(!g.is_game_over());
}

#[test]
fn mine_ends_game_and_blocks_further_moves() {
    let mut g = game(3, 1, &[Position::new(0, 0)]);
    assert_eq!(g.reveal_cell(Position::new(0, 0)).unwrap(), RevealOutcome::HitMine);
    assert!(g.is_game_over());
    assert!(!g.minefield().all_non_mines_revealed());

    assert_eq!(g.reveal_cell(Position::new(2, 0)).unwrap(), RevealOutcome::NoChange);
    assert!(!g.minefield().cell(Position::new(2, 0)).unwrap().is_revealed());
    assert!(!g.flag_cell(Position::new(1, 0)).unwrap());
    assert!(!g.is_victory());
}

#[test]
fn chord_onto_mine_is_a_loss() {
    let mut g = game(3, 1, &[Position::new(0, 0)]);
    g.reveal_cell(Position::new(1, 0)).unwrap();
    g.flag_cell(Position::new(2, 0)).unwrap();
    g.reveal_cell(Position::new(1, 0)).unwrap();
    assert!(g.is_game_over());
}

#[test]
fn actions_drive_the_session() {
    let mut g = game(3, 1, &[Position::new(0, 0)]);
    g.apply(Action::MoveCursor { dx: 1, dy: 0 }).unwrap();
    let cursor = g.minefield().cursor();
    assert_eq!(cursor, Position::new(1, 0));

    g.apply(Action::Reveal(cursor)).unwrap();
    g.apply(Action::Flag(Position::new(0, 0))).unwrap();
    assert!(!g.is_victory());
    g.apply(Action::Reveal(cursor)).unwrap();
    assert!(g.is_victory());
    assert_eq!(g.to_string(), "F1.");
}

#[test]
fn out_of_bounds_action_is_an_error() {
    let mut g = game(2, 2, &[]);
    assert!(g.apply(Action::Reveal(Position::new(5, 0))).is_err());
    assert!(!g.is_finished());
}

#[test]
fn loss_disclosure_shows_every_cell() {
    let mut g = game(2, 2, &[Position::new(1, 1)]);
    g.reveal_cell(Position::new(1, 1)).unwrap();
    g.minefield_mut().reveal_all();
    assert_eq!(g.to_string(), "11\n1*");
}
