use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use minesweeper::engine::{Minefield, Position, Size};
use minesweeper::{tui, Minesweeper, MinesweeperError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "minesweeper", about = "Terminal Minesweeper", version)]
struct Args {
    /// Board width
    #[arg(long, default_value_t = 10)]
    width: usize,
    /// Board height
    #[arg(long, default_value_t = 10)]
    height: usize,
    /// Number of mines
    #[arg(long, default_value_t = 15)]
    mines: usize,
    /// Seed (0 = random)
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Line-oriented mode instead of the full-screen UI
    #[arg(long)]
    plain: bool,
    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(args: &Args) -> io::Result<()> {
    let Some(path) = &args.log_file else { return Ok(()) };
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  r x y   - reveal cell at column x, row y (1-based); a revealed number chords")?;
    writeln!(out, "  f x y   - toggle flag at x, y (1-based)")?;
    writeln!(out, "  q       - quit")?;
    writeln!(out, "  h/help  - show this help")
}

fn parse_coords(parts: &[&str]) -> Option<Position> {
    let x = parts.get(1)?.parse::<usize>().ok()?;
    let y = parts.get(2)?.parse::<usize>().ok()?;
    if x == 0 || y == 0 { return None; }
    Some(Position::new(x - 1, y - 1))
}

fn run_plain<R: BufRead, W: Write>(mut game: Minesweeper, mut input: R, out: &mut W) -> Result<()> {
    writeln!(out, "Coordinates are 1-based. Type 'h' for help.")?;
    print_help(out)?;

    let mut line = String::new();
    loop {
        if game.is_game_over() {
            game.minefield_mut().reveal_all();
            writeln!(out, "\n{}\nGame Over! You revealed a mine.", game)?;
            break;
        }
        writeln!(out, "\n{}", game)?;
        if game.is_victory() {
            writeln!(out, "Congratulations! You cleared the minefield.")?;
            break;
        }

        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 { break; }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(command) = parts.first() else { continue };

        match command.to_lowercase().as_str() {
            "q" | "quit" | "exit" => break,
            "h" | "help" => print_help(out)?,
            "r" | "reveal" => match parse_coords(&parts) {
                Some(pos) => match game.reveal_cell(pos) {
                    Err(MinesweeperError::OutOfBounds { .. }) => writeln!(out, "Coordinates outside the board")?,
                    other => { other?; }
                },
                None => writeln!(out, "Usage: r x y")?,
            },
            "f" | "flag" => match parse_coords(&parts) {
                Some(pos) => match game.flag_cell(pos) {
                    Ok(true) => {}
                    Ok(false) => writeln!(out, "Cannot flag a revealed cell")?,
                    Err(MinesweeperError::OutOfBounds { .. }) => writeln!(out, "Coordinates outside the board")?,
                    Err(e) => return Err(e),
                },
                None => writeln!(out, "Usage: f x y")?,
            },
            other => writeln!(out, "Unknown command '{}'. Type 'h' for help.", other)?,
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("cannot open log file: {}", e);
        return ExitCode::from(2);
    }

    let mut rng = if args.seed == 0 { StdRng::from_os_rng() } else { StdRng::seed_from_u64(args.seed) };
    let size = Size::new(args.width, args.height);
    let mut new_field = || Minefield::new(Position::default(), size, args.mines, &mut rng);

    let result = if args.plain {
        new_field().and_then(|field| {
            println!("Minesweeper {}x{} with {} mines", args.width, args.height, args.mines);
            run_plain(Minesweeper::new(field), io::stdin().lock(), &mut io::stdout())
        })
    } else {
        tui::run_tui(new_field)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ (MinesweeperError::EmptyBoard { .. } | MinesweeperError::BoardTooLarge { .. } | MinesweeperError::TooManyMines { .. })) => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
