use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use mines_core::*;

/// Play Mines in the terminal: find gems, dodge mines, cash out before it blows up.
#[derive(Debug, Parser)]
#[command(name = "mines", version)]
struct Cli {
    /// Side length of the square grid (1-10)
    #[arg(long, default_value_t = 5)]
    size: Coord,
    /// Number of hidden mines
    #[arg(long, default_value_t = 3)]
    mines: CellCount,
    /// Amount wagered on this game
    #[arg(long, default_value_t = 10)]
    bet: u32,
    /// Starting balance of the player
    #[arg(long, default_value_t = 1000)]
    balance: i64,
    /// Seed for the mine layout, drawn from OS entropy when omitted
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    verbose: Verbosity,
}

const PLAYER: &str = "player";

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let config = GameConfig::new(cli.size, cli.mines).with_context(|| {
        format!(
            "cannot play {} mines on a {}x{} grid",
            cli.mines, cli.size, cli.size
        )
    })?;

    let mut balances = MemoryBalances::new(cli.balance);
    if i64::from(cli.bet) > balances.balance(&PLAYER) {
        bail!(
            "bet of {} exceeds the balance of {}",
            cli.bet,
            balances.balance(&PLAYER)
        );
    }

    let seed = match cli.seed {
        Some(seed) => seed,
        None => entropy_seed()?,
    };
    log::info!("Starting game with seed {}", seed);

    let mut session = MinesSession::start(config, RandomMinefieldGenerator::new(seed), cli.bet)?;
    println!(
        "{} mines hidden in the {}x{} grid. Bet: {}",
        config.mines, config.size, config.size, cli.bet
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    play(&mut session, &mut lines)?;

    println!("{}", render(&BoardView::from_session_exposed(&session)));
    let settlement = match Settlement::from_session(&session) {
        Ok(settlement) => settlement,
        Err(GameError::NotFinished) => {
            println!("Game abandoned, the bet is forfeited.");
            Settlement {
                wagered: i64::from(session.bet()),
                returned: 0,
            }
        }
        Err(err) => return Err(err.into()),
    };
    settlement.apply(&mut balances, &PLAYER);
    println!("Balance: {}", balances.balance(&PLAYER));

    Ok(())
}

/// Drives the session until it ends or input runs out.
fn play<I>(session: &mut MinesSession, lines: &mut I) -> Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    while !session.is_finished() {
        println!("{}", render(&session.view()));

        let Some(line) = prompt(lines, "Enter row and column: ")? else {
            return Ok(());
        };
        let coords = match parse_coords(&line) {
            Some(coords) => coords,
            None => {
                println!("Expected two numbers, like `2 3`. Try again.");
                continue;
            }
        };

        match session.reveal(coords) {
            Ok(RevealOutcome::Busted) => println!("Boom! Game over."),
            Ok(RevealOutcome::Gem { multiplier }) => {
                println!("Found a gem! Multiplier: {multiplier:.2}");
                if confirm(lines, "Do you want to withdraw? (y/n): ")? {
                    cash_out(session)?;
                }
            }
            Ok(RevealOutcome::Cleared { multiplier }) => {
                println!("Every gem found! Multiplier: {multiplier:.2}");
                cash_out(session)?;
            }
            Err(err @ (GameError::OutOfBounds | GameError::AlreadyRevealed)) => {
                println!("{err}. Try again.");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn cash_out(session: &mut MinesSession) -> Result<()> {
    let winnings = session.cash_out()?;
    println!("Congratulations! You won {winnings:.2}.");
    Ok(())
}

fn prompt<I>(lines: &mut I, message: &str) -> Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{message}");
    io::stdout().flush()?;
    lines.next().transpose().context("failed to read input")
}

fn confirm<I>(lines: &mut I, message: &str) -> Result<bool>
where
    I: Iterator<Item = io::Result<String>>,
{
    let answer = prompt(lines, message)?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn parse_coords(line: &str) -> Option<Coord2> {
    let mut parts = line.split(|c: char| c.is_whitespace() || c == ',').filter(|part| !part.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((row, col))
}

fn render(view: &BoardView) -> String {
    let mut out = String::new();
    for row in 0..view.size {
        let cells: Vec<&str> = (0..view.size)
            .map(|col| match view.tile_at((row, col)) {
                TileView::Hidden => "X",
                TileView::Gem => "G",
                TileView::Mine => "*",
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out.push_str(&format!(
        "Gems: {}  Multiplier: {:.2}",
        view.gems_revealed, view.multiplier
    ));
    out
}

fn entropy_seed() -> Result<u64> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes).map_err(|err| anyhow!("failed to read OS entropy: {err}"))?;
    Ok(u64::from_le_bytes(bytes))
}
