use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nba_edge::config::Config;
use nba_edge::data::{
    load_snapshot, save_prop_leaderboard_to_csv, save_to_cache, save_top_picks_to_csv,
};
use nba_edge::odds_math::{combine_parlay, parse_legs, payout_from_input};
use nba_edge::pick_parser::{parse_pick_text, parse_prop_line};
use nba_edge::{build_dashboard, GameStatus};
use std::io::Read;
use std::path::PathBuf;

/// NBA betting calculator and dashboard
#[derive(Parser, Debug)]
#[command(name = "nba-edge")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Payout for a single bet
    Payout {
        /// American odds, e.g. -110 or +150
        #[arg(allow_negative_numbers = true)]
        odds: String,
        /// Stake in dollars
        #[arg(allow_negative_numbers = true)]
        stake: String,
    },

    /// Combine two or more legs into a parlay
    Parlay {
        /// American odds for each leg
        #[arg(required = true, allow_negative_numbers = true)]
        legs: Vec<String>,
        /// Optional stake in dollars
        #[arg(long, allow_negative_numbers = true)]
        stake: Option<String>,
    },

    /// Pull best bet / total / player prop out of analysis text
    Parse {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,
    },

    /// Resolve results, pace projections and top picks for a snapshot
    Dashboard {
        /// Snapshot file (defaults to NBA_SNAPSHOT_FILE)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Commands::Payout { odds, stake } => match payout_from_input(&odds, &stake)? {
            Some(p) => {
                println!("Stake:  ${:.2}", p.stake);
                println!("Payout: ${:.2}", p.payout);
                println!("Profit: ${:.2}", p.profit);
            }
            None => println!("Enter a positive stake to see a payout."),
        },
        Commands::Parlay { legs, stake } => {
            let legs = parse_legs(&legs)?;
            let mut quote = combine_parlay(&legs)?;
            if let Some(stake) = &stake {
                if let Ok(stake) = stake.trim().parse::<f64>() {
                    quote = quote.with_stake(stake);
                }
            }
            println!("Legs:     {}", quote.legs.len());
            println!("Decimal:  {:.4}", quote.combined_decimal);
            println!("American: {}", quote.american_display());
            println!("Implied:  {:.1}%", quote.implied_probability);
            match (&quote.payout, stake) {
                (Some(p), _) => println!("Payout:   ${:.2} (profit ${:.2})", p.payout, p.profit),
                (None, Some(_)) => println!("Enter a positive stake to see a payout."),
                (None, None) => {}
            }
        }
        Commands::Parse { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut text = String::new();
                    std::io::stdin()
                        .read_to_string(&mut text)
                        .context("Failed to read stdin")?;
                    text
                }
            };

            let picks = parse_pick_text(&text);
            if picks.is_empty() {
                println!("No picks found.");
                return Ok(());
            }
            println!("{}", picks.to_text());
            if let Some(prop) = picks.player_prop.as_deref().and_then(parse_prop_line) {
                println!("\nParsed prop: {}", prop.format());
            }
        }
        Commands::Dashboard { snapshot } => {
            let snapshot_file = snapshot.unwrap_or_else(|| config.snapshot_file.clone());
            let snapshot = load_snapshot(&snapshot_file)?;
            let dashboard = build_dashboard(&snapshot, config.top_picks, config.leaderboard_size);
            print_dashboard(&dashboard);

            if config.save_csv {
                let dir = &config.export_dir;
                save_to_cache(&dashboard, dir.join("dashboard.json"))?;
                if !dashboard.top_picks.is_empty() {
                    save_top_picks_to_csv(
                        &dashboard.top_picks,
                        &snapshot.games,
                        dir.join("top_picks.csv"),
                    )?;
                    println!("\nSaved top picks to top_picks.csv");
                }
                if !dashboard.prop_leaderboard.is_empty() {
                    save_prop_leaderboard_to_csv(
                        &dashboard.prop_leaderboard,
                        dir.join("prop_leaderboard.csv"),
                    )?;
                    println!("Saved props leaderboard to prop_leaderboard.csv");
                }
            }
        }
    }

    Ok(())
}

fn print_dashboard(dashboard: &nba_edge::Dashboard) {
    println!("GAMES\n");
    for card in &dashboard.games {
        let game = &card.game;
        match game.status {
            GameStatus::Upcoming => println!(
                "{} @ {}  {}",
                game.away,
                game.home,
                game.time.as_deref().unwrap_or("TBD")
            ),
            GameStatus::Live | GameStatus::Final => println!(
                "{} {} @ {} {}  {}",
                game.away,
                game.away_score,
                game.home,
                game.home_score,
                if game.is_final() { "FINAL" } else { "LIVE" }
            ),
        }
        if let Some(result) = &card.result {
            println!("    {}", result.format());
        }
        if let Some(pace) = &card.pace {
            println!("    {}", pace.format());
        }
        for graded in &card.picks {
            match graded.grade {
                Some(grade) => println!("    {} => {:?}", graded.pick.format(), grade),
                None => println!("    {}", graded.pick.format()),
            }
        }
    }

    println!("\nTOP PICKS\n");
    if dashboard.top_picks.is_empty() {
        println!("No ranked picks for upcoming or live games.");
    } else {
        for (i, pick) in dashboard.top_picks.iter().enumerate() {
            println!("{}. {}", i + 1, pick.format());
        }
    }

    println!("\nPLAYER PROPS\n");
    if dashboard.prop_leaderboard.is_empty() {
        println!("No player props.");
    } else {
        for (i, prop) in dashboard.prop_leaderboard.iter().enumerate() {
            println!("{}. {}", i + 1, prop.format());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_stake_reaches_payout() {
        let cli = Cli::try_parse_from(["cli", "payout", "-110", "-5"]).unwrap();
        match cli.command {
            Commands::Payout { odds, stake } => {
                assert_eq!(odds, "-110");
                assert_eq!(stake, "-5");
                assert_eq!(payout_from_input(&odds, &stake).unwrap(), None);
            }
            other => panic!("expected payout, got {:?}", other),
        }
    }

    #[test]
    fn test_parlay_stake_is_free_text() {
        let cli =
            Cli::try_parse_from(["cli", "parlay", "-110", "+150", "--stake", "abc"]).unwrap();
        match cli.command {
            Commands::Parlay { legs, stake } => {
                assert_eq!(legs, vec!["-110", "+150"]);
                assert_eq!(stake.as_deref(), Some("abc"));
            }
            other => panic!("expected parlay, got {:?}", other),
        }

        let cli = Cli::try_parse_from(["cli", "parlay", "-110", "+150", "--stake", "-10"]).unwrap();
        match cli.command {
            Commands::Parlay { stake, .. } => assert_eq!(stake.as_deref(), Some("-10")),
            other => panic!("expected parlay, got {:?}", other),
        }
    }
}
