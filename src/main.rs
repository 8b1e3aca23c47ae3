//! Tavern Brawl headless runner
//!
//! Fights one round between a player army and the scripted enemy wave,
//! driving the battle with a synthetic 60 Hz frame clock, then prints the
//! damage report.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;

use tavern_brawl::sim::Impact;
use tavern_brawl::templates::player_card;
use tavern_brawl::waves::enemy_wave;
use tavern_brawl::{BattleSession, Card, Faction, TimeScale, Tuning, TuningError};

/// Wall time of one synthetic render frame
const FRAME_MS: f32 = 1000.0 / 60.0;

#[derive(Parser)]
#[command(name = "tavern-brawl")]
#[command(about = "Run a headless tavern battle against a scripted wave")]
#[command(version)]
struct Cli {
    /// Enemy wave to fight (rounds past 12 are the endless horde)
    #[arg(short, long, default_value = "1")]
    round: u32,

    /// Random seed for spawn jitter and effects
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Time scale: 0 (paused), 1, 2 or 4
    #[arg(long, default_value = "1", value_parser = parse_speed)]
    speed: TimeScale,

    /// Player army as `name[:count],...` (names or template ids)
    #[arg(short, long, default_value = "militia,archers,ballista", value_parser = parse_army)]
    army: Army,

    /// Balance overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Give up after this many seconds of (synthetic) frame time
    #[arg(long, default_value = "600")]
    max_seconds: u32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone)]
struct Army(Vec<Option<Card>>);

fn parse_speed(s: &str) -> Result<TimeScale, String> {
    let multiplier: u32 = s.parse().map_err(|_| format!("invalid speed: {s}"))?;
    TimeScale::from_multiplier(multiplier).ok_or_else(|| format!("speed must be 0, 1, 2 or 4, got {s}"))
}

fn parse_army(s: &str) -> Result<Army, String> {
    let mut cards = Vec::new();
    for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, count) = match entry.split_once(':') {
            Some((name, count)) => {
                let count: u32 = count
                    .parse()
                    .map_err(|_| format!("invalid unit count in {entry:?}"))?;
                (name, Some(count))
            }
            None => (entry, None),
        };

        let mut card = player_card(name).ok_or_else(|| format!("unknown card {name:?}"))?;
        if let Some(count) = count {
            card.unit_count = count;
        }
        card.id = format!("{}_{}", card.id, cards.len() + 1);
        cards.push(Some(card));
    }
    Ok(Army(cards))
}

fn main() -> Result<(), TuningError> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let mut session = BattleSession::new(tuning, cli.seed)?;
    session.set_time_scale(cli.speed);

    let shakes = Rc::new(Cell::new(0u32));
    let counter = shakes.clone();
    session.battle.set_impact_hook(move |impact| {
        if matches!(impact, Impact::HeavyStrike | Impact::Explosion) {
            counter.set(counter.get() + 1);
        }
    });
    session.set_on_end(|winner| log::info!("Outcome callback: {winner:?}"));

    let wave = enemy_wave(cli.round);
    session.start(&cli.army.0, &wave);
    log::info!(
        "Round {} at {}x: {} vs {} units",
        cli.round,
        cli.speed.multiplier(),
        session.battle.living_count(Faction::Player),
        session.battle.living_count(Faction::Enemy)
    );

    let max_frames = u64::from(cli.max_seconds) * 60;
    let mut frames = 0u64;
    while !session.is_finished() && frames < max_frames {
        session.frame(FRAME_MS);
        frames += 1;
    }

    let battle = &session.battle;
    match session.winner() {
        Some(winner) => log::info!("{winner:?} wins after {} ticks", battle.time_ticks),
        None => log::warn!("No winner after {frames} frames ({} ticks)", battle.time_ticks),
    }

    if cli.json {
        let report = serde_json::json!({
            "round": cli.round,
            "seed": cli.seed,
            "winner": session.winner(),
            "ticks": battle.time_ticks,
            "impacts": shakes.get(),
            "player_value": battle.living_value(Faction::Player),
            "enemy_value": battle.living_value(Faction::Enemy),
            "player_damage": battle.player_damage,
            "enemy_damage": battle.enemy_damage,
        });
        println!("{report:#}");
        return Ok(());
    }

    let outcome = match session.winner() {
        Some(Faction::Player) => "VICTORY",
        Some(Faction::Enemy) => "DEFEAT",
        None => "UNDECIDED",
    };
    println!("Round {}: {outcome} after {:.1}s of battle", cli.round, battle.time_ticks as f32 / 60.0);
    println!(
        "Survivors: {} player ({:.0} value), {} enemy ({:.0} value)",
        battle.living_count(Faction::Player),
        battle.living_value(Faction::Player),
        battle.living_count(Faction::Enemy),
        battle.living_value(Faction::Enemy)
    );

    for (label, faction) in [("Player", Faction::Player), ("Enemy", Faction::Enemy)] {
        let tracker = battle.damage_tracker(faction);
        println!("\n{label} damage ({:.0} total)", tracker.total());
        for (name, entry) in tracker.ranked() {
            println!("  {:<22} {:>8} {:>8.0}", name, entry.role.as_str(), entry.total);
        }
    }

    Ok(())
}
