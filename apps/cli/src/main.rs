#![deny(warnings)]

//! Headless driver: boot a session, simulate some time, print a report.

use anyhow::{Context, Result};
use idle_core::{format_number, SystemClock};
use idle_runtime::{RuntimeConfig, Session};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Simulated frame length fed to the ticker.
const FRAME_SECS: f64 = 1.0 / 60.0;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    skin: Option<String>,
    skins_root: Option<PathBuf>,
    save_dir: Option<PathBuf>,
    seconds: Option<f64>,
    autobuy: bool,
    prestige: bool,
    json: bool,
    version: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = it.next().map(PathBuf::from),
            "--skin" => args.skin = it.next(),
            "--skins-root" => args.skins_root = it.next().map(PathBuf::from),
            "--save-dir" => args.save_dir = it.next().map(PathBuf::from),
            "--seconds" => args.seconds = it.next().and_then(|s| s.parse().ok()),
            "--autobuy" => args.autobuy = true,
            "--prestige" => args.prestige = true,
            "--json" => args.json = true,
            "--version" => args.version = true,
            _ => {}
        }
    }
    args
}

fn build_config(args: &Args) -> Result<RuntimeConfig> {
    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    if let Some(skin) = &args.skin {
        config.skin = skin.clone();
    }
    if let Some(root) = &args.skins_root {
        config.skins_root = root.clone();
    }
    if let Some(dir) = &args.save_dir {
        config.save_dir = Some(dir.clone());
    }
    Ok(config)
}

/// Run `seconds` of play in frames, autobuying once per simulated second if asked.
fn simulate(session: &mut Session, seconds: f64, autobuy: bool) -> u64 {
    let frames = (seconds / FRAME_SECS).round().max(0.0) as u64;
    let mut steps = 0u64;
    let mut bought = 0u32;
    for frame in 0..frames {
        steps += u64::from(session.advance(FRAME_SECS));
        if autobuy && frame % 60 == 0 {
            bought += session.autobuy();
        }
    }
    info!(frames, steps, bought, "simulation finished");
    steps
}

fn print_report(session: &Session) {
    let economy = session.economy();
    let prestige = session.prestige_engine();
    let catalog = session.catalog();

    println!("Currencies");
    for currency in catalog.currencies() {
        println!(
            "  {:<12} {:>10}",
            currency.name,
            format_number(economy.balance(currency.id.as_str()))
        );
    }
    println!("Generators");
    for spec in catalog.generators() {
        let id = spec.id.as_str();
        let next = economy
            .next_generator_cost(id)
            .map(format_number)
            .unwrap_or_default();
        let status = match economy.can_buy_generator_level(id) {
            Ok(()) => "buyable".to_string(),
            Err(reason) => reason.to_string(),
        };
        println!(
            "  {:<14} Lv {:>4} | {:>8}/s | next {:>8} | {}",
            spec.name,
            economy.level(id),
            format_number(economy.production_per_sec(id)),
            next,
            status
        );
    }
    println!("Upgrades");
    for upgrade in catalog.upgrades() {
        let mark = if economy.has_upgrade(upgrade.id.as_str()) {
            "x"
        } else {
            " "
        };
        println!(
            "  [{}] {:<18} {:>8}",
            mark,
            upgrade.name,
            format_number(upgrade.price)
        );
    }
    println!(
        "Prestige | currency: {} | multiplier: x{:.2} | available: {}",
        format_number(prestige.prestige_currency()),
        prestige.global_multiplier(),
        prestige.preview_prestige(economy)
    );
}

fn json_report(session: &Session) -> serde_json::Value {
    let economy = session.economy();
    let prestige = session.prestige_engine();
    let generators: serde_json::Map<String, serde_json::Value> = economy
        .generators()
        .map(|(id, state)| {
            (
                id.to_string(),
                serde_json::json!({
                    "level": state.level,
                    "lifetimeProduced": state.lifetime_produced,
                    "perSec": economy.production_per_sec(id.as_str()),
                }),
            )
        })
        .collect();
    serde_json::json!({
        "balances": economy.balances(),
        "generators": generators,
        "purchasedUpgrades": economy.purchased_upgrades().collect::<Vec<_>>(),
        "totalLifetimeProduced": economy.total_lifetime_produced(),
        "prestige": {
            "currency": prestige.prestige_currency(),
            "multiplier": prestige.global_multiplier(),
            "available": prestige.preview_prestige(economy),
            "last": prestige.last_prestige().to_rfc3339(),
        },
    })
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    if args.version {
        println!(
            "idle-cli {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(?args, "starting CLI");

    let config = build_config(&args)?;
    let mut session =
        Session::start(&config, Arc::new(SystemClock)).context("Failed to start session")?;

    if let Some(earnings) = session.claim_offline_earnings() {
        println!(
            "Welcome back! {:.1}h away earned {}",
            earnings.hours,
            format_number(earnings.total_earned)
        );
    }

    simulate(&mut session, args.seconds.unwrap_or(60.0), args.autobuy);

    if args.prestige {
        match session.prestige()? {
            0 => println!("Nothing to gain from prestige yet"),
            payout => println!("Prestiged for {payout}"),
        }
    }
    session.save()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_report(&session))?);
    } else {
        print_report(&session);
    }
    Ok(())
}
