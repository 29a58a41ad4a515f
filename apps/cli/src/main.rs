#![deny(warnings)]

//! Headless runner: plays the warehouse game for a number of days.

use anyhow::{bail, Context, Result};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use warehouse_ai::Autopilot;
use warehouse_core::Catalog;
use warehouse_sim::{CommandError, DaySummary, Game, SimConfig};

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<String>,
    seed: Option<u64>,
    days: Option<u32>,
    autoplay: bool,
    json: bool,
    dump_catalog: bool,
    version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut out = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => out.config = Some(it.next().context("--config needs a path")?),
            "--seed" => {
                let v = it.next().context("--seed needs a value")?;
                out.seed = Some(v.parse().with_context(|| format!("bad seed {v:?}"))?);
            }
            "--days" => {
                let v = it.next().context("--days needs a value")?;
                out.days = Some(v.parse().with_context(|| format!("bad day count {v:?}"))?);
            }
            "--autoplay" => out.autoplay = true,
            "--json" => out.json = true,
            "--dump-catalog" => out.dump_catalog = true,
            "--version" => out.version = true,
            other => bail!("unknown argument {other:?}"),
        }
    }
    Ok(out)
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {path}"))?;
            SimConfig::from_yaml_str(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.rng_seed = seed;
    }
    Ok(cfg)
}

fn day_line(summary: &DaySummary, game: &Game) -> String {
    let events = summary.event_descriptions();
    format!(
        "День {} | деньги: {}₽ | влажность: {}% | вредители: {} | повреждено: {} | события: {}",
        summary.day,
        game.state().money,
        summary.humidity,
        game.active_pests().len(),
        game.warehouse().damaged_count(),
        if events.is_empty() {
            "-".to_string()
        } else {
            events.join("; ")
        }
    )
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!("warehouse {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_SHA"));
        return Ok(());
    }
    if args.dump_catalog {
        println!("{}", serde_json::to_string_pretty(&Catalog::standard())?);
        return Ok(());
    }

    let cfg = load_config(&args)?;
    let days = args.days.unwrap_or(30);
    info!(seed = cfg.rng_seed, days, autoplay = args.autoplay, "starting run");

    let mut game = Game::new(&cfg)?;
    let pilot = Autopilot::default();
    for _ in 0..days {
        let step = if args.autoplay {
            pilot.play_day(&mut game)
        } else {
            game.advance_day()
        };
        let summary = match step {
            Ok(s) => s,
            Err(CommandError::GameOver(_)) => break,
            Err(e) => return Err(e.into()),
        };
        if !args.json {
            println!("{}", day_line(&summary, &game));
        }
        if summary.status.is_terminal() {
            break;
        }
    }

    if args.json {
        println!("{}", game.snapshot().to_json()?);
    } else {
        println!(
            "Итог | день: {} | деньги: {}₽ | статус: {}",
            game.state().day,
            game.state().money,
            game.status()
        );
    }
    Ok(())
}
