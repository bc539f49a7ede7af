use anyhow::{bail, Context};
use packdraw_core::{
    BatchResult, DrawResult, InventoryEntry, PlayerCatalog, Rarity, RngState, Session,
    SessionConfig,
};
use packdraw_data::{default_state_path, load_catalog, JsonFileStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_CATALOG: &str = "assets/catalog.json";

const USAGE: &str = "usage: packdraw [--catalog PATH] [--seed N] [--no-save] <command>

commands:
  packs            list pack types
  wallet           show currency balances
  open <pack>      open one pack
  ten <pack>       open ten packs, stopping at the first failure
  inv [rarity]     list owned cards, optionally of one rarity
  stats            count owned cards by rarity
  reset            clear inventory and restore starting balances";

#[derive(Debug, Clone)]
struct CliOptions {
    catalog: PathBuf,
    seed: Option<u64>,
    save: bool,
    command: Vec<String>,
}

fn parse_cli_options(args: &[String]) -> anyhow::Result<CliOptions> {
    let mut options = CliOptions {
        catalog: PathBuf::from(DEFAULT_CATALOG),
        seed: None,
        save: true,
        command: Vec::new(),
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--catalog" => {
                let value = iter.next().context("--catalog needs a path")?;
                options.catalog = PathBuf::from(value);
            }
            "--seed" => {
                let value = iter.next().context("--seed needs a number")?;
                options.seed = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid seed {value}"))?,
                );
            }
            "--no-save" => options.save = false,
            "-h" | "--help" => options.command = vec!["help".to_string()],
            _ => {
                options.command.push(arg.clone());
                options.command.extend(iter.by_ref().cloned());
            }
        }
    }
    Ok(options)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PACKDRAW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let options = parse_cli_options(args)?;
    let Some((command, rest)) = options.command.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };
    if command == "help" {
        println!("{USAGE}");
        return Ok(());
    }

    let rng = match options.seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_entropy(),
    };
    tracing::debug!(seed = rng.seed(), "rng ready");
    let config = SessionConfig::default();
    let mut session = match default_state_path().filter(|_| options.save) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using save file");
            Session::with_store(config, rng, Box::new(JsonFileStore::new(path)))
        }
        None => Session::new(config, rng),
    };

    match command.as_str() {
        "wallet" => print_wallet(&session),
        "reset" => {
            session.reset_user_data()?;
            println!("user data reset");
            print_wallet(&session);
        }
        "packs" | "open" | "ten" | "inv" | "stats" => {
            let catalog = load_catalog(&options.catalog)?;
            session.install_catalog(catalog)?;
            let catalog = session
                .catalog()
                .context("catalog missing after install")?;
            match command.as_str() {
                "packs" => print_packs(catalog),
                "inv" => {
                    let rarity = rest
                        .first()
                        .map(|name| {
                            Rarity::from_name(name).with_context(|| format!("unknown rarity {name}"))
                        })
                        .transpose()?;
                    let entries: Vec<&InventoryEntry> = match rarity {
                        Some(rarity) => session.inventory_by_rarity(rarity),
                        None => session.inventory().iter().collect(),
                    };
                    print_inventory(catalog, &entries);
                }
                "stats" => {
                    let stats = session.inventory_stats();
                    println!("total: {}", stats.total_count);
                    for (rarity, count) in stats.per_rarity {
                        println!("  {rarity:<6} {:<7} {count}", catalog.rarity_color(rarity));
                    }
                }
                "open" => {
                    let pack = pack_arg(rest)?;
                    let result = session.open_pack(pack)?;
                    print_draw(&result);
                    print_wallet(&session);
                }
                _ => {
                    let pack = pack_arg(rest)?;
                    let batch = session.open_ten_pack(pack);
                    print_batch(&batch);
                    print_wallet(&session);
                }
            }
        }
        other => bail!("unknown command {other}\n\n{USAGE}"),
    }
    Ok(())
}

fn pack_arg(rest: &[String]) -> anyhow::Result<&str> {
    rest.first()
        .map(String::as_str)
        .context("missing pack id")
}

fn print_packs(catalog: &PlayerCatalog) {
    for pack in catalog.packs() {
        let odds: Vec<String> = pack
            .rarity_probabilities
            .iter()
            .map(|row| format!("{} {}%", row.rarity, row.percent))
            .collect();
        println!(
            "{:<14} {:<14} {:>7} {:<6} {}",
            pack.id,
            pack.display_name(),
            pack.price,
            pack.currency,
            odds.join(", ")
        );
    }
    for pack in catalog.irregular_packs() {
        println!(
            "warning: {} probabilities total {}%",
            pack.id,
            pack.probability_total()
        );
    }
}

fn print_inventory(catalog: &PlayerCatalog, entries: &[&InventoryEntry]) {
    if entries.is_empty() {
        println!("no cards");
    }
    for entry in entries {
        println!(
            "{}  {:<11} {:>2} {:<4} {}",
            entry.acquired_at.format("%Y-%m-%d %H:%M"),
            catalog.rarity_class(entry.rarity()),
            entry.player.overall,
            entry.player.position,
            entry.player.name
        );
    }
}

fn print_wallet<R: packdraw_core::RandomSource>(session: &Session<R>) {
    let balances: Vec<String> = session
        .currency()
        .iter()
        .map(|(currency, amount)| format!("{currency}: {amount}"))
        .collect();
    println!("wallet: {}", balances.join(", "));
}

fn print_draw(result: &DrawResult) {
    let player = &result.player;
    println!(
        "[{}] {} ({}) {} {}  -{} {}",
        result.rarity,
        player.name,
        player.english_name,
        player.overall,
        player.position,
        result.cost.amount,
        result.cost.currency
    );
}

fn print_batch(batch: &BatchResult) {
    for result in &batch.results {
        print_draw(result);
    }
    println!(
        "{} draws, total {} {}",
        batch.results.len(),
        batch.total_cost,
        batch.currency.as_deref().unwrap_or("")
    );
    if let Some(message) = batch.error_message() {
        println!("stopped early: {message}");
    }
}
