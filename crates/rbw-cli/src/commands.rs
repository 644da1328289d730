use std::io::{self, Write};

use anyhow::{bail, Context};
use colored::Colorize;
use rbw_card::{CardDriver, MemoryCard};
use rbw_catalog::TagCatalog;
use rbw_station::{Station, StationConfig};
use rbw_types::TagId;
use serde_json::json;

use crate::cli::*;
use crate::session::{print_report, print_table, run_session};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = effective_config(&cli)?;
    match cli.command {
        Command::Lookup(ref args) => return cmd_lookup(args, cli.format),
        Command::Config(_) => return cmd_config(&config, cli.format),
        _ => {}
    }
    if config.simulate {
        run_with_driver(cli, config, MemoryCard::new())
    } else {
        run_hardware(cli, config)
    }
}

#[cfg(feature = "pcsc")]
fn run_hardware(cli: Cli, config: StationConfig) -> anyhow::Result<()> {
    run_with_driver(cli, config, rbw_card::PcscDriver::new())
}

#[cfg(not(feature = "pcsc"))]
fn run_hardware(_cli: Cli, _config: StationConfig) -> anyhow::Result<()> {
    bail!("built without PC/SC support; rebuild with `--features pcsc` or pass --simulate")
}

/// Config file values, overridden by command-line flags.
fn effective_config(cli: &Cli) -> anyhow::Result<StationConfig> {
    let mut config = match &cli.config {
        Some(path) => StationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StationConfig::default(),
    };
    if cli.simulate {
        config.simulate = true;
    }
    if let Some(reader) = &cli.reader {
        config.reader_name = Some(reader.clone());
    }
    if let Some(key) = &cli.key {
        config.sector_key = key.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run_with_driver<D: CardDriver>(
    cli: Cli,
    config: StationConfig,
    driver: D,
) -> anyhow::Result<()> {
    let default_block = i64::from(config.start_block);
    let mut station = Station::new(config, driver)?;
    let format = cli.format;
    match cli.command {
        Command::Readers(_) => cmd_readers(&station, format),
        Command::Scan(args) => cmd_scan(&mut station, args, default_block, format),
        Command::Write(args) => cmd_write(&mut station, args, default_block, format),
        Command::Read(args) => cmd_read(&station, args, format),
        Command::Lookup(_) | Command::Config(_) => Ok(()),
    }
}

fn cmd_lookup(args: &LookupArgs, format: OutputFormat) -> anyhow::Result<()> {
    let tag = TagId::parse(&args.tag)?;
    let catalog = TagCatalog::builtin();
    let article = catalog.resolve(tag.as_str())?;
    match format {
        OutputFormat::Text => println!("{} → {}", tag, article.to_string().bold()),
        OutputFormat::Json => println!("{}", json!({ "tag": tag, "article": article })),
    }
    Ok(())
}

fn cmd_config(config: &StationConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}

fn cmd_readers<D: CardDriver>(station: &Station<D>, format: OutputFormat) -> anyhow::Result<()> {
    let readers = station.list_readers()?;
    match format {
        OutputFormat::Text if readers.is_empty() => println!("No readers found."),
        OutputFormat::Text => {
            for name in &readers {
                println!("  {}", name.cyan());
            }
        }
        OutputFormat::Json => println!("{}", json!(readers)),
    }
    Ok(())
}

fn cmd_scan<D: CardDriver>(
    station: &mut Station<D>,
    args: ScanArgs,
    default_block: i64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let start_block = args.start_block.unwrap_or(default_block);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(station, stdin.lock(), &mut stdout, start_block)?;

    let snapshot = station.snapshot();
    match format {
        OutputFormat::Text => print_table(&mut stdout, &snapshot)?,
        OutputFormat::Json => writeln!(stdout, "{}", serde_json::to_string(&snapshot)?)?,
    }
    if args.write {
        write_batch(station, start_block, format)?;
    }
    Ok(())
}

fn cmd_write<D: CardDriver>(
    station: &mut Station<D>,
    args: WriteArgs,
    default_block: i64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    for raw in &args.tags {
        let tag = TagId::parse(raw)?;
        if let Err(err) = station.scan(tag.as_str()) {
            eprintln!("{} {}", "✗".red(), err);
        }
    }
    if format == OutputFormat::Text {
        print_table(&mut io::stdout(), &station.snapshot())?;
    }
    write_batch(station, args.start_block.unwrap_or(default_block), format)
}

fn write_batch<D: CardDriver>(
    station: &Station<D>,
    start_block: i64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if !station.is_connected() {
        let reader = station.connect()?;
        if format == OutputFormat::Text {
            println!("{} Reader connected: {}", "✓".green(), reader);
        }
    }
    let report = station.write_to_card(start_block)?;
    match format {
        OutputFormat::Text => print_report(&mut io::stdout(), &report, start_block)?,
        OutputFormat::Json => println!(
            "{}",
            json!({
                "start_block": start_block,
                "planned": report.planned(),
                "attempted": report.attempted(),
                "written": report.written(),
                "outcomes": report.outcomes,
                "failure": report.failure.as_ref().map(|e| e.to_string()),
            })
        ),
    }
    station.disconnect();
    if let Some(err) = report.failure {
        bail!("write batch incomplete: {err}");
    }
    Ok(())
}

fn cmd_read<D: CardDriver>(
    station: &Station<D>,
    args: ReadArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    station.connect()?;
    let result = station.read_text(args.block);
    station.disconnect();
    let text = result?;
    match format {
        OutputFormat::Text => println!("Block {}: {}", args.block.to_string().yellow(), text),
        OutputFormat::Json => println!(
            "{}",
            json!({ "block": args.block, "text": text.text, "hex": text.hex })
        ),
    }
    Ok(())
}
