//! Line-oriented scanning session.
//!
//! Keyboard-emulating RFID readers type the tag and press Enter, so each
//! input line is one scan. Lines starting with `:` are commands:
//!
//! ```text
//! :show              print the batch table
//! :remove <article>  drop one article from the batch
//! :clear             empty the batch
//! :write [block]     write the batch to the card
//! :read <block>      read one block back
//! ```

use std::io::{BufRead, Write};

use colored::Colorize;
use rbw_card::{BatchReport, BlockStatus, CardDriver};
use rbw_station::{LedgerSnapshot, Station, StationError};

/// Feed every line of `input` to `station`, reporting on `out`.
pub fn run_session<D, R, W>(
    station: &mut Station<D>,
    input: R,
    out: &mut W,
    start_block: i64,
) -> anyhow::Result<()>
where
    D: CardDriver,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.strip_prefix(':') {
            Some(command) => run_line_command(station, command, out, start_block)?,
            None => scan_line(station, line, out)?,
        }
    }
    Ok(())
}

fn scan_line<D, W>(station: &mut Station<D>, tag: &str, out: &mut W) -> anyhow::Result<()>
where
    D: CardDriver,
    W: Write,
{
    match station.scan(tag) {
        Ok(receipt) => writeln!(
            out,
            "{} Added {} x1 | Total unique items: {}",
            "✓".green(),
            receipt.article.to_string().bold(),
            receipt.rows
        )?,
        Err(StationError::Catalog(err)) => writeln!(out, "{} {}", "✗".red(), err)?,
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn run_line_command<D: CardDriver, W: Write>(
    station: &mut Station<D>,
    command: &str,
    out: &mut W,
    start_block: i64,
) -> anyhow::Result<()> {
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "show" => print_table(out, &station.snapshot())?,
        "clear" => {
            station.clear();
            writeln!(out, "Table cleared")?;
        }
        "remove" => {
            if station.remove(arg) {
                writeln!(out, "Removed {}", arg.bold())?;
            } else {
                writeln!(out, "{} not in table", arg.bold())?;
            }
        }
        "write" => {
            let block = if arg.is_empty() {
                start_block
            } else {
                match arg.parse::<i64>() {
                    Ok(block) => block,
                    Err(err) => return report_failure(out, "Invalid block", arg, err),
                }
            };
            if !ensure_connected(station, out)? {
                return Ok(());
            }
            match station.write_to_card(block) {
                Ok(report) => print_report(out, &report, block)?,
                Err(err) => writeln!(out, "{} Write failed: {}", "✗".red(), err)?,
            }
        }
        "read" => {
            let block = match arg.parse::<u32>() {
                Ok(block) => block,
                Err(err) => return report_failure(out, "Invalid block", arg, err),
            };
            if !ensure_connected(station, out)? {
                return Ok(());
            }
            match station.read_text(block) {
                Ok(text) => writeln!(out, "Block {block}: {text}")?,
                Err(err) => writeln!(out, "{} Read failed: {}", "✗".red(), err)?,
            }
        }
        other => writeln!(out, "{} unknown command :{}", "✗".red(), other)?,
    }
    Ok(())
}

/// Connect if needed. A failed connect is reported on `out` and leaves the
/// batch untouched.
fn ensure_connected<D, W>(station: &Station<D>, out: &mut W) -> std::io::Result<bool>
where
    D: CardDriver,
    W: Write,
{
    if station.is_connected() {
        return Ok(true);
    }
    match station.connect() {
        Ok(reader) => {
            writeln!(out, "{} Reader connected: {}", "✓".green(), reader)?;
            Ok(true)
        }
        Err(err) => {
            writeln!(out, "{} Reader connect failed: {}", "✗".red(), err)?;
            Ok(false)
        }
    }
}

fn report_failure<W: Write>(
    out: &mut W,
    what: &str,
    arg: &str,
    err: impl std::fmt::Display,
) -> anyhow::Result<()> {
    writeln!(out, "{} {} {:?}: {}", "✗".red(), what, arg, err)?;
    Ok(())
}

pub fn print_table<W: Write>(out: &mut W, snapshot: &LedgerSnapshot) -> std::io::Result<()> {
    if snapshot.is_empty() {
        return writeln!(out, "No articles scanned.");
    }
    writeln!(out, "{:<4} {:<28} {:>8}", "#", "Article", "Quantity")?;
    for (i, entry) in snapshot.iter().enumerate() {
        writeln!(out, "{:<4} {:<28} {:>8}", i + 1, entry.article, entry.quantity)?;
    }
    Ok(())
}

pub fn print_report<W: Write>(
    out: &mut W,
    report: &BatchReport,
    start_block: i64,
) -> std::io::Result<()> {
    for outcome in &report.outcomes {
        match outcome.status {
            BlockStatus::Written => {
                writeln!(out, "  block {:>3}  {}", outcome.block, "written".green())?
            }
            BlockStatus::Failed => writeln!(
                out,
                "  block {:>3}  {} {}",
                outcome.block,
                "failed".red(),
                outcome.error.as_deref().unwrap_or_default()
            )?,
            BlockStatus::Skipped => {
                writeln!(out, "  block {:>3}  {}", outcome.block, "skipped".dimmed())?
            }
        }
    }
    match &report.failure {
        None => writeln!(
            out,
            "{} Wrote {} articles starting block {}",
            "✓".green().bold(),
            report.written().len(),
            start_block
        ),
        Some(err) => writeln!(
            out,
            "{} Write failed after {} of {} blocks: {}",
            "✗".red().bold(),
            report.written().len(),
            report.planned(),
            err
        ),
    }
}
