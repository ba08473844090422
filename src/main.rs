//! Main entry point for the zipspy CLI application.
//!
//! Prints the names stored in the ZIP archive embedded in a local file or a
//! remote URL, one per line.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{Read, Seek, Write};

use zipspy::zip::{Archive, ZipInspector, entries, locate};
use zipspy::{Cli, EntryName, Source, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_filter());

    let mut source = Source::open(&cli.file)
        .await
        .with_context(|| format!("cannot open {}", cli.file))?;

    if cli.json {
        print_json(&mut source, &cli)
    } else if cli.all_copies {
        list_all_archives(&mut source, &cli)
    } else {
        list_names(&mut source, &cli)
    }
}

/// Stream the names of the archive closing the source.
///
/// Names before a corrupt header are still printed; the error follows.
fn list_names<R: Read + Seek>(source: &mut R, cli: &Cli) -> Result<()> {
    let Some(offset) = locate(source).with_context(|| format!("cannot scan {}", cli.file))? else {
        report_not_found(cli);
        return Ok(());
    };

    let mut stdout = std::io::stdout().lock();
    let walk = entries(source, offset).with_context(|| format!("{}: corrupt zip archive", cli.file))?;
    for name in walk {
        let name = name.with_context(|| format!("{}: corrupt central directory", cli.file))?;
        write_name(&mut stdout, &name)?;
    }

    Ok(())
}

/// List every archive found in the source, outermost first.
fn list_all_archives<R: Read + Seek>(source: &mut R, cli: &Cli) -> Result<()> {
    let archives = ZipInspector::new(source)
        .find_all_archives()
        .with_context(|| format!("cannot scan {}", cli.file))?;

    if archives.is_empty() {
        report_not_found(cli);
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    for archive in &archives {
        writeln!(stdout, "--- archive ending at offset {:#x} ---", archive.summary_offset)?;
        for name in &archive.entries {
            write_name(&mut stdout, name)?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct Report<'a> {
    source: &'a str,
    archives: Vec<Archive>,
}

fn print_json<R: Read + Seek>(source: &mut R, cli: &Cli) -> Result<()> {
    let mut inspector = ZipInspector::new(source);
    let archives = if cli.all_copies {
        inspector.find_all_archives()
    } else {
        inspector.find_archive().map(|found| found.into_iter().collect::<Vec<_>>())
    }
    .with_context(|| format!("{}: cannot inspect", cli.file))?;

    let report = Report {
        source: &cli.file,
        archives,
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;

    Ok(())
}

/// Write a name exactly as stored, followed by a newline.
fn write_name<W: Write>(out: &mut W, name: &EntryName) -> Result<()> {
    out.write_all(name.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

fn report_not_found(cli: &Cli) {
    if !cli.quiet {
        println!("{}: no zip archive found", cli.file);
    }
}
