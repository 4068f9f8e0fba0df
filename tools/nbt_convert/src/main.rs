#![doc = include_str!("../README.md")]
#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    rustdoc::missing_crate_level_docs,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls,
    rustdoc::invalid_html_tags
)]
#![warn(
    trivial_casts,
    trivial_numeric_casts,
    unused_lifetimes,
    unused_import_braces,
    clippy::dbg_macro
)]

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tagtree_nbt::Compression;
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Maximum level of log messages written to stderr.
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a binary tag file to JSON.
    ToJson {
        /// Binary input file, or `-` for stdin.
        input: PathBuf,
        /// The input is gzip-compressed.
        #[arg(long)]
        gzip: bool,
        /// Indent the JSON output.
        #[arg(long)]
        pretty: bool,
        /// Output JSON file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert a JSON document to a binary tag file, inferring tag types.
    FromJson {
        /// JSON input file, or `-` for stdin.
        input: PathBuf,
        /// Output binary file.
        #[arg(short, long)]
        output: PathBuf,
        /// Gzip-compress the output.
        #[arg(long)]
        gzip: bool,
        /// Name given to the root tag.
        #[arg(long, default_value = "")]
        root_name: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::ToJson {
            input,
            gzip,
            pretty,
            output,
        } => to_json(&input, compression(gzip), pretty, output.as_deref()),
        Command::FromJson {
            input,
            output,
            gzip,
            root_name,
        } => from_json(&input, &output, compression(gzip), &root_name),
    }
}

fn compression(gzip: bool) -> Compression {
    if gzip {
        Compression::Gzip
    } else {
        Compression::None
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn to_json(
    input: &Path,
    compression: Compression,
    pretty: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let (value, root_name) = if is_stdio(input) {
        tagtree_nbt::read_all_from(io::stdin().lock(), compression)
            .context("failed to decode tag data from stdin")?
    } else {
        tagtree_nbt::read_file(input, compression)
            .with_context(|| format!("failed to read tag file {}", input.display()))?
    };

    if !root_name.is_empty() {
        warn!("root name {root_name:?} is not kept in the JSON output");
    }

    let mut json = tagtree_nbt::to_json_string(&value, pretty)?;
    json.push('\n');

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => io::stdout().lock().write_all(json.as_bytes())?,
    }

    Ok(())
}

fn from_json(
    input: &Path,
    output: &Path,
    compression: Compression,
    root_name: &str,
) -> anyhow::Result<()> {
    let text = if is_stdio(input) {
        let mut text = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut text)
            .context("failed to read JSON from stdin")?;
        text
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?
    };

    let value = tagtree_nbt::from_json_str(&text)
        .with_context(|| format!("failed to parse JSON from {}", input.display()))?;

    tagtree_nbt::write_file(output, &value, root_name, compression)
        .with_context(|| format!("failed to write tag file {}", output.display()))?;

    info!(
        "wrote {} ({} bytes before compression)",
        output.display(),
        tagtree_nbt::written_size(&value, root_name)
    );

    Ok(())
}
