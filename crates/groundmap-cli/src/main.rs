//! Groundmap CLI
//!
//! Command-line interface for:
//! - Applying a curated grounding table to statement files (`map`)
//! - Choosing canonical agent names (`rename`, or both at once with `normalize`)
//! - Corpus statistics for table curation (`stats`, `ungrounded`, `sentences`)
//! - Writing curation reports of texts the table does not cover yet (`curate`)

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use groundmap_core::{
    aggregate_by_text, load_statements, save_statements, sentences_for_text, uncovered_entries,
    ungrounded_texts, write_curation_report_for, AccessionTable, CachedResolver, CurationEntry,
    GroundingMapper, GroundingTable, GroundmapConfig, NameCascade, NameResolver, NullResolver,
    Statement,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "groundmap")]
#[command(
    author,
    version,
    about = "Groundmap: grounding normalization for text-mined agents"
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TableArgs {
    /// Grounding table (tab-separated: text, ns1, id1, ns2, id2)
    #[arg(long)]
    table: Option<PathBuf>,
}

#[derive(Args)]
struct NamesArgs {
    /// Accession names (tab-separated: accession, curated, gene, mnemonic)
    #[arg(long)]
    names: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace agent groundings with curated table entries
    Map {
        /// Input statements JSON
        #[arg(short, long)]
        input: PathBuf,
        /// Output statements JSON
        #[arg(short, long)]
        out: PathBuf,
        #[command(flatten)]
        table: TableArgs,
    },

    /// Assign canonical display names to agents
    Rename {
        /// Input statements JSON
        #[arg(short, long)]
        input: PathBuf,
        /// Output statements JSON
        #[arg(short, long)]
        out: PathBuf,
        #[command(flatten)]
        names: NamesArgs,
    },

    /// Map, then rename
    Normalize {
        /// Input statements JSON
        #[arg(short, long)]
        input: PathBuf,
        /// Output statements JSON
        #[arg(short, long)]
        out: PathBuf,
        #[command(flatten)]
        table: TableArgs,
        #[command(flatten)]
        names: NamesArgs,
    },

    /// Groundings seen for each raw text, most frequent first
    Stats {
        /// Input statements JSON
        #[arg(short, long)]
        input: PathBuf,
        /// Show only the first N texts
        #[arg(long)]
        top: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Raw texts with no grounding, most frequent first
    Ungrounded {
        /// Input statements JSON
        #[arg(short, long)]
        input: PathBuf,
        /// Show only the first N texts
        #[arg(long)]
        top: Option<usize>,
    },

    /// Evidence sentences for agents with the given raw text
    Sentences {
        /// Input statements JSON
        #[arg(short, long)]
        input: PathBuf,
        /// Raw text to look for
        #[arg(long)]
        text: String,
    },

    /// Write a curation report (tab-separated) for table maintenance
    Curate {
        /// Input statements JSON
        #[arg(short, long)]
        input: PathBuf,
        /// Output report
        #[arg(short, long)]
        out: PathBuf,
        /// Keep texts already covered by the grounding table
        #[arg(long)]
        include_covered: bool,
        #[command(flatten)]
        table: TableArgs,
        #[command(flatten)]
        names: NamesArgs,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groundmap=info,groundmap_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = GroundmapConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Map { input, out, table } => {
            let table = load_table(&config, table.table.as_deref())?;
            let stmts = read_statements(&input)?;
            let mapped = GroundingMapper::new(&table).map_agents(&stmts);
            write_statements(&out, &mapped)?;
        }
        Commands::Rename { input, out, names } => {
            let resolver = load_resolver(&config, names.names.as_deref())?;
            let stmts = read_statements(&input)?;
            let renamed = cascade(&config, resolver.as_ref()).rename_agents_with_log(&stmts);
            eprintln!("{} {} agents", "Renamed".green().bold(), renamed.events.len());
            write_statements(&out, &renamed.statements)?;
        }
        Commands::Normalize {
            input,
            out,
            table,
            names,
        } => {
            let table = load_table(&config, table.table.as_deref())?;
            let resolver = load_resolver(&config, names.names.as_deref())?;
            let stmts = read_statements(&input)?;
            let mapped = GroundingMapper::new(&table).map_agents(&stmts);
            let renamed = cascade(&config, resolver.as_ref()).rename_agents_with_log(&mapped);
            eprintln!("{} {} agents", "Renamed".green().bold(), renamed.events.len());
            write_statements(&out, &renamed.statements)?;
        }
        Commands::Stats { input, top, json } => {
            let stmts = read_statements(&input)?;
            let mut entries = aggregate_by_text(&stmts);
            if let Some(n) = top {
                entries.truncate(n);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_entries(&entries);
            }
        }
        Commands::Ungrounded { input, top } => {
            let stmts = read_statements(&input)?;
            let ranked = ungrounded_texts(&stmts);
            let n = top.unwrap_or(ranked.len());
            for (text, count) in ranked.iter().take(n) {
                println!("{count:>8}  {text}");
            }
        }
        Commands::Sentences { input, text } => {
            let stmts = read_statements(&input)?;
            let sentences = sentences_for_text(&text, &stmts);
            if sentences.is_empty() {
                eprintln!("{} no evidence for {:?}", "note:".yellow().bold(), text);
            }
            for sentence in sentences {
                println!("{sentence}");
            }
        }
        Commands::Curate {
            input,
            out,
            include_covered,
            table,
            names,
        } => {
            let stmts = read_statements(&input)?;
            let mut entries = aggregate_by_text(&stmts);
            if !include_covered {
                match table_path(&config, table.table.as_deref()) {
                    Some(path) => {
                        let table = load_table_from(&path)?;
                        entries = uncovered_entries(entries, &table);
                    }
                    None => tracing::warn!("no grounding table given; reporting every text"),
                }
            }
            let resolver = load_resolver(&config, names.names.as_deref())?;
            write_curation_report_for(
                &out,
                &entries,
                resolver.as_ref(),
                &config.primary_namespace,
            )
            .with_context(|| format!("failed to write {}", out.display()))?;
            eprintln!(
                "{} {} ({} texts)",
                "wrote".green().bold(),
                out.display().to_string().bold(),
                entries.len()
            );
        }
    }

    Ok(())
}

fn table_path(config: &GroundmapConfig, flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.table_path.clone())
}

fn load_table(config: &GroundmapConfig, flag: Option<&Path>) -> Result<GroundingTable> {
    let path = table_path(config, flag)
        .ok_or_else(|| anyhow!("no grounding table given (use --table or GROUNDMAP_TABLE)"))?;
    load_table_from(&path)
}

fn load_table_from(path: &Path) -> Result<GroundingTable> {
    let table = GroundingTable::load(path)
        .with_context(|| format!("failed to load grounding table {}", path.display()))?;
    eprintln!(
        "{} {} ({} entries)",
        "Loaded".green().bold(),
        path.display(),
        table.len()
    );
    Ok(table)
}

fn load_resolver(config: &GroundmapConfig, flag: Option<&Path>) -> Result<Box<dyn NameResolver>> {
    let Some(path) = flag.map(Path::to_path_buf).or_else(|| config.names_path.clone()) else {
        tracing::warn!("no accession names given; only preferred names will be applied");
        return Ok(Box::new(NullResolver));
    };
    let names = AccessionTable::load_for(&path, &config.primary_namespace)
        .with_context(|| format!("failed to load accession names {}", path.display()))?;
    if config.cache_names {
        Ok(Box::new(CachedResolver::new(names)))
    } else {
        Ok(Box::new(names))
    }
}

fn cascade<'a>(config: &GroundmapConfig, resolver: &'a dyn NameResolver) -> NameCascade<'a> {
    NameCascade::with_namespaces(
        resolver,
        &config.preferred_namespace,
        &config.primary_namespace,
    )
}

fn read_statements(path: &Path) -> Result<Vec<Statement>> {
    let stmts = load_statements(path)
        .with_context(|| format!("failed to read statements {}", path.display()))?;
    tracing::info!(path = %path.display(), statements = stmts.len(), "read statements");
    Ok(stmts)
}

fn write_statements(path: &Path, stmts: &[Statement]) -> Result<()> {
    save_statements(path, stmts).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!(
        "{} {}",
        "wrote".green().bold(),
        path.display().to_string().bold()
    );
    Ok(())
}

fn print_entries(entries: &[CurationEntry]) {
    for entry in entries {
        println!("{} ({})", entry.text.bold(), entry.total);
        for g in &entry.groundings {
            match (&g.namespace, &g.identifier) {
                (Some(ns), Some(id)) => println!("    {:>6}  {ns}:{id}", g.count),
                _ => println!("    {:>6}  {}", g.count, "ungrounded".dimmed()),
            }
        }
    }
}
