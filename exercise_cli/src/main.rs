use clap::{Parser, Subcommand};
use exercise_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "exdedup")]
#[command(about = "Exercise catalog duplicate detection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog file (JSON array or JSON Lines); defaults to <data-dir>/catalog.json
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an exercise already exists in the catalog
    Check {
        /// Exercise name to check
        #[arg(long)]
        name: String,

        /// Muscle group tag (repeatable)
        #[arg(long = "muscle")]
        muscles: Vec<String>,

        /// Equipment tag (repeatable)
        #[arg(long)]
        equipment: Vec<String>,
    },

    /// Collapse near-duplicate records across the whole catalog
    Dedupe {
        /// Replace the catalog file with the deduplicated records
        #[arg(long, conflicts_with = "output")]
        write: bool,

        /// Write the deduplicated records to this file instead
        #[arg(long)]
        output: Option<PathBuf>,

        /// Audit CSV; defaults to <data-dir>/dedup_audit.csv
        #[arg(long)]
        audit: Option<PathBuf>,
    },

    /// Explain how both duplicate strategies judge two names
    Compare {
        first: String,
        second: String,
    },

    /// Write the built-in seed catalog to disk
    Seed {
        /// Destination; defaults to the catalog path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    exercise_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let problems = config.validate();
    if !problems.is_empty() {
        eprintln!("Configuration errors:");
        for problem in &problems {
            eprintln!("  - {}", problem);
        }
        return Err(Error::Config("Invalid configuration".into()));
    }

    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let catalog_path = cli.catalog.unwrap_or_else(|| data_dir.join("catalog.json"));

    match cli.command {
        Commands::Check {
            name,
            muscles,
            equipment,
        } => cmd_check(&catalog_path, &name, &muscles, &equipment, &config),
        Commands::Dedupe {
            write,
            output,
            audit,
        } => {
            let audit_path = audit.unwrap_or_else(|| data_dir.join("dedup_audit.csv"));
            cmd_dedupe(&catalog_path, write, output, &audit_path, &config)
        }
        Commands::Compare { first, second } => cmd_compare(&first, &second, &config),
        Commands::Seed { output } => {
            let path = output.unwrap_or(catalog_path);
            cmd_seed(&path)
        }
    }
}

/// Load the catalog file, falling back to the seed catalog when it is absent
fn load_catalog(path: &Path) -> Result<CatalogSnapshot> {
    if !path.exists() {
        tracing::info!("No catalog at {:?}, using seed catalog", path);
        return Ok(CatalogSnapshot::from_records(get_seed_catalog().to_vec()));
    }

    let snapshot = JsonCatalogFile::new(path).load()?;
    for entry in &snapshot.skipped {
        eprintln!(
            "warning: skipped catalog entry {}: {}",
            entry.position, entry.reason
        );
    }
    Ok(snapshot)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_check(
    catalog_path: &Path,
    name: &str,
    muscles: &[String],
    equipment: &[String],
    config: &Config,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("exercise name must not be blank".into()));
    }

    let muscle_groups = muscles
        .iter()
        .map(|tag| {
            MuscleGroup::parse(tag)
                .ok_or_else(|| Error::InvalidInput(format!("unknown muscle group '{}'", tag)))
        })
        .collect::<Result<Vec<_>>>()?;

    let snapshot = load_catalog(catalog_path)?;
    let report = check_duplicates(name, &muscle_groups, equipment, &snapshot.records, config);
    print_json(&report)
}

fn cmd_dedupe(
    catalog_path: &Path,
    write: bool,
    output: Option<PathBuf>,
    audit_path: &Path,
    config: &Config,
) -> Result<()> {
    let snapshot = load_catalog(catalog_path)?;

    // Rewriting in place would silently drop every entry we could not decode
    if write && !snapshot.skipped.is_empty() {
        return Err(Error::Catalog(format!(
            "refusing to rewrite {}: {} entries could not be decoded; fix them or use --output",
            catalog_path.display(),
            snapshot.skipped.len()
        )));
    }

    for problem in validate_catalog(&snapshot.records) {
        eprintln!("warning: {}", problem);
    }

    let matcher = NameMatcher::from_config(&config.batch);
    let outcome = deduplicate_catalog(&snapshot.records, &matcher);

    let target = if write {
        Some(catalog_path.to_path_buf())
    } else {
        output
    };
    if let Some(path) = target {
        write_catalog(&path, &outcome.unique)?;
        eprintln!("✓ Wrote {} records to {}", outcome.unique_count, path.display());
    }

    append_audit(audit_path, &outcome, &snapshot.skipped)?;

    // The full record list is already in the written file; print the summary
    let summary = serde_json::json!({
        "originalCount": outcome.original_count,
        "uniqueCount": outcome.unique_count,
        "removedNames": outcome.removed_names,
        "skippedIds": outcome.skipped_ids,
        "skippedEntries": snapshot.skipped.len(),
        "merges": outcome.merges,
    });
    print_json(&summary)
}

fn cmd_compare(first: &str, second: &str, config: &Config) -> Result<()> {
    if first.trim().is_empty() || second.trim().is_empty() {
        return Err(Error::InvalidInput("both names must be non-blank".into()));
    }

    let a = ExerciseRecord::new("first", first);
    let b = ExerciseRecord::new("second", second);

    let scorer = SimilarityScorer::new(
        config.scoring.clone(),
        Normalizer::from_config(&config.normalizer),
    );
    let matcher = NameMatcher::from_config(&config.batch);
    let pair = scorer.score(&DuplicateQuery::from(&a), &b);

    let judges: [&dyn DuplicateJudge; 2] = [&scorer, &matcher];
    let verdicts: serde_json::Map<String, serde_json::Value> = judges
        .iter()
        .map(|judge| (judge.name().to_string(), judge.is_probably_same(&a, &b).into()))
        .collect();

    print_json(&serde_json::json!({
        "normalized": [normalize_name(first), normalize_name(second)],
        "score": (pair.score * 1000.0).round() / 1000.0,
        "reasons": pair.reasons,
        "verdicts": verdicts,
    }))
}

fn cmd_seed(path: &Path) -> Result<()> {
    write_catalog(path, get_seed_catalog())?;
    eprintln!(
        "✓ Wrote {} seed records to {}",
        get_seed_catalog().len(),
        path.display()
    );
    Ok(())
}
