//! CLI subcommand handlers.

use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use evalstat_core::analysis::agreement::interpret_kappa;
use evalstat_core::analysis::significance::interpret_cohens_d;
use evalstat_core::config::{load_config, workspace_config_path};
use evalstat_core::report::{export_csv, export_json};
use evalstat_core::{AnalysisOptions, EvalConfig, load_and_validate_dataset, run_analysis};

use crate::{AnalyzeArgs, Commands, ConfigAction};

/// Handle a CLI subcommand.
pub fn handle_command(command: Commands, workspace: &Path, quiet: bool) -> anyhow::Result<()> {
    match command {
        Commands::Analyze(args) => handle_analyze(args, workspace, quiet),
        Commands::Validate { data } => handle_validate(&data, workspace),
        Commands::Config { action } => handle_config(action, workspace),
    }
}

fn load_workspace_config(workspace: &Path) -> anyhow::Result<EvalConfig> {
    let config = load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    config.validate()?;
    Ok(config)
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut EvalConfig, args: &AnalyzeArgs) -> anyhow::Result<()> {
    if let Some(seed) = args.seed {
        config.random_seed = seed;
    }
    if let Some(iterations) = args.iterations {
        config.bootstrap_iterations = iterations;
    }
    if let Some(alpha) = args.alpha {
        config.significance_alpha = alpha;
    }
    if let Some(min_size) = args.min_size {
        config.min_dataset_size = min_size;
    }
    config.validate().context("Invalid command-line override")?;
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs, workspace: &Path, quiet: bool) -> anyhow::Result<()> {
    let mut config = load_workspace_config(workspace)?;
    apply_overrides(&mut config, &args)?;

    let dataset = load_and_validate_dataset(&args.data, &config)
        .with_context(|| format!("Failed to load dataset {}", args.data.display()))?;

    let benchmark = args
        .benchmark
        .as_deref()
        .map(|path| {
            load_and_validate_dataset(path, &config)
                .with_context(|| format!("Failed to load benchmark dataset {}", path.display()))
        })
        .transpose()?;
    let drift = args
        .drift
        .as_deref()
        .map(|path| {
            load_and_validate_dataset(path, &config)
                .with_context(|| format!("Failed to load baseline dataset {}", path.display()))
        })
        .transpose()?;

    let options = AnalysisOptions {
        agreement: args.agreement,
        significance: args.significance,
        benchmark,
        drift,
        breakdown: args.group_by,
    };
    let results = run_analysis(&dataset, &config, &options)?;

    println!("{}", results.report);
    if !quiet {
        print_section("Failure Analysis", &results.failures)?;
        if let Some(dimensional) = &results.dimensional {
            print_section("Dimensional Breakdown", dimensional)?;
        }
    }
    if let Some(agreement) = &results.agreement {
        print_section("Inter-Rater Agreement (Cohen's Kappa)", agreement)?;
        for (dimension, kappa) in agreement {
            println!("  {dimension}: {}", interpret_kappa(*kappa));
        }
    }
    if let Some(t_test) = &results.t_test {
        print_section("Independent T-Test", t_test)?;
        println!(
            "  Effect size: {}",
            interpret_cohens_d(t_test.effect_size_cohen_d)
        );
    }
    if let Some(bootstrap) = &results.bootstrap {
        print_section("Bootstrap Significance Test", bootstrap)?;
    }
    if let Some(benchmark) = &results.benchmark {
        print_section("Benchmark Comparison", benchmark)?;
    }
    if let Some(drift) = &results.drift {
        print_section("KL Drift Detection", drift)?;
    }
    if let Some(breakdown) = &results.breakdown {
        print_section(&format!("Performance by {}", breakdown.key), breakdown)?;
    }

    if let Some(path) = &args.export {
        export_json(&results, path)?;
        println!("Results exported to: {}", path.display());
    }
    if let Some(path) = &args.csv {
        export_csv(&results.summary, &config, path)?;
        println!("Summary exported to: {}", path.display());
    }

    info!("Analysis finished");
    Ok(())
}

fn print_section<T: Serialize>(title: &str, value: &T) -> anyhow::Result<()> {
    println!("\n--- {title} ---");
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_validate(data: &Path, workspace: &Path) -> anyhow::Result<()> {
    let config = load_workspace_config(workspace)?;
    let dataset = load_and_validate_dataset(data, &config)
        .with_context(|| format!("Failed to load dataset {}", data.display()))?;

    println!("Dataset is valid: {} entries", dataset.len());
    for group in dataset.partition_by_group() {
        println!("  {}: {} entries", group.label, group.entries.len());
    }
    Ok(())
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            write_default_config(&config_path)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config(Some(workspace), None)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

fn write_default_config(config_path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let toml_str = toml::to_string_pretty(&EvalConfig::default())?;
    std::fs::write(config_path, &toml_str)?;
    Ok(())
}
