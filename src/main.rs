use anyhow::{Context, Result};
use clap::Parser;

mod assemble;
mod checksum;
mod classify;
mod cli;
mod config;
mod error;
mod model;
mod scan;
mod schemas;
mod sniff;
mod validate;
mod write;

use cli::{Command, GenerateArgs, RootArgs, ValidateArgs};
use config::GeneratorConfig;
use schemas::SchemaCache;

fn main() -> Result<()> {
    let args = RootArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    match args.command {
        Command::Generate(args) => cmd_generate(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let root = args
        .root
        .canonicalize()
        .with_context(|| format!("resolve package root {}", args.root.display()))?;

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(strategy) = args.write_strategy {
        config.write_strategy = strategy;
    }
    if let Some(algorithm) = args.checksum_algorithm {
        config.checksum_algorithm = algorithm;
    }

    let cache = SchemaCache::default_location();
    let sip = assemble::assemble(
        &root,
        &args.description,
        &args.submission_agreement,
        &config,
        &cache,
    )?;
    let package_path = write::write_package(&sip, &args.output, config.write_strategy)?;
    println!("SIP created successfully at: {}", package_path.display());
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> Result<()> {
    println!("Starting validation for SIP at: {}", args.sip.display());
    let valid = validate::validate(&args.sip, &args.report)?;
    if valid {
        println!(
            "Validation successful. Report generated at: {}",
            args.report.display()
        );
    } else {
        eprintln!(
            "Validation failed. Report generated at: {}",
            args.report.display()
        );
    }
    Ok(())
}
