//! CLI argument parsing for SIP generation and validation.
//!
//! The CLI is intentionally thin: argument types carry no policy, so the
//! same assembly and validation code can be reused elsewhere.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::checksum::ChecksumAlgorithm;
use crate::write::WriteStrategy;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "sipgen",
    version,
    about = "Assemble and validate E-ARK submission packages",
    after_help = "Examples:\n  sipgen generate ~/batches/digifoto_20171115_00295 ~/output \"My Collection\" SA-123\n  sipgen generate ~/batches/digifoto_20171115_00295 ~/output \"My Collection\" SA-123 --write-strategy zip\n  sipgen validate ~/output/digifoto_20171115_00295 ./validation_report.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Generate(GenerateArgs),
    Validate(ValidateArgs),
}

/// Generate command inputs for building a package from a directory tree.
#[derive(Parser, Debug)]
#[command(about = "Build a SIP from a conventional directory tree")]
pub struct GenerateArgs {
    /// Package root laid out as documentation/, metadata/, representations/
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Output directory for the serialized package
    #[arg(value_name = "OUT_DIR")]
    pub output: PathBuf,

    /// Human-readable package description
    #[arg(value_name = "DESCRIPTION")]
    pub description: String,

    /// Submission agreement identifier recorded on the package header
    #[arg(value_name = "AGREEMENT")]
    pub submission_agreement: String,

    /// Generator config file (JSON); built-in defaults apply when omitted
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Physical form of the serialized package
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub write_strategy: Option<WriteStrategy>,

    /// Digest algorithm for the checksum manifest
    #[arg(long, value_enum, value_name = "ALGO")]
    pub checksum_algorithm: Option<ChecksumAlgorithm>,
}

/// Validate command inputs for checking an existing package.
#[derive(Parser, Debug)]
#[command(about = "Validate an existing SIP and write a JSON report")]
pub struct ValidateArgs {
    /// Serialized package: a folder or a zip archive
    #[arg(value_name = "SIP_PATH")]
    pub sip: PathBuf,

    /// Destination for the JSON validation report
    #[arg(value_name = "REPORT_PATH")]
    pub report: PathBuf,
}
