//! Command-line interface for vcf-consensus.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **build**: build per-sample consensus sequences for a region
//! - **samples**: list the sample columns of a variant file
//!
//! ## Usage
//!
//! ```text
//! # Consensus for every sample in the variant file
//! vcf-consensus build --reference ref.fa --variants calls.vcf --region chr1:1000-2000
//!
//! # Restrict to named samples, select phase 1
//! vcf-consensus build -r ref.fa --variants calls.vcf --region chr1:1000-2000 \
//!     --sample NA12878 --sample NA12891 --phase 1
//!
//! # JSON output for scripting
//! vcf-consensus build -r ref.fa --variants calls.vcf --region chr1:1000-2000 --format json
//!
//! # Which samples does this file have?
//! vcf-consensus samples --variants calls.vcf
//! ```

use clap::{Parser, Subcommand};

pub mod build;
pub mod samples;

#[derive(Parser)]
#[command(name = "vcf-consensus")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Build per-sample consensus sequences from a reference genome and variant calls")]
#[command(
    long_about = "vcf-consensus applies each sample's called substitutions to the reference bases of a requested region and emits one consensus sequence per sample.\n\nInputs are a (possibly gzipped) multi-contig FASTA reference and a multi-sample VCF. Insertions are reported and skipped; deletions appear as gap markers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build consensus sequences for a genomic region
    Build(build::BuildArgs),

    /// List the samples declared in a variant file
    Samples(samples::SamplesArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
