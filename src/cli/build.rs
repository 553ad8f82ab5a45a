use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::region::Region;
use crate::engine::ConsensusEngine;
use crate::parsing::fasta::ReferenceCursor;
use crate::parsing::vcf::{VariantCursor, VariantSource};

#[derive(Args)]
pub struct BuildArgs {
    /// Reference genome (FASTA, optionally .gz/.bgz)
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Variant calls (VCF, optionally .gz/.bgz)
    #[arg(long)]
    pub variants: PathBuf,

    /// Region to build, 1-based inclusive (e.g. chr1:1000-2000)
    #[arg(long)]
    pub region: Region,

    /// Sample to include (repeatable; defaults to every sample in the file)
    #[arg(short, long = "sample")]
    pub samples: Vec<String>,

    /// Diploid phase to apply (0 or 1)
    #[arg(long, default_value = "0")]
    pub phase: u8,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// One sample's consensus, for JSON output.
#[derive(Serialize)]
struct ConsensusRecord {
    sample: String,
    contig: String,
    start: u64,
    end: u64,
    sequence: String,
}

/// Execute build subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be parsed, a requested sample is
/// unknown, or the region cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: BuildArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let source = VariantSource::from_path(&args.variants)?;
    let samples = if args.samples.is_empty() {
        source.sample_names().to_vec()
    } else {
        args.samples.clone()
    };

    let reference = ReferenceCursor::from_path(&args.reference)?;
    let mut engine = ConsensusEngine::new(reference);
    for sample in &samples {
        let cursor = VariantCursor::from_path(&args.variants, source.clone(), sample, args.phase)?;
        engine.add_sample(cursor);
    }

    let region = args.region;
    let results = engine.build_region(region.contig, region.start, region.half_open_end())?;

    if verbose {
        eprintln!(
            "Built {} consensus sequence(s) for {region} (phase {})",
            results.len(),
            args.phase
        );
    }

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        OutputFormat::Text => {
            for consensus in &results {
                writeln!(writer, "{}", consensus.render())?;
            }
        }
        OutputFormat::Json => {
            let records: Vec<ConsensusRecord> = results
                .iter()
                .map(|c| ConsensusRecord {
                    sample: c.name().unwrap_or("").to_string(),
                    contig: region.contig.to_string(),
                    start: region.start,
                    end: region.end,
                    sequence: c.sequence().to_string(),
                })
                .collect();
            serde_json::to_writer_pretty(&mut writer, &records)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;

    Ok(())
}
