use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::vcf::VariantSource;

#[derive(Args)]
pub struct SamplesArgs {
    /// Variant calls (VCF, optionally .gz/.bgz)
    #[arg(long)]
    pub variants: PathBuf,
}

/// Execute samples subcommand
///
/// # Errors
///
/// Returns an error if the variant file's header cannot be parsed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SamplesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let source = VariantSource::from_path(&args.variants)?;

    if verbose {
        eprintln!(
            "{} declares {} sample column(s)",
            args.variants.display(),
            source.sample_names().len()
        );
    }

    match format {
        OutputFormat::Text => {
            for name in source.sample_names() {
                println!("{name}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(source.sample_names())?);
        }
    }

    Ok(())
}
