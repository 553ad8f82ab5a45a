//! # vcf-consensus
//!
//! Build per-sample consensus sequences from a reference genome and
//! multi-sample variant calls.
//!
//! Given a FASTA-style reference and a VCF-style variant file, the engine
//! produces, for an arbitrary genomic region and each requested sample, the
//! reference bases for that region with the sample's called substitutions
//! applied at the correct offsets. Reference genomes may be gigabytes, so
//! every reader streams forward-only and never loads a contig into memory.
//!
//! Substitutions are the only supported edit: insertions are detected and
//! skipped with a diagnostic, which keeps the position map length-stable.
//! Deletions collapse to a gap-marker substitution during normalization.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vcf_consensus::{ConsensusEngine, ContigId, ReferenceCursor, VariantCursor, VariantSource};
//!
//! # fn main() -> vcf_consensus::Result<()> {
//! let reference = ReferenceCursor::from_path(Path::new("ref.fa"))?;
//! let source = VariantSource::from_path(Path::new("calls.vcf"))?;
//!
//! let mut engine = ConsensusEngine::new(reference);
//! for sample in source.sample_names().to_vec() {
//!     let cursor = VariantCursor::from_path(Path::new("calls.vcf"), source.clone(), &sample, 0)?;
//!     engine.add_sample(cursor);
//! }
//!
//! for consensus in engine.build_region(ContigId(1), 1_000, 2_000)? {
//!     println!("{}", consensus.render());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: contig identifiers, variants, regions, consensus buffers
//! - [`parsing`]: forward-only readers for reference and variant files
//! - [`engine`]: per-region orchestration across samples
//! - [`cli`]: command-line interface implementation

pub mod cli;
pub mod core;
pub mod engine;
pub mod error;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::consensus::ConsensusSequence;
pub use core::contig::ContigId;
pub use core::region::Region;
pub use core::variant::{Phase, Variant};
pub use engine::ConsensusEngine;
pub use error::{ConsensusError, Result};
pub use parsing::{ReferenceCursor, VariantCursor, VariantSource};
