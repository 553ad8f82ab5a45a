//! Streaming parsers for the two input formats.
//!
//! Both readers are forward-only: they may move forward within a contig
//! and to later contigs, never backward. Backward requests are caller
//! errors and fail with `ConsensusError::Order` rather than being clamped.
//!
//! - [`fasta`]: multi-contig reference sequences
//! - [`vcf`]: multi-sample variant calls

pub mod fasta;
pub mod vcf;

pub use fasta::ReferenceCursor;
pub use vcf::{VariantCursor, VariantSource};
