//! Region orchestration: compose the reference cursor with one variant
//! cursor per sample to build consensus sequences.

use tracing::debug;

use crate::core::consensus::ConsensusSequence;
use crate::core::contig::ContigId;
use crate::error::{ConsensusError, Result};
use crate::parsing::fasta::ReferenceCursor;
use crate::parsing::vcf::VariantCursor;

/// Builds per-sample consensus sequences for requested regions.
///
/// Holds the shared reference cursor and one registered variant cursor per
/// sample. Regions must be requested in non-decreasing `(contig, start)`
/// order because every cursor underneath is forward-only.
pub struct ConsensusEngine {
    reference: ReferenceCursor,
    samples: Vec<VariantCursor>,
}

impl ConsensusEngine {
    pub fn new(reference: ReferenceCursor) -> Self {
        Self {
            reference,
            samples: Vec::new(),
        }
    }

    /// Register a sample's variant cursor to be included in every
    /// subsequent region request.
    pub fn add_sample(&mut self, cursor: VariantCursor) {
        self.samples.push(cursor);
    }

    /// Number of registered samples.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Build one consensus sequence per registered sample for the 1-based,
    /// half-open region `[start, end)`.
    ///
    /// Reads the reference bases for the span once, then for each sample
    /// seeds a consensus with them, positions the sample's cursor at the
    /// region start, and applies records until the contig changes, the
    /// position reaches `end`, or the stream ends. A sample whose cursor
    /// has no record at or after the region start simply receives the
    /// unmodified reference slice.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::Range` for an empty or 0-based span, and
    /// propagates every cursor and mapping error; no partially-built result
    /// is returned.
    pub fn build_region(
        &mut self,
        contig: ContigId,
        start: u64,
        end: u64,
    ) -> Result<Vec<ConsensusSequence>> {
        if start == 0 {
            return Err(ConsensusError::Range(
                "region start must be >= 1 (positions are 1-based)".to_string(),
            ));
        }
        if end <= start {
            return Err(ConsensusError::Range(format!(
                "empty region [{start}, {end})"
            )));
        }

        let mut bases = String::with_capacity((end - start) as usize);
        for pos in start..end {
            bases.push(self.reference.base_at(contig, pos)?);
        }

        let mut results = Vec::with_capacity(self.samples.len());
        for cursor in &mut self.samples {
            let mut consensus = ConsensusSequence::new(start, &bases);
            consensus.label(cursor.sample());

            match cursor.advance_to(contig, start) {
                Ok(()) => {
                    let mut applied = 0usize;
                    loop {
                        let Some(variant) = cursor.current()? else {
                            break;
                        };
                        if ContigId::parse(&variant.contig)? != contig || variant.pos >= end {
                            break;
                        }
                        consensus.apply_variant(&variant, cursor.phase())?;
                        applied += 1;
                        if !cursor.advance()? {
                            break;
                        }
                    }
                    debug!(
                        sample = cursor.sample(),
                        %contig,
                        start,
                        end,
                        applied,
                        "built consensus"
                    );
                }
                // No record at or after the region start: the consensus is
                // the reference slice itself.
                Err(ConsensusError::NotFound(_)) => {
                    debug!(sample = cursor.sample(), %contig, start, end, "no variants in region");
                }
                Err(e) => return Err(e),
            }

            results.push(consensus);
        }

        Ok(results)
    }
}
