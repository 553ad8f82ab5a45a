//! Per-sample consensus sequence buffer.
//!
//! A `ConsensusSequence` starts as a copy of a reference slice and has a
//! sample's called substitutions applied in place. A list of breakpoints
//! translates 1-based reference positions into 0-based buffer offsets; with
//! substitutions being the only supported edit the buffer never changes
//! length, so the list never grows past its seed entry in the current
//! design. Length-changing edits are not supported and callers must not
//! attempt them.

use tracing::warn;

use crate::core::variant::{Phase, Variant};
use crate::error::{ConsensusError, Result};

/// A `(reference position, buffer index)` pair anchoring the translation
/// between genomic coordinates and buffer offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    /// 1-based reference position.
    pub ref_pos: u64,
    /// 0-based offset into the buffer.
    pub buffer_index: usize,
}

/// A mutable working copy of a reference slice for one sample.
#[derive(Debug, Clone)]
pub struct ConsensusSequence {
    name: Option<String>,
    buffer: Vec<u8>,
    /// Non-decreasing in both fields; the mapping is valid only for
    /// positions at or after the first entry.
    breakpoints: Vec<Breakpoint>,
}

impl ConsensusSequence {
    /// Seed the buffer with a reference slice whose first base sits at
    /// 1-based position `start_pos`.
    pub fn new(start_pos: u64, reference_slice: &str) -> Self {
        Self {
            name: None,
            buffer: reference_slice.as_bytes().to_vec(),
            breakpoints: vec![Breakpoint {
                ref_pos: start_pos,
                buffer_index: 0,
            }],
        }
    }

    /// Attach a sample name for rendering.
    pub fn label(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current buffer contents.
    pub fn sequence(&self) -> &str {
        // The buffer is seeded from a &str and only ever overwritten with
        // single ASCII allele characters.
        std::str::from_utf8(&self.buffer).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Translate a 1-based reference position into a buffer offset.
    ///
    /// Scans the breakpoint list for the containing interval and offsets
    /// from its anchor.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::Range` if `pos` lies before the first
    /// breakpoint or maps past the end of the buffer, and
    /// `ConsensusError::InternalInvariant` if the breakpoint list is found
    /// to be non-monotonic.
    pub fn index_for_ref_pos(&self, pos: u64) -> Result<usize> {
        let first = self.breakpoints.first().ok_or_else(|| {
            ConsensusError::InternalInvariant("consensus has no breakpoints".to_string())
        })?;
        if pos < first.ref_pos {
            return Err(ConsensusError::Range(format!(
                "position {pos} precedes mapped range starting at {}",
                first.ref_pos
            )));
        }

        let mut anchor = *first;
        for bp in &self.breakpoints[1..] {
            if bp.ref_pos < anchor.ref_pos || bp.buffer_index < anchor.buffer_index {
                return Err(ConsensusError::InternalInvariant(format!(
                    "breakpoints not monotonic at ref_pos {}",
                    bp.ref_pos
                )));
            }
            if bp.ref_pos > pos {
                break;
            }
            anchor = *bp;
        }

        let index = anchor.buffer_index + (pos - anchor.ref_pos) as usize;
        if index >= self.buffer.len() {
            return Err(ConsensusError::Range(format!(
                "position {pos} maps to offset {index} past end of buffer (len {})",
                self.buffer.len()
            )));
        }
        Ok(index)
    }

    /// The buffer character at a 1-based reference position.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Self::index_for_ref_pos`].
    pub fn base_for_ref_pos(&self, pos: u64) -> Result<char> {
        self.index_for_ref_pos(pos).map(|i| self.buffer[i] as char)
    }

    /// Apply one called variant for the given phase.
    ///
    /// A phase carrying the reference allele is a no-op (homozygous
    /// reference at this site). A single-character allele overwrites the
    /// buffer in place. A longer allele is an insertion, which is reported
    /// and skipped rather than woven in, so one unsupported edit does not
    /// block the rest of the region.
    ///
    /// # Errors
    ///
    /// Propagates mapping errors from [`Self::index_for_ref_pos`].
    pub fn apply_variant(&mut self, variant: &Variant, phase: Phase) -> Result<()> {
        if variant.is_reference(phase) {
            return Ok(());
        }

        let allele = variant.allele(phase);
        let mut chars = allele.chars();
        match (chars.next(), chars.next()) {
            (Some(base), None) => {
                let index = self.index_for_ref_pos(variant.pos)?;
                self.buffer[index] = base as u8;
                Ok(())
            }
            _ => {
                warn!(
                    contig = %variant.contig,
                    pos = variant.pos,
                    allele = %allele,
                    "skipping insertion: multi-character alleles are not applied"
                );
                Ok(())
            }
        }
    }

    /// Two-line FASTA-style record: `>` + name, newline, sequence.
    pub fn render(&self) -> String {
        format!(">{}\n{}", self.name.as_deref().unwrap_or(""), self.sequence())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substitution(pos: u64, reference: &str, alt: &str) -> Variant {
        Variant {
            contig: "chr1".to_string(),
            pos,
            reference: reference.to_string(),
            alt_phase0: alt.to_string(),
            alt_phase1: reference.to_string(),
            quality: 60.0,
            depth: 10,
        }
    }

    #[test]
    fn test_seed_and_lookup() {
        let cons = ConsensusSequence::new(1, "ACGTACGTAC");
        assert_eq!(cons.index_for_ref_pos(1).unwrap(), 0);
        assert_eq!(cons.index_for_ref_pos(10).unwrap(), 9);
        assert_eq!(cons.base_for_ref_pos(5).unwrap(), 'A');
    }

    #[test]
    fn test_lookup_with_offset_start() {
        let cons = ConsensusSequence::new(101, "ACGT");
        assert_eq!(cons.index_for_ref_pos(101).unwrap(), 0);
        assert_eq!(cons.index_for_ref_pos(104).unwrap(), 3);
    }

    #[test]
    fn test_lookup_before_mapped_range() {
        let cons = ConsensusSequence::new(101, "ACGT");
        assert!(matches!(
            cons.index_for_ref_pos(100),
            Err(ConsensusError::Range(_))
        ));
    }

    #[test]
    fn test_lookup_past_end() {
        let cons = ConsensusSequence::new(1, "ACGT");
        assert!(matches!(
            cons.index_for_ref_pos(5),
            Err(ConsensusError::Range(_))
        ));
    }

    #[test]
    fn test_mapping_monotonicity() {
        let cons = ConsensusSequence::new(1, "ACGTACGTAC");
        let mut last = cons.index_for_ref_pos(1).unwrap();
        for pos in 2..=10 {
            let index = cons.index_for_ref_pos(pos).unwrap();
            assert!(index > last, "index must grow with position");
            last = index;
        }
    }

    #[test]
    fn test_single_base_substitution() {
        let mut cons = ConsensusSequence::new(1, "ACGTACGTAC");
        let v = substitution(5, "A", "G");
        cons.apply_variant(&v, Phase::Zero).unwrap();
        assert_eq!(cons.sequence(), "ACGTGCGTAC");
    }

    #[test]
    fn test_reference_allele_is_noop() {
        let mut cons = ConsensusSequence::new(1, "ACGTACGTAC");
        let v = substitution(5, "A", "G");
        // Phase one carries the reference allele
        cons.apply_variant(&v, Phase::One).unwrap();
        assert_eq!(cons.sequence(), "ACGTACGTAC");
    }

    #[test]
    fn test_insertion_is_skipped_not_applied() {
        let mut cons = ConsensusSequence::new(1, "ACGTACGTAC");
        let v = substitution(5, "A", "AGG");
        cons.apply_variant(&v, Phase::Zero).unwrap();
        assert_eq!(cons.sequence(), "ACGTACGTAC");
        assert_eq!(cons.len(), 10);
    }

    #[test]
    fn test_gap_marker_substitution() {
        // A deletion normalized to a gap marker is a plain substitution
        let mut cons = ConsensusSequence::new(1, "ACGTACGTAC");
        let v = substitution(3, "G", "-");
        cons.apply_variant(&v, Phase::Zero).unwrap();
        assert_eq!(cons.sequence(), "AC-TACGTAC");
    }

    #[test]
    fn test_render() {
        let mut cons = ConsensusSequence::new(1, "ACGT");
        cons.label("NA12878");
        assert_eq!(cons.render(), ">NA12878\nACGT");
    }
}
