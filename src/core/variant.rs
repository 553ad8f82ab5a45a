use std::fmt;

use crate::error::{ConsensusError, Result};

/// Placeholder substituted for an allele that becomes empty after indel
/// normalization (a deletion's reference-anchored representation).
pub const GAP_MARKER: char = '-';

/// Which of the two alleles of a diploid genotype call to use when building
/// a consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Zero,
    One,
}

impl Phase {
    /// Checked conversion from an integer phase selector.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::InvalidArgument` for any value other than
    /// 0 or 1.
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            other => Err(ConsensusError::InvalidArgument(format!(
                "phase must be 0 or 1, got {other}"
            ))),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "0"),
            Self::One => write!(f, "1"),
        }
    }
}

/// One sample's called variant at a single site, normalized so that alleles
/// align 1:1 with reference bases where possible.
///
/// Built on demand by a `VariantCursor` from one row of a multi-sample
/// variant file plus that sample's genotype field; immutable once built and
/// discarded on the next `advance()`. Both diploid phases are resolved and
/// retained even though consensus building currently selects one.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Contig name exactly as it appears in the record.
    pub contig: String,
    /// 1-based position, already adjusted if indel normalization trimmed a
    /// shared leading base.
    pub pos: u64,
    /// Reference allele (possibly trimmed; `-` if empty after trimming).
    pub reference: String,
    /// Allele selected by the first genotype index.
    pub alt_phase0: String,
    /// Allele selected by the second genotype index.
    pub alt_phase1: String,
    /// Call quality score.
    pub quality: f64,
    /// Total read depth (sum of allele depths; 1 when absent).
    pub depth: u32,
}

impl Variant {
    /// The allele for the given phase.
    pub fn allele(&self, phase: Phase) -> &str {
        match phase {
            Phase::Zero => &self.alt_phase0,
            Phase::One => &self.alt_phase1,
        }
    }

    /// Whether the given phase carries the reference allele (a no-op for
    /// consensus building).
    pub fn is_reference(&self, phase: Phase) -> bool {
        self.allele(phase) == self.reference
    }
}
