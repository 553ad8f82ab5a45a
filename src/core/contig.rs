use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConsensusError, Result};

/// Integer track number identifying a contig.
///
/// Contig names are normalized to an integer so that cursors can enforce
/// their global ordering invariant with a plain comparison: a `chr` prefix
/// is stripped, `X` maps to 23 and `Y` to 24, and anything after the first
/// space in a header is ignored. Contigs must be visited in non-decreasing
/// `ContigId` order by any single cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContigId(pub u32);

impl ContigId {
    pub const X: ContigId = ContigId(23);
    pub const Y: ContigId = ContigId(24);

    /// Parse a contig identifier from a header token or a record's contig
    /// column.
    ///
    /// Accepts UCSC (`chr1`, `chrX`) and NCBI (`1`, `X`) naming. Trailing
    /// annotation after a space (common in FASTA headers) is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::Format` if the remaining token is not a
    /// decimal integer, `X`, or `Y`.
    pub fn parse(name: &str) -> Result<Self> {
        let token = name.split_whitespace().next().unwrap_or("");
        let token = token.strip_prefix("chr").unwrap_or(token);

        match token {
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            _ => token.parse::<u32>().map(ContigId).map_err(|_| {
                ConsensusError::format(format!("cannot parse contig identifier '{name}'"))
            }),
        }
    }
}

impl FromStr for ContigId {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ContigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(ContigId::parse("1").unwrap(), ContigId(1));
        assert_eq!(ContigId::parse("22").unwrap(), ContigId(22));
    }

    #[test]
    fn test_parse_chr_prefix() {
        assert_eq!(ContigId::parse("chr7").unwrap(), ContigId(7));
        assert_eq!(ContigId::parse("chrX").unwrap(), ContigId(23));
        assert_eq!(ContigId::parse("chrY").unwrap(), ContigId(24));
    }

    #[test]
    fn test_parse_sex_chromosomes() {
        assert_eq!(ContigId::parse("X").unwrap(), ContigId::X);
        assert_eq!(ContigId::parse("Y").unwrap(), ContigId::Y);
    }

    #[test]
    fn test_parse_trailing_annotation() {
        // FASTA headers often carry metadata after the name
        assert_eq!(
            ContigId::parse("chr1 AC:CM000663.2 gi:568336023").unwrap(),
            ContigId(1)
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ContigId::parse("chrM").is_err());
        assert!(ContigId::parse("scaffold_123").is_err());
        assert!(ContigId::parse("").is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(ContigId(1) < ContigId(2));
        assert!(ContigId(22) < ContigId::X);
        assert!(ContigId::X < ContigId::Y);
    }

    #[test]
    fn test_display_round_trip() {
        for name in ["1", "22", "X", "Y"] {
            let id = ContigId::parse(name).unwrap();
            assert_eq!(id.to_string(), name);
        }
    }
}
