use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::contig::ContigId;
use crate::error::{ConsensusError, Result};

/// A genomic region in the conventional `contig:start-end` syntax.
///
/// Positions are 1-based and inclusive on input (`chr1:101-200` covers 100
/// bases); [`Region::half_open_end`] converts to the engine's half-open
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub contig: ContigId,
    pub start: u64,
    pub end: u64,
}

impl Region {
    /// Exclusive end position for half-open `[start, end)` iteration.
    pub fn half_open_end(&self) -> u64 {
        self.end + 1
    }

    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

impl FromStr for Region {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self> {
        let (contig, span) = s.split_once(':').ok_or_else(|| {
            ConsensusError::format(format!("region '{s}' is not in contig:start-end form"))
        })?;
        let (start, end) = span.split_once('-').ok_or_else(|| {
            ConsensusError::format(format!("region '{s}' is not in contig:start-end form"))
        })?;

        let contig = ContigId::parse(contig)?;
        let start: u64 = start
            .parse()
            .map_err(|_| ConsensusError::format(format!("invalid region start '{start}'")))?;
        let end: u64 = end
            .parse()
            .map_err(|_| ConsensusError::format(format!("invalid region end '{end}'")))?;

        if start == 0 {
            return Err(ConsensusError::Range(
                "region start must be >= 1 (positions are 1-based)".to_string(),
            ));
        }
        if end < start {
            return Err(ConsensusError::Range(format!(
                "region end {end} precedes start {start}"
            )));
        }

        Ok(Self { contig, start, end })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}
