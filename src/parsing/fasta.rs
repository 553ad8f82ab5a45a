//! Forward-only cursor over a multi-contig FASTA-style reference.
//!
//! A reference genome is too large to load into memory, so the cursor
//! streams the file line by line and answers "what base is at (contig,
//! position)?" for strictly non-decreasing queries only. Backward requests
//! are a caller error, not a supported query: silently reinterpreting one
//! would corrupt the coordinate bookkeeping the rest of the system relies
//! on, so every ordering violation fails fast with a typed error.
//!
//! Supports both uncompressed and gzip/bgzip compressed files, detected by
//! extension.

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::core::contig::ContigId;
use crate::error::{ConsensusError, Result};
use crate::utils::coords;

/// Marker character beginning a contig header line.
const HEADER_MARKER: char = '>';

/// Streaming reader over a multi-contig reference sequence.
///
/// Owns its stream handle exclusively; it is not shared across concurrent
/// reads. State is mutated only by [`Self::base_at`].
pub struct ReferenceCursor {
    reader: Box<dyn BufRead>,
    /// Contig the cursor is currently inside.
    contig: ContigId,
    /// Current unconsumed line; `None` once the stream is exhausted.
    line: Option<String>,
    /// 0-based offset within the current contig of the first base of
    /// `line` (meaningful only while `line` is a sequence line).
    line_start: u64,
    /// 0-based offset of the last base served within the current contig.
    pos: u64,
}

impl ReferenceCursor {
    /// Open a cursor over a reference stream.
    ///
    /// Reads the first line, which must be a contig header, and primes the
    /// line buffer.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::Format` if the stream does not begin with a
    /// contig header or the header's contig cannot be parsed.
    pub fn open<R: BufRead + 'static>(reader: R) -> Result<Self> {
        let mut reader: Box<dyn BufRead> = Box::new(reader);

        let first = read_trimmed_line(&mut reader)?.ok_or_else(|| {
            ConsensusError::format("reference is empty: expected a contig header line")
        })?;
        let contig = parse_header(&first)?;

        let line = read_trimmed_line(&mut reader)?;
        Ok(Self {
            reader,
            contig,
            line,
            line_start: 0,
            pos: 0,
        })
    }

    /// Open a cursor over a reference file, decoding gzip/bgzip by
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::Io` if the file cannot be opened, plus the
    /// errors of [`Self::open`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        if is_gzipped(path) {
            Self::open(BufReader::new(GzDecoder::new(file)))
        } else {
            Self::open(BufReader::new(file))
        }
    }

    /// Contig the cursor is currently positioned in.
    pub fn contig(&self) -> ContigId {
        self.contig
    }

    /// The base at a 1-based position within a contig.
    ///
    /// Queries must be non-decreasing in `(contig, pos)`. A later contig
    /// advances the cursor forward, skipping intermediate contigs.
    ///
    /// # Errors
    ///
    /// - `ConsensusError::Range` if `pos` is 0.
    /// - `ConsensusError::Order` if `contig` precedes the current contig or
    ///   `pos` precedes the last-served position.
    /// - `ConsensusError::Format` if the stream passes the target contig
    ///   without an exact match (input not sorted ascending).
    /// - `ConsensusError::NotFound` if the stream or contig ends before the
    ///   requested position.
    pub fn base_at(&mut self, contig: ContigId, pos: u64) -> Result<char> {
        let target = coords::to_zero_based(pos)?;

        if contig < self.contig {
            return Err(ConsensusError::order(format!(
                "cannot move back from contig {} to {contig}",
                self.contig
            )));
        }
        if contig > self.contig {
            self.seek_contig(contig)?;
        }

        if target < self.pos {
            return Err(ConsensusError::order(format!(
                "cannot move back from position {} to {pos} in contig {contig}",
                coords::to_one_based(self.pos)
            )));
        }

        loop {
            let Some(line) = self.line.as_ref() else {
                return Err(ConsensusError::not_found(format!(
                    "contig {contig} ends before position {pos}"
                )));
            };

            if line.starts_with(HEADER_MARKER) {
                // The next contig begins before the requested position.
                let next = parse_header(line)?;
                self.enter_contig(next)?;
                return Err(ConsensusError::not_found(format!(
                    "contig {contig} ends before position {pos}"
                )));
            }

            let line_len = line.len() as u64;
            if target < self.line_start + line_len {
                let offset = (target - self.line_start) as usize;
                let base = line.as_bytes()[offset] as char;
                self.pos = target;
                return Ok(base);
            }

            self.line_start += line_len;
            self.line = read_trimmed_line(&mut self.reader)?;
        }
    }

    /// Skip forward until the header of `target` is found.
    fn seek_contig(&mut self, target: ContigId) -> Result<()> {
        debug!(from = %self.contig, to = %target, "seeking contig");
        loop {
            let Some(line) = self.line.as_ref() else {
                return Err(ConsensusError::not_found(format!(
                    "contig {target} not found before end of reference"
                )));
            };

            if line.starts_with(HEADER_MARKER) {
                let found = parse_header(line)?;
                if found > target {
                    return Err(ConsensusError::format(format!(
                        "missed target contig {target}: reached {found} - input is not sorted ascending"
                    )));
                }
                self.enter_contig(found)?;
                if found == target {
                    return Ok(());
                }
            } else {
                self.line = read_trimmed_line(&mut self.reader)?;
            }
        }
    }

    /// Reset per-contig counters and consume the header line.
    fn enter_contig(&mut self, contig: ContigId) -> Result<()> {
        self.contig = contig;
        self.line_start = 0;
        self.pos = 0;
        self.line = read_trimmed_line(&mut self.reader)?;
        Ok(())
    }
}

/// Parse the contig identifier out of a header line.
fn parse_header(line: &str) -> Result<ContigId> {
    let name = line.strip_prefix(HEADER_MARKER).ok_or_else(|| {
        ConsensusError::format(format!("expected contig header line, got '{line}'"))
    })?;
    ContigId::parse(name)
}

/// Read one line, stripping the trailing newline (and carriage return).
fn read_trimmed_line(reader: &mut Box<dyn BufRead>) -> Result<Option<String>> {
    let mut buf = String::new();
    let n = reader.read_line(&mut buf)?;
    if n == 0 {
        return Ok(None);
    }
    while buf.ends_with('\n') || buf.ends_with('\r') {
        buf.pop();
    }
    Ok(Some(buf))
}

/// Check if the path is a gzipped file
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}
