//! Multi-sample variant file parsing.
//!
//! Two pieces: [`VariantSource`] parses the column layout of a VCF-style
//! file once (sample columns, FORMAT tag order), and [`VariantCursor`]
//! iterates one sample's records forward-only, normalizing each row into a
//! [`Variant`] on demand.
//!
//! Multiple cursors may point at the same file, one per sample; each opens
//! an independent handle and keeps its own read position.

use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::core::contig::ContigId;
use crate::core::variant::{Phase, Variant, GAP_MARKER};
use crate::error::{ConsensusError, Result};

/// Genotype tag within the FORMAT column.
const GENOTYPE_TAG: &str = "GT";
/// Allele-depth tag within the FORMAT column.
const ALLELE_DEPTH_TAG: &str = "AD";
/// Number of fixed metadata columns preceding the FORMAT column.
const MIN_COLUMNS: usize = 9;

/// One-time parse of a multi-sample variant file's column layout.
///
/// Records which column belongs to which sample (the first sample column
/// follows the FORMAT column, wherever that lands) and the tag-to-index map
/// of the FORMAT descriptor, taken from the first data row and assumed
/// constant for the whole file.
#[derive(Debug, Clone)]
pub struct VariantSource {
    samples: Vec<String>,
    sample_columns: HashMap<String, usize>,
    format_fields: HashMap<String, usize>,
}

impl VariantSource {
    /// Parse the header section of a variant stream.
    ///
    /// Skips `##` meta lines until the column-header line (the `#`-prefixed
    /// line naming the columns) is found, then reads ahead to the first
    /// data row to capture the FORMAT field order. A file with a header but
    /// no data rows is valid and simply has no FORMAT fields.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::Format` if no column-header line is found.
    pub fn open<R: BufRead>(reader: R) -> Result<Self> {
        let mut format_column: Option<usize> = None;
        let mut samples = Vec::new();
        let mut sample_columns = HashMap::new();
        let mut format_fields = HashMap::new();
        let mut header_seen = false;

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() || line.starts_with("##") {
                continue;
            }

            if let Some(header) = line.strip_prefix('#') {
                // Column-header line: everything after FORMAT is a sample.
                let columns: Vec<&str> = header.split('\t').collect();
                format_column = columns.iter().position(|c| *c == "FORMAT");
                if let Some(fmt) = format_column {
                    for (index, name) in columns.iter().enumerate().skip(fmt + 1) {
                        samples.push((*name).to_string());
                        sample_columns.insert((*name).to_string(), index);
                    }
                }
                header_seen = true;
                continue;
            }

            if !header_seen {
                return Err(ConsensusError::format(
                    "data row encountered before column-header line",
                ));
            }

            // First data row: capture the FORMAT field order.
            if let Some(fmt) = format_column {
                if let Some(descriptor) = line.split('\t').nth(fmt) {
                    for (index, tag) in descriptor.split(':').enumerate() {
                        format_fields.insert(tag.to_string(), index);
                    }
                }
            }
            break;
        }

        if !header_seen {
            return Err(ConsensusError::format(
                "no column-header line found in variant file",
            ));
        }

        debug!(
            samples = samples.len(),
            format_fields = format_fields.len(),
            "parsed variant file layout"
        );

        Ok(Self {
            samples,
            sample_columns,
            format_fields,
        })
    }

    /// Parse the layout of a variant file, decoding gzip/bgzip by
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

    /// Sample names in column order.
    pub fn sample_names(&self) -> &[String] {
        &self.samples
    }

    /// The 0-based column index of a sample.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::NotFound` for an unknown sample.
    pub fn column_for_sample(&self, name: &str) -> Result<usize> {
        self.sample_columns.get(name).copied().ok_or_else(|| {
            ConsensusError::not_found(format!("sample '{name}' not present in variant file"))
        })
    }

    /// The index of a FORMAT tag within each sample's colon-separated
    /// field, or `None` if the file does not declare the tag. Absence is
    /// not an error; callers substitute a default.
    pub fn field_index(&self, tag: &str) -> Option<usize> {
        self.format_fields.get(tag).copied()
    }
}

/// Forward-only per-sample iterator over normalized [`Variant`] records.
///
/// Created once per (file, sample, phase) triple; owns its stream handle
/// exclusively. State moves only forward, via [`Self::advance`] and
/// [`Self::advance_to`]; it is the caller's responsibility to request
/// positions in non-decreasing order.
pub struct VariantCursor {
    reader: Box<dyn BufRead>,
    layout: VariantSource,
    sample: String,
    sample_column: usize,
    phase: Phase,
    row: Option<String>,
}

impl VariantCursor {
    /// Open a cursor over a variant stream for one sample and phase.
    ///
    /// The stream is consumed up to the first data row.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::InvalidArgument` if `phase` is not 0 or 1,
    /// and `ConsensusError::NotFound` if the sample is unknown to `layout`.
    pub fn open<R: BufRead + 'static>(
        reader: R,
        layout: VariantSource,
        sample: &str,
        phase: u8,
    ) -> Result<Self> {
        let phase = Phase::from_index(phase)?;
        let sample_column = layout.column_for_sample(sample)?;

        let mut cursor = Self {
            reader: Box::new(reader),
            layout,
            sample: sample.to_string(),
            sample_column,
            phase,
            row: None,
        };
        cursor.advance()?;
        Ok(cursor)
    }

    /// Open a cursor over a variant file with its own independent handle,
    /// decoding gzip/bgzip by extension.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::Io` if the file cannot be opened, plus the
    /// errors of [`Self::open`].
    pub fn from_path(path: &Path, layout: VariantSource, sample: &str, phase: u8) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        if is_gzipped(path) {
            Self::open(BufReader::new(GzDecoder::new(file)), layout, sample, phase)
        } else {
            Self::open(BufReader::new(file), layout, sample, phase)
        }
    }

    /// The sample this cursor reads.
    pub fn sample(&self) -> &str {
        &self.sample
    }

    /// The phase this cursor was opened with.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to the next data row. Returns whether a row remains.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::Io` on read failure.
    pub fn advance(&mut self) -> Result<bool> {
        loop {
            let mut buf = String::new();
            if self.reader.read_line(&mut buf)? == 0 {
                self.row = None;
                return Ok(false);
            }
            while buf.ends_with('\n') || buf.ends_with('\r') {
                buf.pop();
            }
            if buf.is_empty() || buf.starts_with('#') {
                continue;
            }
            self.row = Some(buf);
            return Ok(true);
        }
    }

    /// Scan forward to the first record at or after `(contig, pos)`.
    ///
    /// Records on other contigs are skipped until the contig matches; then
    /// records before `pos` are skipped. May only move forward.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::NotFound` if the stream is exhausted before
    /// the contig is reached, or if the contig changes again before `pos`.
    pub fn advance_to(&mut self, contig: ContigId, pos: u64) -> Result<()> {
        // Skip records until the contig matches.
        loop {
            let Some(row) = self.row.as_ref() else {
                return Err(ConsensusError::not_found(format!(
                    "sample '{}': no records for contig {contig}",
                    self.sample
                )));
            };
            if row_contig(row)? == contig {
                break;
            }
            self.advance()?;
        }

        // Skip records before the requested position.
        loop {
            let Some(row) = self.row.as_ref() else {
                return Err(ConsensusError::not_found(format!(
                    "sample '{}': contig {contig} exhausted before position {pos}",
                    self.sample
                )));
            };
            if row_contig(row)? != contig {
                return Err(ConsensusError::not_found(format!(
                    "sample '{}': contig {contig} exhausted before position {pos}",
                    self.sample
                )));
            }
            if row_pos(row)? >= pos {
                return Ok(());
            }
            self.advance()?;
        }
    }

    /// Build the current row's [`Variant`], or `None` if the stream is
    /// exhausted.
    ///
    /// Normalization: when the first alternate allele's length differs from
    /// the reference allele's and one is a prefix of the other, the shared
    /// anchor is trimmed from both, the position moves one base right, and
    /// an allele left empty becomes the gap marker. A multi-allelic row
    /// whose first allele needed that repositioning is unsupported: one row
    /// cannot anchor two indels differently.
    ///
    /// # Errors
    ///
    /// Returns `ConsensusError::Format` for short rows, unparseable fields,
    /// or genotype indices without a matching allele, and
    /// `ConsensusError::Unsupported` for the repositioned multi-allelic
    /// case above.
    pub fn current(&self) -> Result<Option<Variant>> {
        let Some(row) = self.row.as_ref() else {
            return Ok(None);
        };

        let columns: Vec<&str> = row.split('\t').collect();
        if columns.len() < MIN_COLUMNS {
            return Err(ConsensusError::format(format!(
                "row has {} columns, expected at least {MIN_COLUMNS} (no FORMAT column)",
                columns.len()
            )));
        }
        if columns.len() <= self.sample_column {
            return Err(ConsensusError::format(format!(
                "row has {} columns but sample '{}' is at column {}",
                columns.len(),
                self.sample,
                self.sample_column
            )));
        }

        let contig = columns[0].to_string();
        let mut pos: u64 = columns[1].parse().map_err(|_| {
            ConsensusError::format(format!("invalid position '{}' in contig {contig}", columns[1]))
        })?;
        let mut reference = columns[3].to_string();
        let mut alternates: Vec<String> = columns[4].split(',').map(str::to_string).collect();
        let quality: f64 = if columns[5] == "." {
            0.0
        } else {
            columns[5].parse().map_err(|_| {
                ConsensusError::format(format!("invalid quality '{}' at {contig}:{pos}", columns[5]))
            })?
        };

        let subfields: Vec<&str> = columns[self.sample_column].split(':').collect();
        let (allele0, allele1) = self.genotype_indices(&subfields, &contig, pos)?;

        // Indel normalization: trim a shared leading anchor so alleles
        // align 1:1 with reference bases where possible.
        let mut repositioned = false;
        if alternates[0].len() != reference.len()
            && !reference.is_empty()
            && !alternates[0].is_empty()
            && alternates[0].as_bytes()[0] == reference.as_bytes()[0]
        {
            let alt = &mut alternates[0];
            if alt.starts_with(reference.as_str()) {
                *alt = alt[reference.len()..].to_string();
                reference.clear();
            } else if reference.starts_with(alt.as_str()) {
                reference = reference[alt.len()..].to_string();
                alt.clear();
            } else {
                reference.remove(0);
                alt.remove(0);
            }
            pos += 1;
            repositioned = true;

            if reference.is_empty() {
                reference.push(GAP_MARKER);
            }
            if alternates[0].is_empty() {
                alternates[0].push(GAP_MARKER);
            }
        }

        if repositioned && alternates.len() > 1 {
            return Err(ConsensusError::Unsupported(format!(
                "multi-allelic record at {contig}:{pos} requires incompatible repositioning"
            )));
        }

        let resolve = |index: u32| -> Result<String> {
            if index == 0 {
                return Ok(reference.clone());
            }
            alternates
                .get(index as usize - 1)
                .cloned()
                .ok_or_else(|| {
                    ConsensusError::format(format!(
                        "genotype index {index} at {contig}:{pos} but only {} alternate allele(s)",
                        alternates.len()
                    ))
                })
        };

        let alt_phase0 = resolve(allele0)?;
        let alt_phase1 = resolve(allele1)?;
        let depth = self.read_depth(&subfields, &contig, pos)?;

        Ok(Some(Variant {
            contig,
            pos,
            reference,
            alt_phase0,
            alt_phase1,
            quality,
            depth,
        }))
    }

    /// Extract the two allele indices from the genotype sub-field, a
    /// `<int><sep><int>` pattern such as `0/1` or `1|1`.
    fn genotype_indices(&self, subfields: &[&str], contig: &str, pos: u64) -> Result<(u32, u32)> {
        let gt_index = self.layout.field_index(GENOTYPE_TAG).ok_or_else(|| {
            ConsensusError::format(format!("FORMAT descriptor has no {GENOTYPE_TAG} tag"))
        })?;
        let genotype = subfields.get(gt_index).ok_or_else(|| {
            ConsensusError::format(format!(
                "sample '{}' field at {contig}:{pos} has no genotype sub-field",
                self.sample
            ))
        })?;

        let bytes = genotype.as_bytes();
        if bytes.len() < 3 {
            return Err(ConsensusError::format(format!(
                "malformed genotype '{genotype}' at {contig}:{pos}"
            )));
        }
        let digit = |b: u8| -> Result<u32> {
            (b as char).to_digit(10).ok_or_else(|| {
                ConsensusError::format(format!("malformed genotype '{genotype}' at {contig}:{pos}"))
            })
        };
        Ok((digit(bytes[0])?, digit(bytes[2])?))
    }

    /// Sum of the comma-separated allele depths, or 1 when the tag or
    /// sub-field is absent.
    fn read_depth(&self, subfields: &[&str], contig: &str, pos: u64) -> Result<u32> {
        let Some(ad_index) = self.layout.field_index(ALLELE_DEPTH_TAG) else {
            return Ok(1);
        };
        let Some(field) = subfields.get(ad_index) else {
            return Ok(1);
        };

        let mut total = 0u32;
        for part in field.split(',') {
            let value: u32 = part.parse().map_err(|_| {
                ConsensusError::format(format!(
                    "invalid allele depth '{field}' at {contig}:{pos}"
                ))
            })?;
            total += value;
        }
        Ok(total)
    }
}

/// Parse the contig column of a raw row.
fn row_contig(row: &str) -> Result<ContigId> {
    let name = row.split('\t').next().unwrap_or("");
    ContigId::parse(name)
}

/// Parse the position column of a raw row.
fn row_pos(row: &str) -> Result<u64> {
    let field = row
        .split('\t')
        .nth(1)
        .ok_or_else(|| ConsensusError::format("row has no position column"))?;
    field
        .parse()
        .map_err(|_| ConsensusError::format(format!("invalid position '{field}'")))
}

/// Check if the path is a gzipped file
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}
