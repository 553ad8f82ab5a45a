//! End-to-end region builds over real files on disk.

use std::io::Write;

use tempfile::NamedTempFile;

use vcf_consensus::{
    ConsensusEngine, ConsensusError, ContigId, ReferenceCursor, VariantCursor, VariantSource,
};

const REFERENCE: &str = ">chr1\nACGTACGTAC\nGGGGCCCC\n>chr2\nTTTTAAAA\n";

const VARIANTS: &str = "\
##fileformat=VCFv4.2
##contig=<ID=chr1>
##contig=<ID=chr2>
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA12878\tNA12891
chr1\t5\t.\tA\tG\t50\tPASS\t.\tGT:AD\t1/1:3,9\t0/0:12,0
chr1\t8\t.\tT\tTGG\t35\tPASS\t.\tGT:AD\t0/0:6,0\t1/1:2,4
chr1\t12\t.\tG\tC\t61\tPASS\t.\tGT:AD\t0/0:7,0\t1/1:1,9
chr2\t2\t.\tT\tA\t44\tPASS\t.\tGT:AD\t1/1:0,5\t0/0:8,0
";

fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn engine_for(reference: &NamedTempFile, variants: &NamedTempFile, samples: &[&str]) -> ConsensusEngine {
    let cursor = ReferenceCursor::from_path(reference.path()).unwrap();
    let source = VariantSource::from_path(variants.path()).unwrap();

    let mut engine = ConsensusEngine::new(cursor);
    for sample in samples {
        let vc = VariantCursor::from_path(variants.path(), source.clone(), sample, 0).unwrap();
        engine.add_sample(vc);
    }
    engine
}

#[test]
fn builds_substituted_consensus_per_sample() {
    let reference = write_temp(REFERENCE, ".fa");
    let variants = write_temp(VARIANTS, ".vcf");

    let mut engine = engine_for(&reference, &variants, &["NA12878", "NA12891"]);
    let results = engine.build_region(ContigId(1), 1, 19).unwrap();

    assert_eq!(results.len(), 2);
    // NA12878: A->G at 5; the insertion at 8 belongs to NA12891
    assert_eq!(results[0].name(), Some("NA12878"));
    assert_eq!(results[0].sequence(), "ACGTGCGTACGGGGCCCC");
    // NA12891: insertion at 8 skipped (multi-character allele), G->C at 12
    assert_eq!(results[1].name(), Some("NA12891"));
    assert_eq!(results[1].sequence(), "ACGTACGTACGCGGCCCC");
}

#[test]
fn insertion_leaves_length_and_content_unchanged() {
    let reference = write_temp(REFERENCE, ".fa");
    let variants = write_temp(VARIANTS, ".vcf");

    let mut engine = engine_for(&reference, &variants, &["NA12891"]);
    // Only positions 1..9, so the sole candidate edit is the insertion at 8
    let results = engine.build_region(ContigId(1), 1, 9).unwrap();
    assert_eq!(results[0].sequence(), "ACGTACGT");
    assert_eq!(results[0].len(), 8);
}

#[test]
fn identity_for_sample_with_no_region_variants() {
    let reference = write_temp(REFERENCE, ".fa");
    let variants = write_temp(VARIANTS, ".vcf");

    let mut engine = engine_for(&reference, &variants, &["NA12891"]);
    // NA12891 has no record on chr2 at or after position 3
    let results = engine.build_region(ContigId(2), 3, 9).unwrap();
    assert_eq!(results[0].sequence(), "TTAAAA");
}

#[test]
fn samples_do_not_share_buffers() {
    let reference = write_temp(REFERENCE, ".fa");
    let variants = write_temp(VARIANTS, ".vcf");

    let mut engine = engine_for(&reference, &variants, &["NA12878", "NA12891"]);
    let results = engine.build_region(ContigId(1), 1, 7).unwrap();
    assert_eq!(results[0].sequence(), "ACGTGC");
    assert_eq!(results[1].sequence(), "ACGTAC");
}

#[test]
fn unknown_sample_is_rejected_at_cursor_open() {
    let variants = write_temp(VARIANTS, ".vcf");
    let source = VariantSource::from_path(variants.path()).unwrap();

    let result = VariantCursor::from_path(variants.path(), source, "HG00096", 0);
    assert!(matches!(result, Err(ConsensusError::NotFound(_))));
}

#[test]
fn gzipped_inputs_are_decoded() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(REFERENCE.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut reference = NamedTempFile::with_suffix(".fa.gz").unwrap();
    reference.write_all(&compressed).unwrap();
    reference.flush().unwrap();

    let variants = write_temp(VARIANTS, ".vcf");
    let mut engine = engine_for(&reference, &variants, &["NA12878"]);
    let results = engine.build_region(ContigId(1), 1, 11).unwrap();
    assert_eq!(results[0].sequence(), "ACGTGCGTAC");
}

#[test]
fn rendered_records_are_two_line_fasta() {
    let reference = write_temp(REFERENCE, ".fa");
    let variants = write_temp(VARIANTS, ".vcf");

    let mut engine = engine_for(&reference, &variants, &["NA12878"]);
    let results = engine.build_region(ContigId(1), 1, 5).unwrap();
    assert_eq!(results[0].render(), ">NA12878\nACGT");
}
