//! CLI smoke tests.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const REFERENCE: &str = ">chr1\nACGTACGTAC\n";

const VARIANTS: &str = "\
##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA12878\tNA12891
chr1\t5\t.\tA\tG\t50\tPASS\t.\tGT:AD\t1/1:3,9\t0/0:12,0
";

fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn build_emits_fasta_records() {
    let reference = write_temp(REFERENCE, ".fa");
    let variants = write_temp(VARIANTS, ".vcf");

    Command::cargo_bin("vcf-consensus")
        .unwrap()
        .args(["build", "--region", "chr1:1-10"])
        .arg("--reference")
        .arg(reference.path())
        .arg("--variants")
        .arg(variants.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(">NA12878\nACGTGCGTAC"))
        .stdout(predicate::str::contains(">NA12891\nACGTACGTAC"));
}

#[test]
fn build_json_output() {
    let reference = write_temp(REFERENCE, ".fa");
    let variants = write_temp(VARIANTS, ".vcf");

    Command::cargo_bin("vcf-consensus")
        .unwrap()
        .args(["build", "--region", "chr1:1-10", "--format", "json"])
        .args(["--sample", "NA12878"])
        .arg("--reference")
        .arg(reference.path())
        .arg("--variants")
        .arg(variants.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sample\": \"NA12878\""))
        .stdout(predicate::str::contains("\"sequence\": \"ACGTGCGTAC\""));
}

#[test]
fn samples_lists_columns() {
    let variants = write_temp(VARIANTS, ".vcf");

    Command::cargo_bin("vcf-consensus")
        .unwrap()
        .arg("samples")
        .arg("--variants")
        .arg(variants.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("NA12878"))
        .stdout(predicate::str::contains("NA12891"));
}

#[test]
fn rejects_malformed_region() {
    let reference = write_temp(REFERENCE, ".fa");
    let variants = write_temp(VARIANTS, ".vcf");

    Command::cargo_bin("vcf-consensus")
        .unwrap()
        .args(["build", "--region", "chr1"])
        .arg("--reference")
        .arg(reference.path())
        .arg("--variants")
        .arg(variants.path())
        .assert()
        .failure();
}

#[test]
fn rejects_unknown_sample() {
    let reference = write_temp(REFERENCE, ".fa");
    let variants = write_temp(VARIANTS, ".vcf");

    Command::cargo_bin("vcf-consensus")
        .unwrap()
        .args(["build", "--region", "chr1:1-10", "--sample", "HG00096"])
        .arg("--reference")
        .arg(reference.path())
        .arg("--variants")
        .arg(variants.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("HG00096"));
}

#[test]
fn rejects_invalid_phase() {
    let reference = write_temp(REFERENCE, ".fa");
    let variants = write_temp(VARIANTS, ".vcf");

    Command::cargo_bin("vcf-consensus")
        .unwrap()
        .args(["build", "--region", "chr1:1-10", "--phase", "2"])
        .arg("--reference")
        .arg(reference.path())
        .arg("--variants")
        .arg(variants.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("phase"));
}
