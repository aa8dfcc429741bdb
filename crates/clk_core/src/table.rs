//! Frequency tables and their comma-delimited file format.
//!
//! Files have no header row. Quoting follows the usual CSV rules, so a quoted
//! field may hold commas, doubled quotes or line breaks. Blank lines are
//! skipped. Every filter in an encoded table has the same width.
use crate::attack::AttackResult;
use crate::errors::{ClkError, Result};
use crate::filter::ClkFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// One vocabulary entry of the public plaintext frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextRecord {
    pub word: String,
    pub frequency: u64,
}

impl PlaintextRecord {
    pub fn new(word: impl Into<String>, frequency: u64) -> Self {
        Self { word: word.into(), frequency }
    }
}

/// A CLK with its observed frequency. `ground_truth` is only read by the
/// evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    pub filter: ClkFilter,
    pub frequency: u64,
    pub ground_truth: String,
}

fn csv_reader<R: Read>(r: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().has_headers(false).flexible(true).from_reader(r)
}

/// Yields `(line_no, record)`, where `line_no` is the 1-based line the record
/// starts on.
fn rows<R: Read>(r: R) -> impl Iterator<Item = Result<(usize, csv::StringRecord)>> {
    csv_reader(r).into_records().map(|rec| {
        let rec = rec.map_err(ClkError::from_csv)?;
        let line_no = rec.position().map(|p| p.line() as usize).unwrap_or(0);
        Ok((line_no, rec))
    })
}

fn expect_fields(line_no: usize, rec: &csv::StringRecord, n: usize) -> Result<()> {
    if rec.len() != n {
        return Err(ClkError::malformed(
            line_no,
            format!("expected {n} fields, found {}", rec.len()),
        ));
    }
    Ok(())
}

fn parse_frequency(line_no: usize, s: &str) -> Result<u64> {
    s.trim()
        .parse::<u64>()
        .map_err(|_| ClkError::malformed(line_no, format!("frequency {s:?} is not a non-negative integer")))
}

/// Reads `word,frequency` rows.
pub fn read_plaintext_table<R: Read>(r: R) -> Result<Vec<PlaintextRecord>> {
    let mut out = Vec::new();
    for row in rows(r) {
        let (line_no, rec) = row?;
        expect_fields(line_no, &rec, 2)?;
        let frequency = parse_frequency(line_no, &rec[1])?;
        out.push(PlaintextRecord { word: rec[0].to_string(), frequency });
    }
    Ok(out)
}

/// Reads `base64 filter,frequency,word` rows. A filter whose width differs
/// from the first row's is malformed.
pub fn read_encoded_table<R: Read>(r: R) -> Result<Vec<EncodedRecord>> {
    let mut out: Vec<EncodedRecord> = Vec::new();
    for row in rows(r) {
        let (line_no, rec) = row?;
        expect_fields(line_no, &rec, 3)?;
        let filter = ClkFilter::from_base64(&rec[0])
            .map_err(|e| ClkError::malformed(line_no, e.to_string()))?;
        if let Some(first) = out.first() {
            if first.filter.len() != filter.len() {
                return Err(ClkError::malformed(
                    line_no,
                    format!("filter has {} bits, expected {}", filter.len(), first.filter.len()),
                ));
            }
        }
        let frequency = parse_frequency(line_no, &rec[1])?;
        out.push(EncodedRecord { filter, frequency, ground_truth: rec[2].to_string() });
    }
    Ok(out)
}

/// First field of every row. Extra columns are ignored, so both a bare word
/// list and a `word,frequency` table work.
pub fn read_word_column<R: Read>(r: R) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for row in rows(r) {
        let (_, rec) = row?;
        if let Some(word) = rec.get(0) {
            out.push(word.to_string());
        }
    }
    Ok(out)
}

pub fn load_plaintext_table(path: impl AsRef<Path>) -> Result<Vec<PlaintextRecord>> {
    read_plaintext_table(File::open(path)?)
}

pub fn load_encoded_table(path: impl AsRef<Path>) -> Result<Vec<EncodedRecord>> {
    read_encoded_table(File::open(path)?)
}

pub fn load_word_column(path: impl AsRef<Path>) -> Result<Vec<String>> {
    read_word_column(File::open(path)?)
}

fn write_rows<W, I, R>(w: W, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(w);
    for row in rows {
        wtr.write_record(row).map_err(ClkError::from_csv)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_plaintext_table<W: Write>(w: W, table: &[PlaintextRecord]) -> Result<()> {
    write_rows(w, table.iter().map(|rec| [rec.word.clone(), rec.frequency.to_string()]))
}

pub fn write_encoded_table<W: Write>(w: W, table: &[EncodedRecord]) -> Result<()> {
    write_rows(
        w,
        table.iter().map(|rec| {
            [rec.filter.to_base64(), rec.frequency.to_string(), rec.ground_truth.clone()]
        }),
    )
}

/// Writes `word,"cand1,cand2,..."` rows, candidates in sorted order.
pub fn write_attack_results<W: Write>(w: W, results: &[AttackResult]) -> Result<()> {
    write_rows(w, results.iter().map(|res| [res.ground_truth.clone(), res.joined_candidates()]))
}
