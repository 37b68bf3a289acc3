use super::serializer::SEPARATOR;
use crate::domain::target::{DATE_FORMAT, TIME_FORMAT};
use crate::domain::TargetEntry;
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use std::io::{self, BufRead};

/// Reads delimited-text records, joining physical lines while inside a quoted field
pub struct RecordReader<R> {
    reader: R,
    lines_read: usize,
    record_line: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lines_read: 0,
            record_line: 0,
        }
    }

    /// 1-based line on which the most recently returned record started
    pub fn record_line(&self) -> usize {
        self.record_line
    }
}

/// Check if the text so far ends inside an open quoted field
fn inside_quotes(raw: &str) -> bool {
    raw.chars().filter(|&c| c == '"').count() % 2 == 1
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = io::Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut raw = String::new();
            let start = self.lines_read + 1;

            loop {
                let mut line = String::new();
                match self.reader.read_line(&mut line) {
                    // EOF inside an unterminated quote keeps what was read
                    Ok(0) => break,
                    Ok(_) => {
                        self.lines_read += 1;
                        raw.push_str(&line);
                        if !inside_quotes(&raw) {
                            break;
                        }
                    }
                    Err(e) => return Some(Err(e)),
                }
            }

            if raw.is_empty() {
                return None;
            }

            let record = raw
                .strip_suffix('\n')
                .map(|r| r.strip_suffix('\r').unwrap_or(r))
                .unwrap_or(&raw);

            // Skip blank lines
            if record.trim().is_empty() {
                continue;
            }

            self.record_line = start;
            return Some(Ok(parse_record(record)));
        }
    }
}

/// Split one record (without its terminator) into fields
pub fn parse_record(record: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == SEPARATOR {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }

    fields.push(field);
    fields
}

/// Parse a Date,Time,Target record into an entry
pub fn parse_entry(fields: &[String]) -> Result<TargetEntry> {
    let [date, time, text] = fields else {
        bail!("Expected 3 fields, found {}", fields.len());
    };

    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .with_context(|| format!("Invalid date: {}", date))?;
    let time = NaiveTime::parse_from_str(time, TIME_FORMAT)
        .with_context(|| format!("Invalid time: {}", time))?;
    if text.trim().is_empty() {
        bail!("Empty target");
    }

    Ok(TargetEntry {
        date,
        time,
        text: text.clone(),
    })
}
