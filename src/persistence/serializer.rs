use crate::domain::TargetEntry;

/// Field separator of the target log
pub const SEPARATOR: char = ',';

/// Record terminator written after every row
pub const TERMINATOR: &str = "\r\n";

/// Column names, always the first record
pub const HEADER: [&str; 3] = ["Date", "Time", "Target"];

/// Quote a field only when it needs it, doubling any embedded quotes
fn serialize_field(field: &str) -> String {
    let needs_quotes = field.contains(SEPARATOR)
        || field.contains('"')
        || field.contains('\r')
        || field.contains('\n');

    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Serialize one record, including its terminator
pub fn serialize_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut output = fields
        .iter()
        .map(|f| serialize_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string());
    output.push_str(TERMINATOR);
    output
}

/// Serialize the header record
pub fn serialize_header() -> String {
    serialize_record(&HEADER)
}

/// Serialize a target as a Date,Time,Target record
pub fn serialize_entry(entry: &TargetEntry) -> String {
    serialize_record(&[entry.date_str(), entry.time_str(), entry.text.clone()])
}
