//! Declared-kind response decoding.
//!
//! The representation of a payload is selected by the kind the caller
//! declared for the request, never by sniffing the body. There is exactly
//! one decode dispatch point; everything downstream matches on
//! [`DecodedBody`].

use serde_json::Value;

use crate::error::ClientError;

/// Payload representation declared by the caller for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Structured JSON document, decoded into a value tree.
    Json,
    /// Delimited tabular document, decoded into header + rows.
    Csv,
    /// Opaque text blob, passed through untouched.
    Text,
}

/// Decoded payload, one variant per [`ContentKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Tree(Value),
    Table(CsvTable),
    Text(String),
}

/// Header and rows of a delimited payload.
///
/// Rows whose field count differs from the header's were already dropped
/// during decoding; a row here always has exactly `header.len()` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decode a raw payload according to its declared kind.
///
/// Returns the decoded body and the payload size in bytes. A malformed
/// structured payload is an `Api`-class failure carrying the response
/// status: the bytes arrived, the service just produced garbage.
pub fn decode_body(
    kind: ContentKind,
    status: u16,
    body: String,
) -> Result<(DecodedBody, usize), ClientError> {
    let size = body.len();

    let decoded = match kind {
        ContentKind::Json => {
            let tree: Value = serde_json::from_str(&body)
                .map_err(|e| ClientError::api(status, format!("malformed json payload: {e}")))?;
            DecodedBody::Tree(tree)
        }
        ContentKind::Csv => DecodedBody::Table(split_table(&body)),
        ContentKind::Text => DecodedBody::Text(body),
    };

    Ok((decoded, size))
}

/// Split a delimited payload into header and width-matched rows.
///
/// The first line is the header and is never emitted as data. Blank lines
/// and rows with a mismatched field count are skipped silently; a partial
/// table is preferable to aborting the whole decode.
fn split_table(body: &str) -> CsvTable {
    let mut lines = body.trim().lines();

    let Some(header_line) = lines.next() else {
        return CsvTable::default();
    };

    let header: Vec<String> = header_line.split(',').map(str::to_owned).collect();
    let mut rows = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<String> = line.split(',').map(str::to_owned).collect();
        if fields.len() != header.len() {
            continue;
        }

        rows.push(fields);
    }

    CsvTable { header, rows }
}
