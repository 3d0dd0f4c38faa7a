//! JSON writers for the command-line front end
//!
//! Batch results are written as an array of `{"data": record}` objects, a
//! single page as one such object, and streamed envelopes as newline
//! delimited JSON.

use super::{Envelope, PageRecord};
use crate::CrawlError;
use serde::Serialize;
use std::io::Write;

/// Wrapper giving every record the `{"data": ...}` shape
#[derive(Debug, Serialize)]
pub struct DataEnvelope<'a> {
    pub data: &'a PageRecord,
}

fn write_value<W, V>(writer: &mut W, value: &V, pretty: bool) -> Result<(), CrawlError>
where
    W: Write + ?Sized,
    V: Serialize + ?Sized,
{
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Writes a batch of records as `[{"data": record}, ...]`
pub fn write_records<W: Write + ?Sized>(
    writer: &mut W,
    records: &[PageRecord],
    pretty: bool,
) -> Result<(), CrawlError> {
    let wrapped: Vec<_> = records.iter().map(|data| DataEnvelope { data }).collect();
    write_value(writer, &wrapped, pretty)
}

/// Writes one record as `{"data": record}`
pub fn write_single<W: Write + ?Sized>(
    writer: &mut W,
    record: &PageRecord,
    pretty: bool,
) -> Result<(), CrawlError> {
    write_value(writer, &DataEnvelope { data: record }, pretty)
}

/// Writes one streamed envelope as a single line and flushes it
pub fn write_envelope<W: Write + ?Sized>(
    writer: &mut W,
    envelope: &Envelope,
) -> Result<(), CrawlError> {
    write_value(writer, envelope, false)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CrawlState;

    #[test]
    fn test_write_records_shape() {
        let records = vec![
            PageRecord::new("https://ex.com/", "Home", "Welcome"),
            PageRecord::non_html("https://ex.com/a.pdf"),
        ];
        let mut out = Vec::new();
        write_records(&mut out, &records, false).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["data"]["title"], "Home");
        assert_eq!(items[1]["data"]["content"], "Skipped non-HTML content");
    }

    #[test]
    fn test_write_single_pretty() {
        let record = PageRecord::new("https://ex.com/", "Home", "Welcome");
        let mut out = Vec::new();
        write_single(&mut out, &record, true).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\n'));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["data"]["source_url"], "https://ex.com/");
    }

    #[test]
    fn test_write_envelope_single_line() {
        let mut out = Vec::new();
        write_envelope(
            &mut out,
            &Envelope::Complete {
                total: 2,
                state: CrawlState::Completed,
            },
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "{\"kind\":\"complete\",\"payload\":{\"total\":2,\"state\":\"completed\"}}\n"
        );
    }
}
