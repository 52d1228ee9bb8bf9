//! JSON output formatting.

use crate::storage::ScanRecord;
use std::io::{self, Write};

/// Print results in JSON format.
pub fn print_json(record: &ScanRecord) -> io::Result<()> {
    let stdout = io::stdout();
    write_json(&mut stdout.lock(), record)
}

/// Write `record` as pretty JSON followed by a newline.
pub fn write_json(out: &mut impl Write, record: &ScanRecord) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, record).map_err(io::Error::other)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ScanKind;
    use crate::probe::Hit;

    #[test]
    fn test_json_contains_hits_and_stop_reason() {
        let mut record = ScanRecord::new(ScanKind::Directory, "http://t/");
        record.results = vec![Hit::http("admin", "http://t/admin", 301, 0)];

        let mut buf = Vec::new();
        write_json(&mut buf, &record).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["kind"], "directory");
        assert_eq!(value["stop_reason"], "completed");
        assert_eq!(value["results"][0]["status_code"], 301);
        assert!(value.get("verified").is_none());
    }
}
