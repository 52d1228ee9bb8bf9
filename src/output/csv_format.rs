//! CSV output formatting.
//!
//! One row per hit. Verified subdomains are emitted after the DNS results
//! with `verified` set.

use crate::probe::Hit;
use crate::storage::ScanRecord;
use std::io::{self, Write};

/// Print results in CSV format.
pub fn print_csv(record: &ScanRecord) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), record)
}

/// Write `record` as CSV to `out`.
pub fn write_csv<W: Write>(out: W, record: &ScanRecord) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["target", "url", "status", "size", "addresses", "verified"])?;

    let rows = record
        .results
        .iter()
        .map(|hit| (hit, false))
        .chain(record.verified.iter().map(|hit| (hit, true)));
    for (hit, verified) in rows {
        wtr.write_record(row(hit, verified))?;
    }

    wtr.flush()?;
    Ok(())
}

fn row(hit: &Hit, verified: bool) -> [String; 6] {
    let addresses: Vec<String> = hit.addresses.iter().map(ToString::to_string).collect();
    [
        hit.target.clone(),
        hit.resolved_url.clone(),
        hit.status_code.map_or(String::new(), |s| s.to_string()),
        hit.byte_size.map_or(String::new(), |s| s.to_string()),
        addresses.join(" "),
        verified.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ScanKind;

    #[test]
    fn test_csv_rows() {
        let mut record = ScanRecord::new(ScanKind::Subdomain, "x.com");
        record.results = vec![Hit::resolved(
            "www",
            "www.x.com",
            vec!["10.0.0.1".parse().unwrap(), "10.0.0.2".parse().unwrap()],
        )];
        record.verified = vec![Hit::http("www.x.com", "https://www.x.com/", 200, 5)];

        let mut buf = Vec::new();
        write_csv(&mut buf, &record).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "target,url,status,size,addresses,verified");
        assert_eq!(lines[1], "www,www.x.com,,,10.0.0.1 10.0.0.2,false");
        assert_eq!(lines[2], "www.x.com,https://www.x.com/,200,5,,true");
    }
}
