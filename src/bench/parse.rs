//! Benchmark output parser
//!
//! Understands the line format printed by `go test -bench`:
//!
//! ```text
//! BenchmarkEncode-8   	  300000	      4521 ns/op	  28.31 MB/s	    1024 B/op	       3 allocs/op
//! ```
//!
//! Anything that is not a benchmark line (package headers, `PASS`, `ok`
//! summaries, log output) is skipped when parsing a whole stream.

use std::io::{BufRead, BufReader, Read};

use crate::models::{BenchmarkRecord, BenchmarkSet, Measured};
use crate::{BenchfluxError, Result};

const NAME_PREFIX: &str = "Benchmark";

/// Parse a single benchmark result line
///
/// # Examples
/// ```
/// use benchflux::bench::parse::parse_line;
/// use benchflux::models::Measured;
///
/// let record = parse_line("BenchmarkSort-4 2000 612345 ns/op").unwrap();
/// assert_eq!(record.name, "BenchmarkSort-4");
/// assert_eq!(record.n, 2000);
/// assert_eq!(record.measured, Measured::NS_PER_OP);
/// ```
pub fn parse_line(line: &str) -> Result<BenchmarkRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    // Name and iteration count; measurements are optional.
    if fields.len() < 2 {
        return Err(BenchfluxError::ParseError(format!(
            "two fields required, have {}",
            fields.len()
        )));
    }
    if !fields[0].starts_with(NAME_PREFIX) {
        return Err(BenchfluxError::ParseError(format!(
            "first field does not start with \"{}\"",
            NAME_PREFIX
        )));
    }
    let n: i64 = fields[1].parse().map_err(|e| {
        BenchfluxError::ParseError(format!("invalid iteration count {:?}: {}", fields[1], e))
    })?;

    let mut record = BenchmarkRecord::new(fields[0], n);
    // The name and count form the first pair; a trailing odd field is dropped.
    for i in 1..fields.len() / 2 {
        parse_measurement(&mut record, fields[i * 2], fields[i * 2 + 1]);
    }
    Ok(record)
}

fn parse_measurement(record: &mut BenchmarkRecord, quantity: &str, unit: &str) {
    match unit {
        "ns/op" => {
            if let Ok(value) = quantity.parse::<f64>() {
                record.ns_per_op = value;
                record.measured |= Measured::NS_PER_OP;
            }
        }
        "MB/s" => {
            if let Ok(value) = quantity.parse::<f64>() {
                record.mb_per_s = value;
                record.measured |= Measured::MB_PER_S;
            }
        }
        "B/op" => {
            if let Ok(value) = quantity.parse::<u64>() {
                record.alloced_bytes_per_op = value;
                record.measured |= Measured::ALLOCED_BYTES_PER_OP;
            }
        }
        "allocs/op" => {
            if let Ok(value) = quantity.parse::<u64>() {
                record.allocs_per_op = value;
                record.measured |= Measured::ALLOCS_PER_OP;
            }
        }
        _ => {}
    }
}

/// Parse every benchmark line of a stream into a set
///
/// Lines that are not benchmark results are ignored. Only a read failure
/// makes the whole set fail.
pub fn parse_set<R: Read>(reader: R) -> Result<BenchmarkSet> {
    let mut reader = BufReader::new(reader);
    let mut set = BenchmarkSet::new();
    let mut buf = Vec::new();
    let mut ord = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches('\n').trim_end_matches('\r');

        if let Ok(record) = parse_line(line) {
            let record = record.with_ord(ord);
            ord += 1;
            set.entry(record.name.clone()).or_default().push(record);
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    const SAMPLE: &str = "\
goos: linux
goarch: amd64
pkg: example.com/codec
BenchmarkEncode-8   \t  300000\t      4521 ns/op\t  28.31 MB/s\t    1024 B/op\t       3 allocs/op
BenchmarkDecode-8   \t  200000\t      6010 ns/op
BenchmarkEncode-8   \t  310000\t      4490 ns/op\t  28.50 MB/s\t    1024 B/op\t       3 allocs/op
PASS
ok  \texample.com/codec\t3.012s
";

    #[test]
    fn test_parse_line_all_fields() {
        let record = parse_line(
            "BenchmarkEncode-8 300000 4521 ns/op 28.31 MB/s 1024 B/op 3 allocs/op",
        )
        .unwrap();

        assert_eq!(record.name, "BenchmarkEncode-8");
        assert_eq!(record.n, 300000);
        assert_eq!(record.ns_per_op, 4521.0);
        assert_eq!(record.mb_per_s, 28.31);
        assert_eq!(record.alloced_bytes_per_op, 1024);
        assert_eq!(record.allocs_per_op, 3);
        assert_eq!(
            record.measured,
            Measured::NS_PER_OP
                | Measured::MB_PER_S
                | Measured::ALLOCED_BYTES_PER_OP
                | Measured::ALLOCS_PER_OP
        );
    }

    #[test]
    fn test_parse_line_rejects() {
        assert!(parse_line("").is_err());
        assert!(parse_line("BenchmarkLonely").is_err());
        assert!(parse_line("TestSomething 100 5 ns/op").is_err());
        assert!(parse_line("BenchmarkBadCount abc 5 ns/op").is_err());
    }

    #[test]
    fn test_parse_line_iterations_only() {
        let record = parse_line("BenchmarkNoop-8 1000").unwrap();
        assert_eq!(record.name, "BenchmarkNoop-8");
        assert_eq!(record.n, 1000);
        assert_eq!(record.measured, Measured::NONE);

        let record = parse_line("BenchmarkNoop-8 1000 12.5").unwrap();
        assert_eq!(record.measured, Measured::NONE);
    }

    #[test]
    fn test_parse_set_keeps_iterations_only_lines() {
        let set = parse_set("BenchmarkNoop-8 1000\nBenchmarkA 1 2 ns/op\n".as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set["BenchmarkNoop-8"][0].n, 1000);
        assert_eq!(set["BenchmarkNoop-8"][0].ord, 0);
        assert_eq!(set["BenchmarkA"][0].ord, 1);
    }

    #[test]
    fn test_parse_set_reads_past_long_lines() {
        let mut input = format!("PASS {}\n", "x".repeat(128 * 1024));
        input.push_str("BenchmarkAfter-8 5 10 ns/op\n");

        let set = parse_set(input.as_bytes()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set["BenchmarkAfter-8"][0].n, 5);
    }

    #[test]
    fn test_parse_line_skips_unknown_and_bad_values() {
        let record =
            parse_line("BenchmarkMixed 10 12.5 ns/op 7 widgets/op x B/op 2 allocs/op").unwrap();
        assert_eq!(record.measured, Measured::NS_PER_OP | Measured::ALLOCS_PER_OP);
        assert_eq!(record.alloced_bytes_per_op, 0);
        assert_eq!(record.allocs_per_op, 2);
    }

    #[test]
    fn test_parse_line_ignores_trailing_odd_field() {
        let record = parse_line("BenchmarkOdd 10 12.5 ns/op 99").unwrap();
        assert_eq!(record.measured, Measured::NS_PER_OP);
    }

    #[test]
    fn test_parse_set_groups_in_order() {
        let set = parse_set(SAMPLE.as_bytes()).unwrap();

        assert_eq!(set.len(), 2);
        let encode = &set["BenchmarkEncode-8"];
        assert_eq!(encode.len(), 2);
        assert_eq!(encode[0].n, 300000);
        assert_eq!(encode[1].n, 310000);
        assert_eq!(encode[0].ord, 0);
        assert_eq!(encode[1].ord, 2);

        let decode = &set["BenchmarkDecode-8"];
        assert_eq!(decode.len(), 1);
        assert_eq!(decode[0].ord, 1);
        assert_eq!(decode[0].measured, Measured::NS_PER_OP);
    }

    #[test]
    fn test_parse_set_crlf_and_missing_newline() {
        let set = parse_set("BenchmarkA 1 2 ns/op\r\nBenchmarkB 3 4 ns/op".as_bytes()).unwrap();
        assert_eq!(set["BenchmarkA"][0].ns_per_op, 2.0);
        assert_eq!(set["BenchmarkB"][0].ns_per_op, 4.0);
    }

    #[test]
    fn test_parse_set_empty_input() {
        let set = parse_set(io::empty()).unwrap();
        assert!(set.is_empty());
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    #[test]
    fn test_parse_set_read_error() {
        let err = parse_set(FailingReader).unwrap_err();
        assert!(matches!(err, BenchfluxError::IoError(_)));
    }
}
