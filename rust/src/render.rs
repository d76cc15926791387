//! Output formats and human-readable rendering used by the CLI.

use chrono::SecondsFormat;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::xid::Xid;

/// How generated XIDs are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 20-character text form.
    #[default]
    Text,
    /// Raw 12 bytes, no separators.
    Binary,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" | "hex" => Some(Self::Text),
            "binary" => Some(Self::Binary),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid output format: {s} (expected text or binary)"))
    }
}

/// Decoded fields of an XID, ready for display or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XidFields {
    pub id: String,
    pub timestamp: String,
    pub machine: String,
    pub pid: u16,
    pub counter: u32,
}

impl From<&Xid> for XidFields {
    fn from(id: &Xid) -> Self {
        Self {
            id: id.to_string(),
            timestamp: id.time().to_rfc3339_opts(SecondsFormat::Secs, true),
            machine: hex::encode(id.machine()),
            pid: id.pid(),
            counter: id.counter(),
        }
    }
}

/// Write the four decoded fields, one per line.
pub fn write_fields<W: Write + ?Sized>(out: &mut W, id: &Xid) -> io::Result<()> {
    let f = XidFields::from(id);
    writeln!(out, "Timestamp:   {}", f.timestamp)?;
    writeln!(out, "Machine ID:  {}", f.machine)?;
    writeln!(out, "Process ID:  {}", f.pid)?;
    writeln!(out, "Counter:     {}", f.counter)
}

/// Write the id line followed by its decoded fields.
pub fn write_verbose<W: Write + ?Sized>(out: &mut W, id: &Xid) -> io::Result<()> {
    writeln!(out, "XID:         {id}")?;
    write_fields(out, id)
}

/// Write a batch of generated XIDs, one at a time as `ids` yields them.
///
/// Text output puts `separator` between ids and ends with a newline; binary
/// output is the raw bytes back to back. `verbose` switches text output to the
/// multi-line form with a blank line between records.
pub fn write_generated<W, I>(
    out: &mut W,
    ids: I,
    format: OutputFormat,
    separator: &str,
    verbose: bool,
) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = Xid>,
{
    match format {
        OutputFormat::Binary => {
            for id in ids {
                out.write_all(id.as_bytes())?;
            }
        }
        OutputFormat::Text if verbose => {
            for (i, id) in ids.into_iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write_verbose(out, &id)?;
            }
        }
        OutputFormat::Text => {
            let mut any = false;
            for id in ids {
                if any {
                    out.write_all(separator.as_bytes())?;
                }
                write!(out, "{id}")?;
                any = true;
            }
            if any {
                writeln!(out)?;
            }
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample() -> Xid {
        Xid::from_parts(1_600_000_000, [1, 2, 3], 0x0A0B, 1)
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("hex"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("binary"), Some(OutputFormat::Binary));
        assert_eq!(OutputFormat::parse("base64"), None);
        assert!("json".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Binary.to_string(), "binary");
    }

    #[test]
    fn test_fields() {
        let f = XidFields::from(&sample());
        assert_eq!(f.id, "btf10001081gk2o0000g");
        assert_eq!(f.timestamp, "2020-09-13T12:26:40Z");
        assert_eq!(f.machine, "010203");
        assert_eq!(f.pid, 2571);
        assert_eq!(f.counter, 1);

        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["machine"], "010203");
        assert_eq!(json["pid"], 2571);
    }

    #[test]
    fn test_write_fields() {
        let s = render(|w| write_fields(w, &sample()));
        assert_eq!(
            s,
            "Timestamp:   2020-09-13T12:26:40Z\n\
             Machine ID:  010203\n\
             Process ID:  2571\n\
             Counter:     1\n"
        );
    }

    #[test]
    fn test_write_generated_text_with_separator() {
        let a = sample();
        let b = Xid::from_parts(1_600_000_000, [1, 2, 3], 0x0A0B, 2);
        let s = render(|w| write_generated(w, [a, b], OutputFormat::Text, ",", false));
        assert_eq!(s, format!("{a},{b}\n"));

        let s = render(|w| write_generated(w, [a, b], OutputFormat::Text, "\n", false));
        assert_eq!(s, format!("{a}\n{b}\n"));

        let s = render(|w| write_generated(w, std::iter::empty(), OutputFormat::Text, "\n", false));
        assert!(s.is_empty());
    }

    #[test]
    fn test_write_generated_verbose() {
        let a = sample();
        let s = render(|w| write_generated(w, [a, a], OutputFormat::Text, "\n", true));
        let records: Vec<&str> = s.split("\n\n").collect();
        assert_eq!(records.len(), 2);
        assert!(records[0].starts_with("XID:         btf10001081gk2o0000g\n"));
        assert!(records[1].ends_with("Counter:     1\n"));
    }

    #[test]
    fn test_write_generated_binary() {
        let a = sample();
        let b = Xid::NIL;
        let mut buf = Vec::new();
        write_generated(&mut buf, [a, b], OutputFormat::Binary, ",", true).unwrap();
        assert_eq!(buf.len(), 24);
        assert_eq!(&buf[..12], a.as_bytes());
        assert_eq!(&buf[12..], b.as_bytes());
    }

    struct SharedSink(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_generated_writes_each_id_as_produced() {
        let buf = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&buf);
        let mut len_before = Vec::new();
        let ids = (1..=3).map(|c| {
            len_before.push(seen.borrow().len());
            Xid::from_parts(1_600_000_000, [1, 2, 3], 0x0A0B, c)
        });

        let mut sink = SharedSink(Rc::clone(&buf));
        write_generated(&mut sink, ids, OutputFormat::Text, ",", false).unwrap();

        assert_eq!(len_before, vec![0, 20, 41]);
        assert_eq!(buf.borrow().len(), 3 * 20 + 2 + 1);
    }
}
