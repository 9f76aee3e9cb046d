//! Intel HEX images as produced by the GBDK linker.
//!
//! Only the occupied address ranges are of interest, contiguous data records are merged into
//! a single area. Data written twice to the same address shows up as overlapping areas, which
//! is why every area read from an image is exclusive.

use super::{read_text, AreaSource, Format, Input};
use crate::error::Result;
use crate::model::Area;
use crate::util::CompactIterator;
use std::path::{Path, PathBuf};
use tracing::debug;

const DATA: u8 = 0x00;
const END_OF_FILE: u8 = 0x01;
const EXTENDED_SEGMENT_ADDRESS: u8 = 0x02;
const EXTENDED_LINEAR_ADDRESS: u8 = 0x04;

pub struct IhxFile {
    file_path: PathBuf,
}

impl IhxFile {
    pub fn new(file_path: &Path) -> Self {
        Self {
            file_path: file_path.to_owned(),
        }
    }
}

impl AreaSource for IhxFile {
    fn format(&self) -> Format {
        Format::Ihx
    }

    fn areas(&self) -> Result<Vec<Area>> {
        let text = read_text(&self.file_path)?;
        let input = Input::new(&self.file_path);

        let ranges = parse_ihx(&input, &text)?;
        debug!(
            "read {} data ranges from {}",
            ranges.len(),
            self.file_path.display()
        );

        Ok(merge_ranges(ranges)
            .into_iter()
            .map(|(address, length)| {
                Area::linked(&format!("IHX_{:X}", address), address, length).with_exclusive(true)
            })
            .collect())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct Record {
    kind: u8,
    offset: u16,
    data: Vec<u8>,
}

/// Decodes `:LLAAAATT<data>CC` and verifies its checksum.
fn decode_record(line: &str) -> std::result::Result<Record, &'static str> {
    let digits = line
        .strip_prefix(':')
        .ok_or("record does not start with ':'")?;
    if digits.len() % 2 != 0 {
        return Err("odd number of hex digits");
    }

    let bytes = (0..digits.len())
        .step_by(2)
        .map(|i| {
            digits
                .get(i..i + 2)
                .and_then(|byte| u8::from_str_radix(byte, 16).ok())
        })
        .collect::<Option<Vec<u8>>>()
        .ok_or("invalid hex digit")?;

    if bytes.len() < 5 {
        return Err("record too short");
    }
    let length = usize::from(bytes[0]);
    if bytes.len() != length + 5 {
        return Err("record length does not match its byte count");
    }
    let checksum = bytes.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte));
    if checksum != 0 {
        return Err("checksum mismatch");
    }

    Ok(Record {
        kind: bytes[3],
        offset: u16::from_be_bytes([bytes[1], bytes[2]]),
        data: bytes[4..4 + length].to_vec(),
    })
}

/// Returns the `(address, length)` of every data record in file order.
fn parse_ihx(input: &Input, text: &str) -> Result<Vec<(u32, u32)>> {
    let mut ranges = Vec::new();
    let mut base: u32 = 0;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = decode_record(line).map_err(|message| input.error(index + 1, message))?;
        match record.kind {
            DATA => {
                if !record.data.is_empty() {
                    let length = record.data.len() as u32;
                    let address = base + u32::from(record.offset);
                    if address.checked_add(length - 1).is_none() {
                        return Err(
                            input.error(index + 1, "data record exceeds the address space")
                        );
                    }
                    ranges.push((address, length));
                }
            }
            END_OF_FILE => break,
            EXTENDED_SEGMENT_ADDRESS | EXTENDED_LINEAR_ADDRESS => {
                if record.data.len() != 2 {
                    return Err(input.error(index + 1, "malformed extended address record"));
                }
                let value = u32::from(u16::from_be_bytes([record.data[0], record.data[1]]));
                base = if record.kind == EXTENDED_LINEAR_ADDRESS {
                    value << 16
                } else {
                    value << 4
                };
            }
            // start address records carry no data
            _ => {}
        }
    }

    Ok(ranges)
}

/// Merges ranges where one ends exactly where the next begins.
fn merge_ranges(ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    ranges
        .into_iter()
        .compact(|last, next| last.0.checked_add(last.1) == Some(next.0))
        .map(|(first, last)| (first.0, last.0 + last.1 - first.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn input() -> Input {
        Input::new(Path::new("game.ihx"))
    }

    #[test]
    fn test_decode_record() {
        // WHEN
        let record = decode_record(":0300300002337A1E").unwrap();

        // THEN
        assert_eq!(record.kind, DATA);
        assert_eq!(record.offset, 0x0030);
        assert_eq!(record.data, vec![0x02, 0x33, 0x7a]);
    }

    #[test]
    fn test_decode_record_rejects_bad_checksum() {
        assert_eq!(decode_record(":0300300002337A1F"), Err("checksum mismatch"));
        assert!(decode_record("0300300002337A1E").is_err());
        assert!(decode_record(":03003000").is_err());
    }

    #[test]
    fn test_parse_ihx_applies_extended_addresses() {
        // GIVEN
        let text = "\
:020000040001F9
:024000000102BB
:00000001FF
:0200000400FFFB
";

        // WHEN
        let ranges = parse_ihx(&input(), text).unwrap();

        // THEN
        // records after end of file are ignored
        assert_eq!(ranges, vec![(0x1_4000, 2)]);
    }

    #[test]
    fn test_malformed_record_reports_its_line() {
        // GIVEN
        let text = ":0300300002337A1E\n:XX\n";

        // WHEN
        let message = parse_ihx(&input(), text).unwrap_err().to_string();

        // THEN
        assert!(message.starts_with("game.ihx:2:"), "{}", message);
    }

    #[test]
    fn test_merge_ranges() {
        let ranges = vec![(0x0, 0x10), (0x10, 0x10), (0x40, 0x4), (0x44, 0x1), (0x20, 0x2)];
        assert_eq!(
            merge_ranges(ranges),
            vec![(0x0, 0x20), (0x40, 0x5), (0x20, 0x2)]
        );
    }

    #[test]
    fn test_record_past_the_end_of_the_address_space_is_an_error() {
        // GIVEN
        let text = "\
:02000004FFFFFC
:10FFF80000000000000000000000000000000000F9
:00000001FF
";

        // WHEN
        let message = parse_ihx(&input(), text).unwrap_err().to_string();

        // THEN
        assert!(message.starts_with("game.ihx:2:"), "{}", message);
    }

    #[test]
    fn test_ranges_at_the_end_of_the_address_space() {
        // GIVEN
        let text = "\
:02000004FFFFFC
:08FFF800000000000000000001
:0100000000FF
:00000001FF
";

        // WHEN
        let ranges = parse_ihx(&input(), text).unwrap();

        // THEN
        assert_eq!(ranges, vec![(0xffff_fff8, 8), (0xffff_0000, 1)]);
        assert_eq!(merge_ranges(ranges.clone()), ranges);
    }

    #[test]
    fn test_ihx_areas_are_exclusive() {
        // GIVEN
        let mut file = tempfile::Builder::new().suffix(".ihx").tempfile().unwrap();
        writeln!(file, ":0300300002337A1E").unwrap();
        writeln!(file, ":00000001FF").unwrap();

        // WHEN
        let areas = IhxFile::new(file.path()).areas().unwrap();

        // THEN
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].address(), 0x30);
        assert_eq!(areas[0].length(), 3);
        assert!(areas[0].is_exclusive());
    }
}
