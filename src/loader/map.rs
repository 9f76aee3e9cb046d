//! Linker map files of the GBDK (sdld) and RGBDS toolchains.

use super::{read_text, AreaSource, Format, Input};
use crate::error::Result;
use crate::memory_map::banked_address;
use crate::model::Area;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct MapFile {
    file_path: PathBuf,
}

impl MapFile {
    pub fn new(file_path: &Path) -> Self {
        Self {
            file_path: file_path.to_owned(),
        }
    }
}

impl AreaSource for MapFile {
    fn format(&self) -> Format {
        Format::Map
    }

    fn areas(&self) -> Result<Vec<Area>> {
        let text = read_text(&self.file_path)?;
        let input = Input::new(&self.file_path);

        let areas = if is_rgbds_map(&text) {
            debug!("reading {} as RGBDS map", self.file_path.display());
            parse_rgbds_map(&input, &text)?
        } else {
            debug!("reading {} as GBDK map", self.file_path.display());
            parse_gbdk_map(&input, &text)?
        };

        if areas.is_empty() {
            return Err(input.error(0, "no areas found in map file"));
        }

        debug!("found {} areas", areas.len());
        Ok(areas)
    }
}

fn is_rgbds_map(text: &str) -> bool {
    text.lines()
        .any(|line| parser::rgbds_bank_heading(line).is_ok())
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum GbdkState {
    Searching,
    HeaderSeen,
    RulerSeen,
}

/// Area tables look like
///
/// ```text
/// Area                       Addr        Size        Decimal Bytes (Attributes)
/// --------------------       ----        ----        ------- ----- ------------
/// _CODE                  00000200    00002F54 =       12116. bytes (REL,CON)
/// ```
fn parse_gbdk_map(input: &Input, text: &str) -> Result<Vec<Area>> {
    let mut areas = Vec::new();
    let mut state = GbdkState::Searching;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        state = match state {
            GbdkState::Searching if parser::gbdk_table_header(line) => GbdkState::HeaderSeen,
            GbdkState::HeaderSeen if line.starts_with('-') => GbdkState::RulerSeen,
            GbdkState::HeaderSeen => GbdkState::Searching,
            GbdkState::RulerSeen => {
                let (_, (name, address, length)) = parser::gbdk_area(line)
                    .map_err(|_| input.error(index + 1, "malformed area entry"))?;
                if length > 0 {
                    areas.push(Area::linked(name, address, length));
                }
                GbdkState::Searching
            }
            GbdkState::Searching => GbdkState::Searching,
        };
    }

    Ok(areas)
}

/// Sections are listed below the bank they were placed in:
///
/// ```text
/// ROMX bank #1:
///     SECTION: $4000-$4fff ($1000 bytes) ["Level data"]
/// ```
fn parse_rgbds_map(input: &Input, text: &str) -> Result<Vec<Area>> {
    let mut areas = Vec::new();
    let mut bank = 0;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if let Ok((_, number)) = parser::rgbds_bank_heading(line) {
            bank = number;
        } else if line.starts_with("SECTION:") {
            let (_, (name, start, length)) = parser::rgbds_section(line)
                .map_err(|_| input.error(index + 1, "malformed section entry"))?;
            if length > 0 {
                areas.push(Area::linked(name, banked_address(bank, start), length));
            }
        }
    }

    Ok(areas)
}

mod parser {
    use nom::{
        branch::alt,
        bytes::complete::{tag, tag_no_case, take_till1, take_until},
        character::complete::{char, digit1, hex_digit1, space0, space1},
        combinator::{map_res, opt},
        sequence::{delimited, preceded, tuple},
        IResult,
    };
    use std::str::FromStr;

    fn hex_u32(input: &str) -> IResult<&str, u32> {
        map_res(hex_digit1, |s: &str| u32::from_str_radix(s, 16))(input)
    }

    fn hex_u16(input: &str) -> IResult<&str, u16> {
        map_res(hex_digit1, |s: &str| u16::from_str_radix(s, 16))(input)
    }

    pub fn gbdk_table_header(line: &str) -> bool {
        let header: IResult<&str, _> =
            tuple((tag("Area"), space1, tag("Addr"), space1, tag("Size")))(line);
        header.is_ok()
    }

    pub fn gbdk_area(input: &str) -> IResult<&str, (&str, u32, u32)> {
        let (input, (name, _, address, _, length)) = tuple((
            take_till1(char::is_whitespace),
            space1,
            hex_u32,
            space1,
            hex_u32,
        ))(input)?;
        Ok((input, (name, address, length)))
    }

    /// `ROMX bank #3:`, the bank number is returned.
    pub fn rgbds_bank_heading(input: &str) -> IResult<&str, u16> {
        let (input, (_, _, _, _, bank)) = tuple((
            alt((
                tag("ROM0"),
                tag("ROMX"),
                tag("VRAM"),
                tag("SRAM"),
                tag("WRAM0"),
                tag("WRAMX"),
                tag("OAM"),
                tag("HRAM"),
                tag("ROM"),
                tag("WRAM"),
            )),
            space1,
            tag_no_case("bank"),
            tuple((space1, char('#'))),
            map_res(digit1, u16::from_str),
        ))(input)?;
        Ok((input, bank))
    }

    /// `SECTION: $4000-$4fff ($1000 bytes) ["name"]`, the end address is absent for
    /// empty sections.
    pub fn rgbds_section(input: &str) -> IResult<&str, (&str, u16, u32)> {
        let (input, (_, start, _, _, length, _)) = tuple((
            tuple((tag("SECTION:"), space1, char('$'))),
            hex_u16,
            opt(preceded(tag("-$"), hex_u16)),
            tuple((space1, tag("($"))),
            hex_u32,
            take_until("[\""),
        ))(input)?;
        let (input, name) = delimited(tag("[\""), take_until("\"]"), tag("\"]"))(input)?;
        let (input, _) = space0(input)?;
        Ok((input, (name, start, length)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AreaKind;
    use std::io::Write;

    const GBDK_MAP: &str = "\
Hexadecimal  [32-Bits]

Area                                    Addr        Size        Decimal Bytes (Attributes)
--------------------------------        ----        ----        ------- ----- ------------
_HEADER0                            00000000    00000001 =           1. bytes (ABS,CON)

      Value  Global                              Global Defined In Module
      -----  --------------------------------   ------------------------

Area                                    Addr        Size        Decimal Bytes (Attributes)
--------------------------------        ----        ----        ------- ----- ------------
_CODE                               00000200    00002F54 =       12116. bytes (REL,CON)

Area                                    Addr        Size        Decimal Bytes (Attributes)
--------------------------------        ----        ----        ------- ----- ------------
_CODE_1                             00014000    00000800 =        2048. bytes (REL,CON)

Area                                    Addr        Size        Decimal Bytes (Attributes)
--------------------------------        ----        ----        ------- ----- ------------
_EMPTY                              0000C000    00000000 =           0. bytes (REL,CON)
";

    const RGBDS_MAP: &str = "\
ROM0 bank #0:
\tSECTION: $0000-$0007 ($0008 bytes) [\"RST_00\"]
\tSECTION: $0100-$014f ($0050 bytes) [\"Header\"]
\tEMPTY: $0150-$3fff ($3eb0 bytes)
\tTOTAL EMPTY: $3f98 bytes

ROMX bank #2:
\tSECTION: $4000-$4fff ($1000 bytes) [\"Level data\"]
\tSECTION: $5000 ($0000 bytes) [\"Nothing\"]

WRAM0 bank #0:
\tSECTION: $c000-$c09f ($00a0 bytes) [\"Shadow OAM\"]
";

    fn input() -> Input {
        Input::new(Path::new("game.map"))
    }

    #[test]
    fn test_parse_gbdk_map() {
        // WHEN
        let areas = parse_gbdk_map(&input(), GBDK_MAP).unwrap();

        // THEN
        let summary: Vec<(&str, u32, u32)> = areas
            .iter()
            .map(|area| (area.name(), area.address(), area.length()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("_HEADER0", 0x0, 0x1),
                ("_CODE", 0x200, 0x2f54),
                ("_CODE_1", 0x1_4000, 0x800),
            ]
        );
        assert_eq!(areas[0].kind(), AreaKind::Header);
        assert_eq!(areas[1].kind(), AreaKind::Linked);
    }

    #[test]
    fn test_malformed_gbdk_area_is_an_error() {
        // GIVEN
        let map = "\
Area                                    Addr        Size        Decimal Bytes (Attributes)
--------------------------------        ----        ----        ------- ----- ------------
_CODE                               XYZ    00002F54 =       12116. bytes (REL,CON)
";

        // WHEN
        let result = parse_gbdk_map(&input(), map);

        // THEN
        let message = result.unwrap_err().to_string();
        assert!(message.contains("game.map:3"), "{}", message);
    }

    #[test]
    fn test_parse_rgbds_map() {
        // GIVEN
        assert!(is_rgbds_map(RGBDS_MAP));
        assert!(!is_rgbds_map(GBDK_MAP));

        // WHEN
        let areas = parse_rgbds_map(&input(), RGBDS_MAP).unwrap();

        // THEN
        let summary: Vec<(&str, u32, u32)> = areas
            .iter()
            .map(|area| (area.name(), area.address(), area.length()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("RST_00", 0x0000, 0x8),
                ("Header", 0x0100, 0x50),
                ("Level data", 0x2_4000, 0x1000),
                ("Shadow OAM", 0xc000, 0xa0),
            ]
        );
    }

    #[test]
    fn test_rgbds_rom_banks_above_255() {
        // GIVEN
        let map = "ROMX bank #300:\n\tSECTION: $4000-$40ff ($0100 bytes) [\"Far\"]\n";

        // WHEN
        let areas = parse_rgbds_map(&input(), map).unwrap();

        // THEN
        assert_eq!(areas[0].address(), 0x12c_4000);
    }

    #[test]
    fn test_map_file_without_areas_is_an_error() {
        // GIVEN
        let mut file = tempfile::Builder::new().suffix(".map").tempfile().unwrap();
        writeln!(file, "nothing to see here").unwrap();

        // WHEN
        let result = MapFile::new(file.path()).areas();

        // THEN
        assert!(result.is_err());
    }

    #[test]
    fn test_read_map_file() {
        // GIVEN
        let mut file = tempfile::Builder::new().suffix(".map").tempfile().unwrap();
        write!(file, "{}", GBDK_MAP).unwrap();

        // WHEN
        let areas = MapFile::new(file.path()).areas().unwrap();

        // THEN
        assert_eq!(areas.len(), 3);
    }
}
