//! GBDK `.noi` symbol files.
//!
//! The linker emits a start (`s__NAME`) and a length (`l__NAME`) symbol for every area:
//!
//! ```text
//! DEF s__CODE 0x200
//! DEF l__CODE 0x2F54
//! ```

use super::{read_text, AreaSource, Format, Input};
use crate::error::Result;
use crate::model::Area;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct NoiFile {
    file_path: PathBuf,
}

impl NoiFile {
    pub fn new(file_path: &Path) -> Self {
        Self {
            file_path: file_path.to_owned(),
        }
    }
}

impl AreaSource for NoiFile {
    fn format(&self) -> Format {
        Format::Noi
    }

    fn areas(&self) -> Result<Vec<Area>> {
        let text = read_text(&self.file_path)?;
        let input = Input::new(&self.file_path);

        let areas = parse_noi(&text);
        if areas.is_empty() {
            return Err(input.error(0, "no area symbols found in noi file"));
        }

        debug!("found {} areas in {}", areas.len(), self.file_path.display());
        Ok(areas)
    }
}

#[derive(Debug, Default)]
struct AreaSymbols {
    start: Option<u32>,
    length: Option<u32>,
}

/// Pairs up start and length symbols, areas keep the order their first symbol appeared in.
fn parse_noi(text: &str) -> Vec<Area> {
    let mut order: Vec<String> = Vec::new();
    let mut symbols: HashMap<String, AreaSymbols> = HashMap::new();

    for line in text.lines() {
        let (symbol, value) = match parser::definition(line.trim()) {
            Ok((_, definition)) => definition,
            Err(_) => continue,
        };

        let (name, is_start) = if let Some(name) = strip_area_prefix(symbol, "s_") {
            (name, true)
        } else if let Some(name) = strip_area_prefix(symbol, "l_") {
            (name, false)
        } else {
            continue;
        };

        let entry = symbols.entry(name.to_owned()).or_insert_with(|| {
            order.push(name.to_owned());
            AreaSymbols::default()
        });
        if is_start {
            entry.start = Some(value);
        } else {
            entry.length = Some(value);
        }
    }

    order
        .iter()
        .filter_map(|name| {
            let entry = symbols.get(name)?;
            match (entry.start, entry.length) {
                (Some(start), Some(length)) if length > 0 => {
                    Some(Area::linked(name, start, length))
                }
                _ => None,
            }
        })
        .collect()
}

/// Area names start with an underscore, `s__CODE` belongs to area `_CODE`.
fn strip_area_prefix<'a>(symbol: &'a str, prefix: &str) -> Option<&'a str> {
    if symbol.starts_with(prefix) && symbol[prefix.len()..].starts_with('_') {
        Some(&symbol[prefix.len()..])
    } else {
        None
    }
}

mod parser {
    use nom::{
        bytes::complete::{tag, tag_no_case, take_till1},
        character::complete::{hex_digit1, space1},
        combinator::{map_res, opt},
        sequence::{preceded, tuple},
        IResult,
    };

    /// `DEF <symbol> 0x<value>`
    pub fn definition(input: &str) -> IResult<&str, (&str, u32)> {
        let (input, (_, _, symbol, _, value)) = tuple((
            tag("DEF"),
            space1,
            take_till1(char::is_whitespace),
            space1,
            preceded(
                opt(tag_no_case("0x")),
                map_res(hex_digit1, |s: &str| u32::from_str_radix(s, 16)),
            ),
        ))(input)?;
        Ok((input, (symbol, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_noi_pairs_start_and_length() {
        // GIVEN
        let text = "\
DEF s__CODE 0x200
DEF _main 0x250
DEF l__DATA 0xA0
DEF l__CODE 0x2F54
DEF s__DATA 0xC0A0
DEF s__BSS 0xC200
DEF l__BSS 0x0
DEF l__ORPHAN 0x10
";

        // WHEN
        let areas = parse_noi(text);

        // THEN
        let summary: Vec<(&str, u32, u32)> = areas
            .iter()
            .map(|area| (area.name(), area.address(), area.length()))
            .collect();
        assert_eq!(
            summary,
            vec![("_CODE", 0x200, 0x2f54), ("_DATA", 0xc0a0, 0xa0)]
        );
    }

    #[test]
    fn test_plain_symbols_are_not_areas() {
        let text = "DEF _s_sprite 0xC100\nDEF s_x 0x10\nDEF l_x 0x10\n";
        assert!(parse_noi(text).is_empty());
    }

    #[test]
    fn test_noi_file_without_areas_is_an_error() {
        // GIVEN
        let mut file = tempfile::Builder::new().suffix(".noi").tempfile().unwrap();
        writeln!(file, "DEF _main 0x250").unwrap();

        // THEN
        assert!(NoiFile::new(file.path()).areas().is_err());
    }
}
