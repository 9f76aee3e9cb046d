//! SDCC `.cdb` debug information.
//!
//! Only symbols which the linker placed (`L:` records) are reported. Variables take their size
//! from the type in their `S:` record, functions span from their start address to the end
//! address recorded in the matching `L:X` record.

use super::{read_text, AreaSource, Format, Input};
use crate::error::Result;
use crate::model::Area;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CdbFile {
    file_path: PathBuf,
}

impl CdbFile {
    pub fn new(file_path: &Path) -> Self {
        Self {
            file_path: file_path.to_owned(),
        }
    }
}

impl AreaSource for CdbFile {
    fn format(&self) -> Format {
        Format::Cdb
    }

    fn areas(&self) -> Result<Vec<Area>> {
        let text = read_text(&self.file_path)?;
        let input = Input::new(&self.file_path);

        let areas = parse_cdb(&text);
        if areas.is_empty() {
            return Err(input.error(0, "no placed symbols found in cdb file"));
        }

        debug!("found {} symbols in {}", areas.len(), self.file_path.display());
        Ok(areas)
    }
}

#[derive(Debug, Default)]
struct Symbols<'a> {
    sizes: HashMap<&'a str, u32>,
    functions: HashSet<&'a str>,
    starts: Vec<(&'a str, u32)>,
    ends: HashMap<&'a str, u32>,
}

impl<'a> Symbols<'a> {
    fn read_line(&mut self, line: &'a str) {
        if let Ok((_, (record, key, size))) = parser::symbol_record(line) {
            if record == parser::FUNCTION {
                self.functions.insert(key);
            } else {
                self.sizes.insert(key, size);
            }
        } else if let Some((key, address)) = parser::linker_record(line) {
            // assembler and C source line records
            if key.starts_with('A') || key.starts_with('C') {
                return;
            }
            if let Some(function) = key.strip_prefix('X') {
                self.ends.insert(function, address);
            } else if self.starts.iter().all(|(known, _)| *known != key) {
                self.starts.push((key, address));
            }
        }
    }

    fn length_of(&self, key: &str, start: u32) -> Option<u32> {
        if self.functions.contains(key) {
            let end = *self.ends.get(key)?;
            if end >= start {
                Some(end - start + 1)
            } else {
                None
            }
        } else {
            self.sizes.get(key).copied()
        }
    }

    fn into_areas(self) -> Vec<Area> {
        self.starts
            .iter()
            .filter_map(|&(key, start)| {
                let length = self.length_of(key, start).filter(|&length| length > 0)?;
                Some(Area::linked(symbol_name(key), start, length))
            })
            .collect()
    }
}

/// `G$main$0_0$0` names symbol `main`.
fn symbol_name(key: &str) -> &str {
    key.split('$').nth(1).filter(|name| !name.is_empty()).unwrap_or(key)
}

fn parse_cdb(text: &str) -> Vec<Area> {
    let mut symbols = Symbols::default();
    for line in text.lines() {
        symbols.read_line(line.trim());
    }
    symbols.into_areas()
}

mod parser {
    use nom::{
        branch::alt,
        bytes::complete::{tag, take_until},
        character::complete::{char, digit1},
        combinator::map_res,
        sequence::{delimited, tuple},
        IResult,
    };
    use std::str::FromStr;

    pub const FUNCTION: &str = "F:";

    /// `S:G$counter$0_0$0({1}SC:U),E,0,0` or `F:G$main$0_0$0({2}DF,SV:S),C,0,0,0,0,0`,
    /// returns the record type, the symbol key and its size.
    pub fn symbol_record(input: &str) -> IResult<&str, (&str, &str, u32)> {
        let (input, (record, key, size)) = tuple((
            alt((tag("S:"), tag(FUNCTION))),
            take_until("("),
            delimited(tag("({"), map_res(digit1, u32::from_str), char('}')),
        ))(input)?;
        Ok((input, (record, key, size)))
    }

    /// `L:G$counter$0_0$0:C0A0`
    pub fn linker_record(line: &str) -> Option<(&str, u32)> {
        let record = line.strip_prefix("L:")?;
        let separator = record.rfind(':')?;
        let address = u32::from_str_radix(&record[separator + 1..], 16).ok()?;
        Some((&record[..separator], address))
    }
}
