use crate::error::{ErrorKind, Result};
use crate::model::ManualArea;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum AreaSort {
    #[serde(rename = "input")]
    Input,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "size")]
    Size,
    #[serde(rename = "hide")]
    Hide,
}

impl Default for AreaSort {
    fn default() -> Self {
        Self::Input
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum BankOrder {
    #[serde(rename = "first-seen")]
    FirstSeen,
    #[serde(rename = "address")]
    Address,
}

impl Default for BankOrder {
    fn default() -> Self {
        Self::FirstSeen
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum ColorMode {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "whole-row")]
    WholeRow,
    #[serde(rename = "row-ends")]
    RowEnds,
    #[serde(rename = "dimmed")]
    Dimmed, // whole row, center columns dimmed
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::Off
    }
}

/// VT100 foreground color codes, one per memory category.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub default: u8,
    pub rom: u8,
    pub vram: u8,
    pub sram: u8,
    pub wram: u8,
    pub hram: u8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            default: 37,
            rom: 32,
            vram: 35,
            sram: 33,
            wram: 36,
            hram: 34,
        }
    }
}

/// Color codes which can be expressed as foreground color.
pub fn is_supported_color_code(code: u8) -> bool {
    matches!(code, 0 | 39 | 30..=37 | 90..=97)
}

impl FromStr for Palette {
    type Err = crate::error::Error;

    /// Parses `DEFAULT:ROM:VRAM:SRAM:WRAM:HRAM`.
    fn from_str(value: &str) -> Result<Self> {
        let malformed = || ErrorKind::Palette(value.to_owned());

        let codes = value
            .split(':')
            .map(|token| {
                token
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .filter(|&code| is_supported_color_code(code))
                    .ok_or_else(malformed)
            })
            .collect::<std::result::Result<Vec<u8>, ErrorKind>>()?;

        if codes.len() != 6 {
            return Err(malformed().into());
        }

        Ok(Self {
            default: codes[0],
            rom: codes[1],
            vram: codes[2],
            sram: codes[3],
            wram: codes[4],
            hram: codes[5],
        })
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Colors {
    #[serde(default)]
    pub mode: ColorMode,
    /// Color by usage percentage instead of memory category.
    #[serde(default = "disabled")]
    pub percentage_based: bool,
    #[serde(default)]
    pub palette: Palette,
}

impl Colors {
    pub fn enabled(&self) -> bool {
        self.mode != ColorMode::Off
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Display {
    #[serde(default = "disabled")]
    pub show_areas: bool,
    #[serde(default)]
    pub area_sort: AreaSort,
    /// Areas smaller than this are not listed.
    #[serde(default)]
    pub hide_below_size: u32,
    #[serde(default = "disabled")]
    pub show_headers: bool,
    #[serde(default = "disabled")]
    pub compact: bool,
    #[serde(default = "disabled")]
    pub mini_graph: bool,
    #[serde(default = "disabled")]
    pub large_graph: bool,
    #[serde(default = "disabled")]
    pub ascii: bool,
    #[serde(default)]
    pub bank_order: BankOrder,
    #[serde(default = "disabled")]
    pub hide_banners: bool,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Options {
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub colors: Colors,
    /// Manual areas as `NAME:HEXADDR:HEXLENGTH`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manual: Vec<String>,
    /// Manual areas which must not overlap.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusive: Vec<String>,
    #[serde(default = "disabled")]
    pub all_exclusive: bool,
    #[serde(default = "disabled")]
    pub error_on_warning: bool,
    #[serde(default = "disabled")]
    pub quiet: bool,
    #[serde(default = "disabled")]
    pub debug: bool,
}

impl Options {
    pub fn from_file(path: &Path) -> Result<Options> {
        let file = File::open(path)
            .map_err(|_| format!("Config file '{}' could not be loaded", path.display()))?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Parses all manually specified areas, `-m` entries first.
    pub fn manual_areas(&self) -> Result<Vec<ManualArea>> {
        let manual = self.manual.iter().map(|arg| ManualArea::parse(arg, false));
        let exclusive = self.exclusive.iter().map(|arg| ManualArea::parse(arg, true));
        manual.chain(exclusive).collect()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yaml = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", yaml)
    }
}

fn disabled() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_palette() {
        // WHEN
        let palette: Palette = "90:32:90:35:33:36".parse().unwrap();

        // THEN
        assert_eq!(palette.default, 90);
        assert_eq!(palette.rom, 32);
        assert_eq!(palette.vram, 90);
        assert_eq!(palette.sram, 35);
        assert_eq!(palette.wram, 33);
        assert_eq!(palette.hram, 36);
    }

    #[test]
    fn test_parse_palette_rejects_malformed_values() {
        for value in &["", "90:32", "90:32:90:35:33:36:37", "90:32:x:35:33:36", "90:32:90:35:33:300", "90:32:90:35:33:12"] {
            assert!(value.parse::<Palette>().is_err(), "{}", value);
        }
    }

    #[test]
    fn test_options_from_yaml() {
        // GIVEN
        let yaml = "
display:
  show_areas: true
  area_sort: size
  hide_below_size: 16
colors:
  mode: row-ends
exclusive:
  - STACK:DFF0:10
error_on_warning: true
";

        // WHEN
        let options: Options = serde_yaml::from_str(yaml).unwrap();

        // THEN
        assert!(options.display.show_areas);
        assert_eq!(options.display.area_sort, AreaSort::Size);
        assert_eq!(options.display.hide_below_size, 16);
        assert_eq!(options.display.bank_order, BankOrder::FirstSeen);
        assert_eq!(options.colors.mode, ColorMode::RowEnds);
        assert_eq!(options.colors.palette, Palette::default());
        assert!(options.error_on_warning);
        assert!(!options.quiet);

        let manual = options.manual_areas().unwrap();
        assert_eq!(manual.len(), 1);
        assert!(manual[0].is_exclusive());
    }

    #[test]
    fn test_malformed_manual_area_in_options_is_an_error() {
        // GIVEN
        let options = Options {
            manual: vec!["STACK:DFF0".to_owned()],
            ..Options::default()
        };

        // THEN
        assert!(options.manual_areas().is_err());
    }
}
