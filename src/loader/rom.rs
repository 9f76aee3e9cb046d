//! ROM images.
//!
//! A ROM carries no linker information, usage is estimated per 16K bank: trailing bytes equal
//! to the fill value (`0xFF` or `0x00`) are considered free.

use super::{read_bytes, AreaSource, Format, Input};
use crate::error::Result;
use crate::memory_map::banked_address;
use crate::model::Area;
use std::convert::TryFrom;
use std::path::{Path, PathBuf};
use tracing::debug;

const ROM_BANK_SIZE: usize = 0x4000;
const HEADER_END: usize = 0x150;
const TITLE: std::ops::Range<usize> = 0x134..0x144;

pub struct RomFile {
    file_path: PathBuf,
}

impl RomFile {
    pub fn new(file_path: &Path) -> Self {
        Self {
            file_path: file_path.to_owned(),
        }
    }
}

impl AreaSource for RomFile {
    fn format(&self) -> Format {
        Format::Rom
    }

    fn areas(&self) -> Result<Vec<Area>> {
        let bytes = read_bytes(&self.file_path)?;
        let input = Input::new(&self.file_path);

        if bytes.len() < HEADER_END {
            return Err(input.error(0, "file is too small to be a ROM image"));
        }
        debug!(
            "ROM title {:?}, {} bytes",
            title(&bytes),
            bytes.len()
        );

        rom_areas(&input, &bytes)
    }
}

fn title(bytes: &[u8]) -> String {
    bytes[TITLE]
        .iter()
        .take_while(|&&byte| byte != 0)
        .map(|&byte| if byte.is_ascii_graphic() || byte == b' ' { byte as char } else { '.' })
        .collect()
}

/// Number of trailing bytes equal to the fill value of `bank`.
fn trailing_fill(bank: &[u8]) -> usize {
    match bank.last() {
        Some(&fill) if fill == 0xff || fill == 0x00 => {
            bank.iter().rev().take_while(|&&byte| byte == fill).count()
        }
        _ => 0,
    }
}

fn rom_areas(input: &Input, bytes: &[u8]) -> Result<Vec<Area>> {
    let mut areas = Vec::new();

    for (index, bank) in bytes.chunks(ROM_BANK_SIZE).enumerate() {
        let used = bank.len() - trailing_fill(bank);
        if used == 0 {
            continue;
        }

        let number =
            u16::try_from(index).map_err(|_| input.error(0, "too many banks in ROM image"))?;
        let address = if number == 0 {
            0
        } else {
            banked_address(number, 0x4000)
        };
        areas.push(Area::linked(&format!("BANK_{}", number), address, used as u32));
    }

    Ok(areas)
}
