//! The fixed memory windows of the Game Boy family.
//!
//! Addresses handled by this crate are "banked" addresses: the lower 16 bits are the
//! address as seen by the CPU, the upper 16 bits hold the bank number (`0x14000` is ROM bank 1 at
//! `0x4000`, `0x1FF4000` is ROM bank 511). Inputs which do not know about banks simply leave
//! the upper bits cleared.

use crate::error::{ErrorKind, Result};
use std::fmt;

pub const BANK_SHIFT: u32 = 16;
/// Last byte of the highest ROM bank.
pub const MAX_ADDRESS: u32 = 0x01ff_ffff;

/// Palette group of a memory region.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Category {
    Default,
    Rom,
    Vram,
    Sram,
    Wram,
    Hram,
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Region {
    Rom0,
    RomX,
    Vram,
    Sram,
    Wram0,
    WramX,
    Echo,
    Oam,
    Unusable,
    Io,
    Hram,
    InterruptEnable,
}

impl Region {
    pub fn window(self) -> Option<&'static Window> {
        WINDOWS.iter().find(|w| w.region == self)
    }

    pub fn category(self) -> Category {
        match self {
            Self::Rom0 | Self::RomX => Category::Rom,
            Self::Vram => Category::Vram,
            Self::Sram => Category::Sram,
            Self::Wram0 | Self::WramX => Category::Wram,
            Self::Hram => Category::Hram,
            _ => Category::Default,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Rom0 => "ROM",
            Self::RomX => "ROM",
            Self::Vram => "VRAM",
            Self::Sram => "SRAM",
            Self::Wram0 => "WRAM_LO",
            Self::WramX => "WRAM_HI",
            Self::Echo => "ECHO",
            Self::Oam => "OAM",
            Self::Unusable => "UNUSABLE",
            Self::Io => "IO",
            Self::Hram => "HRAM",
            Self::InterruptEnable => "IE",
        }
    }
}

/// A contiguous range of the 16-bit CPU address space.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Window {
    pub region: Region,
    pub start: u16,
    pub end: u16,
    pub banked: bool,
    pub default_bank: u16,
    pub max_bank: u16,
}

impl Window {
    const fn new(region: Region, start: u16, end: u16) -> Self {
        Self {
            region,
            start,
            end,
            banked: false,
            default_bank: 0,
            max_bank: 0,
        }
    }

    const fn banked(region: Region, start: u16, end: u16, default_bank: u16, max_bank: u16) -> Self {
        Self {
            region,
            start,
            end,
            banked: true,
            default_bank,
            max_bank,
        }
    }

    pub fn size(&self) -> u32 {
        u32::from(self.end) - u32::from(self.start) + 1
    }

    pub fn contains(&self, local_address: u16) -> bool {
        self.start <= local_address && local_address <= self.end
    }
}

#[rustfmt::skip]
pub const WINDOWS: &[Window] = &[
    Window::new(Region::Rom0,                0x0000, 0x3fff),
    Window::banked(Region::RomX,             0x4000, 0x7fff, 1, 511),
    Window::banked(Region::Vram,             0x8000, 0x9fff, 0, 1),
    Window::banked(Region::Sram,             0xa000, 0xbfff, 0, 15),
    Window::new(Region::Wram0,               0xc000, 0xcfff),
    Window::banked(Region::WramX,            0xd000, 0xdfff, 1, 7),
    Window::new(Region::Echo,                0xe000, 0xfdff),
    Window::new(Region::Oam,                 0xfe00, 0xfe9f),
    Window::new(Region::Unusable,            0xfea0, 0xfeff),
    Window::new(Region::Io,                  0xff00, 0xff7f),
    Window::new(Region::Hram,                0xff80, 0xfffe),
    Window::new(Region::InterruptEnable,     0xffff, 0xffff),
];

/// Identifies a single bank, e.g. ROM bank 3 or the fixed WRAM window.
///
/// Unmapped banks carry a bank number the window does not support (bank bits on a fixed
/// window, or above the highest bank). They keep the region of their window.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct BankId {
    region: Region,
    number: u16,
    unmapped: bool,
}

impl BankId {
    pub fn new(region: Region, number: u16) -> Self {
        Self {
            region,
            number,
            unmapped: false,
        }
    }

    pub fn unmapped(region: Region, number: u16) -> Self {
        Self {
            region,
            number,
            unmapped: true,
        }
    }

    pub fn is_unmapped(&self) -> bool {
        self.unmapped
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    /// The window of a mapped bank, `None` for unmapped banks.
    pub fn window(&self) -> Option<&'static Window> {
        if self.unmapped {
            None
        } else {
            self.region.window()
        }
    }

    /// Bytes available in this bank, `None` if unknown.
    pub fn capacity(&self) -> Option<u32> {
        self.window().map(Window::size)
    }

    pub fn category(&self) -> Category {
        if self.unmapped {
            Category::Default
        } else {
            self.region.category()
        }
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unmapped {
            return write!(f, "UNMAPPED_{}_{}", self.region.label(), self.number);
        }
        match self.window() {
            Some(window) if window.banked || self.region == Region::Rom0 => {
                write!(f, "{}_{}", self.region.label(), self.number)
            }
            _ => write!(f, "{}", self.region.label()),
        }
    }
}

pub fn bank_bits(address: u32) -> u16 {
    (address >> BANK_SHIFT) as u16
}

pub fn local_address(address: u32) -> u16 {
    (address & 0xffff) as u16
}

pub fn banked_address(bank: u16, local_address: u16) -> u32 {
    (u32::from(bank) << BANK_SHIFT) | u32::from(local_address)
}

/// Returns the window containing `local_address`.
///
/// The registry covers the whole 16-bit space, see `validate_registry`.
pub fn window_at(local_address: u16) -> &'static Window {
    let index = WINDOWS
        .iter()
        .position(|w| w.contains(local_address))
        .unwrap_or(WINDOWS.len() - 1);
    &WINDOWS[index]
}

/// Maps a banked address onto the bank it belongs to.
pub fn resolve_bank(address: u32) -> BankId {
    let bank = bank_bits(address);
    let window = window_at(local_address(address));

    if window.banked {
        let number = if bank == 0 { window.default_bank } else { bank };
        if number <= window.max_bank {
            return BankId::new(window.region, number);
        }
    } else if bank == 0 {
        return BankId::new(window.region, 0);
    }

    BankId::unmapped(window.region, bank)
}

/// Rewrites the bank bits of `address` to the bank it resolves to, so that `0x4000` and
/// `0x14000` describe the same byte.
pub fn canonical_address(address: u32) -> u32 {
    let bank = resolve_bank(address);
    if bank.is_unmapped() {
        address
    } else {
        banked_address(bank.number(), local_address(address))
    }
}

/// Checks that the windows are ordered and cover `0x0000..=0xffff` without gaps or overlaps.
pub fn validate_registry() -> Result<()> {
    validate_windows(WINDOWS)
}

fn validate_windows(windows: &[Window]) -> Result<()> {
    let mut next_start: u32 = 0;
    for window in windows {
        if window.start > window.end {
            return Err(ErrorKind::Registry(format!("window {:?} is inverted", window.region)).into());
        }
        if u32::from(window.start) != next_start {
            return Err(ErrorKind::Registry(format!(
                "window {:?} starts at 0x{:04X}, expected 0x{:04X}",
                window.region, window.start, next_start
            ))
            .into());
        }
        if window.default_bank > window.max_bank {
            return Err(ErrorKind::Registry(format!(
                "window {:?} has an invalid default bank",
                window.region
            ))
            .into());
        }
        next_start = u32::from(window.end) + 1;
    }

    if next_start != 0x1_0000 {
        return Err(ErrorKind::Registry(format!("address space ends at 0x{:04X}", next_start)).into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_complete() {
        assert!(validate_registry().is_ok());
    }

    #[test]
    fn test_validate_windows_should_detect_gaps() {
        // GIVEN
        let windows = [
            Window::new(Region::Rom0, 0x0000, 0x3fff),
            Window::new(Region::Vram, 0x8000, 0xffff),
        ];

        // WHEN
        let result = validate_windows(&windows);

        // THEN
        assert!(result.is_err());
    }

    #[test]
    fn test_every_address_resolves_to_exactly_one_window() {
        for address in 0..=0xffffu16 {
            let count = WINDOWS.iter().filter(|w| w.contains(address)).count();
            assert_eq!(count, 1, "address 0x{:04X}", address);
        }
    }

    #[test]
    fn test_resolve_bank_should_apply_default_banks() {
        assert_eq!(resolve_bank(0x0150), BankId::new(Region::Rom0, 0));
        assert_eq!(resolve_bank(0x4000), BankId::new(Region::RomX, 1));
        assert_eq!(resolve_bank(0x3_4000), BankId::new(Region::RomX, 3));
        assert_eq!(resolve_bank(0xdff0), BankId::new(Region::WramX, 1));
        assert_eq!(resolve_bank(0xc000), BankId::new(Region::Wram0, 0));
        assert_eq!(resolve_bank(0xff80), BankId::new(Region::Hram, 0));
    }

    #[test]
    fn test_resolve_bank_should_flag_impossible_banks_as_unmapped() {
        // Bank bits on a fixed window
        assert_eq!(resolve_bank(0x2_c000), BankId::unmapped(Region::Wram0, 2));
        // VRAM only has two banks
        assert_eq!(resolve_bank(0x5_8000), BankId::unmapped(Region::Vram, 5));
        assert_eq!(resolve_bank(0x200_4000), BankId::unmapped(Region::RomX, 512));
        assert_eq!(BankId::unmapped(Region::Vram, 5).capacity(), None);
        assert_eq!(BankId::unmapped(Region::Vram, 5).category(), Category::Default);
    }

    #[test]
    fn test_resolve_bank_should_reach_all_rom_banks() {
        assert_eq!(resolve_bank(0x100_4000), BankId::new(Region::RomX, 256));
        assert_eq!(resolve_bank(0x12c_4000), BankId::new(Region::RomX, 300));
        assert_eq!(resolve_bank(0x1ff_7fff), BankId::new(Region::RomX, 511));
        assert_eq!(canonical_address(0x1ff_4000), 0x1ff_4000);
    }

    #[test]
    fn test_unmapped_banks_keep_their_window_apart() {
        // GIVEN
        let wram = resolve_bank(0x2_c000);
        let hram = resolve_bank(0x2_ff80);

        // THEN
        assert_ne!(wram, hram);
        assert_eq!(wram.to_string(), "UNMAPPED_WRAM_LO_2");
        assert_eq!(hram.to_string(), "UNMAPPED_HRAM_2");
    }

    #[test]
    fn test_canonical_address() {
        assert_eq!(canonical_address(0x4000), 0x1_4000);
        assert_eq!(canonical_address(0x1_4000), 0x1_4000);
        assert_eq!(canonical_address(0xc000), 0xc000);
    }

    #[test]
    fn test_bank_names() {
        assert_eq!(BankId::new(Region::Rom0, 0).to_string(), "ROM_0");
        assert_eq!(BankId::new(Region::RomX, 12).to_string(), "ROM_12");
        assert_eq!(BankId::new(Region::Wram0, 0).to_string(), "WRAM_LO");
        assert_eq!(BankId::new(Region::WramX, 1).to_string(), "WRAM_HI_1");
        assert_eq!(BankId::new(Region::Hram, 0).to_string(), "HRAM");
        assert_eq!(BankId::new(Region::RomX, 511).to_string(), "ROM_511");
        assert_eq!(BankId::unmapped(Region::Vram, 4).to_string(), "UNMAPPED_VRAM_4");
    }
}
