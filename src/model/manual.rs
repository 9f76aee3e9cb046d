use crate::error::{ErrorKind, Result};
use crate::memory_map::MAX_ADDRESS;
use crate::model::{Area, AreaKind};
use std::fmt;

/// An area declared on the command line as `NAME:HEXADDR:HEXLENGTH`.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ManualArea {
    name: String,
    address: u32,
    length: u32,
    exclusive: bool,
}

impl ManualArea {
    /// Parses `NAME:HEXADDR:HEXLENGTH`, hex values may be prefixed with `0x` or `$`.
    pub fn parse(value: &str, exclusive: bool) -> Result<Self> {
        let malformed = || ErrorKind::ManualArea(value.to_owned());

        let fields: Vec<&str> = value.split(':').collect();
        if fields.len() != 3 {
            return Err(malformed().into());
        }

        let name = fields[0].trim();
        if name.is_empty() {
            return Err(malformed().into());
        }

        let address = parse_hex(fields[1]).ok_or_else(malformed)?;
        let length = parse_hex(fields[2]).ok_or_else(malformed)?;
        if address > MAX_ADDRESS {
            return Err(malformed().into());
        }

        Ok(Self {
            name: name.to_owned(),
            address,
            length,
            exclusive,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn to_area(&self) -> Area {
        let kind = if self.exclusive {
            AreaKind::ManualExclusive
        } else {
            AreaKind::Manual
        };
        Area::new(&self.name, self.address, self.length, kind)
    }
}

impl fmt::Display for ManualArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:X}:{:X}", self.name, self.address, self.length)
    }
}

fn parse_hex(field: &str) -> Option<u32> {
    let field = field.trim();
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .or_else(|| field.strip_prefix('$'))
        .unwrap_or(field);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manual_area() {
        // WHEN
        let area = ManualArea::parse("STACK:DFF0:10", true).unwrap();

        // THEN
        assert_eq!(area.name(), "STACK");
        assert_eq!(area.address(), 0xdff0);
        assert_eq!(area.length(), 0x10);
        assert_eq!(area.to_area().kind(), AreaKind::ManualExclusive);
        assert!(area.to_area().is_exclusive());
    }

    #[test]
    fn test_parse_accepts_hex_prefixes() {
        let area = ManualArea::parse("SHADOW_OAM:0xC000:$A0", false).unwrap();
        assert_eq!(area.address(), 0xc000);
        assert_eq!(area.length(), 0xa0);
        assert!(!area.to_area().is_exclusive());
    }

    #[test]
    fn test_parse_accepts_high_rom_banks() {
        let area = ManualArea::parse("BANK_511:1FF4000:4000", false).unwrap();
        assert_eq!(area.address(), 0x1ff_4000);
    }

    #[test]
    fn test_parse_rejects_malformed_arguments() {
        for arg in &[
            "",
            "STACK",
            "STACK:DFF0",
            ":DFF0:10",
            "STACK:XYZ:10",
            "STACK:DFF0:",
            "STACK:DFF0:10:4",
            "STACK:2000000:10",
        ] {
            assert!(ManualArea::parse(arg, false).is_err(), "{}", arg);
        }
    }
}
