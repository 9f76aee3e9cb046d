use std::fmt;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum AreaKind {
    /// Found in the input file.
    Linked,
    /// Found in the input file, but only describes structural data (cartridge header etc.).
    Header,
    /// Added with `-m`.
    Manual,
    /// Added with `-e`, must not overlap with other exclusive areas.
    ManualExclusive,
}

impl AreaKind {
    pub fn is_manual(self) -> bool {
        matches!(self, Self::Manual | Self::ManualExclusive)
    }
}

/// A named, contiguous address range.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Area {
    name: String,
    /// Banked start address, see `memory_map`.
    address: u32,
    length: u32,
    kind: AreaKind,
    exclusive: bool,
}

impl Area {
    pub fn new(name: &str, address: u32, length: u32, kind: AreaKind) -> Self {
        Self {
            name: name.to_owned(),
            address,
            length,
            kind,
            exclusive: kind == AreaKind::ManualExclusive,
        }
    }

    /// Creates an area read from an input file.
    ///
    /// Areas with `HEADER` in their name are classified as `AreaKind::Header`.
    pub fn linked(name: &str, address: u32, length: u32) -> Self {
        let kind = if name.contains("HEADER") {
            AreaKind::Header
        } else {
            AreaKind::Linked
        };
        Self::new(name, address, length, kind)
    }

    /// Marks the area as exclusive, headers never are.
    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive && self.kind != AreaKind::Header;
        self
    }

    pub(crate) fn with_range(&self, address: u32, length: u32) -> Self {
        Self {
            address,
            length,
            ..self.clone()
        }
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

    pub fn kind(&self) -> AreaKind {
        self.kind
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn is_header(&self) -> bool {
        self.kind == AreaKind::Header
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Last address occupied by this area (inclusive), `None` for empty areas.
    pub fn end_address(&self) -> Option<u32> {
        if self.is_empty() {
            None
        } else {
            Some(self.address.saturating_add(self.length - 1))
        }
    }

    /// Returns the intersection of both areas as inclusive `(start, end)` range.
    pub fn intersection(&self, other: &Area) -> Option<(u32, u32)> {
        let start = self.address.max(other.address);
        let end = self.end_address()?.min(other.end_address()?);
        if start <= end {
            Some((start, end))
        } else {
            None
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end_address() {
            Some(end) => write!(
                f,
                "{} (0x{:X} -> 0x{:X}, {} bytes)",
                self.name, self.address, end, self.length
            ),
            None => write!(f, "{} (0x{:X}, empty)", self.name, self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linked_areas_with_header_in_name_are_headers() {
        assert_eq!(Area::linked("_HEADER0", 0, 1).kind(), AreaKind::Header);
        assert_eq!(Area::linked("_CODE", 0, 1).kind(), AreaKind::Linked);
    }

    #[test]
    fn test_headers_are_never_exclusive() {
        assert!(!Area::linked("_HEADER", 0x100, 0x50)
            .with_exclusive(true)
            .is_exclusive());
        assert!(Area::linked("_CODE", 0x200, 0x50)
            .with_exclusive(true)
            .is_exclusive());
    }

    #[test]
    fn test_end_address() {
        assert_eq!(Area::linked("A", 0xc000, 0x100).end_address(), Some(0xc0ff));
        assert_eq!(Area::linked("A", 0xc000, 0).end_address(), None);
    }

    #[test]
    fn test_intersection() {
        // GIVEN
        let a = Area::linked("A", 0xc000, 0x100);
        let b = Area::linked("B", 0xc050, 0x100);
        let c = Area::linked("C", 0xc100, 0x10);
        let empty = Area::linked("E", 0xc050, 0);

        // THEN
        assert_eq!(a.intersection(&b), Some((0xc050, 0xc0ff)));
        assert_eq!(b.intersection(&a), Some((0xc050, 0xc0ff)));
        assert_eq!(a.intersection(&c), None);
        assert_eq!(a.intersection(&empty), None);
    }
}
