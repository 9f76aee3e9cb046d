//! Readers turning toolchain output into areas.
//!
//! Every supported file format implements `AreaSource`. Readers only report what they find,
//! placing areas into banks is up to `model::BankList::ingest`.

use crate::error::{ErrorKind, Result, ResultExt};
use crate::model::Area;
use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

mod cdb;
mod ihx;
mod map;
mod noi;
mod rom;

pub use self::cdb::CdbFile;
pub use self::ihx::IhxFile;
pub use self::map::MapFile;
pub use self::noi::NoiFile;
pub use self::rom::RomFile;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Format {
    /// GBDK (sdld) or RGBDS linker map
    Map,
    /// GBDK symbol file
    Noi,
    /// Intel HEX
    Ihx,
    /// SDCC debug information
    Cdb,
    /// ROM image (.gb, .gbc, .pocket, .duck)
    Rom,
}

impl Format {
    /// Detects the format from the (case insensitive) file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("map") => Ok(Self::Map),
            Some("noi") => Ok(Self::Noi),
            Some("ihx") => Ok(Self::Ihx),
            Some("cdb") => Ok(Self::Cdb),
            Some("gb") | Some("gbc") | Some("pocket") | Some("duck") => Ok(Self::Rom),
            _ => Err(ErrorKind::UnknownFormat(path.display().to_string()).into()),
        }
    }

    /// `.cdb` files only know about C symbols, listing them is more useful than bank totals.
    pub fn shows_areas_by_default(self) -> bool {
        self == Self::Cdb
    }

    /// Whether bank totals are known to be incomplete for this format.
    pub fn undercounts(self) -> bool {
        self == Self::Cdb
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map => write!(f, "map"),
            Self::Noi => write!(f, "noi"),
            Self::Ihx => write!(f, "ihx"),
            Self::Cdb => write!(f, "cdb"),
            Self::Rom => write!(f, "rom"),
        }
    }
}

pub trait AreaSource {
    fn format(&self) -> Format;

    /// Reads all areas of the input, in file order.
    fn areas(&self) -> Result<Vec<Area>>;
}

pub fn create_source(file_path: &Path) -> Result<Box<dyn AreaSource>> {
    let source: Box<dyn AreaSource> = match Format::from_path(file_path)? {
        Format::Map => Box::new(MapFile::new(file_path)),
        Format::Noi => Box::new(NoiFile::new(file_path)),
        Format::Ihx => Box::new(IhxFile::new(file_path)),
        Format::Cdb => Box::new(CdbFile::new(file_path)),
        Format::Rom => Box::new(RomFile::new(file_path)),
    };
    Ok(source)
}

fn read_bytes(file_path: &Path) -> Result<Vec<u8>> {
    let file = File::open(file_path).chain_err(|| {
        ErrorKind::UnknownFormat(file_path.display().to_string())
    })?;
    let mut bytes = Vec::new();
    BufReader::new(file).read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn read_text(file_path: &Path) -> Result<String> {
    let bytes = read_bytes(file_path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn parse_error(file_path: &Path, line: usize, message: &str) -> crate::error::Error {
    ErrorKind::Parse(file_path.display().to_string(), line, message.to_owned()).into()
}

/// Location of the file being parsed, used for error messages.
#[derive(Debug, Clone)]
struct Input {
    file_path: PathBuf,
}

impl Input {
    fn new(file_path: &Path) -> Self {
        Self {
            file_path: file_path.to_owned(),
        }
    }

    fn error(&self, line: usize, message: &str) -> crate::error::Error {
        parse_error(&self.file_path, line, message)
    }
}
