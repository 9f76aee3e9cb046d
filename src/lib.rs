#[macro_use]
extern crate clap;
#[macro_use]
extern crate error_chain;
extern crate nom;
extern crate serde;
extern crate serde_yaml;

pub mod cli;
pub mod environment;
pub mod loader;
pub mod memory_map;
pub mod model;
pub mod overlap;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod util;

pub mod error {
    error_chain! {
        types {
            Error, ErrorKind, ResultExt, Result;
        }

        foreign_links {
            ClapError(::clap::Error);
            IOError(::std::io::Error);
            ParseIntError(::std::num::ParseIntError);
            SerdeYAML(::serde_yaml::Error);
        }

        errors {
            ManualArea(arg: String) {
                description("Malformed manual area")
                display("malformed manual area argument: {}", arg)
            }
            Palette(arg: String) {
                description("Malformed color palette")
                display("malformed custom color palette: {}", arg)
            }
            UnknownFormat(file: String) {
                description("Unknown input file format")
                display("Problem with filename or unable to open file! {}", file)
            }
            Parse(file: String, line: usize, message: String) {
                description("Input file could not be parsed")
                display("{}:{}: {}", file, line, message)
            }
            Registry(m: String) {
                description("Inconsistent memory map")
                display("Memory map error: {}", m)
            }
        }
    }
}
