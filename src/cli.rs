//! Command line interface.
//!
//! The classic single dash options (`-sRe`, `-m:NAME:ADDR:LEN`, ...) are rewritten into long
//! options before clap sees them, see `normalize_args`.

use crate::environment::{AreaSort, BankOrder, ColorMode, Options, Palette};
use crate::error::Result;
use clap::{App, Arg, ArgMatches};
use std::path::Path;

fn long(options: &[&str]) -> Vec<String> {
    options.iter().map(|&option| option.to_owned()).collect()
}

/// Rewrites a single classic option into its long form(s).
///
/// Arguments which are not classic options are passed through unchanged, so clap still
/// rejects anything unknown.
fn normalize_arg(arg: &str) -> Vec<String> {
    if let Some(value) = arg.strip_prefix("-m:") {
        return vec![format!("--manual={}", value)];
    }
    if let Some(value) = arg.strip_prefix("-e:") {
        return vec![format!("--exclusive={}", value)];
    }
    if let Some(value) = arg.strip_prefix("-z:") {
        return vec![format!("--hide-size={}", value)];
    }
    if let Some(value) = arg.strip_prefix("-sP:") {
        return vec![format!("--palette={}", value)];
    }

    match arg {
        "-h" => long(&["--help"]),
        "-a" => long(&["--areas"]),
        "-aA" => long(&["--areas=address"]),
        "-aS" => long(&["--areas=size"]),
        "-g" => long(&["--graph"]),
        "-gA" => long(&["--graph", "--ascii"]),
        "-G" => long(&["--large-graph"]),
        "-GA" => long(&["--large-graph", "--ascii"]),
        "-E" => long(&["--all-exclusive"]),
        "-q" => long(&["--quiet"]),
        "-R" => long(&["--error-on-warning"]),
        "-sR" => long(&["--color"]),
        "-sRw" => long(&["--color=whole-row"]),
        "-sRe" => long(&["--color=row-ends"]),
        "-sRd" => long(&["--color=dimmed"]),
        "-sRp" => long(&["--color-percentage"]),
        "-sC" => long(&["--compact"]),
        "-sH" => long(&["--show-headers"]),
        "-nB" => long(&["--no-banner"]),
        "-nA" => long(&["--hide-areas"]),
        _ => vec![arg.to_owned()],
    }
}

pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .enumerate()
        .flat_map(|(index, arg)| {
            // program name
            if index == 0 {
                vec![arg]
            } else {
                normalize_arg(&arg)
            }
        })
        .collect()
}

pub fn app<'a, 'b>() -> App<'a, 'b> {
    app_from_crate!()
        .arg(
            Arg::with_name("input_file")
                .value_name("FILE")
                .help("Input file: .map, .noi, .ihx, .cdb, .gb, .gbc, .pocket or .duck")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("config_file")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Sets options file to use (command line options take precedence)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("areas")
                .long("areas")
                .value_name("SORT")
                .possible_values(&["input", "address", "size"])
                .help("Shows areas in each bank, optionally sorted [-a, -aA, -aS]")
                .takes_value(true)
                .min_values(0)
                .require_equals(true),
        )
        .arg(
            Arg::with_name("hide_areas")
                .long("hide-areas")
                .help("Hides areas, shown by default for .cdb files [-nA]"),
        )
        .arg(
            Arg::with_name("graph")
                .long("graph")
                .help("Shows a small usage graph per bank [-g]"),
        )
        .arg(
            Arg::with_name("large_graph")
                .long("large-graph")
                .help("Shows a large usage graph per bank [-G]"),
        )
        .arg(
            Arg::with_name("ascii")
                .long("ascii")
                .help("Uses ascii style graphs [-gA, -GA]"),
        )
        .arg(
            Arg::with_name("manual")
                .long("manual")
                .value_name("NAME:HEXADDR:HEXLENGTH")
                .help("Manually specifies an area [-m:NAME:HEXADDR:HEXLENGTH]")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .require_equals(true),
        )
        .arg(
            Arg::with_name("exclusive")
                .long("exclusive")
                .value_name("NAME:HEXADDR:HEXLENGTH")
                .help("Manually specifies an area that should not overlap [-e:NAME:HEXADDR:HEXLENGTH]")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .require_equals(true),
        )
        .arg(
            Arg::with_name("all_exclusive")
                .long("all-exclusive")
                .help("All areas are exclusive (except headers), warns for any overlaps [-E]"),
        )
        .arg(
            Arg::with_name("quiet")
                .long("quiet")
                .help("No output except warnings and errors [-q]"),
        )
        .arg(
            Arg::with_name("error_on_warning")
                .long("error-on-warning")
                .help("Returns an error code for area warnings and errors [-R]"),
        )
        .arg(
            Arg::with_name("color")
                .long("color")
                .value_name("MODE")
                .possible_values(&["whole-row", "row-ends", "dimmed"])
                .help("Colors the output [-sR, -sRw, -sRe, -sRd]")
                .takes_value(true)
                .min_values(0)
                .require_equals(true),
        )
        .arg(
            Arg::with_name("color_percentage")
                .long("color-percentage")
                .help("Colors by usage percentage instead of memory region [-sRp]"),
        )
        .arg(
            Arg::with_name("palette")
                .long("palette")
                .value_name("DEFAULT:ROM:VRAM:SRAM:WRAM:HRAM")
                .help("Custom palette of decimal VT100 color codes [-sP:...]")
                .takes_value(true)
                .require_equals(true),
        )
        .arg(
            Arg::with_name("compact")
                .long("compact")
                .help("Hides non-essential columns [-sC]"),
        )
        .arg(
            Arg::with_name("show_headers")
                .long("show-headers")
                .help("Shows header areas, normally hidden [-sH]"),
        )
        .arg(
            Arg::with_name("no_banner")
                .long("no-banner")
                .help("Hides the warning banner of .cdb output [-nB]"),
        )
        .arg(
            Arg::with_name("hide_size")
                .long("hide-size")
                .value_name("DECSIZE")
                .help("Hides areas smaller than the given size [-z:DECSIZE]")
                .takes_value(true)
                .require_equals(true),
        )
        .arg(
            Arg::with_name("bank_order")
                .long("bank-order")
                .value_name("ORDER")
                .possible_values(&["first-seen", "address"])
                .help("Order in which banks are listed")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Enables debug mode"),
        )
}

/// Builds the options for a run: the options file (if any) overridden by the command line.
pub fn build_options(arguments: &ArgMatches) -> Result<Options> {
    let mut options = match arguments.value_of("config_file") {
        Some(file_path) => Options::from_file(Path::new(file_path))?,
        None => Options::default(),
    };

    if arguments.is_present("areas") {
        options.display.show_areas = true;
        options.display.area_sort = match arguments.value_of("areas") {
            Some("address") => AreaSort::Address,
            Some("size") => AreaSort::Size,
            _ => AreaSort::Input,
        };
    }
    if arguments.is_present("hide_areas") {
        options.display.area_sort = AreaSort::Hide;
    }
    if let Some(size) = arguments.value_of("hide_size") {
        options.display.hide_below_size = size.parse()?;
    }
    if arguments.is_present("show_headers") {
        options.display.show_headers = true;
    }
    if arguments.is_present("compact") {
        options.display.compact = true;
    }
    if arguments.is_present("graph") {
        options.display.mini_graph = true;
    }
    if arguments.is_present("large_graph") {
        options.display.large_graph = true;
    }
    if arguments.is_present("ascii") {
        options.display.ascii = true;
    }
    if let Some(order) = arguments.value_of("bank_order") {
        options.display.bank_order = match order {
            "address" => BankOrder::Address,
            _ => BankOrder::FirstSeen,
        };
    }
    if arguments.is_present("no_banner") {
        options.display.hide_banners = true;
    }

    if arguments.is_present("color") {
        options.colors.mode = match arguments.value_of("color") {
            Some("row-ends") => ColorMode::RowEnds,
            Some("dimmed") => ColorMode::Dimmed,
            _ => ColorMode::WholeRow,
        };
    }
    if arguments.is_present("color_percentage") {
        options.colors.percentage_based = true;
        if !options.colors.enabled() {
            options.colors.mode = ColorMode::WholeRow;
        }
    }
    if let Some(palette) = arguments.value_of("palette") {
        options.colors.palette = palette.parse::<Palette>()?;
    }

    if let Some(values) = arguments.values_of("manual") {
        options.manual.extend(values.map(str::to_owned));
    }
    if let Some(values) = arguments.values_of("exclusive") {
        options.exclusive.extend(values.map(str::to_owned));
    }
    if arguments.is_present("all_exclusive") {
        options.all_exclusive = true;
    }
    if arguments.is_present("quiet") {
        options.quiet = true;
    }
    if arguments.is_present("error_on_warning") {
        options.error_on_warning = true;
    }
    if arguments.is_present("debug") {
        options.debug = true;
    }

    // fail on malformed manual areas before any input is read
    options.manual_areas()?;

    Ok(options)
}
