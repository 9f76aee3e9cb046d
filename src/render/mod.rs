//! Text rendering of a `ReportView`.
//!
//! Rendering never touches the model, the same view and options always produce the same text.

mod color;
mod graph;

pub use self::color::RowStyle;
pub use self::graph::{large_graph, mini_graph, GraphGlyphs};

use crate::environment::{ColorMode, Options};
use crate::memory_map;
use crate::model::{Area, Bank};
use crate::report::{AreaFilter, ReportView};
use std::fmt;

const NAME_WIDTH: usize = 16;
const RANGE_WIDTH: usize = 16;
const SIZE_WIDTH: usize = 7;
const PERCENT_WIDTH: usize = 5;

pub struct Renderer<'a> {
    options: &'a Options,
    filter: AreaFilter,
    show_areas: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            filter: AreaFilter::new_from_display(&options.display),
            show_areas: options.display.show_areas,
        }
    }

    /// Overrides whether areas are listed below their bank.
    pub fn with_show_areas(mut self, show_areas: bool) -> Self {
        self.show_areas = show_areas;
        self
    }

    pub fn render(&self, view: &ReportView) -> String {
        Report {
            renderer: self,
            view,
        }
        .to_string()
    }

    fn compact(&self) -> bool {
        self.options.display.compact
    }

    fn glyphs(&self) -> GraphGlyphs {
        GraphGlyphs::new(self.options.display.ascii)
    }

    fn tree_glyphs(&self) -> (&'static str, &'static str) {
        if self.options.display.ascii {
            ("|- ", "`- ")
        } else {
            ("\u{251c}\u{2500} ", "\u{2514}\u{2500} ")
        }
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut titles = vec![pad_right("Bank", NAME_WIDTH)];
        let mut dashes = vec!["-".repeat(NAME_WIDTH)];
        if !self.compact() {
            titles.push(pad_right("Range", RANGE_WIDTH));
            dashes.push("-".repeat(RANGE_WIDTH));
        }
        for &(title, width) in &[
            ("Size", SIZE_WIDTH),
            ("Used", SIZE_WIDTH),
            ("Used%", PERCENT_WIDTH),
            ("Free", SIZE_WIDTH),
        ] {
            titles.push(pad_left(title, width));
            dashes.push("-".repeat(width));
        }
        if !self.compact() {
            titles.push(pad_left("Free%", PERCENT_WIDTH));
            dashes.push("-".repeat(PERCENT_WIDTH));
        }

        writeln!(f, "{}", titles.join(" ").trim_end())?;
        writeln!(f, "{}", dashes.join(" "))
    }

    fn write_bank(&self, f: &mut fmt::Formatter<'_>, bank: &Bank) -> fmt::Result {
        let style = RowStyle::for_bank(&self.options.colors, bank);
        let unknown = |value: Option<u32>, suffix: &str| match value {
            Some(value) => format!("{}{}", value, suffix),
            None => "-".to_owned(),
        };

        let mut center = Vec::new();
        if !self.compact() {
            center.push(pad_right(&bank_range(bank), RANGE_WIDTH));
        }
        center.push(pad_left(
            &bank
                .capacity()
                .map_or_else(|| "?".to_owned(), |c| c.to_string()),
            SIZE_WIDTH,
        ));
        center.push(pad_left(&bank.used().to_string(), SIZE_WIDTH));
        center.push(pad_left(&unknown(bank.percent_used(), "%"), PERCENT_WIDTH));

        let free = pad_left(&unknown(bank.free(), ""), SIZE_WIDTH);
        let end = if self.compact() {
            free
        } else {
            center.push(free);
            let free_percent = bank.percent_used().map(|p| 100u32.saturating_sub(p));
            pad_left(&unknown(free_percent, "%"), PERCENT_WIDTH)
        };

        write!(
            f,
            "{} {} {}",
            style.ends.apply_to(pad_right(&bank.name(), NAME_WIDTH)),
            style.center.apply_to(center.join(" ")),
            style.ends.apply_to(end)
        )?;

        if self.options.display.mini_graph {
            let bar = mini_graph(bank, self.glyphs());
            write!(f, "  {}", style.ends.apply_to(format!("|{}|", bar)))?;
        }
        writeln!(f)?;

        if self.show_areas {
            let areas = self.filter.apply(bank.areas());
            for (index, area) in areas.iter().enumerate() {
                let last = index + 1 == areas.len();
                self.write_area(f, area, last, &style)?;
            }
        }

        Ok(())
    }

    fn write_area(
        &self,
        f: &mut fmt::Formatter<'_>,
        area: &Area,
        last: bool,
        style: &RowStyle,
    ) -> fmt::Result {
        let (branch, last_branch) = self.tree_glyphs();
        let glyph = if last { last_branch } else { branch };
        let name = format!("{}{}", glyph, area.name());

        let mut columns = vec![pad_right(&name, NAME_WIDTH)];
        if !self.compact() {
            columns.push(pad_right(&area_range(area), RANGE_WIDTH));
        }
        columns.push(pad_left("", SIZE_WIDTH));
        columns.push(pad_left(&area.length().to_string(), SIZE_WIDTH));

        let row = columns.join(" ");
        match self.options.colors.mode {
            ColorMode::Off | ColorMode::RowEnds => writeln!(f, "{}", row.trim_end()),
            _ => writeln!(f, "{}", style.center.apply_to(row.trim_end())),
        }
    }

    fn write_large_graph(&self, f: &mut fmt::Formatter<'_>, bank: &Bank) -> fmt::Result {
        let rows = large_graph(bank, self.glyphs());
        if rows.is_empty() {
            return Ok(());
        }

        let style = RowStyle::for_bank(&self.options.colors, bank);
        writeln!(f)?;
        writeln!(f, "{}", style.ends.apply_to(bank.name()))?;
        for row in rows {
            writeln!(f, "  {}", style.ends.apply_to(row))?;
        }
        Ok(())
    }
}

struct Report<'r, 'a> {
    renderer: &'r Renderer<'a>,
    view: &'r ReportView,
}

impl<'r, 'a> fmt::Display for Report<'r, 'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let banks = self
            .view
            .ordered_banks(self.renderer.options.display.bank_order);

        self.renderer.write_header(f)?;
        for bank in &banks {
            self.renderer.write_bank(f, bank)?;
        }

        if self.renderer.options.display.large_graph {
            for bank in &banks {
                self.renderer.write_large_graph(f, bank)?;
            }
        }

        Ok(())
    }
}

fn pad_left(value: &str, width: usize) -> String {
    format!("{:>width$}", value, width = width)
}

fn pad_right(value: &str, width: usize) -> String {
    format!("{:<width$}", value, width = width)
}

fn bank_range(bank: &Bank) -> String {
    match (bank.start_address(), bank.end_address()) {
        (Some(start), Some(end)) => format!("0x{:04X} -> 0x{:04X}", start, end),
        _ => "-".to_owned(),
    }
}

fn area_range(area: &Area) -> String {
    let start = memory_map::local_address(area.address());
    match area.end_address() {
        Some(end) => format!(
            "0x{:04X} -> 0x{:04X}",
            start,
            memory_map::local_address(end)
        ),
        None => format!("0x{:04X} -> -", start),
    }
}
