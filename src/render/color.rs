//! Row colors, either by memory category or by usage percentage.

use crate::environment::{ColorMode, Colors, Palette};
use crate::memory_map::Category;
use crate::model::Bank;
use console::{Color, Style};

/// Maps a VT100 foreground code onto a (forced) console style.
pub fn code_style(code: u8) -> Style {
    let style = Style::new().force_styling(true);
    match code {
        30..=37 => style.fg(basic_color(code - 30)),
        90..=97 => style.fg(basic_color(code - 90)).bright(),
        _ => style,
    }
}

fn basic_color(index: u8) -> Color {
    match index {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        _ => Color::White,
    }
}

pub fn palette_code(palette: &Palette, category: Category) -> u8 {
    match category {
        Category::Default => palette.default,
        Category::Rom => palette.rom,
        Category::Vram => palette.vram,
        Category::Sram => palette.sram,
        Category::Wram => palette.wram,
        Category::Hram => palette.hram,
    }
}

/// Green to red with increasing usage, bright red once a bank overflows.
pub fn gradient_code(percent: u32) -> u8 {
    match percent {
        0..=49 => 32,
        50..=74 => 33,
        75..=89 => 35,
        90..=100 => 31,
        _ => 91,
    }
}

/// Styles for the outer columns (bank name, last column) and the center of a row.
#[derive(Clone, Debug)]
pub struct RowStyle {
    pub ends: Style,
    pub center: Style,
}

impl RowStyle {
    pub fn plain() -> Self {
        Self {
            ends: Style::new(),
            center: Style::new(),
        }
    }

    pub fn for_bank(colors: &Colors, bank: &Bank) -> Self {
        if !colors.enabled() {
            return Self::plain();
        }

        let code = match (colors.percentage_based, bank.percent_used()) {
            (true, Some(percent)) => gradient_code(percent),
            _ => palette_code(&colors.palette, bank.category()),
        };
        let style = code_style(code);

        match colors.mode {
            ColorMode::Off => Self::plain(),
            ColorMode::WholeRow => Self {
                ends: style.clone(),
                center: style,
            },
            ColorMode::RowEnds => Self {
                ends: style,
                center: Style::new(),
            },
            ColorMode::Dimmed => Self {
                ends: style.clone(),
                center: style.dim(),
            },
        }
    }
}
