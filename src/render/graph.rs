//! Usage bars and block graphs.

use crate::memory_map;
use crate::model::Bank;

pub const MINI_GRAPH_WIDTH: u32 = 20;
pub const LARGE_GRAPH_COLUMNS: usize = 64;
pub const LARGE_GRAPH_ROWS: usize = 8;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GraphGlyphs {
    pub used: char,
    pub partial: char,
    pub free: char,
}

impl GraphGlyphs {
    pub fn new(ascii: bool) -> Self {
        if ascii {
            Self {
                used: '#',
                partial: '+',
                free: '.',
            }
        } else {
            Self {
                used: '\u{2588}',
                partial: '\u{2592}',
                free: '\u{2591}',
            }
        }
    }
}

/// A fixed width bar showing the used percentage of a bank.
///
/// Any usage fills at least one cell. Banks of unknown capacity get an empty bar.
pub fn mini_graph(bank: &Bank, glyphs: GraphGlyphs) -> String {
    let capacity = match bank.capacity() {
        Some(capacity) if capacity > 0 => u64::from(capacity),
        _ => return " ".repeat(MINI_GRAPH_WIDTH as usize),
    };

    let used = u64::from(bank.used().min(bank.capacity().unwrap_or(0)));
    let width = u64::from(MINI_GRAPH_WIDTH);
    let mut cells = (used * width + capacity / 2) / capacity;
    if used > 0 && cells == 0 {
        cells = 1;
    }

    (0..width)
        .map(|cell| if cell < cells { glyphs.used } else { glyphs.free })
        .collect()
}

/// Coverage of a bank at cell resolution, one string per graph row.
///
/// Each row is prefixed with the CPU address of its first cell.
pub fn large_graph(bank: &Bank, glyphs: GraphGlyphs) -> Vec<String> {
    let (window_start, capacity) = match (bank.start_address(), bank.capacity()) {
        (Some(start), Some(capacity)) if capacity > 0 => (start, capacity as usize),
        _ => return Vec::new(),
    };

    let coverage = coverage(bank, window_start, capacity);

    let max_cells = LARGE_GRAPH_COLUMNS * LARGE_GRAPH_ROWS;
    let cell_bytes = (capacity + max_cells - 1) / max_cells;
    let cells = (capacity + cell_bytes - 1) / cell_bytes;

    let glyph_of = |cell: usize| {
        let start = cell * cell_bytes;
        let end = (start + cell_bytes).min(capacity);
        let used = coverage[start..end].iter().filter(|&&b| b).count();
        if used == 0 {
            glyphs.free
        } else if used == end - start {
            glyphs.used
        } else {
            glyphs.partial
        }
    };

    (0..cells)
        .step_by(LARGE_GRAPH_COLUMNS)
        .map(|first_cell| {
            let last_cell = (first_cell + LARGE_GRAPH_COLUMNS).min(cells);
            let row: String = (first_cell..last_cell).map(glyph_of).collect();
            let address = usize::from(window_start) + first_cell * cell_bytes;
            format!("0x{:04X} |{}|", address, row)
        })
        .collect()
}

/// Marks every byte of the bank covered by at least one area.
fn coverage(bank: &Bank, window_start: u16, capacity: usize) -> Vec<bool> {
    let mut covered = vec![false; capacity];
    for area in bank.areas() {
        if area.is_empty() {
            continue;
        }
        let local = memory_map::local_address(area.address());
        let offset = match local.checked_sub(window_start) {
            Some(offset) => usize::from(offset),
            None => continue,
        };
        let end = offset.saturating_add(area.length() as usize).min(capacity);
        for byte in covered.iter_mut().take(end).skip(offset) {
            *byte = true;
        }
    }
    covered
}
