use crate::environment::{AreaSort, Display};
use crate::model::Area;

/// Selects and orders the areas listed below a bank.
///
/// Purely a presentation concern, bank totals always include every area.
#[derive(Clone, Debug)]
pub struct AreaFilter {
    sort: AreaSort,
    hide_below_size: u32,
    show_headers: bool,
}

impl Default for AreaFilter {
    fn default() -> Self {
        Self {
            sort: AreaSort::Input,
            hide_below_size: 0,
            show_headers: false,
        }
    }
}

impl AreaFilter {
    pub fn new_from_display(display: &Display) -> Self {
        Self {
            sort: display.area_sort,
            hide_below_size: display.hide_below_size,
            show_headers: display.show_headers,
        }
    }

    pub fn with_sort(&mut self, sort: AreaSort) -> &mut Self {
        self.sort = sort;
        self
    }

    pub fn with_hide_below_size(&mut self, size: u32) -> &mut Self {
        self.hide_below_size = size;
        self
    }

    pub fn with_show_headers(&mut self, show_headers: bool) -> &mut Self {
        self.show_headers = show_headers;
        self
    }

    pub fn is_visible(&self, area: &Area) -> bool {
        if self.sort == AreaSort::Hide {
            return false;
        }
        if area.is_header() && !self.show_headers {
            return false;
        }
        area.length() >= self.hide_below_size
    }

    /// Returns the visible areas in display order. Sorts are stable.
    pub fn apply<'a>(&self, areas: &'a [Area]) -> Vec<&'a Area> {
        let mut visible: Vec<&Area> = areas.iter().filter(|a| self.is_visible(a)).collect();
        match self.sort {
            AreaSort::Address => visible.sort_by_key(|area| area.address()),
            AreaSort::Size => visible.sort_by(|a, b| b.length().cmp(&a.length())),
            AreaSort::Input | AreaSort::Hide => {}
        }
        visible
    }
}
