use crate::memory_map::{self, BankId};
use crate::model::{Area, Bank};
use crate::report::ReportView;
use std::collections::HashMap;

/// All banks touched by the current run, in the order they were first seen.
#[derive(Clone, Debug, Default)]
pub struct BankList {
    banks: Vec<Bank>,
    index: HashMap<BankId, usize>,
    all_exclusive: bool,
}

impl BankList {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every area except headers takes part in overlap detection.
    pub fn with_all_exclusive(mut self, all_exclusive: bool) -> Self {
        self.all_exclusive = all_exclusive;
        self
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn bank(&self, id: BankId) -> Option<&Bank> {
        self.index.get(&id).map(|&index| &self.banks[index])
    }

    pub fn bank_for_address(&self, address: u32) -> Option<&Bank> {
        self.bank(memory_map::resolve_bank(address))
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Appends `area` to the bank `bank_id`, creating the bank if necessary.
    ///
    /// Areas are not deduplicated.
    pub fn add_area(&mut self, bank_id: BankId, area: Area) {
        let index = match self.index.get(&bank_id) {
            Some(&index) => index,
            None => {
                self.banks.push(Bank::new(bank_id));
                self.index.insert(bank_id, self.banks.len() - 1);
                self.banks.len() - 1
            }
        };
        self.banks[index].push_area(area);
    }

    /// Places an area read from an input (or given manually) into its bank(s).
    ///
    /// Areas crossing the end of a fixed window continue in the next window and are split
    /// accordingly. Areas crossing the end of a banked window stay in their bank.
    pub fn ingest(&mut self, area: Area) {
        let exclusive = area.is_exclusive() || self.all_exclusive;
        let area = area.with_exclusive(exclusive);

        for piece in split_at_windows(&area) {
            let bank_id = memory_map::resolve_bank(piece.address());
            self.add_area(bank_id, piece);
        }
    }

    pub fn finalize(self) -> ReportView {
        ReportView::new(self.banks)
    }
}

fn split_at_windows(area: &Area) -> Vec<Area> {
    let mut pieces = Vec::new();
    let mut address = memory_map::canonical_address(area.address());
    let mut remaining = area.length();

    loop {
        let window = match memory_map::resolve_bank(address).window() {
            Some(window) if !window.banked && window.end != 0xffff => window,
            _ => {
                pieces.push(area.with_range(address, remaining));
                break;
            }
        };

        let local = memory_map::local_address(address);
        let room = u32::from(window.end) - u32::from(local) + 1;
        if remaining <= room {
            pieces.push(area.with_range(address, remaining));
            break;
        }

        pieces.push(area.with_range(address, room));
        remaining -= room;
        address = memory_map::canonical_address(u32::from(window.end) + 1);
    }

    pieces
}
