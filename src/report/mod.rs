//! The finalized view of all banks, and what is shown of it.

mod filter;
mod warning;

pub use self::filter::AreaFilter;
pub use self::warning::{Diagnostics, Warning};

use crate::environment::BankOrder;
use crate::model::{Area, Bank};
use crate::overlap::{self, Overlap, Severity};

/// Frozen result of a run, all aggregates are derived from it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReportView {
    banks: Vec<Bank>,
}

impl ReportView {
    pub fn new(banks: Vec<Bank>) -> Self {
        Self { banks }
    }

    /// Banks in first-seen order.
    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn ordered_banks(&self, order: BankOrder) -> Vec<&Bank> {
        let mut banks: Vec<&Bank> = self.banks.iter().collect();
        if order == BankOrder::Address {
            banks.sort_by_key(|bank| bank.id());
        }
        banks
    }

    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.banks.iter().flat_map(Bank::areas)
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    pub fn overlaps(&self, severity: Severity) -> Vec<Overlap> {
        overlap::detect_overlaps(&self.banks, severity)
    }

    /// Collects overlaps, overflowing banks and banks without known capacity.
    pub fn diagnose(&self, error_on_warning: bool) -> Diagnostics {
        let mut diagnostics = Diagnostics::new(error_on_warning);

        for overlap in self.overlaps(Severity::from_error_on_warning(error_on_warning)) {
            diagnostics.push(Warning::Overlap(overlap));
        }

        for bank in &self.banks {
            if let Some(by) = bank.overflow() {
                diagnostics.push(Warning::BankOverflow {
                    bank: bank.name(),
                    by,
                });
            }
            if bank.capacity().is_none() {
                diagnostics.push(Warning::UnknownCapacity { bank: bank.name() });
            }
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{AreaSort, Display};
    use crate::model::{AreaKind, BankList};

    fn view_of(areas: Vec<Area>) -> ReportView {
        let mut banks = BankList::new();
        for area in areas {
            banks.ingest(area);
        }
        banks.finalize()
    }

    fn totals(view: &ReportView) -> Vec<(u32, Option<u32>, Option<u32>)> {
        view.banks()
            .iter()
            .map(|bank| (bank.used(), bank.free(), bank.percent_used()))
            .collect()
    }

    #[test]
    fn test_display_settings_do_not_change_totals() {
        // GIVEN
        let view = view_of(vec![
            Area::linked("_CODE", 0x0200, 0x1000),
            Area::linked("_HEADER", 0x0100, 0x50),
            Area::linked("_TINY", 0x1200, 0x4),
            Area::linked("_DATA", 0xc000, 0x20),
        ]);
        let before = totals(&view);

        for &sort in &[AreaSort::Input, AreaSort::Address, AreaSort::Size, AreaSort::Hide] {
            // WHEN
            let display = Display {
                show_areas: true,
                area_sort: sort,
                hide_below_size: 0x10,
                ..Display::default()
            };
            let filter = AreaFilter::new_from_display(&display);
            for bank in view.banks() {
                filter.apply(bank.areas());
            }

            // THEN
            assert_eq!(totals(&view), before);
        }
        assert_eq!(before[0].0, 0x1000 + 0x50 + 0x4);
    }

    #[test]
    fn test_ordered_banks() {
        // GIVEN
        let view = view_of(vec![
            Area::linked("_DATA", 0xc000, 0x20),
            Area::linked("_CODE_2", 0x2_4000, 0x20),
            Area::linked("_CODE", 0x0200, 0x20),
        ]);

        // WHEN
        let first_seen: Vec<String> = view
            .ordered_banks(BankOrder::FirstSeen)
            .iter()
            .map(|bank| bank.name())
            .collect();
        let by_address: Vec<String> = view
            .ordered_banks(BankOrder::Address)
            .iter()
            .map(|bank| bank.name())
            .collect();

        // THEN
        assert_eq!(first_seen, vec!["WRAM_LO", "ROM_2", "ROM_0"]);
        assert_eq!(by_address, vec!["ROM_0", "ROM_2", "WRAM_LO"]);
    }

    #[test]
    fn test_diagnose_reports_overlaps_and_overflows() {
        // GIVEN
        let view = view_of(vec![
            Area::new("A", 0xc000, 0x100, AreaKind::ManualExclusive),
            Area::new("B", 0xc050, 0x100, AreaKind::ManualExclusive),
            Area::linked("_CODE_1", 0x1_4000, 0x4010),
        ]);

        // WHEN
        let lenient = view.diagnose(false);
        let strict = view.diagnose(true);

        // THEN
        assert_eq!(lenient.warnings().len(), 2);
        assert!(!lenient.failed());
        assert!(strict.failed());
        assert!(matches!(
            strict.warnings()[1],
            Warning::BankOverflow { by: 0x10, .. }
        ));
    }

    #[test]
    fn test_unknown_capacity_never_fails() {
        // GIVEN
        let view = view_of(vec![Area::linked("_FAR", 0x3_c000, 0x10)]);

        // WHEN
        let diagnostics = view.diagnose(true);

        // THEN
        assert_eq!(diagnostics.warnings().len(), 1);
        assert!(!diagnostics.failed());
    }
}
