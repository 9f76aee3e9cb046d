use crate::memory_map::{BankId, Category};
use crate::model::Area;

/// A hardware memory region and the areas placed in it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bank {
    id: BankId,
    capacity: Option<u32>,
    areas: Vec<Area>,
}

impl Bank {
    pub fn new(id: BankId) -> Self {
        Self {
            id,
            capacity: id.capacity(),
            areas: Vec::new(),
        }
    }

    pub fn id(&self) -> BankId {
        self.id
    }

    pub fn name(&self) -> String {
        self.id.to_string()
    }

    pub fn category(&self) -> Category {
        self.id.category()
    }

    /// Capacity in bytes, `None` if unknown.
    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    /// First address of the bank as seen by the CPU.
    pub fn start_address(&self) -> Option<u16> {
        self.id.window().map(|w| w.start)
    }

    /// Last address of the bank as seen by the CPU.
    pub fn end_address(&self) -> Option<u16> {
        self.id.window().map(|w| w.end)
    }

    /// All areas in insertion order.
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn push_area(&mut self, area: Area) {
        self.areas.push(area);
    }

    /// Sum of all area lengths, hidden areas included.
    pub fn used(&self) -> u32 {
        self.areas
            .iter()
            .fold(0u32, |sum, area| sum.saturating_add(area.length()))
    }

    pub fn free(&self) -> Option<u32> {
        self.capacity
            .map(|capacity| capacity.saturating_sub(self.used()))
    }

    /// Used bytes in percent of the capacity (truncated), may exceed 100.
    pub fn percent_used(&self) -> Option<u32> {
        self.capacity.map(|capacity| {
            if capacity == 0 {
                0
            } else {
                (u64::from(self.used()) * 100 / u64::from(capacity)) as u32
            }
        })
    }

    /// Number of bytes exceeding the capacity.
    pub fn overflow(&self) -> Option<u32> {
        let capacity = self.capacity?;
        let used = self.used();
        if used > capacity {
            Some(used - capacity)
        } else {
            None
        }
    }
}
