//! Areas and the banks they are placed in.

mod area;
mod bank;
mod bank_list;
mod manual;

pub use self::area::{Area, AreaKind};
pub use self::bank::Bank;
pub use self::bank_list::BankList;
pub use self::manual::ManualArea;
