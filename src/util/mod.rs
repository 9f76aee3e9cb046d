mod compact_iterator;

pub use self::compact_iterator::{Compact, CompactIterator};
