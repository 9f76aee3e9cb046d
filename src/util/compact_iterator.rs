pub trait CompactIterator: Iterator {
    /// Groups runs of adjacent items, yielding the first and last item of each run.
    ///
    /// The input does not need to be sorted, only consecutive items are compared. Items which
    /// are adjacent but not consecutive end up in separate runs.
    ///
    /// `adjacent(last, next)` decides whether `next` continues the run ending with `last`.
    fn compact(self, adjacent: fn(&Self::Item, &Self::Item) -> bool) -> Compact<Self>
    where
        Self: Sized,
    {
        Compact::new(self, adjacent)
    }
}

impl<T: Sized> CompactIterator for T where T: Iterator {}

pub struct Compact<T>
where
    T: Iterator,
{
    it: T,
    adjacent: fn(&T::Item, &T::Item) -> bool,
    next_item: Option<T::Item>,
}

impl<T> Compact<T>
where
    T: Iterator,
{
    pub fn new(mut it: T, adjacent: fn(&T::Item, &T::Item) -> bool) -> Self {
        let next_item = it.next();
        Self {
            it,
            adjacent,
            next_item,
        }
    }
}

impl<T> Iterator for Compact<T>
where
    T: Iterator,
    T::Item: Clone,
{
    type Item = (T::Item, T::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.next_item.take()?;

        let mut last = first.clone();
        for item in &mut self.it {
            if (self.adjacent)(&last, &item) {
                last = item;
            } else {
                self.next_item = Some(item);
                break;
            }
        }

        Some((first, last))
    }
}
