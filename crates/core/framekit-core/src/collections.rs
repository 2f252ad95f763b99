//! Small list helpers: shuffled copies, range copies and range removal.

/// Extension methods for `Vec<T>`.
pub trait VecExt<T> {
    /// Shuffled copy; `self` is left untouched.
    fn shuffled(&self) -> Vec<T>;

    /// Shuffled copy using the caller's generator (seedable for tests).
    fn shuffled_with(&self, rng: &mut fastrand::Rng) -> Vec<T>;

    /// Copy of `count` items starting at `index`, or `None` when the range
    /// does not fit.
    fn slice_range(&self, index: usize, count: usize) -> Option<Vec<T>>;

    /// Remove and return `count` items starting at `index`, or `None` (and no
    /// change) when the range does not fit.
    fn splice_range(&mut self, index: usize, count: usize) -> Option<Vec<T>>;
}

impl<T: Clone> VecExt<T> for Vec<T> {
    fn shuffled(&self) -> Vec<T> {
        self.shuffled_with(&mut fastrand::Rng::new())
    }

    fn shuffled_with(&self, rng: &mut fastrand::Rng) -> Vec<T> {
        let mut out = self.clone();
        rng.shuffle(&mut out);
        out
    }

    fn slice_range(&self, index: usize, count: usize) -> Option<Vec<T>> {
        let end = index.checked_add(count)?;
        self.get(index..end).map(<[T]>::to_vec)
    }

    fn splice_range(&mut self, index: usize, count: usize) -> Option<Vec<T>> {
        let end = index.checked_add(count)?;
        if end > self.len() {
            return None;
        }
        Some(self.drain(index..end).collect())
    }
}
