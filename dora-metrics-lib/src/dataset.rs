//! Explicit empty-or-populated tables passed between pipeline stages.

/// A table that is either explicitly empty or holds at least one row.
///
/// Every stage of the pipeline hands its output on as a `Dataset` so that the
/// "nothing to export" case is a branch callers must match on rather than an
/// empty `Vec` that happens to flow through.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset<T> {
    /// No rows.
    Empty,

    /// One or more rows. Never constructed with an empty vector.
    Populated(Vec<T>),
}

impl<T> Dataset<T> {
    /// Wrap a vector, mapping an empty vector to [`Dataset::Empty`].
    #[must_use]
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() { Self::Empty } else { Self::Populated(rows) }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    /// The rows of the table, empty for [`Dataset::Empty`].
    #[must_use]
    pub fn rows(&self) -> &[T] {
        match self {
            Self::Empty => &[],
            Self::Populated(rows) => rows,
        }
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.rows().iter()
    }
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> FromIterator<T> for Dataset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Dataset<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
