//! Pagination.

use crate::executor::relation::Relation;
use crate::plan::Page;
use alloc::vec::Vec;

/// Applies offset and limit to a relation, in that order.
///
/// An offset past the end yields an empty relation; a limit past the end
/// yields whatever remains. Pagination values are validated when the
/// [`Page`] is built, so execution cannot fail.
pub struct LimitExecutor {
    page: Page,
}

impl LimitExecutor {
    /// Creates an executor for a validated page.
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Applies the page to the input relation.
    pub fn execute(&self, input: Relation) -> Relation {
        if self.page.is_unbounded() {
            return input;
        }
        let schema = input.schema().clone();
        let rows: Vec<_> = input
            .into_rows()
            .into_iter()
            .skip(self.page.offset())
            .take(self.page.limit().unwrap_or(usize::MAX))
            .collect();
        Relation::new_unchecked(schema, rows)
    }
}
