use serde::{Deserialize, Serialize};

use crate::filter::FilterSpec;
use crate::page::Page;
use crate::projection::Projection;
use crate::sort::Sort;

/// A chainable query over a collection of documents.
///
/// Each method consumes the builder and returns the narrowed query, so a
/// backend can either build its query eagerly or record the steps and run
/// them on execution.
pub trait CollectionQuery: Sized {
    fn find(self, filter: &FilterSpec) -> Self;
    fn sort(self, sort: &[Sort]) -> Self;
    fn select(self, projection: &Projection) -> Self;
    fn skip(self, n: usize) -> Self;
    fn limit(self, n: usize) -> Self;
}

/// Everything needed to run one listing query.
///
/// Each `with_*` method replaces exactly one slot, so setting slots in any
/// order, or setting the same slot twice, yields the same directives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDirectives {
    pub filter: FilterSpec,
    pub sort: Vec<Sort>,
    pub projection: Projection,
    pub page: Page,
}

impl QueryDirectives {
    pub fn with_filter(self, filter: FilterSpec) -> Self {
        Self { filter, ..self }
    }

    pub fn with_sort(self, sort: Vec<Sort>) -> Self {
        Self { sort, ..self }
    }

    pub fn with_projection(self, projection: Projection) -> Self {
        Self { projection, ..self }
    }

    pub fn with_page(self, page: Page) -> Self {
        Self { page, ..self }
    }

    /// Apply the directives to `query` in find, sort, select, skip, limit order.
    pub fn apply<Q: CollectionQuery>(&self, query: Q) -> Q {
        query
            .find(&self.filter)
            .sort(&self.sort)
            .select(&self.projection)
            .skip(self.page.skip())
            .limit(self.page.limit)
    }
}
