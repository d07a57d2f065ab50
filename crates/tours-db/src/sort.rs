use std::cmp::Ordering;

use bson::Document;
use tours_query::{Sort, SortDirection};

use crate::compare::sort_order;
use crate::eval::get_path;

/// Stable multi-key sort. Later keys only break ties of earlier ones.
pub(crate) fn sort_documents(docs: &mut [Document], sorts: &[Sort]) {
    if sorts.is_empty() {
        return;
    }

    docs.sort_by(|a, b| {
        for sort in sorts {
            let ord = sort_order(get_path(a, &sort.field), get_path(b, &sort.field));
            let ord = match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}
