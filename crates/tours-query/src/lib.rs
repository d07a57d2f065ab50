mod error;
mod filter;
mod operator;
mod page;
pub mod params;
mod projection;
mod query;
mod sort;
mod translate;
mod value;

pub use error::ValidationError;
pub use filter::{FieldFilter, FilterSpec};
pub use operator::Operator;
pub use page::{DEFAULT_LIMIT, DEFAULT_PAGE, Page};
pub use params::{ParamValue, QueryParams, RESERVED_KEYS};
pub use projection::{Projection, parse_projection};
pub use query::{CollectionQuery, QueryDirectives};
pub use sort::{Sort, SortDirection, parse_sort};
pub use translate::{QueryTranslator, TranslateOptions};
pub use value::coerce;
