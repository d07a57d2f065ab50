use std::collections::BTreeMap;

use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::filter::{FieldFilter, FilterSpec};
use crate::operator::Operator;
use crate::page::{DEFAULT_PAGE, Page, parse_positive};
use crate::params::{ParamValue, QueryParams, is_reserved};
use crate::projection::{Projection, parse_projection};
use crate::query::QueryDirectives;
use crate::sort::{Sort, parse_sort};
use crate::value::coerce;

/// Defaults used when a request leaves a directive unspecified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    /// Page size when `limit` is missing or invalid.
    pub default_limit: usize,
    /// Sort list, in `sort` parameter syntax, used when `sort` is missing.
    pub default_sort: String,
    /// Fields excluded when `select` is missing.
    pub hidden_fields: Vec<String>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            default_limit: crate::page::DEFAULT_LIMIT,
            default_sort: "-createdAt".into(),
            hidden_fields: vec!["__v".into()],
        }
    }
}

/// Translates request parameters into query directives.
///
/// Every operation reads the borrowed parameters and returns a fresh value;
/// the parameters are never modified.
pub struct QueryTranslator<'a> {
    params: &'a QueryParams,
    options: Option<&'a TranslateOptions>,
}

impl<'a> QueryTranslator<'a> {
    pub fn new(params: &'a QueryParams) -> Self {
        QueryTranslator {
            params,
            options: None,
        }
    }

    pub fn with_options(params: &'a QueryParams, options: &'a TranslateOptions) -> Self {
        QueryTranslator {
            params,
            options: Some(options),
        }
    }

    /// Field constraints from every non-reserved parameter.
    ///
    /// `price[gte]=500` becomes a `gte` comparison, `difficulty=easy` an
    /// equality and a repeated plain key an any-of match. Operator keys
    /// outside `gte|gt|lte|lt|ne` are rejected.
    pub fn filter(&self) -> Result<FilterSpec, ValidationError> {
        let mut spec = FilterSpec::new();
        for (field, value) in self.params {
            if is_reserved(field) {
                continue;
            }
            let filter = match value {
                ParamValue::Single(raw) => FieldFilter::Equals(coerce(raw)),
                ParamValue::Many(raws) => {
                    FieldFilter::AnyOf(raws.iter().map(|raw| coerce(raw)).collect())
                }
                ParamValue::Map(ops) if ops.is_empty() => continue,
                ParamValue::Map(ops) => FieldFilter::Compare(comparisons(field, ops)?),
            };
            spec.insert(field.clone(), filter);
        }
        Ok(spec)
    }

    /// Sort keys from `sort`, or the configured default.
    pub fn sort(&self) -> Vec<Sort> {
        let requested = self
            .params
            .get("sort")
            .and_then(|value| value.joined(","))
            .map(|spec| parse_sort(&spec))
            .unwrap_or_default();

        if requested.is_empty() {
            parse_sort(&self.options().default_sort)
        } else {
            requested
        }
    }

    /// Projection from `select`, or everything but the hidden fields.
    pub fn select(&self) -> Result<Projection, ValidationError> {
        let requested = match self.params.get("select").and_then(|value| value.joined(",")) {
            Some(spec) => parse_projection(&spec)?,
            None => Projection::All,
        };

        match requested {
            Projection::All => Ok(self.default_projection()),
            projection => Ok(projection),
        }
    }

    /// Page and page size. Invalid values fall back to the defaults.
    pub fn paginate(&self) -> Page {
        let page = self.positive("page").unwrap_or(DEFAULT_PAGE);
        let limit = self
            .positive("limit")
            .unwrap_or(self.options().default_limit);
        Page::new(page, limit)
    }

    /// Run all four translations.
    pub fn translate(&self) -> Result<QueryDirectives, ValidationError> {
        Ok(QueryDirectives::default()
            .with_filter(self.filter()?)
            .with_sort(self.sort())
            .with_projection(self.select()?)
            .with_page(self.paginate()))
    }

    fn options(&self) -> &TranslateOptions {
        match self.options {
            Some(options) => options,
            None => default_options(),
        }
    }

    fn default_projection(&self) -> Projection {
        let hidden = &self.options().hidden_fields;
        if hidden.is_empty() {
            Projection::All
        } else {
            Projection::Exclude(hidden.clone())
        }
    }

    fn positive(&self, key: &str) -> Option<usize> {
        self.params
            .get(key)
            .and_then(ParamValue::as_single)
            .and_then(parse_positive)
    }
}

fn default_options() -> &'static TranslateOptions {
    static DEFAULT: std::sync::OnceLock<TranslateOptions> = std::sync::OnceLock::new();
    DEFAULT.get_or_init(TranslateOptions::default)
}

fn comparisons(
    field: &str,
    ops: &BTreeMap<String, ParamValue>,
) -> Result<BTreeMap<Operator, Bson>, ValidationError> {
    let mut out = BTreeMap::new();
    for (key, value) in ops {
        let op = Operator::from_key(key).ok_or_else(|| ValidationError::UnknownOperator {
            field: field.to_string(),
            key: key.clone(),
        })?;
        let raw = match value {
            ParamValue::Single(raw) => raw,
            ParamValue::Many(_) => {
                return Err(ValidationError::RepeatedOperator {
                    field: field.to_string(),
                    key: key.clone(),
                });
            }
            ParamValue::Map(_) => {
                return Err(ValidationError::NestedOperator {
                    field: field.to_string(),
                    key: key.clone(),
                });
            }
        };
        out.insert(op, coerce(raw));
    }
    Ok(out)
}
