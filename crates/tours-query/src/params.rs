use std::collections::BTreeMap;
use std::collections::btree_map::{self, Entry};

use serde::{Deserialize, Serialize};

/// Parameter names that drive pagination, projection and ordering.
/// They are never treated as filter fields.
pub const RESERVED_KEYS: [&str; 4] = ["page", "limit", "sort", "select"];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// A single query-string value.
///
/// `name=x` is `Single`, a repeated `name` (or `name[]`) is `Many`, and a
/// bracketed suffix such as `price[gte]=500` is `Map`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    Many(Vec<String>),
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ParamValue::Single(s) => Some(s),
            _ => None,
        }
    }

    /// Join `Single`/`Many` values with `sep`. `Map` has no flat form.
    pub fn joined(&self, sep: &str) -> Option<String> {
        match self {
            ParamValue::Single(s) => Some(s.clone()),
            ParamValue::Many(values) => Some(values.join(sep)),
            ParamValue::Map(_) => None,
        }
    }

    fn push(&mut self, value: String) {
        match self {
            ParamValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = ParamValue::Many(vec![first, value]);
            }
            ParamValue::Many(values) => values.push(value),
            // A plain value on a key already used with brackets is kept under
            // the empty sub-key so the conflict surfaces during translation.
            ParamValue::Map(map) => push_into(map.entry(String::new()), value, false),
        }
    }

    /// Turn a flat value into a map, keeping the flat part under `""`.
    fn ensure_map(&mut self) -> &mut BTreeMap<String, ParamValue> {
        if !matches!(self, ParamValue::Map(_)) {
            let flat = std::mem::replace(self, ParamValue::Map(BTreeMap::new()));
            if let ParamValue::Map(map) = self {
                map.insert(String::new(), flat);
            }
        }
        match self {
            ParamValue::Map(map) => map,
            _ => unreachable!("value was just converted to a map"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Many(values)
    }
}

/// Query-string parameters of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, ParamValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string such as `price[gte]=500&sort=-price`.
    ///
    /// A leading `?` is ignored. Names and values are percent-decoded before
    /// brackets are interpreted, so `price%5Bgte%5D=500` reads the same as
    /// `price[gte]=500`. Pairs with an empty name are dropped.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = QueryParams::new();
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params.append(&name, value.into_owned());
        }
        params
    }

    /// Add one `name=value` pair, interpreting brackets in `name`.
    pub fn append(&mut self, name: &str, value: String) {
        let (base, path) = split_key(name);
        if base.is_empty() {
            return;
        }
        insert_path(&mut self.0, base, &path, value);
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Replace the value of `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        QueryParams(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Split `price[gte][x]` into `("price", ["gte", "x"])`.
///
/// Keys with unbalanced or trailing text after the brackets are returned
/// whole with no path.
fn split_key(name: &str) -> (&str, Vec<&str>) {
    let Some(open) = name.find('[') else {
        return (name, Vec::new());
    };
    if open == 0 {
        return (name, Vec::new());
    }

    let (base, mut rest) = name.split_at(open);
    let mut path = Vec::new();
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return (name, Vec::new());
        };
        let Some(close) = inner.find(']') else {
            return (name, Vec::new());
        };
        let segment = &inner[..close];
        if segment.contains('[') {
            return (name, Vec::new());
        }
        path.push(segment);
        rest = &inner[close + 1..];
    }
    (base, path)
}

fn insert_path(map: &mut BTreeMap<String, ParamValue>, key: &str, path: &[&str], value: String) {
    match path.split_first() {
        None => push_into(map.entry(key.to_string()), value, false),
        // `tags[]=a` appends to a list
        Some((&"", _)) => push_into(map.entry(key.to_string()), value, true),
        Some((&sub, rest)) => {
            let slot = map
                .entry(key.to_string())
                .or_insert_with(|| ParamValue::Map(BTreeMap::new()));
            insert_path(slot.ensure_map(), sub, rest, value);
        }
    }
}

fn push_into(entry: Entry<'_, String, ParamValue>, value: String, as_list: bool) {
    match entry {
        Entry::Vacant(slot) if as_list => {
            slot.insert(ParamValue::Many(vec![value]));
        }
        Entry::Vacant(slot) => {
            slot.insert(ParamValue::Single(value));
        }
        Entry::Occupied(mut slot) => slot.get_mut().push(value),
    }
}
