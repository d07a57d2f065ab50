use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use imbl::OrdMap;
use tours_query::{CollectionQuery, FilterSpec, Projection, Sort};

use crate::error::DbError;
use crate::eval::matches;
use crate::projection::{hide, project};
use crate::sort::sort_documents;

/// Documents keyed by `_id`. Natural order is `_id` order.
pub(crate) type Records = OrdMap<String, Document>;

/// An in-memory document collection.
///
/// Readers take a snapshot of the current records (cheap due to imbl
/// structural sharing); writers serialize on a lock and swap in a new map.
pub struct MemoryCollection {
    name: String,
    records: ArcSwap<Records>,
    write_lock: Mutex<()>,
    scope: FilterSpec,
    hidden: Vec<String>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: ArcSwap::new(Arc::new(OrdMap::new())),
            write_lock: Mutex::new(()),
            scope: FilterSpec::new(),
            hidden: Vec::new(),
        }
    }

    /// Set a filter that every query and id lookup must also satisfy.
    /// Replaces any previous scope.
    pub fn with_scope(mut self, scope: FilterSpec) -> Self {
        self.scope = scope;
        self
    }

    /// Fields left out of every read unless a query includes them by name.
    pub fn with_hidden_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored documents, including those outside the scope.
    pub fn len(&self) -> usize {
        self.records.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert documents, assigning an `_id` to those without one.
    ///
    /// All-or-nothing: a duplicate or unusable `_id` leaves the collection
    /// unchanged.
    pub fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<String>, DbError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut records = (**self.records.load()).clone();
        let mut ids = Vec::with_capacity(docs.len());
        for mut doc in docs {
            let id = match doc.get("_id") {
                Some(value) => id_key(value)?,
                None => {
                    let id = ObjectId::new().to_hex();
                    doc.insert("_id", id.clone());
                    id
                }
            };
            if records.contains_key(&id) {
                return Err(DbError::DuplicateId(id));
            }
            records.insert(id.clone(), doc);
            ids.push(id);
        }

        self.records.store(Arc::new(records));
        tracing::debug!(collection = %self.name, inserted = ids.len(), "inserted documents");
        Ok(ids)
    }

    /// Remove every document. Returns how many were removed.
    pub fn delete_many(&self) -> usize {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let removed = self.records.load().len();
        self.records.store(Arc::new(OrdMap::new()));
        tracing::debug!(collection = %self.name, removed, "deleted documents");
        removed
    }

    /// Merge `changes` into the document with this `_id`, field by field.
    ///
    /// Returns the updated document as [`find_by_id`](Self::find_by_id)
    /// would, or `None` when no document in scope has the id. Changing
    /// `_id` is rejected.
    pub fn update_one(&self, id: &str, changes: Document) -> Result<Option<Document>, DbError> {
        if let Some(new_id) = changes.get("_id") {
            if id_key(new_id)? != id {
                return Err(DbError::InvalidDocument("_id cannot be changed".into()));
            }
        }

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let current = self.records.load_full();
        let Some(existing) = current.get(id).filter(|doc| matches(doc, &self.scope)) else {
            return Ok(None);
        };
        let mut updated = existing.clone();
        for (key, value) in changes {
            updated.insert(key, value);
        }

        let visible = self.visible(&updated);
        let mut records = (*current).clone();
        records.insert(id.to_string(), updated);
        self.records.store(Arc::new(records));
        tracing::debug!(collection = %self.name, id, "updated document");
        Ok(Some(visible))
    }

    /// Remove the document with this `_id` if it is in scope.
    pub fn delete_one(&self, id: &str) -> bool {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let current = self.records.load_full();
        if !current.get(id).is_some_and(|doc| matches(doc, &self.scope)) {
            return false;
        }
        let mut records = (*current).clone();
        records.remove(id);
        self.records.store(Arc::new(records));
        tracing::debug!(collection = %self.name, id, "deleted document");
        true
    }

    /// Fetch one document by `_id`, honouring the scope and hidden fields.
    pub fn find_by_id(&self, id: &str) -> Option<Document> {
        let records = self.records.load();
        records
            .get(id)
            .filter(|doc| matches(doc, &self.scope))
            .map(|doc| self.visible(doc))
    }

    fn visible(&self, doc: &Document) -> Document {
        project(doc, &hide(&Projection::All, &self.hidden))
    }

    /// Start a query over a snapshot of the current documents.
    pub fn query(&self) -> MemoryQuery {
        MemoryQuery {
            collection: self.name.clone(),
            records: self.records.load_full(),
            scope: self.scope.clone(),
            hidden: self.hidden.clone(),
            filter: FilterSpec::new(),
            sort: Vec::new(),
            projection: Projection::All,
            skip: 0,
            limit: None,
        }
    }
}

fn id_key(value: &Bson) -> Result<String, DbError> {
    match value {
        Bson::String(s) if !s.is_empty() => Ok(s.clone()),
        Bson::ObjectId(oid) => Ok(oid.to_hex()),
        Bson::Int32(n) => Ok(n.to_string()),
        Bson::Int64(n) => Ok(n.to_string()),
        other => Err(DbError::InvalidDocument(format!("unsupported _id: {other}"))),
    }
}

/// A query recorded step by step and run by [`MemoryQuery::exec`].
///
/// Each step replaces what an earlier call of the same step set.
#[derive(Debug, Clone)]
pub struct MemoryQuery {
    collection: String,
    records: Arc<Records>,
    scope: FilterSpec,
    hidden: Vec<String>,
    filter: FilterSpec,
    sort: Vec<Sort>,
    projection: Projection,
    skip: usize,
    limit: Option<usize>,
}

impl MemoryQuery {
    fn matching(&self) -> impl Iterator<Item = &Document> {
        self.records
            .values()
            .filter(|doc| matches(doc, &self.scope) && matches(doc, &self.filter))
    }

    /// Number of documents matching the scope and filter, ignoring skip and limit.
    pub fn count(&self) -> usize {
        self.matching().count()
    }

    /// Filter, sort, page, then project. Hidden fields are dropped unless
    /// the projection includes them by name.
    pub fn exec(&self) -> Vec<Document> {
        let mut docs: Vec<Document> = self.matching().cloned().collect();
        let matched = docs.len();
        sort_documents(&mut docs, &self.sort);
        let projection = hide(&self.projection, &self.hidden);

        let page: Vec<Document> = docs
            .iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|doc| project(doc, &projection))
            .collect();

        tracing::debug!(
            collection = %self.collection,
            matched,
            returned = page.len(),
            "executed query"
        );
        page
    }
}

impl CollectionQuery for MemoryQuery {
    fn find(mut self, filter: &FilterSpec) -> Self {
        self.filter = filter.clone();
        self
    }

    fn sort(mut self, sort: &[Sort]) -> Self {
        self.sort = sort.to_vec();
        self
    }

    fn select(mut self, projection: &Projection) -> Self {
        self.projection = projection.clone();
        self
    }

    fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}
