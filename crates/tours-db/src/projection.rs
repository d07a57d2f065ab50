use std::collections::HashMap;

use bson::{Bson, Document};
use tours_query::Projection;

/// A pre-built tree of dot-notation field paths.
///
/// Given `["startLocation.address", "name"]`, builds:
/// ```text
/// { "startLocation": Branch({ "address": Leaf }), "name": Leaf }
/// ```
#[derive(Debug, Clone, PartialEq)]
enum FieldTree {
    /// Take the entire field value.
    Leaf,
    /// Recurse into sub-fields.
    Branch(HashMap<String, FieldTree>),
}

impl FieldTree {
    fn from_paths(paths: &[String]) -> HashMap<String, FieldTree> {
        let mut root = HashMap::new();
        for path in paths {
            insert_path(&mut root, path);
        }
        root
    }
}

fn insert_path(tree: &mut HashMap<String, FieldTree>, path: &str) {
    match path.split_once('.') {
        None => {
            // A shorter path already selects the whole subtree.
            tree.insert(path.to_string(), FieldTree::Leaf);
        }
        Some((head, rest)) => {
            let node = tree
                .entry(head.to_string())
                .or_insert_with(|| FieldTree::Branch(HashMap::new()));
            if let FieldTree::Branch(children) = node {
                insert_path(children, rest);
            }
        }
    }
}

/// Apply a projection to one document.
pub(crate) fn project(doc: &Document, projection: &Projection) -> Document {
    match projection {
        Projection::All => doc.clone(),
        Projection::Include(fields) => {
            let tree = FieldTree::from_paths(fields);
            let mut out = Document::new();
            if let Some(id) = doc.get("_id") {
                out.insert("_id", id.clone());
            }
            include(doc, &tree, &mut out);
            out
        }
        Projection::Exclude(fields) => {
            let mut out = doc.clone();
            for field in fields {
                exclude(&mut out, field);
            }
            out
        }
    }
}

/// Widen a projection so it also drops `hidden` fields. An explicit
/// inclusion list is left alone: naming a hidden field selects it.
pub(crate) fn hide(projection: &Projection, hidden: &[String]) -> Projection {
    match projection {
        Projection::Include(_) => projection.clone(),
        _ if hidden.is_empty() => projection.clone(),
        Projection::All => Projection::Exclude(hidden.to_vec()),
        Projection::Exclude(fields) => {
            let mut fields = fields.clone();
            for field in hidden {
                if !fields.contains(field) {
                    fields.push(field.clone());
                }
            }
            Projection::Exclude(fields)
        }
    }
}

fn include(src: &Document, tree: &HashMap<String, FieldTree>, dest: &mut Document) {
    for (key, value) in src {
        // always included
        if key == "_id" {
            continue;
        }

        let Some(node) = tree.get(key) else {
            continue;
        };

        match (node, value) {
            (FieldTree::Leaf, _) => {
                dest.insert(key.clone(), value.clone());
            }
            (FieldTree::Branch(children), Bson::Document(sub)) => {
                let mut trimmed = Document::new();
                include(sub, children, &mut trimmed);
                dest.insert(key.clone(), trimmed);
            }
            (FieldTree::Branch(children), Bson::Array(items)) => {
                let projected = items
                    .iter()
                    .filter_map(|item| match item {
                        Bson::Document(sub) => {
                            let mut trimmed = Document::new();
                            include(sub, children, &mut trimmed);
                            Some(Bson::Document(trimmed))
                        }
                        _ => None,
                    })
                    .collect::<Vec<_>>();
                dest.insert(key.clone(), projected);
            }
            (FieldTree::Branch(_), _) => {}
        }
    }
}

fn exclude(doc: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            doc.remove(path);
        }
        Some((head, rest)) => match doc.get_mut(head) {
            Some(Bson::Document(sub)) => exclude(sub, rest),
            Some(Bson::Array(items)) => {
                for item in items {
                    if let Bson::Document(sub) = item {
                        exclude(sub, rest);
                    }
                }
            }
            _ => {}
        },
    }
}
