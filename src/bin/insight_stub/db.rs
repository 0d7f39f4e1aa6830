//! Schema-agnostic in-memory document store with optimistic versioning.

use std::collections::HashMap;

use anyhow::anyhow;

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(super) enum Kind {
    Project,
    Mission,
    Annotation,
    FlightPlan,
    Flight,
    Camera,
}

impl Kind {
    /// Field holding the owning project's id.
    fn project_field(self) -> &'static str {
        match self {
            Kind::Mission | Kind::Flight => "project",
            _ => "project_id",
        }
    }
}

#[derive(Debug)]
pub(super) enum DbError {
    NotFound,
    Conflict,
    Invalid(String),
}

/// Filter accepted by the `.../search` endpoints.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub(super) struct Filter {
    search: Option<String>,
    project_id: Option<String>,
    mission_id: Option<String>,
}

#[derive(Default)]
pub(super) struct Db {
    docs: HashMap<Kind, Vec<Value>>,
}

impl Db {
    /// Stores `doc` with a fresh `_id` and `__v = 0`.
    pub(super) fn insert(&mut self, kind: Kind, mut doc: Value) -> Result<Value, DbError> {
        let obj = doc
            .as_object_mut()
            .ok_or_else(|| DbError::Invalid("body must be a JSON object".to_string()))?;
        let id = new_id().map_err(|e| DbError::Invalid(e.to_string()))?;
        obj.insert("_id".to_string(), Value::String(id));
        obj.insert("__v".to_string(), json!(0));
        self.docs.entry(kind).or_default().push(doc.clone());
        Ok(doc)
    }

    pub(super) fn get(&self, kind: Kind, id: &str) -> Result<Value, DbError> {
        self.docs
            .get(&kind)
            .and_then(|docs| docs.iter().find(|d| doc_id(d) == Some(id)))
            .cloned()
            .ok_or(DbError::NotFound)
    }

    /// Shallow-merges `patch` into the stored document and bumps `__v`.
    ///
    /// A `__v` in the patch must equal the stored version.
    pub(super) fn update(&mut self, kind: Kind, id: &str, patch: Value) -> Result<Value, DbError> {
        let Value::Object(patch) = patch else {
            return Err(DbError::Invalid("body must be a JSON object".to_string()));
        };
        let doc = self
            .docs
            .get_mut(&kind)
            .and_then(|docs| docs.iter_mut().find(|d| doc_id(d) == Some(id)))
            .ok_or(DbError::NotFound)?;

        let current = doc.get("__v").and_then(Value::as_u64).unwrap_or(0);
        if let Some(sent) = patch.get("__v").and_then(Value::as_u64)
            && sent != current
        {
            return Err(DbError::Conflict);
        }

        let obj = doc
            .as_object_mut()
            .ok_or_else(|| DbError::Invalid("stored document is not an object".to_string()))?;
        for (key, value) in patch {
            if key != "_id" && key != "__v" {
                obj.insert(key, value);
            }
        }
        obj.insert("__v".to_string(), json!(current + 1));
        Ok(doc.clone())
    }

    /// Matching documents in insertion order.
    pub(super) fn search(&self, kind: Kind, filter: &Filter) -> Vec<Value> {
        let Some(docs) = self.docs.get(&kind) else {
            return Vec::new();
        };
        docs.iter()
            .filter(|d| {
                filter
                    .project_id
                    .as_deref()
                    .is_none_or(|p| str_field(d, kind.project_field()) == Some(p))
            })
            .filter(|d| {
                filter
                    .mission_id
                    .as_deref()
                    .is_none_or(|m| str_field(d, "mission_id") == Some(m))
            })
            .filter(|d| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|s| str_field(d, "name").is_some_and(|n| n.contains(s)))
            })
            .cloned()
            .collect()
    }

    /// Removes a project and everything that belongs to it.
    pub(super) fn remove_project(&mut self, id: &str) -> Result<Value, DbError> {
        let project = self.get(Kind::Project, id)?;
        for (kind, docs) in self.docs.iter_mut() {
            if *kind == Kind::Project {
                docs.retain(|d| doc_id(d) != Some(id));
            } else {
                docs.retain(|d| str_field(d, kind.project_field()) != Some(id));
            }
        }
        Ok(project)
    }
}

fn doc_id(doc: &Value) -> Option<&str> {
    str_field(doc, "_id")
}

fn str_field<'a>(doc: &'a Value, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

/// 12 random bytes, hex-encoded, like the service's object ids.
fn new_id() -> anyhow::Result<String> {
    let mut bytes = [0u8; 12];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(24);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}
