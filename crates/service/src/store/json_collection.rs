use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tokio::{fs, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

use super::{
    sort_documents, values_equal, DeleteResult, Document, DocumentStore, Filter, FindOptions,
    InsertOneResult, UpdateResult, ID_FIELD,
};
use crate::errors::ServiceError;

/// JSON file-backed document collection.
///
/// Keeps the documents of one collection in memory in insertion order and
/// rewrites the backing file (a JSON array) after every mutation. The write
/// lock is held while persisting so the file never lags behind a later write.
#[derive(Clone)]
pub struct JsonCollection {
    name: String,
    inner: Arc<RwLock<Vec<Document>>>,
    file_path: PathBuf,
}

impl JsonCollection {
    /// Open a collection from a path. Creates the file with an empty array if missing.
    pub async fn open<P: Into<PathBuf>>(name: &str, path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }

        let docs: Vec<Document> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{} is not a JSON array of documents: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&file_path, b"[]").await.map_err(ServiceError::storage)?;
                Vec::new()
            }
            Err(e) => {
                return Err(ServiceError::Storage(format!("cannot read {}: {e}", file_path.display())));
            }
        };
        debug!(collection = %name, count = docs.len(), path = %file_path.display(), "collection_opened");

        Ok(Arc::new(Self { name: name.to_string(), inner: Arc::new(RwLock::new(docs)), file_path }))
    }

    async fn persist(&self, docs: &[Document]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(docs).map_err(ServiceError::storage)?;
        fs::write(&self.file_path, data).await.map_err(ServiceError::storage)?;
        Ok(())
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for JsonCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, mut doc: Document) -> Result<InsertOneResult, ServiceError> {
        let id = doc
            .entry(ID_FIELD)
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()))
            .clone();

        let mut docs = self.inner.write().await;
        let duplicate = docs
            .iter()
            .any(|d| d.get(ID_FIELD).is_some_and(|existing| values_equal(existing, &id)));
        if duplicate {
            return Err(ServiceError::DuplicateKey(id.to_string()));
        }
        docs.push(doc);
        if let Err(e) = self.persist(&docs).await {
            docs.pop();
            return Err(e);
        }
        debug!(collection = %self.name, id = %id, "document_inserted");
        Ok(InsertOneResult { acknowledged: true, inserted_id: id })
    }

    async fn find(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<Document>, ServiceError> {
        let docs = self.inner.read().await;
        let mut out: Vec<Document> = docs.iter().filter(|d| filter.matches(d)).cloned().collect();
        drop(docs);
        if let Some(sort) = &options.sort {
            sort_documents(&mut out, sort);
        }
        Ok(out)
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, ServiceError> {
        let docs = self.inner.read().await;
        Ok(docs.iter().find(|d| filter.matches(d)).cloned())
    }

    async fn update_one(&self, filter: &Filter, set: Document) -> Result<UpdateResult, ServiceError> {
        if set.keys().any(|k| k == ID_FIELD || k.starts_with(&format!("{ID_FIELD}."))) {
            return Err(ServiceError::Validation("the _id field is immutable".into()));
        }

        let mut docs = self.inner.write().await;
        let Some(index) = docs.iter().position(|d| filter.matches(d)) else {
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_id: None,
                upserted_count: 0,
            });
        };

        let mut updated = docs[index].clone();
        let mut modified = false;
        for (path, value) in set {
            modified |= set_path(&mut updated, &path, value)?;
        }
        if modified {
            let previous = std::mem::replace(&mut docs[index], updated);
            if let Err(e) = self.persist(&docs).await {
                docs[index] = previous;
                return Err(e);
            }
        }
        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_id: None,
            upserted_count: 0,
        })
    }

    async fn delete_one(&self, filter: &Filter) -> Result<DeleteResult, ServiceError> {
        let mut docs = self.inner.write().await;
        let Some(index) = docs.iter().position(|d| filter.matches(d)) else {
            return Ok(DeleteResult { acknowledged: true, deleted_count: 0 });
        };
        let removed = docs.remove(index);
        if let Err(e) = self.persist(&docs).await {
            docs.insert(index, removed);
            return Err(e);
        }
        Ok(DeleteResult { acknowledged: true, deleted_count: 1 })
    }
}

/// Assign `value` at a dotted path, creating intermediate objects.
/// Returns whether the document changed.
fn set_path(doc: &mut Document, path: &str, value: Value) -> Result<bool, ServiceError> {
    match path.split_once('.') {
        None => {
            if doc.get(path).is_some_and(|old| *old == value) {
                return Ok(false);
            }
            doc.insert(path.to_string(), value);
            Ok(true)
        }
        Some((head, rest)) => {
            let child = doc
                .entry(head)
                .or_insert_with(|| Value::Object(Document::new()));
            match child {
                Value::Object(map) => set_path(map, rest, value),
                _ => Err(ServiceError::Validation(format!("cannot create field '{rest}' in non-object '{head}'"))),
            }
        }
    }
}
