use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    app::DatabaseError,
    persistence::{DatabaseResult, open_connection},
    sanitize::sanitize,
};

#[derive(Clone, Debug, PartialEq)]
pub enum LookupOutcome {
    Found(String),
    NotFound,
}

/// Looks up stored free text by author name. Name patterns use LIKE
/// semantics, so caller-supplied wildcards apply.
pub trait RecordRepository {
    fn lookup_record(&self, first_name: &str, last_name: &str) -> DatabaseResult<LookupOutcome>;
}

pub struct RecordRepositoryImpl {
    db_path: String,
}

impl RecordRepositoryImpl {
    pub fn new() -> Self {
        let db_path =
            std::env::var("RECORDS_DB_PATH").unwrap_or_else(|_| "records.db".to_string());
        Self { db_path }
    }

    pub fn with_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl RecordRepository for RecordRepositoryImpl {
    fn lookup_record(&self, first_name: &str, last_name: &str) -> DatabaseResult<LookupOutcome> {
        let conn = open_connection(&self.db_path)?;
        let mut stmt = conn
            .prepare("SELECT thedata FROM blogdata WHERE firstname LIKE ?1 AND lastname LIKE ?2")
            .map_err(|e| DatabaseError::QueryError(e))?;
        let row_iter = stmt
            .query_map([first_name, last_name], |row| row.get::<_, String>(0))
            .map_err(|e| DatabaseError::QueryError(e))?;

        let mut texts = Vec::new();
        for text in row_iter {
            texts.push(text.map_err(|e| DatabaseError::QueryError(e))?);
        }

        if texts.is_empty() {
            return Ok(LookupOutcome::NotFound);
        }
        Ok(LookupOutcome::Found(sanitize(&texts.concat())))
    }
}

#[derive(Clone, Default)]
pub struct MockRecordRepository {
    pub records: Arc<Mutex<HashMap<(String, String), String>>>,
    pub requested_names: Arc<Mutex<Vec<(String, String)>>>,
}

#[allow(unused)]
impl MockRecordRepository {
    pub fn insert(&self, first_name: &str, last_name: &str, text: &str) {
        self.records.lock().unwrap().insert(
            (first_name.to_string(), last_name.to_string()),
            text.to_string(),
        );
    }

    pub fn get_requested_names(&self) -> Vec<(String, String)> {
        self.requested_names.lock().unwrap().clone()
    }
}

impl RecordRepository for MockRecordRepository {
    fn lookup_record(&self, first_name: &str, last_name: &str) -> DatabaseResult<LookupOutcome> {
        self.requested_names
            .lock()
            .unwrap()
            .push((first_name.to_string(), last_name.to_string()));
        let records = self.records.lock().unwrap();
        match records.get(&(first_name.to_string(), last_name.to_string())) {
            Some(text) => Ok(LookupOutcome::Found(text.clone())),
            None => Ok(LookupOutcome::NotFound),
        }
    }
}
