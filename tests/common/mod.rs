#![allow(dead_code)]

use async_trait::async_trait;
use folio_cms::cms::{CmsError, CmsTransport, Document};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://cms.test";

/// Canned CMS: documents keyed by endpoint, unknown endpoints answer 404.
#[derive(Clone, Default)]
pub struct RecordingCms {
    documents: Arc<Mutex<HashMap<String, Result<Value, u16>>>>,
    post_responses: Arc<Mutex<VecDeque<Result<Value, u16>>>>,
    gets: Arc<Mutex<Vec<String>>>,
    posts: Arc<Mutex<Vec<(String, Value)>>>,
}

impl RecordingCms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, endpoint: impl Into<String>, body: Value) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(endpoint.into(), Ok(body));
        self
    }

    pub fn fail(self, endpoint: impl Into<String>, status: u16) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(endpoint.into(), Err(status));
        self
    }

    pub fn post_results(self, results: Vec<Result<Value, u16>>) -> Self {
        *self.post_responses.lock().unwrap() = VecDeque::from(results);
        self
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CmsTransport for RecordingCms {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    async fn get_document(&self, endpoint: &str) -> Result<Document, CmsError> {
        self.gets.lock().unwrap().push(endpoint.to_string());
        let canned = self.documents.lock().unwrap().get(endpoint).cloned();
        match canned {
            Some(Ok(body)) => Ok(serde_json::from_value(body)?),
            Some(Err(status)) => Err(CmsError::upstream(status, "canned failure")),
            None => Err(CmsError::upstream(404, format!("no canned response for {}", endpoint))),
        }
    }

    async fn post_document(&self, endpoint: &str, body: &Value) -> Result<Value, CmsError> {
        self.posts
            .lock()
            .unwrap()
            .push((endpoint.to_string(), body.clone()));
        let next = self.post_responses.lock().unwrap().pop_front();
        match next.unwrap_or(Ok(Value::Null)) {
            Ok(v) => Ok(v),
            Err(status) => Err(CmsError::upstream(status, "canned failure")),
        }
    }
}
