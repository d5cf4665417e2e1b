use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Open attribute set of a resource, kept in document order.
pub type Attributes = Map<String, Value>;

/// A JSON:API field that may hold a single item or a list of them.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => std::slice::from_ref(item),
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }
}

/// Top-level response envelope.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Document {
    #[serde(default)]
    pub data: Option<OneOrMany<Resource>>,
    #[serde(default)]
    pub included: Vec<Resource>,
}

impl Document {
    /// Primary resources, empty when `data` is null or missing.
    pub fn resources(&self) -> &[Resource] {
        self.data.as_ref().map(OneOrMany::as_slice).unwrap_or(&[])
    }

    pub fn first(&self) -> Option<&Resource> {
        self.resources().first()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub relationships: HashMap<String, Relationship>,
}

impl Resource {
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<OneOrMany<ResourceRef>>,
}

/// `{type, id}` pointer into the included set.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub typ: String,
    pub id: String,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
}

impl ResourceRef {
    pub fn key(&self) -> String {
        index_key(&self.typ, &self.id)
    }

    /// Alt text carried on image references.
    pub fn alt(&self) -> Option<&str> {
        self.meta.as_ref()?.get("alt")?.as_str()
    }
}

pub(crate) fn index_key(typ: &str, id: &str) -> String {
    format!("{}:{}", typ, id)
}
