//! Relationship resolution against a document's included set.
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::index::ResourceIndex;
use super::model::{Resource, ResourceRef};
use crate::model::Image;

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme regex"));

/// First reference of a relationship, or the single one. Absent relationships yield `None`.
pub fn resolve_one<'a>(resource: &'a Resource, field: &str) -> Option<&'a ResourceRef> {
    resource.relationships.get(field)?.data.as_ref()?.first()
}

/// Every reference of a relationship, in document order.
pub fn resolve_many<'a>(resource: &'a Resource, field: &str) -> &'a [ResourceRef] {
    resource
        .relationships
        .get(field)
        .and_then(|rel| rel.data.as_ref())
        .map(|data| data.as_slice())
        .unwrap_or(&[])
}

/// Prefix `base_url` onto media paths that carry no scheme.
pub fn absolute_url(base_url: &str, url: &str) -> String {
    if SCHEME_RE.is_match(url) || url.starts_with("//") {
        url.to_string()
    } else if url.starts_with('/') {
        format!("{}{}", base_url, url)
    } else {
        format!("{}/{}", base_url, url)
    }
}

fn image_for(reference: &ResourceRef, index: &ResourceIndex<'_>, base_url: &str) -> Option<Image> {
    let url = index
        .get(reference)?
        .get("uri")
        .and_then(|uri| uri.get("url"))
        .and_then(Value::as_str)?;
    Some(Image {
        url: absolute_url(base_url, url),
        alt: reference.alt().map(str::to_string),
    })
}

/// Primary image behind `field`.
pub fn resolve_image(
    resource: &Resource,
    field: &str,
    index: &ResourceIndex<'_>,
    base_url: &str,
) -> Option<Image> {
    image_for(resolve_one(resource, field)?, index, base_url)
}

/// Gallery behind `field`; unresolved references are dropped.
pub fn resolve_images(
    resource: &Resource,
    field: &str,
    index: &ResourceIndex<'_>,
    base_url: &str,
) -> Vec<Image> {
    resolve_many(resource, field)
        .iter()
        .filter_map(|r| image_for(r, index, base_url))
        .collect()
}

/// `name` attribute of every referenced term that made it into the included set.
pub fn resolve_names(resource: &Resource, field: &str, index: &ResourceIndex<'_>) -> Vec<String> {
    resolve_many(resource, field)
        .iter()
        .filter_map(|r| index.get(r)?.get("name")?.as_str().map(str::to_string))
        .collect()
}
