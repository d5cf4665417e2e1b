//! Navigation menu mapper.
//!
//! The CMS exposes menus through different collections depending on its
//! configuration, so the mapper tries each [`MenuSource`] in turn and keeps the
//! first one that yields usable top-level links. Internal `/node/{id}` links are
//! rewritten to slug paths when the target page or project can be found.
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};
use tracing::{debug, instrument, warn};

use crate::cms::endpoints::{self, FIELD_SLUG};
use crate::cms::model::Attributes;
use crate::cms::{CmsError, CmsTransport, Document};
use crate::model::MenuItem;

static NODE_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/node/(\d+)([?#].*)?$").expect("node path regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSource {
    LinkContent,
    MenuItems,
}

impl MenuSource {
    /// Sources in the order they are tried.
    pub const ALL: [MenuSource; 2] = [MenuSource::LinkContent, MenuSource::MenuItems];

    pub fn endpoint(self, menu_id: &str) -> String {
        match self {
            MenuSource::LinkContent => endpoints::menu_link_content(menu_id),
            MenuSource::MenuItems => endpoints::menu_items(menu_id),
        }
    }
}

/// A top-level menu entry before node links are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMenuLink {
    pub title: String,
    pub href: String,
    pub weight: Number,
}

fn is_top_level(attrs: &Attributes) -> bool {
    match attrs.get("parent") {
        None | Some(Value::Null) => true,
        Some(Value::String(p)) => p.is_empty() || p.starts_with("menu:"),
        Some(_) => false,
    }
}

fn is_enabled(attrs: &Attributes) -> bool {
    !matches!(attrs.get("enabled"), Some(Value::Bool(false)))
}

/// Link target from `url.uri`, `link.uri`, `url` or `link`, whichever is a non-empty string first.
fn link_target(attrs: &Attributes) -> Option<&str> {
    [
        nested_uri(attrs, "url"),
        nested_uri(attrs, "link"),
        bare_str(attrs, "url"),
        bare_str(attrs, "link"),
    ]
    .into_iter()
    .flatten()
    .find(|s| !s.is_empty())
}

fn nested_uri<'a>(attrs: &'a Attributes, name: &str) -> Option<&'a str> {
    attrs.get(name)?.get("uri")?.as_str()
}

fn bare_str<'a>(attrs: &'a Attributes, name: &str) -> Option<&'a str> {
    attrs.get(name)?.as_str()
}

/// Weight as the CMS sent it; missing or non-numeric weights count as 0.
fn weight_of(attrs: &Attributes) -> Number {
    match attrs.get("weight") {
        Some(Value::Number(n)) => n.clone(),
        _ => Number::from(0),
    }
}

fn sort_weight(weight: &Number) -> f64 {
    weight.as_f64().unwrap_or(0.0)
}

/// Strip the `internal:` scheme and turn `entity:node/N` into `/node/N`.
pub fn normalize_link(raw: &str) -> String {
    let href = raw.strip_prefix("internal:").unwrap_or(raw);
    match href.strip_prefix("entity:") {
        Some(rest) if rest.starts_with("node/") => format!("/{}", rest),
        _ => href.to_string(),
    }
}

/// Numeric id of a `/node/{id}` path and any trailing query or fragment.
pub fn node_target(href: &str) -> Option<(&str, &str)> {
    let caps = NODE_PATH_RE.captures(href)?;
    let id = caps.get(1)?.as_str();
    let suffix = caps.get(2).map_or("", |m| m.as_str());
    Some((id, suffix))
}

/// Top-level, enabled entries of a menu document, in document order.
pub fn parse_menu_links(doc: &Document) -> Vec<RawMenuLink> {
    doc.resources()
        .iter()
        .filter_map(|item| {
            let attrs = &item.attributes;
            if !is_enabled(attrs) || !is_top_level(attrs) {
                return None;
            }
            let href = normalize_link(link_target(attrs)?);
            let title = attrs
                .get("title")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .or_else(|| attrs.get("label").and_then(Value::as_str))
                .unwrap_or_default()
                .to_string();
            Some(RawMenuLink {
                title,
                href,
                weight: weight_of(attrs),
            })
        })
        .collect()
}

async fn lookup_slug(cms: &dyn CmsTransport, endpoint: &str) -> Result<Option<String>, CmsError> {
    let doc = cms.get_document(endpoint).await?;
    Ok(doc
        .first()
        .and_then(|node| node.attr_str(FIELD_SLUG))
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

/// Slug path of node `nid`, trying pages before projects. Lookup failures are logged and skipped.
pub async fn resolve_node_path(cms: &dyn CmsTransport, nid: &str) -> Option<String> {
    match lookup_slug(cms, &endpoints::page_by_internal_id(nid)).await {
        Ok(Some(slug)) => return Some(format!("/{}", slug)),
        Ok(None) => {}
        Err(err) => warn!(%err, nid, "page lookup for menu link failed"),
    }
    match lookup_slug(cms, &endpoints::project_by_internal_id(nid)).await {
        Ok(Some(slug)) => return Some(format!("/projects/{}", slug)),
        Ok(None) => {}
        Err(err) => warn!(%err, nid, "project lookup for menu link failed"),
    }
    debug!(nid, "menu link left as node path");
    None
}

async fn resolve_link(cms: &dyn CmsTransport, link: RawMenuLink) -> MenuItem {
    let target = node_target(&link.href)
        .map(|(id, suffix)| (id.to_string(), suffix.to_string()));
    let href = match target {
        Some((nid, suffix)) => match resolve_node_path(cms, &nid).await {
            Some(path) => path + &suffix,
            None => link.href,
        },
        None => link.href,
    };
    MenuItem {
        title: link.title,
        href,
        weight: link.weight,
    }
}

/// Menu entries sorted by ascending weight; equal weights keep document order.
///
/// Returns an empty list when no source produced a usable entry.
#[instrument(skip(cms))]
pub async fn fetch_menu(cms: &dyn CmsTransport, menu_id: &str) -> Vec<MenuItem> {
    for source in MenuSource::ALL {
        let endpoint = source.endpoint(menu_id);
        let links = match cms.get_document(&endpoint).await {
            Ok(doc) => parse_menu_links(&doc),
            Err(err) => {
                warn!(%err, ?source, "menu source failed");
                continue;
            }
        };
        if links.is_empty() {
            debug!(?source, "menu source had no usable links");
            continue;
        }

        let mut items = join_all(links.into_iter().map(|link| resolve_link(cms, link))).await;
        items.sort_by(|a, b| sort_weight(&a.weight).total_cmp(&sort_weight(&b.weight)));
        debug!(?source, count = items.len(), "menu loaded");
        return items;
    }
    warn!("no menu source produced links");
    Vec::new()
}
