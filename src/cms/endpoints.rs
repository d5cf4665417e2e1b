//! Upstream JSON:API paths, relative to the configured base URL.
use urlencoding::encode;

pub const PAGES: &str = "/jsonapi/node/pages";
pub const PROJECTS: &str = "/jsonapi/node/projects";
pub const CONTACT_MESSAGE: &str = "/jsonapi/contact_message";

pub const FIELD_SLUG: &str = "field_slug";
pub const FIELD_IMAGE: &str = "field_image";
pub const FIELD_CATEGORY: &str = "field_category";
pub const FIELD_INTERNAL_ID: &str = "drupal_internal__nid";

pub fn pages() -> String {
    PAGES.to_string()
}

pub fn page_by_slug(slug: &str) -> String {
    format!(
        "{}?filter[{}][value]={}&include={}",
        PAGES,
        FIELD_SLUG,
        encode(slug),
        FIELD_IMAGE
    )
}

pub fn page_by_internal_id(nid: &str) -> String {
    format!("{}?filter[{}][value]={}", PAGES, FIELD_INTERNAL_ID, encode(nid))
}

pub fn projects() -> String {
    format!("{}?include={},{}", PROJECTS, FIELD_IMAGE, FIELD_CATEGORY)
}

pub fn project_by_slug(slug: &str) -> String {
    format!(
        "{}?filter[{}][value]={}&include={},{}",
        PROJECTS,
        FIELD_SLUG,
        encode(slug),
        FIELD_IMAGE,
        FIELD_CATEGORY
    )
}

pub fn project_by_internal_id(nid: &str) -> String {
    format!("{}?filter[{}][value]={}", PROJECTS, FIELD_INTERNAL_ID, encode(nid))
}

pub fn menu_link_content(menu_id: &str) -> String {
    format!("/jsonapi/menu_link_content/{}", encode(menu_id))
}

pub fn menu_items(menu_id: &str) -> String {
    format!("/jsonapi/menu_items/{}", encode(menu_id))
}

/// Contact message collection for a form bundle; `None` targets the generic bundle.
pub fn contact_message(form_id: Option<&str>) -> String {
    match form_id {
        Some(id) => format!("{}/{}", CONTACT_MESSAGE, encode(id)),
        None => CONTACT_MESSAGE.to_string(),
    }
}
