//! Page and project mappers.
use tracing::{debug, instrument};

use crate::cms::endpoints::{self, FIELD_CATEGORY, FIELD_IMAGE, FIELD_SLUG};
use crate::cms::extract::extract_html;
use crate::cms::resolve::{resolve_image, resolve_images, resolve_names};
use crate::cms::{CmsError, CmsTransport, Resource, ResourceIndex};
use crate::model::{CategoryListing, Page, PageSummary, Project, ProjectSummary};

/// Category slug that selects every project.
pub const ALL_CATEGORIES: &str = "all";

fn title_of(node: &Resource) -> String {
    node.attr_str("title").unwrap_or_default().to_string()
}

fn slug_of(node: &Resource) -> Option<&str> {
    node.attr_str(FIELD_SLUG).filter(|s| !s.is_empty())
}

#[instrument(skip_all)]
pub async fn fetch_all_pages(cms: &dyn CmsTransport) -> Result<Vec<PageSummary>, CmsError> {
    let doc = cms.get_document(&endpoints::pages()).await?;
    let pages: Vec<PageSummary> = doc
        .resources()
        .iter()
        .filter_map(|node| {
            Some(PageSummary {
                id: node.id.clone(),
                slug: slug_of(node)?.to_string(),
                title: title_of(node),
            })
        })
        .collect();
    debug!(total = doc.resources().len(), kept = pages.len(), "mapped pages");
    Ok(pages)
}

#[instrument(skip(cms))]
pub async fn fetch_page_by_slug(cms: &dyn CmsTransport, slug: &str) -> Result<Option<Page>, CmsError> {
    let doc = cms.get_document(&endpoints::page_by_slug(slug)).await?;
    let Some(node) = doc.first() else {
        debug!("no page matched slug");
        return Ok(None);
    };
    let index = ResourceIndex::build(&doc.included);
    Ok(Some(Page {
        title: title_of(node),
        html: extract_html(&node.attributes),
        image: resolve_image(node, FIELD_IMAGE, &index, cms.base_url()),
    }))
}

/// Listing entry for a project node; `None` when it has no slug.
pub fn project_summary(
    node: &Resource,
    index: &ResourceIndex<'_>,
    base_url: &str,
) -> Option<ProjectSummary> {
    let slug = slug_of(node)?;
    Some(ProjectSummary {
        id: node.id.clone(),
        slug: slug.to_string(),
        title: title_of(node),
        image: resolve_image(node, FIELD_IMAGE, index, base_url),
        categories: resolve_names(node, FIELD_CATEGORY, index),
    })
}

/// Detail view of a project node, including the full gallery.
pub fn project_detail(node: &Resource, index: &ResourceIndex<'_>, base_url: &str) -> Project {
    Project {
        title: title_of(node),
        html: extract_html(&node.attributes),
        image: resolve_image(node, FIELD_IMAGE, index, base_url),
        images: resolve_images(node, FIELD_IMAGE, index, base_url),
        categories: resolve_names(node, FIELD_CATEGORY, index),
    }
}

#[instrument(skip_all)]
pub async fn fetch_projects(cms: &dyn CmsTransport) -> Result<Vec<ProjectSummary>, CmsError> {
    let doc = cms.get_document(&endpoints::projects()).await?;
    let index = ResourceIndex::build(&doc.included);
    let projects: Vec<ProjectSummary> = doc
        .resources()
        .iter()
        .filter_map(|node| project_summary(node, &index, cms.base_url()))
        .collect();
    debug!(total = doc.resources().len(), kept = projects.len(), "mapped projects");
    Ok(projects)
}

#[instrument(skip(cms))]
pub async fn fetch_project_by_slug(
    cms: &dyn CmsTransport,
    slug: &str,
) -> Result<Option<Project>, CmsError> {
    let doc = cms.get_document(&endpoints::project_by_slug(slug)).await?;
    let Some(node) = doc.first() else {
        debug!("no project matched slug");
        return Ok(None);
    };
    let index = ResourceIndex::build(&doc.included);
    Ok(Some(project_detail(node, &index, cms.base_url())))
}

/// URL form of a category name: lower-cased, whitespace runs become `-`.
pub fn category_slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Distinct category names in first-seen order.
pub fn list_categories(projects: &[ProjectSummary]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for name in projects.iter().flat_map(|p| p.categories.iter()) {
        if !seen.contains(name) {
            seen.push(name.clone());
        }
    }
    seen
}

/// Narrow `projects` to the category whose slug is `category`.
pub fn filter_by_category(projects: Vec<ProjectSummary>, category: &str) -> Option<CategoryListing> {
    if category == ALL_CATEGORIES {
        return Some(CategoryListing {
            name: "All Projects".into(),
            slug: ALL_CATEGORIES.into(),
            projects,
        });
    }
    let name = list_categories(&projects)
        .into_iter()
        .find(|name| category_slug(name) == category)?;
    let projects = projects
        .into_iter()
        .filter(|p| p.categories.contains(&name))
        .collect();
    Some(CategoryListing {
        name,
        slug: category.to_string(),
        projects,
    })
}

#[instrument(skip(cms))]
pub async fn fetch_projects_in_category(
    cms: &dyn CmsTransport,
    category: &str,
) -> Result<Option<CategoryListing>, CmsError> {
    let projects = fetch_projects(cms).await?;
    Ok(filter_by_category(projects, category))
}
