//! Content adapter turning a JSON:API CMS into page, project and menu view models.
pub mod cms;
pub mod config;
pub mod contact;
pub mod content;
pub mod handlers;
pub mod menu;
pub mod model;
