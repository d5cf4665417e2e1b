//! Contact form forwarding to the CMS contact-message collection.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cms::endpoints;
use crate::cms::{CmsError, CmsTransport};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Bundle used when the named contact form is not exposed.
pub const GENERIC_FORM_ID: &str = "contact_message";

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error(transparent)]
    Cms(#[from] CmsError),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ContactError> {
        if [&self.name, &self.email, &self.message]
            .iter()
            .any(|f| f.trim().is_empty())
        {
            return Err(ContactError::MissingFields);
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(ContactError::InvalidEmail);
        }
        Ok(())
    }
}

/// JSON:API payload creating a `contact_message--{form_id}` resource.
pub fn build_message_request(form_id: &str, form: &ContactForm) -> Value {
    json!({
        "data": {
            "type": format!("contact_message--{}", form_id),
            "attributes": {
                "name": form.name.trim(),
                "mail": form.email.trim(),
                "subject": format!("Contact from {}", form.name.trim()),
                "message": form.message,
            }
        }
    })
}

/// Validate `form` and post it to the `form_id` bundle, falling back to the
/// generic bundle when the named one answers 404.
#[instrument(skip(cms, form))]
pub async fn submit_contact(
    cms: &dyn CmsTransport,
    form_id: &str,
    form: &ContactForm,
) -> Result<(), ContactError> {
    form.validate()?;

    let named = cms
        .post_document(
            &endpoints::contact_message(Some(form_id)),
            &build_message_request(form_id, form),
        )
        .await;
    match named {
        Ok(_) => {
            info!(form_id, "contact message forwarded");
            Ok(())
        }
        Err(err) if err.status() == Some(404) => {
            warn!(form_id, "contact form not found; using generic bundle");
            cms.post_document(
                &endpoints::contact_message(None),
                &build_message_request(GENERIC_FORM_ID, form),
            )
            .await?;
            info!(form_id = GENERIC_FORM_ID, "contact message forwarded");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
