// contact/ - Contact form submission flow
//
// validate -> resolve visitor id -> store under the visitor's namespaced
// collection -> forward (logged only) -> status message.
mod identity;
mod store;

pub use identity::{FileIdentity, Identity, StaticIdentity};
pub use store::{CollectionPath, Document, DocumentStore, JsonFileStore};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BackdropError, Result};

pub const SENT_MESSAGE: &str = "Thank you! Your message has been sent.";
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields.";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const FAILED_MESSAGE: &str = "Sorry, something went wrong. Please try again later.";

/// The three named fields of the contact form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Trimmed copy of the form, or the status message explaining the rejection
    pub fn validated(&self) -> Result<Self> {
        let form = Self::new(self.name.trim(), self.email.trim(), self.message.trim());

        if form.name.is_empty() || form.email.is_empty() || form.message.is_empty() {
            return Err(BackdropError::Contact(MISSING_FIELDS_MESSAGE.into()));
        }
        if !is_plausible_email(&form.email) {
            return Err(BackdropError::Contact(INVALID_EMAIL_MESSAGE.into()));
        }
        Ok(form)
    }

    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::String(self.name.clone()));
        fields.insert("email".into(), Value::String(self.email.clone()));
        fields.insert("message".into(), Value::String(self.message.clone()));
        fields
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Hands a stored submission on to whoever reads the inbox
pub trait Forwarder {
    fn forward(&mut self, form: &ContactForm, document: &Document) -> Result<()>;
}

/// Stand-in for an e-mail relay: records the hand-off in the log
#[derive(Debug, Clone)]
pub struct LogForwarder {
    pub recipient: String,
}

impl Forwarder for LogForwarder {
    fn forward(&mut self, form: &ContactForm, document: &Document) -> Result<()> {
        log::info!(
            "Forwarding message {} from {} <{}> to {}",
            document.id,
            form.name,
            form.email,
            self.recipient
        );
        Ok(())
    }
}

/// A stored submission and the status message to show the visitor
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub document: Document,
    pub collection: CollectionPath,
    pub status: &'static str,
}

/// Run the whole submission flow for one form
pub fn submit(
    form: &ContactForm,
    app_id: &str,
    identity: &mut dyn Identity,
    store: &mut dyn DocumentStore,
    forwarder: &mut dyn Forwarder,
) -> Result<Submission> {
    let form = form.validated()?;

    let stored = identity
        .user_id()
        .and_then(|uid| CollectionPath::contacts(app_id, &uid))
        .and_then(|collection| {
            let document = store.add_document(&collection, form.to_fields())?;
            Ok((collection, document))
        });

    let (collection, document) = match stored {
        Ok(stored) => stored,
        Err(err) => {
            log::error!("Contact submission failed: {err}");
            return Err(BackdropError::Contact(FAILED_MESSAGE.into()));
        }
    };

    if let Err(err) = forwarder.forward(&form, &document) {
        log::warn!("Stored {} but forwarding failed: {err}", document.id);
    }

    Ok(Submission {
        document,
        collection,
        status: SENT_MESSAGE,
    })
}
