use std::fs;
use std::path::PathBuf;

use rand::Rng;

use crate::error::Result;

/// Source of a stable visitor identifier
pub trait Identity {
    fn user_id(&mut self) -> Result<String>;
}

/// Identifier handed in from outside, e.g. on the command line
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub String);

impl Identity for StaticIdentity {
    fn user_id(&mut self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Anonymous identity persisted to a file on first use
#[derive(Debug, Clone)]
pub struct FileIdentity {
    path: PathBuf,
    cached: Option<String>,
}

impl FileIdentity {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    fn generate() -> String {
        let bits: u128 = rand::rng().random();
        format!("{bits:032x}")
    }
}

impl Identity for FileIdentity {
    fn user_id(&mut self) -> Result<String> {
        if let Some(id) = &self.cached {
            return Ok(id.clone());
        }

        let id = match fs::read_to_string(&self.path) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) | Err(_) => {
                let id = Self::generate();
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, &id)?;
                log::info!("Signed in anonymously as {id}");
                id
            }
        };

        self.cached = Some(id.clone());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_identity_is_stable_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity");

        let first = FileIdentity::new(&path).user_id().unwrap();
        let second = FileIdentity::new(&path).user_id().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn file_identity_reuses_existing_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity");
        fs::write(&path, "visitor-7\n").unwrap();

        assert_eq!(FileIdentity::new(&path).user_id().unwrap(), "visitor-7");
    }

    #[test]
    fn static_identity_returns_given_id() {
        assert_eq!(StaticIdentity("abc".into()).user_id().unwrap(), "abc");
    }
}
