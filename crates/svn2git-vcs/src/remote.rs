//! Outbound remote binding

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{error::Result, repository::RemoteConfig};

/// The single outbound remote a migrated repository publishes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBinding {
    /// Remote name, `origin` by convention
    pub name: String,
    /// Expected URL
    pub url: String,
}

/// What [`RemoteBinding::ensure`] had to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingChange {
    /// The remote did not exist and was added
    Created,
    /// The remote pointed elsewhere and was repointed
    Updated { previous: String },
    /// The remote already carried the expected URL
    Unchanged {
        /// False when the URL only contains the expected one
        exact: bool,
    },
}

impl RemoteBinding {
    /// Derive the binding for a destination: `base_url + destination + ".git"`
    pub fn derive(name: impl Into<String>, base_url: &str, destination: &str) -> Self {
        Self {
            name: name.into(),
            url: format!("{}{}.git", base_url, destination),
        }
    }

    /// Make the repository's remote match this binding
    ///
    /// An existing URL that contains the expected one is accepted as is.
    pub fn ensure<R: RemoteConfig + ?Sized>(&self, repo: &R) -> Result<BindingChange> {
        match repo.remote_url(&self.name)? {
            None => {
                info!(remote = %self.name, url = %self.url, "Creating remote");
                repo.add_remote(&self.name, &self.url)?;
                Ok(BindingChange::Created)
            }
            Some(current) if current.contains(&self.url) => {
                let exact = current == self.url;
                if !exact {
                    warn!(
                        remote = %self.name,
                        current = %current,
                        expected = %self.url,
                        "Remote URL accepted without exact match"
                    );
                }
                Ok(BindingChange::Unchanged { exact })
            }
            Some(previous) => {
                info!(remote = %self.name, from = %previous, to = %self.url, "Updating remote URL");
                repo.set_remote_url(&self.name, &self.url)?;
                Ok(BindingChange::Updated { previous })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    /// In-memory remote table
    #[derive(Default)]
    struct Remotes(RefCell<BTreeMap<String, String>>);

    impl RemoteConfig for Remotes {
        fn remote_url(&self, name: &str) -> Result<Option<String>> {
            Ok(self.0.borrow().get(name).cloned())
        }
        fn add_remote(&self, name: &str, url: &str) -> Result<()> {
            self.0.borrow_mut().insert(name.to_string(), url.to_string());
            Ok(())
        }
        fn set_remote_url(&self, name: &str, url: &str) -> Result<()> {
            self.0.borrow_mut().insert(name.to_string(), url.to_string());
            Ok(())
        }
        fn remote_names(&self) -> Result<Vec<String>> {
            Ok(self.0.borrow().keys().cloned().collect())
        }
    }

    #[test]
    fn test_derive_url() {
        let binding = RemoteBinding::derive("origin", "https://github.com/acme/", "x");
        assert_eq!(binding.url, "https://github.com/acme/x.git");
    }

    #[test]
    fn test_ensure_creates_then_noop() {
        let remotes = Remotes::default();
        let binding = RemoteBinding::derive("origin", "https://github.com/acme/", "x");

        assert_eq!(binding.ensure(&remotes).unwrap(), BindingChange::Created);
        assert_eq!(
            binding.ensure(&remotes).unwrap(),
            BindingChange::Unchanged { exact: true }
        );
        assert_eq!(remotes.remote_names().unwrap(), vec!["origin".to_string()]);
    }

    #[test]
    fn test_ensure_repoints_wrong_url() {
        let remotes = Remotes::default();
        remotes.add_remote("origin", "https://old.example/x.git").unwrap();
        let binding = RemoteBinding::derive("origin", "https://github.com/acme/", "x");

        assert_eq!(
            binding.ensure(&remotes).unwrap(),
            BindingChange::Updated {
                previous: "https://old.example/x.git".to_string()
            }
        );
        assert_eq!(
            remotes.remote_url("origin").unwrap().as_deref(),
            Some("https://github.com/acme/x.git")
        );
    }

    #[test]
    fn test_ensure_accepts_decorated_url() {
        let remotes = Remotes::default();
        remotes
            .add_remote("origin", "git+https://github.com/acme/x.git")
            .unwrap();
        let binding = RemoteBinding::derive("origin", "https://github.com/acme/", "x");

        assert_eq!(
            binding.ensure(&remotes).unwrap(),
            BindingChange::Unchanged { exact: false }
        );
        assert_eq!(
            remotes.remote_url("origin").unwrap().as_deref(),
            Some("git+https://github.com/acme/x.git")
        );
    }
}
