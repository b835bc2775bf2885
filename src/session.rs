// The single in-memory session: an optional bearer token. It is owned by
// `ApiClient` and only ever mutated through it, so there is no global
// header to toggle.

use crate::error::CliError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    credential: Option<String>,
}

impl Session {
    /// A session with no credential.
    pub fn new() -> Self {
        Session::default()
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.credential.is_some()
    }

    /// Store a credential. Blank tokens are rejected and leave the session
    /// as it was.
    pub fn set(&mut self, token: &str) -> Result<(), CliError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CliError::EmptyCredential);
        }
        log::info!("session credential set");
        self.credential = Some(token.to_string());
        Ok(())
    }

    /// Drop the credential. Returns whether one was present; calling it on
    /// an empty session is a no-op.
    pub fn clear(&mut self) -> bool {
        let had = self.credential.take().is_some();
        if had {
            log::info!("session credential cleared");
        }
        had
    }

    /// Value for the `Authorization` header, when a credential is set.
    pub fn bearer(&self) -> Option<String> {
        self.credential.as_ref().map(|t| format!("Bearer {}", t))
    }
}
