// Admin elevation: sign an RS256 token locally with the operator's private
// key and use it as the session credential. The server is not contacted.
//
// Read access to the key file is the whole authorization boundary. Anyone
// who can read it can mint admin tokens, so the resulting credential is only
// as trustworthy as the filesystem permissions of the machine running the
// client.

use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::CliError;

pub const ADMIN_ID: &str = "admin";

/// Lifetime of an elevation token.
pub fn token_lifetime() -> Duration {
    Duration::days(2)
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AdminClaims {
    pub id: String,
    pub secret: String,
    pub iat: i64,
    pub exp: i64,
}

/// Read the PEM private key at `key_path`.
fn read_key(key_path: &Path) -> Result<EncodingKey, CliError> {
    let pem = std::fs::read(key_path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => CliError::KeyFileNotFound(key_path.to_path_buf()),
        _ => CliError::KeyFile {
            path: key_path.to_path_buf(),
            source,
        },
    })?;
    Ok(EncodingKey::from_rsa_pem(&pem)?)
}

/// Sign an admin token valid from `issued_at` for [`token_lifetime`].
pub fn sign_with_clock(
    key_path: &Path,
    secret: &str,
    issued_at: DateTime<Utc>,
) -> Result<String, CliError> {
    let key = read_key(key_path)?;
    let claims = AdminClaims {
        id: ADMIN_ID.to_string(),
        secret: secret.to_string(),
        iat: issued_at.timestamp(),
        exp: (issued_at + token_lifetime()).timestamp(),
    };
    Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
}

/// Sign an admin token valid from now.
pub fn elevate(key_path: &Path, secret: &str) -> Result<String, CliError> {
    sign_with_clock(key_path, secret, Utc::now())
}

/// Sign an admin token and adopt it as the session credential. On any
/// failure the session keeps its previous value.
pub fn elevate_session(api: &mut ApiClient, key_path: &Path, secret: &str) -> Result<(), CliError> {
    let token = elevate(key_path, secret)?;
    api.session_mut().set(&token)?;
    log::debug!("admin token signed with {}", key_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_key_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("privateKey.pem");
        match elevate(&path, "s3cret") {
            Err(CliError::KeyFileNotFound(p)) => assert_eq!(p, path),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn directory_instead_of_key_is_generic_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = elevate(dir.path(), "s3cret").unwrap_err();
        assert!(!matches!(err, CliError::KeyFileNotFound(_)));
    }

    #[test]
    fn garbage_key_is_signing_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("privateKey.pem");
        std::fs::write(&path, "not a key").unwrap();
        assert!(matches!(elevate(&path, "s3cret"), Err(CliError::Signing(_))));
    }

    #[test]
    fn failed_elevation_keeps_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut api = ApiClient::with_endpoint("http://127.0.0.1:1/").unwrap();
        let err = elevate_session(&mut api, &dir.path().join("missing.pem"), "x").unwrap_err();
        assert!(matches!(err, CliError::KeyFileNotFound(_)));
        assert!(!api.session().is_set());
    }
}
