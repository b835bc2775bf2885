// Error taxonomy for every command flow. All of these are caught by the
// dispatcher (`ui::dispatch`) and turned into a single colored line, so
// messages are written for the person at the prompt, not for a log file.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    /// The relaxed-JSON text could not be turned into strict JSON.
    #[error("could not parse `{input}` as JSON: {message}")]
    Parse { input: String, message: String },

    /// No response was received (connection refused, DNS, reset...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status. `body` is echoed verbatim.
    #[error("{body}")]
    Api { status: u16, body: String },

    /// The server answered 2xx but the body was not JSON.
    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Login answered but no table carried a credential.
    #[error("We couldn't find the jwt after login. Maybe the request failed. Here is the results: {raw}")]
    CredentialNotFound { raw: String },

    #[error("private key not found at {}", .0.display())]
    KeyFileNotFound(PathBuf),

    #[error("could not read private key {}: {source}", path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not sign admin token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("no token provided; use `logout` to clear the current one")]
    EmptyCredential,

    #[error("token contains characters that cannot be sent in a header")]
    InvalidCredential,

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CliError {
    /// Short label used as a prefix in verbose output and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Parse { .. } => "parse",
            CliError::Transport(_) => "transport",
            CliError::Api { .. } => "api",
            CliError::Decode(_) => "decode",
            CliError::CredentialNotFound { .. } => "credential-not-found",
            CliError::KeyFileNotFound(_) => "key-not-found",
            CliError::KeyFile { .. } => "key-file",
            CliError::Signing(_) => "signing",
            CliError::EmptyCredential | CliError::InvalidCredential => "credential",
            CliError::MissingArgument(_) => "usage",
            CliError::Config(_) => "config",
        }
    }
}
