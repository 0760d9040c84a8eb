pub mod prompt;

use anyhow::Result;
use std::fmt;
use std::io::IsTerminal;

pub use prompt::prompt_for_credentials;

/// Environment variable name for providing a GitHub token without prompting
pub const ENV_TOKEN_VAR: &str = "ORKO_GH_TOKEN";

/// How requests to GitHub are authenticated
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    Token(String),
    Anonymous,
}

// Keep secrets out of logs and panics
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => write!(f, "Basic({}:***)", username),
            Credentials::Token(_) => write!(f, "Token(***)"),
            Credentials::Anonymous => write!(f, "Anonymous"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CredentialError {
    InvalidBasicAuth,
    Missing,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::InvalidBasicAuth => {
                write!(f, "GitHub auth must be in the format <user>:<password>")
            }
            CredentialError::Missing => write!(
                f,
                "No GitHub credentials. Pass --auth or --token, set {}, or use --anonymous",
                ENV_TOKEN_VAR
            ),
        }
    }
}

impl std::error::Error for CredentialError {}

/// Parse "<user>:<password>". The password may itself contain colons.
pub fn parse_basic_auth(value: &str) -> Result<Credentials, CredentialError> {
    match value.split_once(':') {
        Some((username, password)) if !username.is_empty() && !password.is_empty() => {
            Ok(Credentials::Basic {
                username: username.to_string(),
                password: password.to_string(),
            })
        }
        _ => Err(CredentialError::InvalidBasicAuth),
    }
}

/// Check for a GitHub token in the ORKO_GH_TOKEN environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env() -> Option<String> {
    let value = std::env::var(ENV_TOKEN_VAR).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Explicit credential choices from the command line
#[derive(Debug, Default, Clone)]
pub struct CredentialArgs {
    pub auth: Option<String>,
    pub token: Option<String>,
    pub anonymous: bool,
}

/// Resolve credentials from flags, then the environment, then (only when
/// stdin is a terminal) an interactive prompt.
pub fn resolve_credentials(args: &CredentialArgs) -> Result<Credentials> {
    if let Some(auth) = &args.auth {
        return Ok(parse_basic_auth(auth)?);
    }
    if let Some(token) = &args.token {
        return Ok(Credentials::Token(token.trim().to_string()));
    }
    if args.anonymous {
        return Ok(Credentials::Anonymous);
    }
    if let Some(token) = get_token_from_env() {
        tracing::debug!("using token from {}", ENV_TOKEN_VAR);
        return Ok(Credentials::Token(token));
    }
    if std::io::stdin().is_terminal() {
        return prompt_for_credentials();
    }
    Err(CredentialError::Missing.into())
}
