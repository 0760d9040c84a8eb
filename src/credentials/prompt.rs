use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use super::Credentials;

fn read_line(prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Ask for a username and password, or a personal access token when the
/// username is left empty.
pub fn prompt_for_credentials() -> Result<Credentials> {
    let username = read_line("GitHub username (leave empty to use a token): ")?;

    if username.is_empty() {
        eprintln!("Create a token at: https://github.com/settings/tokens");
        let token = rpassword::prompt_password("GitHub token: ")
            .context("Failed to read token from stdin")?;
        let token = token.trim();
        if token.is_empty() {
            anyhow::bail!("Token cannot be empty");
        }
        return Ok(Credentials::Token(token.to_string()));
    }

    let password = rpassword::prompt_password("GitHub password: ")
        .context("Failed to read password from stdin")?;
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    Ok(Credentials::Basic { username, password })
}
