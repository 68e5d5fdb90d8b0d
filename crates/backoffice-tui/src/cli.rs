//! Non-interactive subcommands: `login`, `logout` and `status`.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::warn;

use backoffice_core::auth::{validate_login, LOGIN_FAILED_MESSAGE};
use backoffice_core::{Config, SessionManager};

/// Read a line from stdin, falling back to `default` when left empty
fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    let mut stdout = io::stdout();
    match default {
        Some(d) if !d.is_empty() => write!(stdout, "{} [{}]: ", label, d)?,
        _ => write!(stdout, "{}: ", label)?,
    }
    stdout.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    let value = line.trim();
    if value.is_empty() {
        return Ok(default.unwrap_or_default().to_string());
    }
    Ok(value.to_string())
}

pub async fn login(session: &SessionManager, config: &mut Config, config_path: Option<&Path>) -> Result<()> {
    session.initialize();

    let email = prompt("Email", config.last_email.as_deref())?;
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    if let Err(e) = validate_login(&email, &password) {
        bail!(e.user_message(""));
    }

    if !session.login(&email, &password).await {
        let message = session.error().unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string());
        bail!(message);
    }

    if let Some(user) = session.current_user() {
        println!("Signed in as {} <{}>", user.name, email);
        if !user.is_admin {
            println!("This account is not an administrator; the console will deny access.");
        }
    }

    config.last_email = Some(email);
    if let Some(path) = config_path {
        if let Err(e) = config.save_to(path) {
            warn!(error = %e, "Failed to save config");
        }
    }
    Ok(())
}

pub fn logout(session: &SessionManager) -> Result<()> {
    session.initialize();
    let was_signed_in = session.snapshot().is_authenticated();
    session.logout();
    if was_signed_in {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub fn status(session: &SessionManager) -> Result<()> {
    session.initialize();
    println!("API: {}", session.api().base_url());

    let state = session.snapshot();
    match &state.user {
        Some(user) => {
            let role = if user.is_admin { "administrator" } else { "user" };
            println!("Signed in as {} <{}> ({})", user.name, user.email, role);
        }
        None => println!("Not signed in."),
    }
    if let Some(error) = state.error {
        println!("{}", error);
    }
    Ok(())
}
