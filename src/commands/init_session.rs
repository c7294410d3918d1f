//! Session initialization command
//!
//! One-shot interactive login: requests a code for the configured phone
//! number, signs in, and leaves the SQLite-backed session file behind for
//! every later run.

use std::io::{self, Write};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::get_client_for_init;

pub async fn run() -> Result<()> {
    let config = Config::new();

    if config.api_id == 0 || config.api_hash.is_empty() {
        return Err(Error::InvalidArgument(
            "telegram.api_id / telegram.api_hash are not configured".to_string(),
        ));
    }
    if config.phone.is_empty() {
        return Err(Error::InvalidArgument(
            "telegram.phone is not configured".to_string(),
        ));
    }

    println!(
        r#"
This will create a NEW Telegram session for {}.

Creating a new session logs you out on other devices that share the
session file and invalidates any previous session file here.

Type 'YES' (uppercase) to continue: "#,
        config.phone
    );

    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        println!("\nCancelled. No session file was created.");
        return Ok(());
    }

    println!("\nCreating a new session for {}...", config.phone);
    println!("Waiting for the confirmation code from Telegram...\n");

    // Connect without an existing session
    let client = get_client_for_init().await?;

    // Request login code
    let token = client
        .request_login_code(&config.phone, &config.api_hash)
        .await
        .map_err(|e| Error::TelegramError(format!("Failed to request code: {}", e)))?;

    println!("Enter the code from Telegram: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().read_line(&mut code)?;
    let code = code.trim();

    // Sign in
    let user = client
        .sign_in(&token, code)
        .await
        .map_err(|e| Error::TelegramError(format!("Failed to sign in: {}", e)))?;

    // Session is auto-saved by the SQLite storage

    println!(
        r#"
Session created.

Profile:
  Name: {}
  Username: @{}

Session file: {}.session

The auto-answer command will use this session automatically. Do not run
init-session again unless you want to replace it.
"#,
        user.full_name(),
        user.username().unwrap_or("not set"),
        config.session_name,
    );

    Ok(())
}
