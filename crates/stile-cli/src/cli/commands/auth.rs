//! Auth command handlers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use stile_core::config::Config;
use stile_core::connectivity::NetworkMonitor;
use stile_core::flow::{LOCKED_OUT_MESSAGE, LoginFlow, LoginState};
use stile_core::gateway::HttpGateway;
use stile_core::lockout::LockoutPolicy;
use stile_core::session::{SessionStore, mask_token};

fn gateway(config: &Config) -> Result<HttpGateway> {
    HttpGateway::new(
        config.auth_base_url.clone(),
        config.request_timeout(),
        SessionStore::new(),
    )
}

pub async fn login(config: &Config, username: Option<String>, remember: bool) -> Result<()> {
    let flow = LoginFlow::new(
        gateway(config)?,
        NetworkMonitor::default(),
        LockoutPolicy::load(config)?,
    );

    flow.check_for_saved_token().await;
    if flow.state() == LoginState::Success {
        println!("Already logged in (saved session found).");
        return Ok(());
    }

    let identifier = match username {
        Some(name) => name,
        None => prompt("Username: ")?,
    };
    let secret = prompt("Password: ")?;

    flow.set_identifier(identifier);
    flow.set_secret(secret);
    flow.set_remember_me(remember);

    if !flow.form_valid() {
        anyhow::bail!("Username and password must not be empty");
    }

    flow.submit().await;
    match flow.state() {
        LoginState::Success => {
            println!("✓ Logged in");
            if remember {
                println!("  Session saved to: {}", SessionStore::new().path().display());
            }
            Ok(())
        }
        LoginState::LockedOut => anyhow::bail!("{LOCKED_OUT_MESSAGE}"),
        LoginState::Error(message) => anyhow::bail!("{message}"),
        state @ (LoginState::Idle | LoginState::Loading) => {
            anyhow::bail!("login ended in unexpected state {state:?}")
        }
    }
}

pub async fn logout(config: &Config) -> Result<()> {
    let store = SessionStore::new();
    let had_session = store.load()?.is_some();

    let flow = LoginFlow::new(
        gateway(config)?,
        NetworkMonitor::default(),
        LockoutPolicy::load(config)?,
    );
    flow.logout().await;

    if had_session {
        println!("✓ Logged out");
        println!("  Session removed from: {}", store.path().display());
    } else {
        println!("Not logged in (no saved session).");
    }
    Ok(())
}

pub async fn status(config: &Config) -> Result<()> {
    let store = SessionStore::new();
    match store.load_valid()? {
        Some(token) => println!("Logged in (token: {})", mask_token(&token.token)),
        None => println!("Not logged in."),
    }

    let lockout = LockoutPolicy::load(config)?;
    if lockout.is_locked_out() {
        println!("{LOCKED_OUT_MESSAGE}");
    } else if lockout.failure_count() > 0 {
        println!("Failed attempts: {}", lockout.failure_count());
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}
