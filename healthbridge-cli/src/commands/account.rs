//! Account commands - register, login, lookup and reset

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::Confirm;
use healthbridge_core::services::AccountSummary;
use healthbridge_core::{Error, LogEvent, SignupForm};

use super::{get_context, log_event, read_password};
use crate::output;

pub fn register(
    full_name: &str,
    email: &str,
    password: Option<String>,
    accept_terms: bool,
    json: bool,
) -> Result<()> {
    let (ctx, logger) = get_context()?;

    let password = read_password(password, "Password", true)?;
    let agreed = accept_terms
        || (!json
            && atty::is(atty::Stream::Stdin)
            && Confirm::new()
                .with_prompt("I agree to the Terms of Service and Privacy Policy")
                .default(false)
                .interact()?);

    let form = SignupForm::new(full_name, email, &password, &password, agreed);
    let result = ctx.auth_service.signup(&form);

    let mut event = LogEvent::new("account_registered").with_command("register");
    if let Err(e) = &result {
        event = event.with_outcome(e.kind());
    }
    log_event(&logger, event);

    match result {
        Ok(account) => {
            if json {
                output::json(&AccountSummary::from(&account))?;
            } else {
                output::success(&format!("Account created for {}", account.email));
            }
            Ok(())
        }
        Err(Error::DuplicateAccount(_)) => {
            bail!("An account with this email already exists. Please use a different email or sign in.")
        }
        Err(e) => Err(e.into()),
    }
}

pub fn login(email: &str, password: Option<String>, json: bool) -> Result<()> {
    let (ctx, logger) = get_context()?;

    let password = if email.trim().is_empty() {
        String::new()
    } else {
        read_password(password, "Password", false)?
    };
    let outcome = ctx.auth_service.login(email, &password);

    log_event(
        &logger,
        LogEvent::new("login_attempted")
            .with_command("login")
            .with_outcome(outcome.kind()),
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "success": outcome.is_success(),
                "outcome": outcome.kind(),
                "title": outcome.title(),
                "message": outcome.message(),
                "account": outcome.account().map(AccountSummary::from),
            }))?
        );
    } else if outcome.is_success() {
        output::success(&outcome.message());
    } else {
        output::error(&format!("{}: {}", outcome.title(), outcome.message()));
    }

    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

pub fn exists(email: &str, json: bool) -> Result<()> {
    let (ctx, _logger) = get_context()?;
    let found = ctx.account_store.exists(email);

    if json {
        println!("{}", serde_json::json!({ "exists": found }));
    } else if found {
        println!("{}", "Account exists".green());
    } else {
        println!("{}", "No account with this email".dimmed());
    }
    Ok(())
}

pub fn find(email: &str, json: bool) -> Result<()> {
    let (ctx, _logger) = get_context()?;
    let account = ctx.account_store.find(email);
    let summary = account.as_ref().map(AccountSummary::from);

    if json {
        return output::json(&summary);
    }

    match summary {
        Some(summary) => {
            let table = output::details(&[
                ("ID", summary.id.clone()),
                ("Name", summary.full_name.clone()),
                ("Email", summary.email.clone()),
                ("Created", summary.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
            ]);
            println!("{}", table);
        }
        None => output::warning("No account found with this email address."),
    }
    Ok(())
}

pub fn clear(force: bool, json: bool) -> Result<()> {
    let (ctx, logger) = get_context()?;
    let count = ctx.account_store.count();

    if clear_needs_confirmation(force, json)? {
        println!(
            "\n{}",
            format!("This will delete all {} registered accounts.", count).yellow()
        );
        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let result = ctx.account_store.clear();
    let mut event = LogEvent::new("accounts_cleared").with_command("clear");
    if let Err(e) = &result {
        event = event.with_outcome(e.kind());
    }
    log_event(&logger, event);
    result?;

    if json {
        println!("{}", serde_json::json!({ "cleared": count }));
    } else {
        output::success(&format!("Removed {} accounts", count));
    }
    Ok(())
}

/// `--json` cannot prompt, so it only clears together with `--force`
fn clear_needs_confirmation(force: bool, json: bool) -> Result<bool> {
    if force {
        return Ok(false);
    }
    if json {
        bail!("--json cannot prompt for confirmation; pass --force to clear all accounts");
    }
    Ok(true)
}

pub fn forgot_password(email: &str, json: bool) -> Result<()> {
    let (ctx, logger) = get_context()?;
    let outcome = ctx.auth_service.forgot_password(email);

    log_event(
        &logger,
        LogEvent::new("password_reset_requested").with_command("forgot-password"),
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "outcome": outcome,
                "title": outcome.title(),
                "message": outcome.message(),
            }))?
        );
    } else {
        println!("{}", outcome.title().bold());
        output::info(outcome.message());
    }
    Ok(())
}
