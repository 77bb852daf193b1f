//! Status command - show account store summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let (ctx, _logger) = get_context()?;
    let status = ctx.status_service.get_status();

    if json {
        return output::json(&status);
    }

    println!("{}", "HealthBridge Status".bold());
    println!();

    let table = output::details(&[
        ("Accounts", status.total_accounts.to_string()),
        ("Storage", status.storage_backend.clone()),
        ("Location", status.storage_location.clone()),
        ("Password hashing", status.password_hashing.clone()),
        ("Data directory", ctx.data_dir.display().to_string()),
    ]);
    println!("{}", table);

    if !status.accounts.is_empty() {
        println!();
        println!("{}", "Registered Accounts".bold());
        for account in &status.accounts {
            println!("  • {} <{}>", account.full_name, account.email);
        }
    }

    Ok(())
}
