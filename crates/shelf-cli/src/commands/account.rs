use super::report;
use crate::app::App;
use crate::prompt::Prompter;
use anyhow::Result;
use colored::Colorize;

pub async fn login(app: &App, user_id: Option<String>) -> Result<()> {
    let mut prompter = Prompter::new()?;
    let user_id = prompter.line_or(user_id, "User id: ")?;
    let password = prompter.password("Password: ")?;

    let response = app.accounts.login(&user_id, &password).await?;
    report(&response, "Signed in");
    if response.success && app.accounts.current().await.needs_email() {
        println!(
            "{}",
            "No e-mail is bound to this account. Run `shelf bind-email <address>` so you can reset your password later."
                .bright_yellow()
        );
    }
    Ok(())
}

pub async fn sign_up(app: &App, user_id: Option<String>, email: Option<String>) -> Result<()> {
    let mut prompter = Prompter::new()?;
    let user_id = prompter.line_or(user_id, "User id: ")?;
    let password = prompter.password("Password: ")?;
    let confirm = prompter.password("Confirm password: ")?;
    let email = prompter.line_or(email, "E-mail (optional): ")?;

    let response = app
        .accounts
        .sign_up(&user_id, &password, &confirm, Some(email.as_str()))
        .await?;
    report(&response, "Account created. Sign in with `shelf login`.");
    Ok(())
}

pub async fn reset_password(app: &App, email: Option<String>) -> Result<()> {
    let mut prompter = Prompter::new()?;
    let email = prompter.line_or(email, "E-mail: ")?;

    let response = app.accounts.send_code(&email).await?;
    report(&response, "Verification code sent");
    if !response.success {
        return Ok(());
    }

    let code = prompter.line("Verification code: ")?;
    let new_password = prompter.password("New password: ")?;
    let response = app
        .accounts
        .reset_password(&email, &code, &new_password)
        .await?;
    report(&response, "Password updated. Sign in with `shelf login`.");
    Ok(())
}

pub async fn bind_email(app: &App, email: &str) -> Result<()> {
    let response = app.accounts.bind_email(email).await?;
    report(&response, "E-mail bound");
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.accounts.logout().await?;
    println!("{}", "Signed out".bright_green());
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    let context = app.accounts.current().await;
    if context.is_signed_in() {
        println!("{}", context.effective_user_id().bright_cyan().bold());
        match &context.email {
            Some(email) => println!("{}", email.bright_black()),
            None => println!("{}", "(no e-mail bound)".bright_black()),
        }
    } else {
        println!(
            "{} {}",
            context.effective_user_id().bright_cyan(),
            "(not signed in)".bright_black()
        );
    }
    Ok(())
}
