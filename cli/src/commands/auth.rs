use anyhow::Context as _;
use colored::*;
use contactbook_common::models::Credentials;
use contactbook_core::auth::AuthService;

use crate::commands::Context;
use crate::terminal::{colors, print, prompt, spinner};

fn service(ctx: &Context) -> AuthService {
    AuthService::new(ctx.api.clone(), ctx.session.clone())
}

pub async fn login(
    ctx: &Context,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    print::header("sign in");

    let email = match email {
        Some(email) => email,
        None => prompt::ask("Email:").context("failed to read email")?,
    };
    let password = match password {
        Some(password) => password,
        None => prompt::ask_secret("Password:").context("failed to read password")?,
    };
    if email.trim().is_empty() || password.is_empty() {
        anyhow::bail!("email and password are required");
    }

    let credentials = Credentials {
        email: email.trim().to_owned(),
        password,
    };
    let session = spinner::with_spinner("Signing in...", service(ctx).login(&credentials))
        .await
        .context("login failed")?;

    let who = session
        .user
        .map(|user| user.name.unwrap_or(user.email))
        .unwrap_or(credentials.email);
    print::print_status(format!("Signed in as {}", who.color(colors::PRIMARY).bold()));
    Ok(())
}

pub async fn logout(ctx: &Context) -> anyhow::Result<()> {
    let auth = service(ctx);
    if !auth.is_logged_in() {
        print::print_status("Not signed in");
        return Ok(());
    }
    auth.logout().await.context("logout failed")?;
    print::print_status("Signed out");
    Ok(())
}

pub async fn whoami(ctx: &Context) -> anyhow::Result<()> {
    let user = spinner::with_spinner("Loading profile...", service(ctx).whoami())
        .await
        .context("failed to load profile")?;

    print::header("profile");
    let width = "Email".len();
    if let Some(name) = user.name.as_deref() {
        print::aligned_line("Name", name, width);
    }
    print::aligned_line("Email", user.email.color(colors::EMAIL), width);
    print::aligned_line("Id", user.id.to_string(), width);
    Ok(())
}
