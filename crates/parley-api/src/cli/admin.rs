//! Admin commands: user creation and token issuance.
//!
//! These run against the database directly and do not need the
//! completion provider, so they work without `PARLEY_GPT_API_KEY`.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use uuid::Uuid;

use parley_infra::auth::{hash_password, TokenAuthenticator};
use parley_infra::sqlite::pool::{default_database_url, DatabasePool};
use parley_infra::sqlite::user::SqliteUserStore;
use parley_types::config::Settings;
use parley_types::user::User;

async fn open_pool(settings: &Settings) -> anyhow::Result<DatabasePool> {
    let db_url = settings
        .database
        .url
        .clone()
        .unwrap_or_else(default_database_url);
    DatabasePool::new(&db_url)
        .await
        .with_context(|| format!("failed to open database at {db_url}"))
}

/// Create a user, prompting for a password on the terminal.
pub async fn create_user(settings: &Settings, email: &str, superuser: bool) -> anyhow::Result<()> {
    let pool = open_pool(settings).await?;
    let store = SqliteUserStore::new(pool);

    let password = dialoguer::Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let now = Utc::now();
    let user = User {
        id: Uuid::now_v7(),
        email: email.to_string(),
        password_hash: hash_password(&password)?,
        is_active: true,
        is_superuser: superuser,
        is_verified: false,
        created_at: now,
        updated_at: now,
    };

    store.create(&user).await?;
    println!("Created user {} ({})", user.email, user.id);
    Ok(())
}

/// Issue and print a bearer token for an existing user.
pub async fn issue_token(settings: &Settings, email: &str) -> anyhow::Result<()> {
    let pool = open_pool(settings).await?;
    let store = SqliteUserStore::new(pool.clone());
    let auth = TokenAuthenticator::new(
        pool,
        Duration::from_secs(settings.access_token.lifetime_secs),
    );

    let user = store
        .get_by_email(email)
        .await?
        .with_context(|| format!("no user with email '{email}'"))?;

    let token = auth.issue(&user.id).await?;
    println!("{token}");
    println!(
        "Expires in {} seconds. Store it now; it cannot be recovered.",
        settings.access_token.lifetime_secs
    );
    Ok(())
}
