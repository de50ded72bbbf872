use crate::config::AppConfig;
use crate::domain::models::UserRole;
use crate::domain::validation::NewAccount;
use anyhow::Result;
use sqlx::PgPool;

/// Creates the bootstrap admin once. Does nothing when `ADMIN_PASSWORD` is unset
/// or an account with the admin email already exists.
pub async fn seed_admin(pool: &PgPool, config: &AppConfig) -> Result<()> {
    let Some(password) = config.admin_password.as_deref() else {
        tracing::info!("ADMIN_PASSWORD not set, skipping admin seed");
        return Ok(());
    };

    if super::find_user_by_email(pool, &config.admin_email).await?.is_some() {
        tracing::info!("Admin {} already exists", config.admin_email);
        return Ok(());
    }

    let account = NewAccount {
        first_name: "Admin".to_string(),
        last_name: "User".to_string(),
        email: config.admin_email.clone(),
        password: password.to_string(),
        date_of_birth: None,
        phone: None,
    };
    let admin = super::insert_user(pool, &account, UserRole::Admin).await?;
    tracing::info!("Seeded admin {} ({})", admin.email, admin.id);
    Ok(())
}
