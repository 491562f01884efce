use anyhow::{Context as _, Result};
use rocket::fairing::{self, Fairing};
use rocket::{error, info, Build, Rocket};
use rocket_db_pools::Database;
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqlitePool};

#[derive(Database)]
#[database("sqlite")]
pub(crate) struct Db(SqlitePool);

impl Db {
    pub(crate) async fn connection(&self) -> Result<PoolConnection<Sqlite>> {
        Ok(self.0.acquire().await?)
    }

    /// Fetches the pool from a launched (or igniting) Rocket instance.
    pub(crate) async fn connect<P: rocket::Phase>(rocket: &Rocket<P>) -> Result<PoolConnection<Sqlite>> {
        Db::fetch(rocket)
            .context("database pool is not initialized")?
            .connection()
            .await
    }

    pub(crate) fn migrations() -> impl Fairing {
        fairing::AdHoc::try_on_ignite("Database Migrations", |rocket| async {
            match run_migrations(&rocket).await {
                Ok(()) => Ok(rocket),
                Err(e) => {
                    error!("Failed to migrate database: {e:?}");
                    Err(rocket)
                }
            }
        })
    }
}

async fn run_migrations(rocket: &Rocket<Build>) -> Result<()> {
    let pool = Db::fetch(rocket).context("database pool is not initialized")?;
    sqlx::migrate!().run(&pool.0).await?;
    info!("Database migrations are up to date");
    Ok(())
}
