use crate::database::{Repository, SqliteRepository};
use crate::infra::Db;
use crate::users::{Role, UserId};
use anyhow::{Context as _, Result};
use rocket::fairing::{self, Fairing};
use rocket::{error, info, Build, Rocket};

/// Makes sure every well-known role exists before the first request is handled.
pub(crate) fn role_bootstrap_fairing() -> impl Fairing {
    fairing::AdHoc::try_on_ignite("Role Bootstrap", |rocket| async {
        match try_bootstrap_roles(&rocket).await {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("{:?}", e);
                Err(rocket)
            }
        }
    })
}

async fn try_bootstrap_roles(rocket: &Rocket<Build>) -> Result<()> {
    let mut repository = SqliteRepository(Db::connect(rocket).await?);
    let created = bootstrap_roles(&mut repository)
        .await
        .context("failed to bootstrap roles")?;
    for role in created {
        info!("Created missing role {role}");
    }
    Ok(())
}

/// Creates the roles that are missing, returns the ones it created.
pub(crate) async fn bootstrap_roles(repository: &mut dyn Repository) -> Result<Vec<Role>> {
    let mut created = Vec::new();
    for role in Role::ALL {
        if repository.add_role(role).await? {
            created.push(role);
        }
    }
    Ok(created)
}

/// Grants a role, creating the role first should it have gone missing.
pub(crate) async fn grant_role(repository: &mut dyn Repository, user: UserId, role: Role) -> Result<bool> {
    repository.add_role(role).await?;
    repository.grant_role(user, role).await
}
