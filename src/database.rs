use crate::event::{Event, EventId, EventListing, Participant};
use crate::infra::Db;
use crate::users::{Credentials, NewUser, Role, User, UserId};
use anyhow::{anyhow, Error, Result};
use itertools::Itertools as _;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::{async_trait, Request};
use rocket_db_pools::Connection;
use sqlx::pool::PoolConnection;
use sqlx::{Connection as _, Sqlite};
use std::fmt;
use std::ops::DerefMut;

type SqliteConnection = PoolConnection<Sqlite>;

#[async_trait]
pub(crate) trait Repository: Send {
    /// Adds an account, returns `None` if the email address is already taken.
    async fn add_user(&mut self, user: NewUser) -> Result<Option<UserId>>;

    async fn get_user_by_id(&mut self, id: UserId) -> Result<Option<User>>;

    async fn get_user_by_email(&mut self, email: &str) -> Result<Option<User>>;

    async fn get_credentials(&mut self, email: &str) -> Result<Option<Credentials>>;

    /// Creates the role unless it exists, returns whether it was created.
    async fn add_role(&mut self, role: Role) -> Result<bool>;

    async fn get_roles(&mut self) -> Result<Vec<Role>>;

    /// Adds the user to the role, returns `false` if the user
    /// already has the role or the role does not exist.
    async fn grant_role(&mut self, user: UserId, role: Role) -> Result<bool>;

    async fn add_event(&mut self, event: Event<()>) -> Result<Event>;

    async fn get_event(&mut self, id: EventId) -> Result<Option<Event>>;

    async fn get_event_listings(&mut self) -> Result<Vec<EventListing>>;

    /// Overwrites everything but the event's organizer.
    async fn update_event(&mut self, event: &Event) -> Result<()>;

    /// Removes the event's signups and then the event itself.
    async fn delete_event(&mut self, id: EventId) -> Result<()>;

    /// Adds a signup, returns `false` if the user is already signed up.
    async fn add_signup(&mut self, event: EventId, user: UserId) -> Result<bool>;

    /// Removes a signup, returns `false` if there was nothing to remove.
    async fn remove_signup(&mut self, event: EventId, user: UserId) -> Result<bool>;

    async fn get_participants(&mut self, event: EventId) -> Result<Vec<Participant>>;
}

pub(crate) struct SqliteRepository(pub(crate) SqliteConnection);

impl fmt::Debug for SqliteRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SqliteRepository").finish_non_exhaustive()
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn add_user(&mut self, user: NewUser) -> Result<Option<UserId>> {
        let result = sqlx::query("INSERT INTO users (email, password_hash) VALUES (?1, ?2)")
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(self.0.deref_mut())
            .await;
        match result {
            Ok(result) => Ok(Some(UserId(result.last_insert_rowid()))),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user_by_id(&mut self, id: UserId) -> Result<Option<User>> {
        let user: Option<User> = sqlx::query_as("SELECT id, email FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.0.deref_mut())
            .await?;
        self.with_roles(user).await
    }

    async fn get_user_by_email(&mut self, email: &str) -> Result<Option<User>> {
        let user: Option<User> = sqlx::query_as("SELECT id, email FROM users WHERE email = ?1")
            .bind(email.trim())
            .fetch_optional(self.0.deref_mut())
            .await?;
        self.with_roles(user).await
    }

    async fn get_credentials(&mut self, email: &str) -> Result<Option<Credentials>> {
        let credentials = sqlx::query_as("SELECT id, password_hash FROM users WHERE email = ?1")
            .bind(email.trim())
            .fetch_optional(self.0.deref_mut())
            .await?;
        Ok(credentials)
    }

    async fn add_role(&mut self, role: Role) -> Result<bool> {
        let result = sqlx::query("INSERT OR IGNORE INTO roles (name) VALUES (?1)")
            .bind(role)
            .execute(self.0.deref_mut())
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn get_roles(&mut self) -> Result<Vec<Role>> {
        let roles = sqlx::query_scalar("SELECT name FROM roles ORDER BY name")
            .fetch_all(self.0.deref_mut())
            .await?;
        Ok(roles)
    }

    async fn grant_role(&mut self, user: UserId, role: Role) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO user_roles (user_id, role_id)
             SELECT ?1, id FROM roles WHERE name = ?2",
        )
        .bind(user)
        .bind(role)
        .execute(self.0.deref_mut())
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn add_event(&mut self, event: Event<()>) -> Result<Event> {
        let result = sqlx::query(
            "INSERT INTO events (name, description, date, location, image_path, organizer_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.image_path)
        .bind(event.organizer_id)
        .execute(self.0.deref_mut())
        .await?;
        Ok(event.with_id(EventId(result.last_insert_rowid())))
    }

    async fn get_event(&mut self, id: EventId) -> Result<Option<Event>> {
        let event = sqlx::query_as("SELECT * FROM events WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.0.deref_mut())
            .await?;
        Ok(event)
    }

    async fn get_event_listings(&mut self) -> Result<Vec<EventListing>> {
        let events = sqlx::query_as::<_, EventWithOrganizer>(
            "SELECT events.*, users.email AS organizer_email
             FROM events
             JOIN users ON users.id = events.organizer_id
             ORDER BY events.date, events.id",
        )
        .fetch_all(self.0.deref_mut())
        .await?
        .into_iter()
        .map(|row| (row.event, row.organizer_email));

        let mut signups = sqlx::query_as::<_, (EventId, UserId)>(
            "SELECT event_id, user_id FROM event_signups",
        )
        .fetch_all(self.0.deref_mut())
        .await?
        .into_iter()
        .into_group_map();

        Ok(events
            .into_iter()
            .map(|(event, organizer_email)| EventListing {
                participants: signups.remove(&event.id).unwrap_or_default(),
                event,
                organizer_email,
            })
            .collect())
    }

    async fn update_event(&mut self, event: &Event) -> Result<()> {
        sqlx::query(
            "UPDATE events
             SET name = ?2, description = ?3, date = ?4, location = ?5, image_path = ?6
             WHERE id = ?1",
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.image_path)
        .execute(self.0.deref_mut())
        .await?;
        Ok(())
    }

    async fn delete_event(&mut self, id: EventId) -> Result<()> {
        let mut transaction = self.0.begin().await?;
        sqlx::query("DELETE FROM event_signups WHERE event_id = ?1")
            .bind(id)
            .execute(&mut *transaction)
            .await?;
        sqlx::query("DELETE FROM events WHERE id = ?1")
            .bind(id)
            .execute(&mut *transaction)
            .await?;
        transaction.commit().await?;
        Ok(())
    }

    async fn add_signup(&mut self, event: EventId, user: UserId) -> Result<bool> {
        let result = sqlx::query("INSERT INTO event_signups (event_id, user_id) VALUES (?1, ?2)")
            .bind(event)
            .bind(user)
            .execute(self.0.deref_mut())
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_signup(&mut self, event: EventId, user: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM event_signups WHERE event_id = ?1 AND user_id = ?2")
            .bind(event)
            .bind(user)
            .execute(self.0.deref_mut())
            .await?;
        Ok(result.rows_affected() >= 1)
    }

    async fn get_participants(&mut self, event: EventId) -> Result<Vec<Participant>> {
        let participants = sqlx::query_as(
            "SELECT users.id, users.email
             FROM event_signups
             JOIN users ON users.id = event_signups.user_id
             WHERE event_signups.event_id = ?1
             ORDER BY users.email",
        )
        .bind(event)
        .fetch_all(self.0.deref_mut())
        .await?;
        Ok(participants)
    }
}

impl SqliteRepository {
    async fn with_roles(&mut self, user: Option<User>) -> Result<Option<User>> {
        let Some(mut user) = user else {
            return Ok(None);
        };
        user.roles = sqlx::query_scalar(
            "SELECT roles.name
             FROM user_roles
             JOIN roles ON roles.id = user_roles.role_id
             WHERE user_roles.user_id = ?1
             ORDER BY roles.name",
        )
        .bind(user.id)
        .fetch_all(self.0.deref_mut())
        .await?;
        Ok(Some(user))
    }
}

#[derive(sqlx::FromRow)]
struct EventWithOrganizer {
    #[sqlx(flatten)]
    event: Event,
    organizer_email: String,
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

#[async_trait]
impl<'r> FromRequest<'r> for Box<dyn Repository> {
    type Error = Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let connection = try_outcome!(request
            .guard::<Connection<Db>>()
            .await
            .map_error(|(status, e)| (status, pool_error(e))));
        Outcome::Success(Box::new(SqliteRepository(connection.into_inner())))
    }
}

fn pool_error(error: Option<impl fmt::Display>) -> Error {
    match error {
        Some(e) => anyhow!("failed to acquire a database connection: {e}"),
        None => anyhow!("database pool is not initialized"),
    }
}
