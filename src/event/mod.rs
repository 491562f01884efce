use crate::iso_8601::Iso8601;
use crate::users::UserId;
use rocket::form::{DataField, FromFormField, ValueField};
use rocket::http::impl_from_uri_param_identity;
use rocket::http::uri::fmt::{Formatter, Path, UriDisplay};
use rocket::request::FromParam;
use rocket::{routes, Route};
use serde::Serialize;
use std::fmt;
use std::num::ParseIntError;
use time::PrimitiveDateTime;

mod create;
mod delete;
mod edit;
mod form;
mod image;
pub(crate) use image::*;
mod list;
pub(crate) use list::*;
mod participants;
mod signup;
#[cfg(test)]
mod tests;

pub(crate) fn routes() -> Vec<Route> {
    routes![
        list::home,
        list::index,
        create::create_page,
        create::create,
        edit::edit_page,
        edit::edit,
        delete::delete,
        participants::participants,
        signup::signup,
        signup::cancel_signup,
    ]
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, sqlx::Type, Serialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub(crate) struct EventId(pub(crate) i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<'a> FromParam<'a> for EventId {
    type Error = ParseIntError;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse().map(EventId)
    }
}

impl UriDisplay<Path> for EventId {
    fn fmt(&self, f: &mut Formatter<'_, Path>) -> fmt::Result {
        UriDisplay::fmt(&self.0, f)
    }
}

impl_from_uri_param_identity!([Path] EventId);

#[rocket::async_trait]
impl<'r> FromFormField<'r> for EventId {
    fn from_value(field: ValueField<'r>) -> rocket::form::Result<'r, Self> {
        i64::from_value(field).map(EventId)
    }

    async fn from_data(field: DataField<'r, '_>) -> rocket::form::Result<'r, Self> {
        i64::from_data(field).await.map(EventId)
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub(crate) struct Event<Id = EventId> {
    pub(crate) id: Id,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) date: Iso8601<PrimitiveDateTime>,
    pub(crate) location: String,
    pub(crate) image_path: Option<String>,
    /// Set once on creation, never reassigned.
    pub(crate) organizer_id: UserId,
}

impl Event<()> {
    pub(crate) fn with_id(self, id: EventId) -> Event {
        Event {
            id,
            name: self.name,
            description: self.description,
            date: self.date,
            location: self.location,
            image_path: self.image_path,
            organizer_id: self.organizer_id,
        }
    }
}

/// An event together with what the event list shows about it.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct EventListing {
    pub(crate) event: Event,
    pub(crate) organizer_email: String,
    pub(crate) participants: Vec<UserId>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub(crate) struct Participant {
    #[sqlx(rename = "id")]
    pub(crate) user_id: UserId,
    pub(crate) email: String,
}
