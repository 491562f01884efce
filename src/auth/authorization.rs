use crate::event::Event;
use crate::users::User;
use anyhow::Error;
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::{async_trait, Request};
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

pub(crate) struct AuthorizedTo<P>(User, PhantomData<P>);

pub(crate) trait UserPredicate {
    fn is_satisfied(user: &User) -> bool;
}

#[async_trait]
impl<'r, P: UserPredicate> FromRequest<'r> for AuthorizedTo<P> {
    type Error = Arc<Error>;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let user: User = try_outcome!(request.guard().await);
        if let Some(result) = AuthorizedTo::new(user) {
            Outcome::Success(result)
        } else {
            Outcome::Forward(Status::Forbidden)
        }
    }
}

impl<P> AuthorizedTo<P>
where
    P: UserPredicate,
{
    pub(crate) fn new(inner: User) -> Option<Self> {
        P::is_satisfied(&inner).then_some(Self(inner, PhantomData))
    }
}

impl<P> Deref for AuthorizedTo<P> {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub(crate) struct AssignRoles;

impl UserPredicate for AssignRoles {
    fn is_satisfied(user: &User) -> bool {
        user.is_organizer()
    }
}

/// Only the organizer recorded on an event may change it or see who signed up.
pub(crate) fn is_organizer(user: &User, event: &Event) -> bool {
    event.organizer_id == user.id
}

pub(crate) fn ensure_organizer(user: &User, event: &Event) -> Result<(), Status> {
    if is_organizer(user, event) {
        Ok(())
    } else {
        Err(Status::Forbidden)
    }
}
