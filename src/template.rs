use crate::users::User;
use rocket::request::{FlashMessage, FromRequest, Outcome};
use rocket::{async_trait, Request};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;
use std::borrow::Cow;
use std::convert::Infallible;

/// Renders pages with everything the base layout needs:
/// the logged in user, the current path and a pending flash message.
pub(crate) struct PageBuilder<'r> {
    user: Option<User>,
    path: &'r str,
    flash: Option<FlashMessage<'r>>,
}

impl PageBuilder<'_> {
    pub(crate) fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub(crate) fn render(
        &self,
        name: impl Into<Cow<'static, str>>,
        context: impl Serialize,
    ) -> Template {
        let flash = self.flash.as_ref().map(|flash| {
            context! { kind: flash.kind(), message: flash.message() }
        });
        Template::render(
            name,
            context! { user: &self.user, path: self.path, flash, page: context },
        )
    }
}

#[async_trait]
impl<'r> FromRequest<'r> for PageBuilder<'r> {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let user = request.guard::<Option<User>>().await.succeeded().flatten();
        let flash = request
            .guard::<Option<FlashMessage<'r>>>()
            .await
            .succeeded()
            .flatten();
        Outcome::Success(PageBuilder {
            user,
            path: request.uri().path().as_str(),
            flash,
        })
    }
}
