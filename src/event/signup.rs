use super::EventId;
use crate::database::Repository;
use crate::result::HttpResult;
use crate::users::User;
use rocket::form::Form;
use rocket::response::{Flash, Redirect};
use rocket::{post, uri, FromForm};

#[derive(Debug, FromForm)]
pub(super) struct SignupForm {
    #[field(name = "eventId")]
    event_id: EventId,
}

#[post("/Event/Signup", data = "<form>")]
pub(super) async fn signup(
    form: Form<SignupForm>,
    user: Option<User>,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Flash<Redirect>> {
    let Some(user) = user else {
        return Ok(to_index_with_error(
            "You need to be logged in to sign up for an event.",
        ));
    };
    let Some(event) = repository.get_event(form.event_id).await? else {
        return Ok(to_index_with_error("Event not found."));
    };
    if repository.add_signup(event.id, user.id).await? {
        Ok(to_index_with_success(
            "You have successfully signed up for the event.",
        ))
    } else {
        Ok(to_index_with_error("You are already signed up for this event."))
    }
}

#[post("/Event/CancelSignup", data = "<form>")]
pub(super) async fn cancel_signup(
    form: Form<SignupForm>,
    user: User,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Flash<Redirect>> {
    if repository.remove_signup(form.event_id, user.id).await? {
        Ok(to_index_with_success(
            "You have canceled your signup for the event.",
        ))
    } else {
        Ok(to_index_with_error("You are not signed up for this event."))
    }
}

fn to_index_with_success(message: &'static str) -> Flash<Redirect> {
    Flash::success(Redirect::to(uri!(super::list::index)), message)
}

fn to_index_with_error(message: &'static str) -> Flash<Redirect> {
    Flash::error(Redirect::to(uri!(super::list::index)), message)
}
