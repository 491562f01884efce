use super::{Event, EventListing};
use crate::auth::is_organizer;
use crate::database::Repository;
use crate::result::HttpResult;
use crate::template::PageBuilder;
use crate::users::User;
use rocket::response::Redirect;
use rocket::{get, uri};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;

#[get("/")]
pub(crate) fn home() -> Redirect {
    Redirect::to(uri!(index))
}

#[get("/Event/Index")]
pub(crate) async fn index(
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Template> {
    let listings = repository.get_event_listings().await?;
    let events: Vec<_> = listings
        .into_iter()
        .map(|listing| EventListItem::new(listing, page.user()))
        .collect();
    Ok(page.render("event/index", context! { events }))
}

/// An event as seen by the current viewer.
#[derive(Debug, Serialize)]
struct EventListItem {
    #[serde(flatten)]
    event: Event,
    organizer_email: String,
    participant_count: usize,
    is_signed_up: bool,
    is_organizer: bool,
}

impl EventListItem {
    fn new(listing: EventListing, viewer: Option<&User>) -> Self {
        let is_signed_up =
            viewer.is_some_and(|user| listing.participants.contains(&user.id));
        let is_organizer = viewer.is_some_and(|user| is_organizer(user, &listing.event));
        Self {
            participant_count: listing.participants.len(),
            organizer_email: listing.organizer_email,
            event: listing.event,
            is_signed_up,
            is_organizer,
        }
    }
}
