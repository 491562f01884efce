use super::EventId;
use crate::auth::ensure_organizer;
use crate::database::Repository;
use crate::result::{HttpResult, OptionExt as _};
use crate::template::PageBuilder;
use crate::users::User;
use rocket::{get, FromForm};
use rocket_dyn_templates::{context, Template};

#[derive(Debug, FromForm)]
pub(super) struct ParticipantsQuery {
    #[field(name = "eventId")]
    event_id: EventId,
}

#[get("/Event/Participants?<query..>")]
pub(super) async fn participants(
    query: ParticipantsQuery,
    page: PageBuilder<'_>,
    user: User,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Template> {
    let event = repository.get_event(query.event_id).await?.or_not_found()?;
    ensure_organizer(&user, &event)?;
    let participants = repository.get_participants(event.id).await?;
    Ok(page.render("event/participants", context! { event, participants }))
}
