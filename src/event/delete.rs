use super::EventId;
use crate::auth::ensure_organizer;
use crate::database::Repository;
use crate::result::{HttpResult, OptionExt as _};
use crate::users::User;
use rocket::response::{Flash, Redirect};
use rocket::{info, post, uri};

/// Removes the event together with its signups.
#[post("/Event/Delete/<id>")]
pub(super) async fn delete(
    id: EventId,
    user: User,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Flash<Redirect>> {
    let event = repository.get_event(id).await?.or_not_found()?;
    ensure_organizer(&user, &event)?;
    repository.delete_event(event.id).await?;
    info!("User {} deleted event {}", user.id, event.id);
    Ok(Flash::success(
        Redirect::to(uri!(super::list::index)),
        "Event deleted successfully!",
    ))
}
