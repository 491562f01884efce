use super::form::{render_event_form, EventDraft, EventForm};
use super::{allowed_image_extension, Event, EventId, ImageStore, INVALID_IMAGE_FORMAT};
use crate::auth::ensure_organizer;
use crate::database::Repository;
use crate::result::{HttpResult, OptionExt as _};
use crate::template::PageBuilder;
use crate::users::User;
use rocket::Either::{self, Left, Right};
use rocket::form::Form;
use rocket::response::{Flash, Redirect};
use rocket::{get, info, post, uri, State};
use rocket_dyn_templates::Template;

#[get("/Event/Edit/<id>")]
pub(super) async fn edit_page(
    id: EventId,
    page: PageBuilder<'_>,
    user: User,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Template> {
    let event = repository.get_event(id).await?.or_not_found()?;
    ensure_organizer(&user, &event)?;
    Ok(render(&page, &event, &EventDraft::from(&event), &[]))
}

#[post("/Event/Edit/<id>", data = "<form>")]
pub(super) async fn edit(
    id: EventId,
    page: PageBuilder<'_>,
    user: User,
    mut form: Form<EventForm<'_>>,
    images: &State<ImageStore>,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Either<Template, Flash<Redirect>>> {
    let mut event = repository.get_event(id).await?.or_not_found()?;
    ensure_organizer(&user, &event)?;

    let draft = form.draft();
    let details = match draft.validate() {
        Ok(details) => details,
        Err(errors) => return Ok(Left(render(&page, &event, &draft, &errors))),
    };

    let mut new_image = None;
    if let Some(file) = form.image_mut() {
        let Some(extension) = allowed_image_extension(file) else {
            let errors = [INVALID_IMAGE_FORMAT.to_owned()];
            return Ok(Left(render(&page, &event, &draft, &errors)));
        };
        event.image_path = Some(images.save(file, &extension).await?);
        new_image = event.image_path.clone();
    }

    details.apply_to(&mut event);
    if let Err(e) = repository.update_event(&event).await {
        if let Some(image_path) = &new_image {
            images.discard(image_path).await;
        }
        return Err(e.into());
    }
    info!("User {} updated event {}", user.id, event.id);

    Ok(Right(Flash::success(
        Redirect::to(uri!(super::list::index)),
        "Event updated successfully!",
    )))
}

fn render(page: &PageBuilder<'_>, event: &Event, draft: &EventDraft, errors: &[String]) -> Template {
    let action = uri!(edit(id = event.id)).to_string();
    let image_path = event.image_path.as_deref();
    render_event_form(page, "event/edit", action, draft, image_path, errors)
}
