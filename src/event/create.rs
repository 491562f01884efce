use super::form::{render_event_form, EventDetails, EventDraft, EventForm};
use super::{allowed_image_extension, Event, ImageStore, INVALID_IMAGE_FORMAT};
use crate::database::Repository;
use crate::roles::grant_role;
use crate::template::PageBuilder;
use crate::users::{Role, User};
use anyhow::Result;
use rocket::Either::{self, Left, Right};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::response::{Flash, Redirect};
use rocket::{error, get, info, post, uri, State};
use rocket_dyn_templates::Template;

const CREATE_FAILED: &str = "There was an error creating the event. Please try again.";

#[get("/Event/Create")]
pub(super) fn create_page(page: PageBuilder<'_>, _user: User) -> Template {
    render(&page, &EventDraft::default(), &[])
}

#[post("/Event/Create", data = "<form>")]
pub(super) async fn create(
    page: PageBuilder<'_>,
    user: User,
    mut form: Form<EventForm<'_>>,
    images: &State<ImageStore>,
    mut repository: Box<dyn Repository>,
) -> Either<Template, Flash<Redirect>> {
    let draft = form.draft();
    let details = match draft.validate() {
        Ok(details) => details,
        Err(errors) => return Left(render(&page, &draft, &errors)),
    };

    let image = match form.image_mut() {
        Some(file) => match allowed_image_extension(file) {
            Some(extension) => Some((file, extension)),
            None => return Left(render(&page, &draft, &[INVALID_IMAGE_FORMAT.to_owned()])),
        },
        None => None,
    };

    match create_event(&user, details, image, images, repository.as_mut()).await {
        Ok(event) => {
            info!("User {} created event {}", user.id, event.id);
            Right(Flash::success(
                Redirect::to(uri!(super::list::index)),
                "Event created successfully!",
            ))
        }
        Err(e) => {
            error!("Failed to create event: {e:?}");
            Left(render(&page, &draft, &[CREATE_FAILED.to_owned()]))
        }
    }
}

async fn create_event(
    organizer: &User,
    details: EventDetails,
    image: Option<(&mut TempFile<'_>, String)>,
    images: &ImageStore,
    repository: &mut dyn Repository,
) -> Result<Event> {
    if !organizer.is_organizer() {
        grant_role(repository, organizer.id, Role::Organizer).await?;
    }
    let image_path = match image {
        Some((file, extension)) => Some(images.save(file, &extension).await?),
        None => None,
    };
    let result = repository
        .add_event(details.into_new_event(organizer.id, image_path.clone()))
        .await;
    if let (Err(_), Some(image_path)) = (&result, &image_path) {
        images.discard(image_path).await;
    }
    result
}

fn render(page: &PageBuilder<'_>, draft: &EventDraft, errors: &[String]) -> Template {
    let action = uri!(create).to_string();
    render_event_form(page, "event/create", action, draft, None, errors)
}
