use crate::auth::{AssignRoles, AuthorizedTo};
use crate::database::Repository;
use crate::result::HttpResult;
use crate::roles::grant_role;
use crate::template::PageBuilder;
use crate::users::Role;
use rocket::form::Form;
use rocket::{get, info, post, FromForm};
use rocket_dyn_templates::{context, Template};

#[get("/Account/AssignOrganizerRoleForm")]
pub(super) fn assign_organizer_role_page(
    page: PageBuilder<'_>,
    _user: AuthorizedTo<AssignRoles>,
) -> Template {
    render(&page, Notice::Blank)
}

#[post("/Account/AssignOrganizerRoleForm", data = "<form>")]
pub(super) async fn assign_organizer_role(
    page: PageBuilder<'_>,
    user: AuthorizedTo<AssignRoles>,
    form: Form<AssignRoleForm<'_>>,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Template> {
    let email = form.email.trim();
    let Some(target) = repository.get_user_by_email(email).await? else {
        return Ok(render(&page, Notice::Error("User not found.".to_owned())));
    };
    if target.is_organizer() {
        let message = "User is already an Organizer.".to_owned();
        return Ok(render(&page, Notice::Error(message)));
    }

    grant_role(repository.as_mut(), target.id, Role::Organizer).await?;
    info!("User {} made {} an organizer", user.id, target.id);
    let message = format!("User {email} was successfully assigned to the Organizer role.");
    Ok(render(&page, Notice::Success(message)))
}

enum Notice {
    Blank,
    Success(String),
    Error(String),
}

fn render(page: &PageBuilder<'_>, notice: Notice) -> Template {
    let (success_message, error_message) = match notice {
        Notice::Blank => (None, None),
        Notice::Success(message) => (Some(message), None),
        Notice::Error(message) => (None, Some(message)),
    };
    page.render(
        "account/assign-organizer-role",
        context! { success_message, error_message },
    )
}

#[derive(Debug, FromForm)]
pub(super) struct AssignRoleForm<'r> {
    #[field(default = "")]
    email: &'r str,
}
