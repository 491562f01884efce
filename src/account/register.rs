use crate::auth::{hash_password, PasswordPolicy};
use crate::database::Repository;
use crate::result::HttpResult;
use crate::roles::grant_role;
use crate::template::PageBuilder;
use crate::users::{NewUser, Role};
use email_address::EmailAddress;
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::status;
use rocket::{get, post, FromForm};
use rocket_dyn_templates::{context, Template};

#[get("/Account/Register")]
pub(super) fn register_page(page: PageBuilder<'_>) -> Template {
    page.render("account/register", context! {})
}

#[post("/Account/Register", data = "<form>")]
pub(super) async fn register(
    form: Form<RegisterForm<'_>>,
    mut repository: Box<dyn Repository>,
) -> HttpResult<status::Custom<String>> {
    let (email, password) = match (non_empty(form.email), non_empty(form.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Ok(bad_request(["Email and password are required.".to_owned()])),
    };

    let errors = validation_errors(email, password);
    if !errors.is_empty() {
        return Ok(bad_request(errors));
    }

    let user = NewUser {
        email: email.to_owned(),
        password_hash: hash_password(password)?,
    };
    let Some(user_id) = repository.add_user(user).await? else {
        return Ok(bad_request([format!("Email '{email}' is already taken.")]));
    };
    grant_role(repository.as_mut(), user_id, Role::Participant).await?;

    Ok(status::Custom(
        Status::Ok,
        "User registered successfully.".to_owned(),
    ))
}

fn validation_errors(email: &str, password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if !EmailAddress::is_valid(email) {
        errors.push(format!("Email '{email}' is invalid."));
    }
    errors.extend(PasswordPolicy::default().violations(password));
    errors
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn bad_request(errors: impl IntoIterator<Item = String>) -> status::Custom<String> {
    let body = errors.into_iter().collect::<Vec<_>>().join("\n");
    status::Custom(Status::BadRequest, body)
}

#[derive(Debug, FromForm)]
pub(super) struct RegisterForm<'r> {
    email: Option<&'r str>,
    password: Option<&'r str>,
}
