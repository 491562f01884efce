use crate::auth::{verify_password, CookieJarExt as _};
use crate::database::Repository;
use crate::result::HttpResult;
use crate::template::PageBuilder;
use rocket::Either::{self, Left, Right};
use rocket::form::Form;
use rocket::http::uri::Origin;
use rocket::http::CookieJar;
use rocket::response::{self, Redirect, Responder};
use rocket::{get, info, post, uri, FromForm, Request, Response};
use rocket_dyn_templates::{context, Template};

#[get("/Account/Login?<redirect>")]
pub(crate) fn login_page(page: PageBuilder<'_>, redirect: Option<&str>) -> Template {
    render_login(&page, redirect, "", None)
}

#[post("/Account/Login?<redirect>", data = "<form>")]
pub(super) async fn login(
    page: PageBuilder<'_>,
    form: Form<LoginForm<'_>>,
    redirect: Option<&str>,
    cookies: &CookieJar<'_>,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Either<Template, Redirect>> {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        let error = "Email and password are required.";
        return Ok(Left(render_login(&page, redirect, email, Some(error))));
    }

    let credentials = repository.get_credentials(email).await?;
    let user_id = match credentials {
        Some(c) if verify_password(form.password, &c.password_hash)? => c.user_id,
        _ => {
            let error = "Invalid email or password.";
            return Ok(Left(render_login(&page, redirect, email, Some(error))));
        }
    };

    cookies.set_user_id(user_id);
    info!("User {user_id} logged in");
    Ok(Right(redirect_to(redirect)))
}

fn render_login(
    page: &PageBuilder<'_>,
    redirect: Option<&str>,
    email: &str,
    error: Option<&str>,
) -> Template {
    page.render(
        "account/login",
        context! {
            email,
            error,
            action: uri!(login(redirect = redirect)).to_string(),
            register_url: uri!(super::register::register_page).to_string(),
        },
    )
}

#[post("/Account/Logout")]
pub(super) fn logout(cookies: &CookieJar<'_>) -> Logout {
    cookies.remove_user_id();
    Logout
}

pub(super) struct Logout;

impl<'r> Responder<'r, 'static> for Logout {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        Response::build_from(Redirect::to(uri!(crate::event::index)).respond_to(request)?)
            .raw_header("Clear-Site-Data", "\"cookies\"")
            .ok()
    }
}

/// Only local paths are followed so that the login form can't be abused
/// to send people elsewhere.
fn redirect_to(redirect_url_from_query: Option<&str>) -> Redirect {
    redirect_url_from_query
        .filter(|r| is_local(r))
        .and_then(|r| Origin::parse_owned(r.to_string()).ok().map(Redirect::to))
        .unwrap_or_else(|| Redirect::to(uri!(crate::event::index)))
}

fn is_local(uri: &str) -> bool {
    uri.starts_with('/') && !uri.starts_with("//") && !uri.starts_with("/\\")
}

#[derive(Debug, FromForm)]
pub(super) struct LoginForm<'r> {
    #[field(default = "")]
    email: &'r str,
    #[field(default = "")]
    password: &'r str,
}
