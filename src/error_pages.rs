use crate::template::PageBuilder;
use rocket::http::Method;
use rocket::request::FromRequest as _;
use rocket::response::Redirect;
use rocket::{catch, catchers, uri, Catcher, Request};
use rocket_dyn_templates::{context, Template};

pub(crate) fn catchers() -> Vec<Catcher> {
    catchers![redirect_to_login, forbidden, not_found]
}

#[catch(401)]
fn redirect_to_login(request: &Request<'_>) -> Redirect {
    // Only a GET can be replayed by following the redirect after login.
    let origin = (request.method() == Method::Get).then(|| request.uri().to_string());
    Redirect::to(uri!(crate::account::login_page(redirect = origin.as_deref())))
}

#[catch(403)]
async fn forbidden(request: &Request<'_>) -> Option<Template> {
    let page = PageBuilder::from_request(request).await.succeeded()?;
    Some(page.render("errors/403", context! {}))
}

#[catch(404)]
async fn not_found(request: &Request<'_>) -> Option<Template> {
    let page = PageBuilder::from_request(request).await.succeeded()?;
    Some(page.render("errors/404", context! {}))
}
