use rocket::{routes, Route};

mod assign_role;
mod login;
pub(crate) use login::*;
mod register;

pub(crate) fn routes() -> Vec<Route> {
    routes![
        register::register_page,
        register::register,
        login::login_page,
        login::login,
        login::logout,
        assign_role::assign_organizer_role_page,
        assign_role::assign_organizer_role,
    ]
}
