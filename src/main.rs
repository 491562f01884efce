use infra::{configure_template_engines, figment, static_dir, Db};
use rocket::fs::{FileServer, Options};
use rocket::shield::{Hsts, Shield};
use rocket::{Build, Config, Rocket};
use rocket_db_pools::Database as _;
use rocket_dyn_templates::Template;

mod account;
mod auth;
mod database;
mod error_pages;
mod event;
mod infra;
mod iso_8601;
mod result;
mod roles;
mod template;
#[cfg(test)]
mod testing;
mod users;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let rocket = build(rocket::custom(figment()?));
    let _rocket = rocket.launch().await?;
    Ok(())
}

fn build(rocket: Rocket<Build>) -> Rocket<Build> {
    let static_dir = static_dir(rocket.figment());
    let images = event::ImageStore::new(&static_dir);
    let shield = shield(rocket.figment().profile() == Config::DEBUG_PROFILE);
    rocket
        .attach(Db::init())
        .attach(Db::migrations())
        .attach(roles::role_bootstrap_fairing())
        .attach(event::ImageStore::fairing())
        .attach(Template::custom(configure_template_engines))
        .attach(shield)
        .mount("/", account::routes())
        .mount("/", event::routes())
        .mount("/images", FileServer::new(images.directory(), Options::Missing))
        .mount("/static", FileServer::new(static_dir.join("static"), Options::Missing))
        .register("/", error_pages::catchers())
}

fn shield(debug: bool) -> Shield {
    if debug {
        Shield::default()
    } else {
        Shield::default().enable(Hsts::default())
    }
}
