use super::RocketSecretKey;
use anyhow::Result;
use rand::rng;
use rocket::figment::providers::{Env, Format as _, Toml};
use rocket::figment::{Figment, Profile};
use rocket::Config;
use std::path::PathBuf;

pub(crate) const STATIC_DIR: &str = "static_dir";
const SECRET_KEYS_PATH: &str = "secret_keys_path";

pub(crate) fn figment() -> Result<Figment> {
    let figment = default_figment();
    if figment.contains(Config::SECRET_KEY) {
        return Ok(figment);
    }
    match figment.extract_inner::<PathBuf>(SECRET_KEYS_PATH) {
        Ok(secret_keys_path) => {
            let key = RocketSecretKey::read_or_generate(secret_keys_path, &mut rng())?;
            Ok(figment.merge((Config::SECRET_KEY, &key.0)))
        }
        Err(_) => Ok(figment),
    }
}

/// Adapted from [`Config::figment`] but with the
/// ability to have two rocket config files.
fn default_figment() -> Figment {
    Figment::from(Config::default())
        .merge(Toml::file(Env::var_or("ROCKET_DEFAULT_CONFIG", "Rocket.default.toml")).nested())
        .merge(Toml::file(Env::var_or("ROCKET_CONFIG", "Rocket.toml")).nested())
        .merge(Env::prefixed("ROCKET_").ignore(&["PROFILE"]).global())
        .select(Profile::from_env_or(
            "ROCKET_PROFILE",
            Config::DEFAULT_PROFILE,
        ))
}

/// The public directory served at `/`, uploaded images included.
pub(crate) fn static_dir(figment: &Figment) -> PathBuf {
    figment
        .extract_inner(STATIC_DIR)
        .unwrap_or_else(|_| PathBuf::from("public"))
}
