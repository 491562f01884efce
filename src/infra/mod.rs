mod config;
pub(crate) use config::*;
mod database;
pub(crate) use database::*;
mod secret_key;
pub(crate) use secret_key::*;
mod tera;
pub(crate) use self::tera::*;
