mod authentication;
pub(crate) use authentication::*;
mod authorization;
pub(crate) use authorization::*;
mod password;
pub(crate) use password::*;
