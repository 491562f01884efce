use anyhow::Error;
use rocket::http::Status;
use rocket::response::Debug;
use rocket::Responder;

pub(crate) type HttpResult<T> = Result<T, HttpError>;

/// Either an unexpected failure (rendered as a 500 and logged by Rocket)
/// or a plain status such as 403 or 404 that is handled by a catcher.
#[derive(Responder)]
pub(crate) enum HttpError {
    Error(Debug<Error>),
    Status(Status),
}

impl From<Error> for HttpError {
    fn from(value: Error) -> Self {
        HttpError::Error(Debug(value))
    }
}

impl From<Status> for HttpError {
    fn from(value: Status) -> Self {
        HttpError::Status(value)
    }
}

pub(crate) trait OptionExt<T> {
    fn or_not_found(self) -> HttpResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self) -> HttpResult<T> {
        self.ok_or(HttpError::Status(Status::NotFound))
    }
}
