use crate::build;
use crate::database::{Repository, SqliteRepository};
use crate::event::{Event, EventListing};
use crate::infra::Db;
use crate::users::Role;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::{Client, LocalResponse};
use std::path::PathBuf;
use tempfile::TempDir;

pub(crate) const PASSWORD: &str = "Secret1!";

/// A running application backed by its own database and public directory.
pub(crate) struct TestApp {
    pub(crate) client: Client,
    directory: TempDir,
}

impl TestApp {
    pub(crate) async fn start() -> Self {
        let directory = tempfile::tempdir().unwrap();
        let database = directory.path().join("events.sqlite");
        let figment = rocket::Config::figment()
            .merge((
                "databases.sqlite.url",
                format!("sqlite://{}?mode=rwc", database.display()),
            ))
            .merge(("static_dir", directory.path().join("public")))
            .merge(("template_dir", "templates"))
            .merge(("log_level", "off"));
        let client = Client::tracked(build(rocket::custom(figment)))
            .await
            .unwrap();
        Self { client, directory }
    }

    pub(crate) fn images_dir(&self) -> PathBuf {
        self.directory.path().join("public").join("images")
    }

    pub(crate) async fn repository(&self) -> SqliteRepository {
        SqliteRepository(Db::connect(self.client.rocket()).await.unwrap())
    }

    pub(crate) async fn register(&self, email: &str) -> LocalResponse<'_> {
        self.client
            .post("/Account/Register")
            .header(ContentType::Form)
            .body(format!("email={email}&password={}", encode(PASSWORD)))
            .dispatch()
            .await
    }

    pub(crate) async fn login(&self, email: &str) -> LocalResponse<'_> {
        self.client
            .post("/Account/Login")
            .header(ContentType::Form)
            .body(format!("email={email}&password={}", encode(PASSWORD)))
            .dispatch()
            .await
    }

    /// Registers a fresh account and logs in with it.
    pub(crate) async fn sign_in_as(&self, email: &str) {
        let response = self.register(email).await;
        assert_eq!(Status::Ok, response.status());
        let response = self.login(email).await;
        assert_eq!(Status::SeeOther, response.status());
    }

    pub(crate) async fn logout(&self) {
        self.client.post("/Account/Logout").dispatch().await;
    }

    pub(crate) async fn make_organizer(&self, email: &str) {
        let mut repository = self.repository().await;
        let user = repository.get_user_by_email(email).await.unwrap().unwrap();
        repository.grant_role(user.id, Role::Organizer).await.unwrap();
    }

    pub(crate) async fn post_event(&self, uri: &str, form: Multipart) -> LocalResponse<'_> {
        let (content_type, body) = form.finish();
        self.client
            .post(uri.to_owned())
            .header(content_type)
            .body(body)
            .dispatch()
            .await
    }

    /// Creates an event through the create page as the logged in user.
    pub(crate) async fn create_event(&self, name: &str) -> Event {
        let response = self.post_event("/Event/Create", event_form(name)).await;
        assert_eq!(Status::SeeOther, response.status());
        self.find_event(name).await.unwrap().event
    }

    pub(crate) async fn find_event(&self, name: &str) -> Option<EventListing> {
        let mut repository = self.repository().await;
        let listings = repository.get_event_listings().await.unwrap();
        listings.into_iter().find(|l| l.event.name == name)
    }

    pub(crate) async fn signup(&self, uri: &str, event: &Event) -> LocalResponse<'_> {
        self.client
            .post(uri.to_owned())
            .header(ContentType::Form)
            .body(format!("eventId={}", event.id))
            .dispatch()
            .await
    }
}

/// A form with all fields of the event form filled in.
pub(crate) fn event_form(name: &str) -> Multipart {
    Multipart::default()
        .text("name", name)
        .text("description", "Games and snacks")
        .text("date", "2024-12-05T18:30")
        .text("location", "Community Hall")
}

fn encode(value: &str) -> String {
    value.replace('!', "%21")
}

const BOUNDARY: &str = "event-manager-test-boundary";

#[derive(Debug, Default)]
pub(crate) struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    pub(crate) fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub(crate) fn file(mut self, name: &str, file_name: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub(crate) fn finish(mut self) -> (ContentType, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        let content_type =
            ContentType::new("multipart", "form-data").with_params(("boundary", BOUNDARY));
        (content_type, self.body)
    }
}
