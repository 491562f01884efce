use crate::database::Repository as _;
use crate::testing::{event_form, Multipart, TestApp};
use rocket::http::Status;

#[rocket::async_test]
async fn event_list_is_public() {
    let app = TestApp::start().await;
    let response = app.client.get("/Event/Index").dispatch().await;
    assert_eq!(Status::Ok, response.status());

    let response = app.client.get("/").dispatch().await;
    assert_eq!(Some("/Event/Index"), response.headers().get_one("Location"));
}

#[rocket::async_test]
async fn creating_an_event_makes_the_creator_its_organizer() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;

    let event = app.create_event("Board Game Night").await;

    let mut repository = app.repository().await;
    let host = repository
        .get_user_by_email("host@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(host.id, event.organizer_id);
    assert!(host.is_organizer());
    assert_eq!(None, event.image_path);

    let body = app
        .client
        .get("/Event/Index")
        .dispatch()
        .await
        .into_string()
        .await
        .unwrap();
    assert!(body.contains("Event created successfully!"));
    assert!(body.contains("Board Game Night"));
}

#[rocket::async_test]
async fn invalid_form_creates_nothing() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;

    let form = Multipart::default()
        .text("name", "Board Game Night")
        .text("description", "Games and snacks")
        .text("date", "someday")
        .text("location", "Community Hall");
    let response = app.post_event("/Event/Create", form).await;
    assert_eq!(Status::Ok, response.status());
    assert!(app.find_event("Board Game Night").await.is_none());
}

#[rocket::async_test]
async fn images_are_stored_under_a_fresh_name() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;

    let form = event_form("Picnic").file("image", "Park.PNG", b"not really a png");
    let response = app.post_event("/Event/Create", form).await;
    assert_eq!(Status::SeeOther, response.status());

    let event = app.find_event("Picnic").await.unwrap().event;
    let image_path = event.image_path.unwrap();
    assert!(image_path.starts_with("/images/"));
    assert!(image_path.ends_with(".png"));
    let file_name = image_path.trim_start_matches("/images/");
    assert!(app.images_dir().join(file_name).exists());

    let response = app.client.get(image_path).dispatch().await;
    assert_eq!(Status::Ok, response.status());
}

#[rocket::async_test]
async fn unsupported_image_formats_are_rejected_on_create() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;

    let form = event_form("Picnic").file("image", "notes.txt", b"hello");
    let response = app.post_event("/Event/Create", form).await;
    assert_eq!(Status::Ok, response.status());
    let body = response.into_string().await.unwrap();
    assert!(body.contains("Invalid image format. Allowed formats: .jpg, .jpeg, .png, .gif."));
    assert!(app.find_event("Picnic").await.is_none());
}

#[rocket::async_test]
async fn organizer_edits_their_event() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let event = app.create_event("Board Game Night").await;

    let response = app.client.get(format!("/Event/Edit/{}", event.id)).dispatch().await;
    assert_eq!(Status::Ok, response.status());

    let form = Multipart::default()
        .text("name", "Chess Night")
        .text("description", "Bring a board")
        .text("date", "2024-12-06T19:00")
        .text("location", "Library");
    let response = app.post_event(&format!("/Event/Edit/{}", event.id), form).await;
    assert_eq!(Status::SeeOther, response.status());

    let mut repository = app.repository().await;
    let edited = repository.get_event(event.id).await.unwrap().unwrap();
    assert_eq!("Chess Night", edited.name);
    assert_eq!("Library", edited.location);
    assert_eq!(event.organizer_id, edited.organizer_id);
}

#[rocket::async_test]
async fn unsupported_image_formats_leave_the_event_unchanged() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    app.post_event(
        "/Event/Create",
        event_form("Picnic").file("image", "park.jpg", b"jpeg"),
    )
    .await;
    let event = app.find_event("Picnic").await.unwrap().event;

    let form = event_form("Renamed").file("image", "virus.exe", b"nope");
    let response = app.post_event(&format!("/Event/Edit/{}", event.id), form).await;
    assert_eq!(Status::Ok, response.status());

    let mut repository = app.repository().await;
    let unchanged = repository.get_event(event.id).await.unwrap().unwrap();
    assert_eq!("Picnic", unchanged.name);
    assert_eq!(event.image_path, unchanged.image_path);
}

#[rocket::async_test]
async fn only_the_organizer_may_manage_an_event() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let event = app.create_event("Board Game Night").await;
    app.logout().await;

    app.sign_in_as("guest@example.com").await;
    let edit = format!("/Event/Edit/{}", event.id);
    let participants = format!("/Event/Participants?eventId={}", event.id);
    let delete = format!("/Event/Delete/{}", event.id);

    assert_eq!(Status::Forbidden, app.client.get(edit.clone()).dispatch().await.status());
    let response = app.post_event(&edit, event_form("Hijacked")).await;
    assert_eq!(Status::Forbidden, response.status());
    assert_eq!(
        Status::Forbidden,
        app.client.get(participants.clone()).dispatch().await.status()
    );
    assert_eq!(Status::Forbidden, app.client.post(delete.clone()).dispatch().await.status());

    app.logout().await;
    let response = app.client.get(participants).dispatch().await;
    assert_eq!(Status::SeeOther, response.status());
    let response = app.client.post(delete).dispatch().await;
    assert_eq!(Status::SeeOther, response.status());

    assert!(app.find_event("Board Game Night").await.is_some());
}

#[rocket::async_test]
async fn missing_events_are_not_found() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    assert_eq!(Status::NotFound, app.client.get("/Event/Edit/42").dispatch().await.status());
    assert_eq!(Status::NotFound, app.client.post("/Event/Delete/42").dispatch().await.status());
    assert_eq!(
        Status::NotFound,
        app.client.get("/Event/Participants?eventId=42").dispatch().await.status()
    );
}

#[rocket::async_test]
async fn signing_up_twice_keeps_a_single_signup() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let event = app.create_event("Board Game Night").await;
    app.logout().await;
    app.sign_in_as("guest@example.com").await;

    app.signup("/Event/Signup", &event).await;
    let body = app.client.get("/Event/Index").dispatch().await.into_string().await.unwrap();
    assert!(body.contains("You have successfully signed up for the event."));

    app.signup("/Event/Signup", &event).await;
    let body = app.client.get("/Event/Index").dispatch().await.into_string().await.unwrap();
    assert!(body.contains("You are already signed up for this event."));

    let listing = app.find_event("Board Game Night").await.unwrap();
    assert_eq!(1, listing.participants.len());
}

#[rocket::async_test]
async fn anonymous_signup_asks_to_log_in() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let event = app.create_event("Board Game Night").await;
    app.logout().await;

    let response = app.signup("/Event/Signup", &event).await;
    assert_eq!(Status::SeeOther, response.status());
    let body = app.client.get("/Event/Index").dispatch().await.into_string().await.unwrap();
    assert!(body.contains("You need to be logged in to sign up for an event."));
    assert!(app.find_event("Board Game Night").await.unwrap().participants.is_empty());
}

#[rocket::async_test]
async fn signing_up_for_a_missing_event_fails() {
    let app = TestApp::start().await;
    app.sign_in_as("guest@example.com").await;
    app.client
        .post("/Event/Signup")
        .header(rocket::http::ContentType::Form)
        .body("eventId=42")
        .dispatch()
        .await;
    let body = app.client.get("/Event/Index").dispatch().await.into_string().await.unwrap();
    assert!(body.contains("Event not found."));
}

#[rocket::async_test]
async fn cancelling_without_a_signup_changes_nothing() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let event = app.create_event("Board Game Night").await;
    app.signup("/Event/Signup", &event).await;
    app.logout().await;
    app.sign_in_as("guest@example.com").await;

    app.signup("/Event/CancelSignup", &event).await;
    let body = app.client.get("/Event/Index").dispatch().await.into_string().await.unwrap();
    assert!(body.contains("You are not signed up for this event."));
    assert_eq!(1, app.find_event("Board Game Night").await.unwrap().participants.len());
}

#[rocket::async_test]
async fn cancelling_removes_the_signup() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let event = app.create_event("Board Game Night").await;
    app.signup("/Event/Signup", &event).await;

    app.signup("/Event/CancelSignup", &event).await;
    let body = app.client.get("/Event/Index").dispatch().await.into_string().await.unwrap();
    assert!(body.contains("You have canceled your signup for the event."));
    assert!(app.find_event("Board Game Night").await.unwrap().participants.is_empty());
}

#[rocket::async_test]
async fn organizer_sees_participants() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let event = app.create_event("Board Game Night").await;
    app.logout().await;
    app.sign_in_as("guest@example.com").await;
    app.signup("/Event/Signup", &event).await;
    app.logout().await;
    app.login("host@example.com").await;

    let response = app
        .client
        .get(format!("/Event/Participants?eventId={}", event.id))
        .dispatch()
        .await;
    assert_eq!(Status::Ok, response.status());
    assert!(response.into_string().await.unwrap().contains("guest@example.com"));
}

#[rocket::async_test]
async fn deleting_an_event_removes_its_signups() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let event = app.create_event("Board Game Night").await;
    app.signup("/Event/Signup", &event).await;

    let response = app.client.post(format!("/Event/Delete/{}", event.id)).dispatch().await;
    assert_eq!(Status::SeeOther, response.status());

    let mut repository = app.repository().await;
    assert!(repository.get_event(event.id).await.unwrap().is_none());
    assert!(repository.get_participants(event.id).await.unwrap().is_empty());
}

#[rocket::async_test]
async fn creating_an_event_restores_a_missing_organizer_role() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let mut repository = app.repository().await;
    sqlx::query("DELETE FROM roles WHERE name = 'Organizer'")
        .execute(&mut *repository.0)
        .await
        .unwrap();

    let event = app.create_event("Board Game Night").await;

    let host = repository
        .get_user_by_email("host@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(host.id, event.organizer_id);
    assert!(host.is_organizer());
}

fn stored_images(app: &TestApp) -> usize {
    std::fs::read_dir(app.images_dir()).unwrap().count()
}

#[rocket::async_test]
async fn failed_creates_leave_no_image_behind() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let mut repository = app.repository().await;
    sqlx::query("CREATE TRIGGER no_inserts BEFORE INSERT ON events BEGIN SELECT RAISE(ABORT, 'read only'); END")
        .execute(&mut *repository.0)
        .await
        .unwrap();

    let form = event_form("Picnic").file("image", "park.png", b"png");
    let response = app.post_event("/Event/Create", form).await;
    assert_eq!(Status::Ok, response.status());
    let body = response.into_string().await.unwrap();
    assert!(body.contains("There was an error creating the event. Please try again."));
    assert_eq!(0, stored_images(&app));
}

#[rocket::async_test]
async fn failed_edits_leave_no_image_behind() {
    let app = TestApp::start().await;
    app.sign_in_as("host@example.com").await;
    let event = app.create_event("Picnic").await;
    let mut repository = app.repository().await;
    sqlx::query("CREATE TRIGGER no_updates BEFORE UPDATE ON events BEGIN SELECT RAISE(ABORT, 'read only'); END")
        .execute(&mut *repository.0)
        .await
        .unwrap();

    let form = event_form("Picnic").file("image", "park.png", b"png");
    let response = app.post_event(&format!("/Event/Edit/{}", event.id), form).await;
    assert_eq!(Status::InternalServerError, response.status());
    assert_eq!(0, stored_images(&app));

    let unchanged = repository.get_event(event.id).await.unwrap().unwrap();
    assert_eq!(None, unchanged.image_path);
}
