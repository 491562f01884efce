use super::Event;
use crate::iso_8601::Iso8601;
use crate::template::PageBuilder;
use crate::users::UserId;
use rocket::fs::TempFile;
use rocket::FromForm;
use rocket_dyn_templates::{context, Template};
use serde::Serialize;
use time::PrimitiveDateTime;

/// The multipart form shared by the create and edit pages.
#[derive(Debug, FromForm)]
pub(super) struct EventForm<'r> {
    #[field(default = String::new())]
    pub(super) name: String,
    #[field(default = String::new())]
    pub(super) description: String,
    #[field(default = String::new())]
    pub(super) date: String,
    #[field(default = String::new())]
    pub(super) location: String,
    pub(super) image: Option<TempFile<'r>>,
}

impl<'r> EventForm<'r> {
    pub(super) fn draft(&self) -> EventDraft {
        EventDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
            location: self.location.clone(),
        }
    }

    /// The uploaded image, browsers submit an empty file if none was chosen.
    pub(super) fn image_mut(&mut self) -> Option<&mut TempFile<'r>> {
        self.image.as_mut().filter(|file| file.len() > 0)
    }
}

/// What the user typed in, echoed back when the form is shown again.
#[derive(Debug, Clone, Default, Serialize)]
pub(super) struct EventDraft {
    pub(super) name: String,
    pub(super) description: String,
    pub(super) date: String,
    pub(super) location: String,
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        EventDraft {
            name: event.name.clone(),
            description: event.description.clone(),
            date: event.date.to_local_string(),
            location: event.location.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub(super) struct EventDetails {
    pub(super) name: String,
    pub(super) description: String,
    pub(super) date: Iso8601<PrimitiveDateTime>,
    pub(super) location: String,
}

impl EventDraft {
    pub(super) fn validate(&self) -> Result<EventDetails, Vec<String>> {
        let mut errors = Vec::new();
        let name = required(&self.name, "The Name field is required.", &mut errors);
        let description = required(
            &self.description,
            "The Description field is required.",
            &mut errors,
        );
        let location = required(&self.location, "The Location field is required.", &mut errors);
        let date = Iso8601::<PrimitiveDateTime>::parse_local(&self.date);
        if date.is_none() {
            errors.push("The Date field must be a valid date and time.".to_owned());
        }
        match date {
            Some(date) if errors.is_empty() => Ok(EventDetails {
                name,
                description,
                date,
                location,
            }),
            _ => Err(errors),
        }
    }
}

fn required(value: &str, message: &str, errors: &mut Vec<String>) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(message.to_owned());
    }
    value.to_owned()
}

impl EventDetails {
    pub(super) fn into_new_event(self, organizer_id: UserId, image_path: Option<String>) -> Event<()> {
        Event {
            id: (),
            name: self.name,
            description: self.description,
            date: self.date,
            location: self.location,
            image_path,
            organizer_id,
        }
    }

    /// Overwrites the event's details, the organizer stays untouched.
    pub(super) fn apply_to(self, event: &mut Event) {
        event.name = self.name;
        event.description = self.description;
        event.date = self.date;
        event.location = self.location;
    }
}

/// Renders the create or edit page, `action` is where the form posts to.
pub(super) fn render_event_form(
    page: &PageBuilder<'_>,
    template: &'static str,
    action: String,
    draft: &EventDraft,
    image_path: Option<&str>,
    errors: &[String],
) -> Template {
    page.render(
        template,
        context! { action, event: draft, image_path, errors },
    )
}
