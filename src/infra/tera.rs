use crate::iso_8601::Iso8601;
use rocket_dyn_templates::tera::{self, Tera, Value};
use rocket_dyn_templates::Engines;
use std::collections::HashMap;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

const DISPLAY_FORMAT: &[FormatItem<'static>] =
    format_description!("[day padding:none]. [month repr:long] [year], [hour]:[minute]");

pub(crate) fn configure_template_engines(engines: &mut Engines) {
    configure_tera(&mut engines.tera);
}

pub(crate) fn configure_tera(tera: &mut Tera) {
    tera.register_filter("event_date", event_date);
}

/// Renders an event date (as serialized by [`Iso8601`]) for humans.
fn event_date(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let input = tera::from_value::<String>(value.clone())?;
    let date = Iso8601::<PrimitiveDateTime>::parse_local(&input)
        .ok_or_else(|| tera::Error::msg(format!("not an event date: {input}")))?;
    let formatted = date
        .format(DISPLAY_FORMAT)
        .map_err(|e| tera::Error::msg(e.to_string()))?;
    Ok(Value::String(formatted))
}
