use serde::{Deserialize, Serialize};
use std::ops::Deref;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

/// A value that is rendered as ISO 8601 text in templates.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub(crate) struct Iso8601<T>(pub(crate) T);

impl<T> From<T> for Iso8601<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> Deref for Iso8601<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The format used by `<input type="datetime-local">`.
const LOCAL_DATE_TIME: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

const LOCAL_DATE_TIME_WITH_SECONDS: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

impl Iso8601<PrimitiveDateTime> {
    /// Parses the value of a `datetime-local` input,
    /// which may or may not include seconds.
    pub(crate) fn parse_local(input: &str) -> Option<Self> {
        let input = input.trim();
        PrimitiveDateTime::parse(input, LOCAL_DATE_TIME)
            .or_else(|_| PrimitiveDateTime::parse(input, LOCAL_DATE_TIME_WITH_SECONDS))
            .ok()
            .map(Self)
    }

    pub(crate) fn to_local_string(self) -> String {
        self.0
            .format(LOCAL_DATE_TIME)
            .unwrap_or_else(|_| self.0.to_string())
    }
}

macro_rules! impl_serde {
    ($T:ident with $mod:path) => {
        impl Serialize for Iso8601<$T> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                use $mod as module;
                module::serialize(self, serializer)
            }
        }

        impl<'de> Deserialize<'de> for Iso8601<$T> {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                use $mod as module;
                module::deserialize(deserializer).map(Self)
            }
        }
    };
}

time::serde::format_description!(
    iso8601_local_date_time,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]"
);

impl_serde!(PrimitiveDateTime with iso8601_local_date_time);

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    type LocalDateTime = Iso8601<PrimitiveDateTime>;

    #[test]
    fn parses_datetime_local_input() {
        let parsed = LocalDateTime::parse_local("2024-12-05T18:30").unwrap();
        assert_eq!(datetime!(2024-12-05 18:30), parsed.0);
    }

    #[test]
    fn parses_datetime_local_input_with_seconds() {
        let parsed = LocalDateTime::parse_local("2024-12-05T18:30:15").unwrap();
        assert_eq!(datetime!(2024-12-05 18:30:15), parsed.0);
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(LocalDateTime::parse_local("").is_none());
        assert!(LocalDateTime::parse_local("tomorrow").is_none());
        assert!(LocalDateTime::parse_local("2024-13-05T18:30").is_none());
    }

    #[test]
    fn renders_in_input_format() {
        let value = Iso8601(datetime!(2024-12-05 08:05));
        assert_eq!("2024-12-05T08:05", value.to_local_string());
    }
}
