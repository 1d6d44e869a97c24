//! Localized "last updated" label.
//!
//! Renders an optional timestamp as `DD/MM/YYYY às HH:MM` in a fixed UTC
//! offset, together with the UTC ISO-8601 instant for `<time datetime>`.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat, TimeZone, Utc,
};
use handlebars::Handlebars;
use serde::Serialize;

use governo_shared::constants::{DEFAULT_TIME_LABEL, DEFAULT_UTC_OFFSET_MINUTES};

use crate::error::TimeLabelError;

const DISPLAY_FORMAT: &str = "%d/%m/%Y às %H:%M";

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const TIME_LABEL_TEMPLATE: &str = r#"<p{{#if class_name}} class="{{class_name}}"{{/if}}>{{label}}: <time datetime="{{datetime}}">{{text}}</time></p>"#;

/// Anything the label accepts as its date value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Instant(DateTime<Utc>),
    Text(String),
}

impl From<DateTime<Utc>> for DateInput {
    fn from(instant: DateTime<Utc>) -> Self {
        DateInput::Instant(instant)
    }
}

impl From<DateTime<FixedOffset>> for DateInput {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        DateInput::Instant(instant.with_timezone(&Utc))
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

/// Display offset and default label text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLocale {
    pub offset: FixedOffset,
    pub default_label: String,
}

impl LabelLocale {
    /// `None` when the offset is outside ±24h.
    pub fn new(utc_offset_minutes: i32, default_label: impl Into<String>) -> Option<Self> {
        let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
        Some(Self {
            offset,
            default_label: default_label.into(),
        })
    }
}

impl Default for LabelLocale {
    fn default() -> Self {
        Self::new(DEFAULT_UTC_OFFSET_MINUTES, DEFAULT_TIME_LABEL).unwrap_or_else(|| Self {
            offset: Utc.fix(),
            default_label: DEFAULT_TIME_LABEL.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TimeLabel {
    date: Option<DateInput>,
    label: Option<String>,
    class_name: Option<String>,
    locale: LabelLocale,
}

/// Output of a label that has something to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTimeLabel {
    pub label: String,
    /// Visible text, e.g. `15/01/2024 às 11:30`
    pub text: String,
    /// UTC ISO-8601 with millisecond precision
    pub datetime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl TimeLabel {
    pub fn new(date: Option<DateInput>) -> Self {
        Self {
            date,
            label: None,
            class_name: None,
            locale: LabelLocale::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_locale(mut self, locale: LabelLocale) -> Self {
        self.locale = locale;
        self
    }

    /// `Ok(None)` when there is no date to show. Unparseable text is an error.
    pub fn render(&self) -> Result<Option<RenderedTimeLabel>, TimeLabelError> {
        let instant = match &self.date {
            None => return Ok(None),
            Some(DateInput::Text(text)) if text.is_empty() => return Ok(None),
            Some(DateInput::Text(text)) => self.parse_text(text)?,
            Some(DateInput::Instant(instant)) => *instant,
        };

        let local = instant.with_timezone(&self.locale.offset);
        Ok(Some(RenderedTimeLabel {
            label: self
                .label
                .clone()
                .unwrap_or_else(|| self.locale.default_label.clone()),
            text: local.format(DISPLAY_FORMAT).to_string(),
            datetime: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            class_name: self.class_name.clone(),
        }))
    }

    /// Convenience for `render` followed by `to_html`; empty string when absent.
    pub fn render_html(&self) -> Result<String, TimeLabelError> {
        match self.render()? {
            Some(rendered) => rendered.to_html(),
            None => Ok(String::new()),
        }
    }

    fn parse_text(&self, input: &str) -> Result<DateTime<Utc>, TimeLabelError> {
        let rfc3339_error = match DateTime::parse_from_rfc3339(input) {
            Ok(instant) => return Ok(instant.with_timezone(&Utc)),
            Err(e) => e,
        };

        // Wall-clock time without offset is read in the display offset
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                if let Some(local) = self.locale.offset.from_local_datetime(&naive).single() {
                    return Ok(local.with_timezone(&Utc));
                }
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Ok(date.and_time(NaiveTime::MIN).and_utc());
        }

        Err(TimeLabelError::InvalidDate {
            input: input.to_string(),
            source: rfc3339_error,
        })
    }
}

impl RenderedTimeLabel {
    /// HTML fragment with escaped label and text.
    pub fn to_html(&self) -> Result<String, TimeLabelError> {
        let registry = Handlebars::new();
        Ok(registry.render_template(TIME_LABEL_TEMPLATE, self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_absent_date_renders_nothing() {
        assert_eq!(TimeLabel::new(None).render().unwrap(), None);
        assert_eq!(TimeLabel::new(Some("".into())).render().unwrap(), None);
        assert_eq!(TimeLabel::new(None).render_html().unwrap(), "");
    }

    #[test]
    fn test_formats_in_locale_offset() {
        let rendered = TimeLabel::new(Some(utc("2024-01-15T14:30:00Z").into()))
            .render()
            .unwrap()
            .unwrap();

        assert_eq!(rendered.label, "Última atualização");
        assert_eq!(rendered.text, "15/01/2024 às 11:30");
        assert_eq!(rendered.datetime, "2024-01-15T14:30:00.000Z");
    }

    #[test]
    fn test_day_rolls_back_across_offset() {
        let rendered = TimeLabel::new(Some("2024-03-01T01:05:00Z".into()))
            .render()
            .unwrap()
            .unwrap();
        assert_eq!(rendered.text, "29/02/2024 às 22:05");
    }

    #[test]
    fn test_text_with_offset_and_millis() {
        let rendered = TimeLabel::new(Some("2023-12-25T08:00:00.250-03:00".into()))
            .render()
            .unwrap()
            .unwrap();
        assert_eq!(rendered.text, "25/12/2023 às 08:00");
        assert_eq!(rendered.datetime, "2023-12-25T11:00:00.250Z");
    }

    #[test]
    fn test_naive_text_uses_locale_offset() {
        let rendered = TimeLabel::new(Some("2024-06-10T09:15".into()))
            .render()
            .unwrap()
            .unwrap();
        assert_eq!(rendered.text, "10/06/2024 às 09:15");
        assert_eq!(rendered.datetime, "2024-06-10T12:15:00.000Z");
    }

    #[test]
    fn test_date_only_is_utc_midnight() {
        let rendered = TimeLabel::new(Some("2024-06-10".into()))
            .render()
            .unwrap()
            .unwrap();
        assert_eq!(rendered.datetime, "2024-06-10T00:00:00.000Z");
        assert_eq!(rendered.text, "09/06/2024 às 21:00");
    }

    #[test]
    fn test_invalid_text_propagates() {
        let result = TimeLabel::new(Some("ontem".into())).render();
        match result {
            Err(TimeLabelError::InvalidDate { input, .. }) => assert_eq!(input, "ontem"),
            other => panic!("Expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_label_and_locale() {
        let locale = LabelLocale::new(0, "Last updated").unwrap();
        let rendered = TimeLabel::new(Some(utc("2024-01-15T14:30:00Z").into()))
            .with_locale(locale)
            .render()
            .unwrap()
            .unwrap();
        assert_eq!(rendered.label, "Last updated");
        assert_eq!(rendered.text, "15/01/2024 às 14:30");

        let rendered = TimeLabel::new(Some(utc("2024-01-15T14:30:00Z").into()))
            .with_label("Publicado em")
            .render()
            .unwrap()
            .unwrap();
        assert_eq!(rendered.label, "Publicado em");
    }

    #[test]
    fn test_locale_rejects_out_of_range_offset() {
        assert!(LabelLocale::new(24 * 60, "x").is_none());
        assert!(LabelLocale::new(-180, "x").is_some());
    }

    #[test]
    fn test_html_markup() {
        let html = TimeLabel::new(Some(utc("2024-01-15T14:30:00Z").into()))
            .with_class_name("text-sm")
            .render_html()
            .unwrap();
        assert_eq!(
            html,
            r#"<p class="text-sm">Última atualização: <time datetime="2024-01-15T14:30:00.000Z">15/01/2024 às 11:30</time></p>"#
        );

        let html = TimeLabel::new(Some(utc("2024-01-15T14:30:00Z").into()))
            .render_html()
            .unwrap();
        assert!(html.starts_with("<p>"));
    }

    #[test]
    fn test_html_escapes_label() {
        let html = TimeLabel::new(Some(utc("2024-01-15T14:30:00Z").into()))
            .with_label("<b>Atualizado</b>")
            .render_html()
            .unwrap();
        assert!(html.contains("&lt;b&gt;Atualizado&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }
}
