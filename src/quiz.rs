/// Quiz answer summary
///
/// Takes a snapshot of the two quiz fields and writes a fixed two-line
/// summary into the result container. Nothing is inferred from the answers;
/// they are echoed back under static captions.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::page::{FormField, ResultContainer};

/// Shown in place of an empty answer
pub const NOT_ANSWERED: &str = "Not answered";

pub const SKIN_TYPE_CAPTION: &str = "Predicted Skin Type:";
pub const ACNE_FREQUENCY_CAPTION: &str = "Acne Frequency:";

/// How answer text is written into the summary markup
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarkupPolicy {
    /// Escape HTML special characters in answers
    #[default]
    Escape,
    /// Insert answers verbatim, markup included
    Preserve,
}

/// One captioned line of the summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    pub caption: &'static str,
    pub value: String,
}

impl ResultLine {
    fn to_markup(&self, policy: MarkupPolicy) -> String {
        let value = match policy {
            MarkupPolicy::Escape => escape_html(&self.value),
            MarkupPolicy::Preserve => Cow::Borrowed(self.value.as_str()),
        };

        format!("<p><strong>{}</strong> {}</p>", self.caption, value)
    }
}

/// The structured summary built by [`analyze`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBlock {
    pub lines: [ResultLine; 2],
}

impl ResultBlock {
    pub fn new(skin_type: &str, acne_severity: &str) -> Self {
        Self {
            lines: [
                ResultLine {
                    caption: SKIN_TYPE_CAPTION,
                    value: answer_or_placeholder(skin_type).to_string(),
                },
                ResultLine {
                    caption: ACNE_FREQUENCY_CAPTION,
                    value: answer_or_placeholder(acne_severity).to_string(),
                },
            ],
        }
    }

    pub fn to_markup(&self, policy: MarkupPolicy) -> String {
        self.lines
            .iter()
            .map(|line| line.to_markup(policy))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Empty answers become [`NOT_ANSWERED`]; anything else is used as-is.
pub fn answer_or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        NOT_ANSWERED
    } else {
        value
    }
}

/// Summarize both answers into `result`, replacing whatever it held
pub fn analyze(
    skin_type: &FormField,
    acne_severity: &FormField,
    result: &mut ResultContainer,
    policy: MarkupPolicy,
) {
    let block = ResultBlock::new(skin_type.value(), acne_severity.value());
    let markup = block.to_markup(policy);

    log::info!("Analyzed answers into #{}", result.id());
    log::debug!(
        "{}={:?}, {}={:?}",
        skin_type.id(),
        skin_type.value(),
        acne_severity.id(),
        acne_severity.value()
    );

    result.replace(block, markup);
}

/// Escape the characters HTML treats as markup
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(skin_type: &str, acne_severity: &str) -> (FormField, FormField) {
        let mut q1 = FormField::new("q1", "Skin type");
        let mut q4 = FormField::new("q4", "Acne severity");
        q1.set_value(skin_type);
        q4.set_value(acne_severity);
        (q1, q4)
    }

    fn run(skin_type: &str, acne_severity: &str, policy: MarkupPolicy) -> String {
        let (q1, q4) = fields(skin_type, acne_severity);
        let mut result = ResultContainer::new("result");
        analyze(&q1, &q4, &mut result, policy);
        result.content().to_string()
    }

    #[test]
    fn test_answers_are_echoed() {
        let content = run("Oily", "Mild", MarkupPolicy::Escape);

        assert!(content.contains("Predicted Skin Type:</strong> Oily"));
        assert!(content.contains("Acne Frequency:</strong> Mild"));
        assert_eq!(
            content,
            "<p><strong>Predicted Skin Type:</strong> Oily</p>\n\
             <p><strong>Acne Frequency:</strong> Mild</p>"
        );
    }

    #[test]
    fn test_empty_answers_use_placeholder() {
        let content = run("", "", MarkupPolicy::Escape);
        assert_eq!(content.matches(NOT_ANSWERED).count(), 2);
    }

    #[test]
    fn test_each_field_falls_back_independently() {
        let content = run("Dry", "", MarkupPolicy::Escape);

        assert!(content.contains("Predicted Skin Type:</strong> Dry"));
        assert!(content.contains("Acne Frequency:</strong> Not answered"));
    }

    #[test]
    fn test_whitespace_is_an_answer() {
        assert_eq!(answer_or_placeholder(" "), " ");
        assert_eq!(answer_or_placeholder(""), NOT_ANSWERED);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let (q1, q4) = fields("Combination", "Often");
        let mut result = ResultContainer::new("result");

        analyze(&q1, &q4, &mut result, MarkupPolicy::Escape);
        let first = result.content().to_string();
        analyze(&q1, &q4, &mut result, MarkupPolicy::Escape);

        assert_eq!(result.content(), first);
    }

    #[test]
    fn test_result_is_replaced_not_appended() {
        let mut result = ResultContainer::new("result");

        let (q1, q4) = fields("Oily", "Mild");
        analyze(&q1, &q4, &mut result, MarkupPolicy::Escape);

        let (q1, q4) = fields("Dry", "Rarely");
        analyze(&q1, &q4, &mut result, MarkupPolicy::Escape);

        assert!(!result.content().contains("Oily"));
        assert_eq!(result.content().matches("<p>").count(), 2);
        assert_eq!(result.block().unwrap().lines[0].value, "Dry");
    }

    #[test]
    fn test_markup_in_answers_is_escaped() {
        let content = run("<b>Oily</b>", "Tom & \"Jerry\"", MarkupPolicy::Escape);

        assert!(content.contains("&lt;b&gt;Oily&lt;/b&gt;"));
        assert!(content.contains("Tom &amp; &quot;Jerry&quot;"));
        assert!(!content.contains("<b>"));
    }

    #[test]
    fn test_markup_is_kept_when_preserved() {
        let content = run("<b>Oily</b>", "", MarkupPolicy::Preserve);
        assert!(content.contains("Predicted Skin Type:</strong> <b>Oily</b>"));
    }

    /// Keeps every record at or above debug, tagged with its level
    struct Capture(std::sync::Mutex<Vec<(log::Level, String)>>);

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            self.0
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(std::sync::Mutex::new(Vec::new()));

    #[test]
    fn test_answers_stay_out_of_info_logs() {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(log::LevelFilter::Debug);

        run("Oily-7f3a", "Often-7f3a", MarkupPolicy::Escape);

        let records = CAPTURE.0.lock().unwrap();
        let mine: Vec<_> = records.iter().filter(|(_, msg)| msg.contains("7f3a")).collect();

        assert!(!mine.is_empty());
        assert!(mine.iter().all(|(level, _)| *level == log::Level::Debug));
    }

    #[test]
    fn test_escape_borrows_plain_text() {
        assert!(matches!(escape_html("Oily"), Cow::Borrowed("Oily")));
        assert_eq!(escape_html("it's"), "it&#39;s");
    }
}
