//! Rendered state as an operator sees it.
//!
//! Views are rebuilt wholesale from a confirmed [`ShowStatus`]; nothing here
//! is patched field by field.

use std::fmt;

use shared::domain::{ShowDirectory, ShowStatus};

pub const NO_SHOW_TEXT: &str = "None";
pub const MISSING_STATUS_TEXT: &str = "undefined";
pub const UNRENDERED_TEXT: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopButtonLabel {
    /// Offered while the player is not looping.
    #[default]
    Looping,
    /// Offered while the player is looping.
    NoLoop,
}

impl LoopButtonLabel {
    pub fn for_looping(looping: bool) -> Self {
        if looping {
            Self::NoLoop
        } else {
            Self::Looping
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Looping => "Looping",
            Self::NoLoop => "No loop",
        }
    }
}

impl fmt::Display for LoopButtonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub show: String,
    pub status: String,
    pub looping: String,
    pub loop_button: LoopButtonLabel,
}

impl StatusView {
    pub fn from_status(status: &ShowStatus) -> Self {
        Self {
            show: status
                .show
                .as_ref()
                .map(|show| show.to_string())
                .unwrap_or_else(|| NO_SHOW_TEXT.to_string()),
            status: status
                .status
                .clone()
                .unwrap_or_else(|| MISSING_STATUS_TEXT.to_string()),
            looping: if status.looping { "Yes" } else { "No" }.to_string(),
            loop_button: LoopButtonLabel::for_looping(status.looping),
        }
    }

    pub fn rows(&self) -> [(&'static str, &str); 3] {
        [
            ("Show", self.show.as_str()),
            ("Status", self.status.as_str()),
            ("Looping", self.looping.as_str()),
        ]
    }
}

impl Default for StatusView {
    fn default() -> Self {
        Self {
            show: UNRENDERED_TEXT.to_string(),
            status: UNRENDERED_TEXT.to_string(),
            looping: UNRENDERED_TEXT.to_string(),
            loop_button: LoopButtonLabel::default(),
        }
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.rows() {
            writeln!(f, "{label:<8} {value}")?;
        }
        write!(f, "[{}]", self.loop_button)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryOption {
    pub value: String,
    pub label: String,
}

pub fn directory_options(directory: &ShowDirectory) -> Vec<DirectoryOption> {
    directory
        .shows()
        .map(|show| DirectoryOption {
            value: show.to_string(),
            label: show.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::domain::{DirectoryEntry, ShowId};

    use super::*;
    use crate::status_codec;

    #[test]
    fn looping_status_renders_no_loop_button() {
        let view = StatusView::from_status(&status_codec::decode(
            &json!({"show": "5", "status": "playing", "loop": "1"}),
        ));
        assert_eq!(
            view.rows(),
            [("Show", "5"), ("Status", "playing"), ("Looping", "Yes")]
        );
        assert_eq!(view.loop_button.as_str(), "No loop");
    }

    #[test]
    fn out_of_range_show_renders_none() {
        let view = StatusView::from_status(&status_codec::decode(
            &json!({"show": "150", "status": "idle", "loop": "0"}),
        ));
        assert_eq!(
            view.rows(),
            [("Show", "None"), ("Status", "idle"), ("Looping", "No")]
        );
        assert_eq!(view.loop_button, LoopButtonLabel::Looping);
    }

    #[test]
    fn show_renders_exactly_as_reported() {
        let view = StatusView::from_status(&status_codec::decode(
            &json!({"show": "07", "status": "Running", "loop": "0"}),
        ));
        assert_eq!(view.show, "07");

        let numeric = StatusView::from_status(&status_codec::decode(&json!({"show": 12})));
        assert_eq!(numeric.show, "12");
    }

    #[test]
    fn missing_status_renders_placeholder() {
        let view = StatusView::from_status(&ShowStatus::default());
        assert_eq!(view.status, MISSING_STATUS_TEXT);
    }

    #[test]
    fn display_lists_rows_then_button() {
        let view = StatusView::from_status(&status_codec::decode(
            &json!({"show": 1, "status": "Stopped", "loop": "0"}),
        ));
        assert_eq!(
            view.to_string(),
            "Show     1\nStatus   Stopped\nLooping  No\n[Looping]"
        );
    }

    #[test]
    fn directory_options_use_show_id_for_value_and_label() {
        let directory = ShowDirectory::new(vec![
            DirectoryEntry {
                key: "b".into(),
                show: ShowId::new("12"),
            },
            DirectoryEntry {
                key: "a".into(),
                show: ShowId::new("3"),
            },
        ]);
        let options = directory_options(&directory);
        assert_eq!(
            options,
            [
                DirectoryOption {
                    value: "12".into(),
                    label: "12".into()
                },
                DirectoryOption {
                    value: "3".into(),
                    label: "3".into()
                },
            ]
        );
    }
}
