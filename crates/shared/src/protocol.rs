use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{LoopValue, PlaybackAction, ShowId};

/// Raw body of `GET showfile/status`. Every field is untrusted and optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub show: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default, rename = "loop")]
    pub loop_flag: Option<Value>,
}

/// Raw body of `GET showfile/directory`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryPayload {
    #[serde(default)]
    pub shows: Option<Map<String, Value>>,
}

/// Body of `POST showfile`.
///
/// An empty `show` leaves the current selection untouched on the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowCommand {
    pub show: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PlaybackAction>,
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_value: Option<LoopValue>,
}

impl ShowCommand {
    pub fn action(action: PlaybackAction) -> Self {
        Self {
            show: String::new(),
            status: Some(action),
            loop_value: None,
        }
    }

    pub fn select(show: &ShowId) -> Self {
        Self {
            show: show.as_str().to_string(),
            status: None,
            loop_value: None,
        }
    }

    pub fn set_loop(value: LoopValue) -> Self {
        Self {
            show: String::new(),
            status: None,
            loop_value: Some(value),
        }
    }
}

/// Operator intents accepted by the show player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Stop,
    Resume,
    SelectShow(ShowId),
    ToggleLoop(LoopValue),
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Resume => "resume",
            Self::SelectShow(_) => "select_show",
            Self::ToggleLoop(_) => "toggle_loop",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_payload_tolerates_missing_fields() {
        let payload: StatusPayload = serde_json::from_value(json!({"show": 4})).expect("payload");
        assert_eq!(payload.show, Some(json!(4)));
        assert!(payload.status.is_none());
        assert!(payload.loop_flag.is_none());
    }

    #[test]
    fn directory_payload_keeps_listing_order() {
        let payload: DirectoryPayload =
            serde_json::from_str(r#"{"shows":{"z":"9","a":"1","m":"5"}}"#).expect("payload");
        let keys: Vec<_> = payload.shows.expect("shows").keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn select_command_omits_status_and_loop() {
        let body = serde_json::to_value(ShowCommand::select(&ShowId::new("12"))).expect("json");
        assert_eq!(body, json!({"show": "12"}));
    }
}
