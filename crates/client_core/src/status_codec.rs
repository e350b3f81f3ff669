//! Decoding of the untrusted `showfile/status` body into a [`ShowStatus`].
//!
//! Decoding is total: any field that is missing or unusable falls back to its
//! safe default instead of failing the whole payload.

use serde::Deserialize;
use serde_json::Value;
use shared::{
    domain::{ShowId, ShowNumber, ShowStatus},
    protocol::StatusPayload,
};

const LOOP_ENABLED_FLAG: &str = "1";

pub fn decode(raw: &Value) -> ShowStatus {
    // Derived struct deserialization would also accept arrays positionally.
    let payload = if raw.is_object() {
        StatusPayload::deserialize(raw).unwrap_or_default()
    } else {
        StatusPayload::default()
    };

    ShowStatus {
        show: payload.show.as_ref().and_then(decode_show),
        status: payload.status.as_ref().and_then(decode_status_text),
        looping: decode_looping(payload.loop_flag.as_ref()),
    }
}

/// Shows arrive as either strings or numbers. The identifier is kept as the
/// player wrote it; parsing only decides whether it lands in `0..=99`.
pub fn decode_show(raw: &Value) -> Option<ShowId> {
    match raw {
        Value::String(text) => {
            let show = ShowId::new(text.as_str());
            show.number().map(|_| show)
        }
        Value::Number(number) => {
            let in_range = match number.as_i64() {
                Some(value) => ShowNumber::new(value),
                None => number
                    .as_f64()
                    .filter(|value| value.is_finite() && value.fract() == 0.0)
                    .and_then(|value| ShowNumber::new(value as i64)),
            };
            in_range.map(|_| ShowId::new(number.to_string()))
        }
        _ => None,
    }
}

fn decode_status_text(raw: &Value) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn decode_looping(raw: Option<&Value>) -> bool {
    matches!(raw, Some(Value::String(flag)) if flag == LOOP_ENABLED_FLAG)
}
