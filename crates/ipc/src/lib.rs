//! IPC message protocol for Inkpass
//!
//! Defines the messages exchanged between the UI collaborators (canvas,
//! sliders, checkboxes, color buttons) and the derivation core, plus the
//! line codec used by the headless controller. One JSON document per line.

mod error;
mod messages;
mod types;

pub use error::IpcError;
pub use messages::{CoreToUi, UiToCore};
pub use types::ConfigUpdate;

/// Decode one line of UI input into a message.
///
/// Blank lines are rejected as [`IpcError::InvalidFormat`].
pub fn decode_ui_message(line: &str) -> Result<UiToCore, IpcError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(IpcError::InvalidFormat("empty message".to_string()));
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Encode a core message as a single JSON line (without the trailing newline).
pub fn encode_core_message(message: &CoreToUi) -> Result<String, IpcError> {
    Ok(serde_json::to_string(message)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpass_config::DerivationConfig;

    #[test]
    fn test_decode_capture_with_timestamp() {
        let msg = decode_ui_message(r#"{"type":"Capture","data":{"x":12.5,"y":3,"timestamp":1016}}"#)
            .unwrap();
        assert_eq!(
            msg,
            UiToCore::Capture {
                x: 12.5,
                y: 3.0,
                timestamp: Some(1016),
            }
        );
    }

    #[test]
    fn test_decode_capture_without_timestamp() {
        let msg = decode_ui_message(r#"{"type":"Capture","data":{"x":-4,"y":900.25}}"#).unwrap();
        assert_eq!(
            msg,
            UiToCore::Capture {
                x: -4.0,
                y: 900.25,
                timestamp: None,
            }
        );
    }

    #[test]
    fn test_decode_reset_and_query() {
        assert_eq!(decode_ui_message(r#"{"type":"Reset"}"#).unwrap(), UiToCore::Reset);
        assert_eq!(decode_ui_message(r#" {"type":"Query"} "#).unwrap(), UiToCore::Query);
    }

    #[test]
    fn test_decode_partial_config_change() {
        let msg =
            decode_ui_message(r#"{"type":"ConfigChange","data":{"include_numbers":true}}"#).unwrap();
        match msg {
            UiToCore::ConfigChange(update) => {
                assert_eq!(update.include_numbers, Some(true));
                assert!(update.password_length.is_none());
                assert!(update.include_special.is_none());
                assert!(update.active_color.is_none());
            }
            other => panic!("Expected ConfigChange, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_ui_message("   "),
            Err(IpcError::InvalidFormat(_))
        ));
        assert!(matches!(
            decode_ui_message(r#"{"type":"Explode"}"#),
            Err(IpcError::Serialize(_))
        ));
        assert!(decode_ui_message("not json").is_err());
    }

    #[test]
    fn test_encode_password_updated() {
        let line = encode_core_message(&CoreToUi::PasswordUpdated {
            password: "mrtlDszD".to_string(),
            point_count: 1,
        })
        .unwrap();
        assert_eq!(
            line,
            r#"{"type":"PasswordUpdated","data":{"password":"mrtlDszD","point_count":1}}"#
        );
    }

    #[test]
    fn test_encode_cleared() {
        assert_eq!(
            encode_core_message(&CoreToUi::Cleared).unwrap(),
            r#"{"type":"Cleared"}"#
        );
    }

    #[test]
    fn test_config_update_apply() {
        let base = DerivationConfig::default();
        let update = ConfigUpdate {
            password_length: Some(40),
            active_color: Some("red".to_string()),
            ..Default::default()
        };
        let merged = update.apply_to(&base);
        assert_eq!(merged.password_length, 40);
        assert_eq!(merged.active_color, "red");
        assert_eq!(merged.include_numbers, base.include_numbers);
        assert_eq!(merged.include_special, base.include_special);

        assert!(ConfigUpdate::default().is_empty());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_ui_message_encode_omits_missing_timestamp() {
        let line = serde_json::to_string(&UiToCore::Capture {
            x: 1.0,
            y: 2.0,
            timestamp: None,
        })
        .unwrap();
        assert!(!line.contains("timestamp"));
        assert_eq!(
            decode_ui_message(&line).unwrap(),
            UiToCore::Capture {
                x: 1.0,
                y: 2.0,
                timestamp: None,
            }
        );
    }
}
