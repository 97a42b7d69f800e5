//! Line transport - JSON messages on stdin/stdout, one per line.

use inkpass_ipc::{decode_ui_message, encode_core_message, CoreToUi};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::controller::Controller;

/// Feed every input line to the controller until EOF.
///
/// Undecodable lines are reported back as `Error` messages and skipped.
pub async fn read_messages<R>(reader: R, controller: &Controller) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match decode_ui_message(&line) {
            Ok(message) => {
                debug!("<- {:?}", message);
                controller.handle(message);
                handled += 1;
            }
            Err(err) => {
                warn!("Ignoring malformed message: {}", err);
                controller.report(CoreToUi::error(err.code(), &err));
            }
        }
    }

    Ok(handled)
}

/// Write every outgoing message as a JSON line until the channel closes.
pub async fn write_messages<W>(
    mut writer: W,
    mut outbox: mpsc::UnboundedReceiver<CoreToUi>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = outbox.recv().await {
        match encode_core_message(&message) {
            Ok(line) => {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Err(err) => warn!("Failed to encode {:?}: {}", message, err),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeriveMode;
    use gesture::PasswordSession;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_read_messages_drives_controller() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = Arc::new(PasswordSession::default());
        let (controller, _worker) = Controller::spawn(Arc::clone(&session), DeriveMode::Coalesce, tx);

        let input = concat!(
            r#"{"type":"ConfigChange","data":{"password_length":8}}"#,
            "\n",
            "garbage\n",
            "\n",
            r#"{"type":"Capture","data":{"x":0,"y":0,"timestamp":1000}}"#,
            "\n",
        );
        let handled = read_messages(input.as_bytes(), &controller).await.unwrap();
        assert_eq!(handled, 2);
        assert_eq!(session.point_count(), 1);

        let mut saw_error = false;
        loop {
            let message = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
                .await
                .expect("timed out")
                .expect("outbox closed");
            match message {
                CoreToUi::Error { code, .. } => {
                    assert_eq!(code, "invalid_message");
                    saw_error = true;
                }
                CoreToUi::PasswordUpdated { password, .. } => {
                    assert_eq!(password, "mrtlDszD");
                    break;
                }
                _ => {}
            }
        }
        assert!(saw_error);
    }

    #[tokio::test]
    async fn test_write_messages_emits_lines() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(CoreToUi::PointCount { count: 3 }).unwrap();
        tx.send(CoreToUi::Cleared).unwrap();
        drop(tx);

        let mut out = Vec::new();
        write_messages(&mut out, rx).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"type\":\"PointCount\",\"data\":{\"count\":3}}\n{\"type\":\"Cleared\"}\n"
        );
    }
}
