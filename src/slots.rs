//! Slot notifications over the node's websocket (`slotSubscribe`).

use futures::{SinkExt, Stream, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::error::Error;
use crate::types::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMessage {
    /// Acknowledgement of `slotSubscribe`, carrying the subscription id.
    Subscribed { subscription: u64 },
    Notification { slot: Slot },
}

/// Decode one websocket text frame. Anything that is neither an
/// acknowledgement nor a slot notification yields `None`.
pub fn parse_slot_message(text: &str) -> Option<SlotMessage> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "skipping invalid ws message json");
            return None;
        }
    };

    if let (Some(_), Some(result)) = (value.get("id"), value.get("result")) {
        return result
            .as_u64()
            .map(|subscription| SlotMessage::Subscribed { subscription });
    }

    if value.get("method").and_then(Value::as_str) != Some("slotNotification") {
        return None;
    }
    let slot = value
        .get("params")?
        .get("result")?
        .get("slot")?
        .as_u64()?;
    Some(SlotMessage::Notification { slot })
}

/// Open a subscription and stream every notified slot. The stream ends when
/// the server closes the socket.
pub async fn subscribe(
    ws_url: &str,
) -> Result<impl Stream<Item = Result<Slot, Error>> + Send + 'static, Error> {
    let (mut ws, _response) = connect_async(ws_url).await?;
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "slotSubscribe",
    });
    ws.send(Message::Text(request.to_string())).await?;
    tracing::info!(ws_url, "slot subscription sent");

    Ok(ws.filter_map(|message| async move {
        match message {
            Ok(Message::Text(text)) => match parse_slot_message(&text)? {
                SlotMessage::Notification { slot } => Some(Ok(slot)),
                SlotMessage::Subscribed { subscription } => {
                    tracing::info!(subscription, "slotSubscribe acknowledged");
                    None
                }
            },
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "slot subscription closed by server");
                None
            }
            Ok(_) => None,
            Err(e) => Some(Err(Error::from(e))),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_acknowledgement() {
        assert_eq!(
            parse_slot_message(r#"{"jsonrpc":"2.0","result":23784,"id":1}"#),
            Some(SlotMessage::Subscribed { subscription: 23784 })
        );
    }

    #[test]
    fn decodes_notification() {
        let text = r#"{"jsonrpc":"2.0","method":"slotNotification","params":{"result":{"parent":75,"root":44,"slot":76},"subscription":0}}"#;
        assert_eq!(
            parse_slot_message(text),
            Some(SlotMessage::Notification { slot: 76 })
        );
    }

    #[test]
    fn ignores_other_frames() {
        assert_eq!(parse_slot_message("not json"), None);
        assert_eq!(
            parse_slot_message(r#"{"jsonrpc":"2.0","method":"rootNotification","params":{"result":42,"subscription":1}}"#),
            None
        );
        assert_eq!(
            parse_slot_message(r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":1}"#),
            None
        );
    }
}
