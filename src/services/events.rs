use std::borrow::Cow;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::warn;

use super::backend::StageError;
use crate::payload::VisualizationUpdate;

/// Decodes a `text/event-stream` body into visualization updates.
///
/// Only `data:` fields are used; consecutive data lines are joined with '\n'
/// and dispatched on a blank line. Comments and other fields are skipped.
/// A frame whose data is not a valid update is logged and dropped, and
/// invalid UTF-8 is replaced rather than reported; the stream keeps going.
#[derive(Debug, Default)]
pub struct EventStreamCodec {
    data: Vec<String>,
}

impl EventStreamCodec {
    pub fn new() -> Self {
        Self::default()
    }

    fn dispatch(&mut self) -> Option<VisualizationUpdate> {
        if self.data.is_empty() {
            return None;
        }
        let body = self.data.join("\n");
        self.data.clear();

        match serde_json::from_str(&body) {
            Ok(update) => Some(update),
            Err(e) => {
                warn!("Dropped malformed visualization event: {}", e);
                None
            }
        }
    }
}

impl Decoder for EventStreamCodec {
    type Item = VisualizationUpdate;
    type Error = StageError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        while let Some(newline) = src.iter().position(|b| *b == b'\n') {
            let raw = src.split_to(newline + 1);
            let text = String::from_utf8_lossy(&raw);
            if let Cow::Owned(_) = text {
                warn!("Replaced invalid UTF-8 in event stream line");
            }
            let line = text.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if let Some(update) = self.dispatch() {
                    return Ok(Some(update));
                }
                continue;
            }

            if line.starts_with(':') {
                continue;
            }

            if let Some(value) = line.strip_prefix("data:") {
                let value = value.strip_prefix(' ').unwrap_or(value);
                self.data.push(value.to_string());
            }
            // event:, id:, retry: carry nothing the visualizer uses
        }

        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(update) = self.decode(src)? {
            return Ok(Some(update));
        }

        // Unterminated trailing line, then whatever is pending.
        if !src.is_empty() {
            let rest = src.split_to(src.len());
            let line = String::from_utf8_lossy(&rest);
            if let Some(value) = line.trim_end_matches('\r').strip_prefix("data:") {
                let value = value.strip_prefix(' ').unwrap_or(value);
                self.data.push(value.to_string());
            }
        }

        Ok(self.dispatch())
    }
}
