//! The narrow interface between the response builder and an HTTP response.

use std::{convert::Infallible, io};

use axum::{
    body::{Body, Bytes},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A writable response bound to one HTTP exchange.
///
/// Streaming responses use [`write_bytes`](Self::write_bytes) followed by
/// [`flush`](Self::flush). Once `flush` returns, the bytes must be on their way to
/// the client. Non-streaming responses are a single [`write_json`](Self::write_json).
pub trait ResponseChannel {
    /// Append raw bytes to the response body.
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Hand everything written so far to the client.
    fn flush(&mut self) -> io::Result<()>;

    /// Set the status and the complete, already-encoded JSON body.
    fn write_json(&mut self, status: StatusCode, body: Vec<u8>) -> io::Result<()>;
}

/// [`ResponseChannel`] backed by an axum response.
///
/// The sink is created for one mode and turned into the final [`Response`] once
/// the builder is done with it.
pub struct HttpResponseSink {
    mode: Mode,
}

enum Mode {
    Json {
        response: Option<(StatusCode, Bytes)>,
    },
    EventStream {
        pending: Vec<u8>,
        sender: UnboundedSender<Bytes>,
        receiver: UnboundedReceiver<Bytes>,
    },
}

impl HttpResponseSink {
    /// A sink for a single JSON body.
    pub fn json() -> Self {
        Self {
            mode: Mode::Json { response: None },
        }
    }

    /// A sink for a `text/event-stream` body.
    pub fn event_stream() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            mode: Mode::EventStream {
                pending: Vec::new(),
                sender,
                receiver,
            },
        }
    }

    /// Sink matching the requested response shape.
    pub fn for_request(streaming: bool) -> Self {
        if streaming { Self::event_stream() } else { Self::json() }
    }
}

impl ResponseChannel for HttpResponseSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        match &mut self.mode {
            Mode::EventStream { pending, .. } => {
                pending.extend_from_slice(bytes);
                Ok(())
            }
            Mode::Json { .. } => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "raw writes are not supported on a JSON response",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.mode {
            Mode::EventStream { pending, sender, .. } => {
                if pending.is_empty() {
                    return Ok(());
                }

                let bytes = Bytes::from(std::mem::take(pending));

                sender
                    .send(bytes)
                    .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response body was dropped"))
            }
            Mode::Json { .. } => Ok(()),
        }
    }

    fn write_json(&mut self, status: StatusCode, body: Vec<u8>) -> io::Result<()> {
        match &mut self.mode {
            Mode::Json { response } if response.is_none() => {
                *response = Some((status, Bytes::from(body)));
                Ok(())
            }
            Mode::Json { .. } => Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "response body was already written",
            )),
            Mode::EventStream { .. } => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "JSON bodies are not supported on an event stream",
            )),
        }
    }
}

impl IntoResponse for HttpResponseSink {
    fn into_response(self) -> Response {
        match self.mode {
            Mode::Json {
                response: Some((status, body)),
            } => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Mode::Json { response: None } => {
                log::error!("JSON response sink was never written to");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Mode::EventStream {
                pending,
                sender,
                receiver,
            } => {
                if !pending.is_empty() {
                    log::warn!("Discarding {} unflushed bytes of an event stream", pending.len());
                }

                // Closing the sender ends the body once everything flushed so far is read.
                drop(sender);

                let stream = futures::stream::unfold(receiver, |mut receiver| async move {
                    receiver.recv().await.map(|bytes| (Ok::<_, Infallible>(bytes), receiver))
                });

                (
                    [
                        (header::CONTENT_TYPE, "text/event-stream"),
                        (header::CACHE_CONTROL, "no-cache"),
                    ],
                    Body::from_stream(stream),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn json_body_and_status() {
        let mut sink = HttpResponseSink::json();
        sink.write_json(StatusCode::OK, br#"{"ok":true}"#.to_vec()).unwrap();

        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_string(response).await, r#"{"ok":true}"#);
    }

    #[test]
    fn json_body_is_written_once() {
        let mut sink = HttpResponseSink::json();
        sink.write_json(StatusCode::OK, b"{}".to_vec()).unwrap();

        let error = sink.write_json(StatusCode::OK, b"{}".to_vec()).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn json_sink_rejects_raw_writes() {
        let mut sink = HttpResponseSink::json();
        let error = sink.write_bytes(b"data: {}\n\n").unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::Unsupported);
    }

    #[tokio::test]
    async fn unwritten_json_sink_is_a_server_error() {
        let response = HttpResponseSink::json().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn event_stream_only_delivers_flushed_bytes() {
        let mut sink = HttpResponseSink::event_stream();
        sink.write_bytes(b"data: one\n\n").unwrap();
        sink.flush().unwrap();
        sink.write_bytes(b"data: two\n\n").unwrap();
        sink.flush().unwrap();
        sink.write_bytes(b"data: never flushed\n\n").unwrap();

        let response = sink.into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(body_string(response).await, "data: one\n\ndata: two\n\n");
    }

    #[test]
    fn event_stream_rejects_json_bodies() {
        let mut sink = HttpResponseSink::event_stream();
        let error = sink.write_json(StatusCode::OK, b"{}".to_vec()).unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::Unsupported);
    }
}
