//! IPC protocol for running a handler as a worker process.
//!
//! The host and the worker exchange length-prefixed JSON frames: a 4-byte
//! big-endian length followed by that many bytes of JSON. Requests arrive on
//! stdin, responses leave on stdout. Anything the worker logs must therefore go
//! to stderr.
//!
//! Every complete frame is answered. A frame whose payload is not a request
//! event gets a 500 with CORS headers; only framing or IO failures end the
//! loop.
//!
//! ```ignore
//! let runtime = tokio::runtime::Runtime::new()?;
//! checkip_edge_sdk::ipc::serve(&runtime, &handler)?;
//! ```

use crate::{Cors, HandlerError, Response};
use std::io::{ErrorKind, Read, Write};

/// Largest frame accepted from the host.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Client-facing detail when an event cannot be parsed.
pub const UNREADABLE_EVENT: &str = "An unexpected error occurred";

/// Read one frame payload.
///
/// Returns `Ok(None)` when the stream ends cleanly before a new frame starts.
pub fn read_frame_from<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, HandlerError> {
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        match reader.read(&mut len_buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(HandlerError::IpcError("Truncated length prefix".into())),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(HandlerError::IpcError(format!(
                    "Failed to read length prefix: {}",
                    e
                )))
            }
        }
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(HandlerError::IpcError(format!(
            "Frame of {} bytes exceeds limit of {}",
            len, MAX_FRAME_LEN
        )));
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .map_err(|e| HandlerError::IpcError(format!("Failed to read payload: {}", e)))?;

    Ok(Some(payload))
}

/// Write one response frame and flush.
pub fn write_response_to<W: Write>(writer: &mut W, response: &Response) -> Result<(), HandlerError> {
    let payload = serde_json::to_vec(response)?;

    let len = u32::try_from(payload.len())
        .map_err(|_| HandlerError::IpcError("Response too large for frame".into()))?;
    writer
        .write_all(&len.to_be_bytes())
        .map_err(|e| HandlerError::IpcError(format!("Failed to write length: {}", e)))?;
    writer
        .write_all(&payload)
        .map_err(|e| HandlerError::IpcError(format!("Failed to write payload: {}", e)))?;
    writer
        .flush()
        .map_err(|e| HandlerError::IpcError(format!("Failed to flush: {}", e)))
}

/// Response sent for a frame that does not hold a request event.
pub fn unreadable_event_response() -> Response {
    HandlerError::Internal(UNREADABLE_EVENT.to_string())
        .to_response()
        .with_cors(&Cors::default())
}

/// Run `handler` over stdin/stdout until the host closes stdin.
#[cfg(feature = "async")]
pub fn serve<H: crate::Handler>(
    runtime: &tokio::runtime::Runtime,
    handler: &H,
) -> Result<(), HandlerError> {
    serve_with(
        runtime,
        handler,
        &mut std::io::stdin().lock(),
        &mut std::io::stdout().lock(),
    )
}

/// Run `handler` over arbitrary streams until the reader is exhausted.
///
/// Returns the first framing or IO error; a handler never produces one.
#[cfg(feature = "async")]
pub fn serve_with<H, R, W>(
    runtime: &tokio::runtime::Runtime,
    handler: &H,
    reader: &mut R,
    writer: &mut W,
) -> Result<(), HandlerError>
where
    H: crate::Handler,
    R: Read,
    W: Write,
{
    while let Some(payload) = read_frame_from(reader)? {
        let response = match crate::Request::from_json(&payload) {
            Ok(req) => runtime.block_on(handler.call(req)),
            Err(e) => {
                eprintln!("Failed to parse request: {}", e);
                unreadable_event_response()
            }
        };
        write_response_to(writer, &response)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut out = (payload.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn test_read_frame() {
        let mut input = Cursor::new(frame(br#"{"httpMethod":"OPTIONS"}"#));
        let payload = read_frame_from(&mut input).unwrap().unwrap();
        assert_eq!(payload, br#"{"httpMethod":"OPTIONS"}"#);
        assert!(read_frame_from(&mut input).unwrap().is_none());
    }

    #[test]
    fn test_empty_stream_is_clean_eof() {
        let mut input = Cursor::new(Vec::new());
        assert!(read_frame_from(&mut input).unwrap().is_none());
    }

    #[test]
    fn test_truncated_prefix() {
        let mut input = Cursor::new(vec![0u8, 0]);
        assert!(matches!(
            read_frame_from(&mut input),
            Err(HandlerError::IpcError(_))
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = frame(br#"{"httpMethod":"GET"}"#);
        bytes.truncate(bytes.len() - 3);
        let mut input = Cursor::new(bytes);
        assert!(read_frame_from(&mut input).is_err());
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let mut input = Cursor::new(u32::MAX.to_be_bytes().to_vec());
        let err = read_frame_from(&mut input).unwrap_err();
        assert!(err.to_string().contains("exceeds limit"));
    }

    #[test]
    fn test_write_response_frame() {
        let response = Response::ok(serde_json::json!({"message": "OK"}));
        let mut out = Vec::new();
        write_response_to(&mut out, &response).unwrap();

        let len = u32::from_be_bytes([out[0], out[1], out[2], out[3]]) as usize;
        assert_eq!(len, out.len() - 4);
        let decoded: Response = serde_json::from_slice(&out[4..]).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_unreadable_event_response() {
        let response = unreadable_event_response();
        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.body,
            r#"{"message":"Internal server error","error":"An unexpected error occurred"}"#
        );
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(response.header("Access-Control-Allow-Methods"), Some("GET,OPTIONS"));
    }

    #[cfg(feature = "async")]
    mod serve_loop {
        use super::frame;
        use crate::handler::{BoxFuture, Handler};
        use crate::ipc::{read_frame_from, serve_with, unreadable_event_response};
        use crate::{HandlerError, Request, Response};
        use std::io::Cursor;

        struct MethodEcho;

        impl Handler for MethodEcho {
            fn call(&self, req: Request) -> BoxFuture<'_, Response> {
                Box::pin(async move {
                    Response::ok(serde_json::json!({ "method": req.method() }))
                })
            }
        }

        fn run(frames: &[&[u8]]) -> (Result<(), HandlerError>, Vec<Response>) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();

            let bytes: Vec<u8> = frames.iter().flat_map(|f| frame(f)).collect();
            let mut input = Cursor::new(bytes);
            let mut output = Vec::new();
            let result = serve_with(&runtime, &MethodEcho, &mut input, &mut output);

            let mut reader = Cursor::new(output);
            let mut responses = Vec::new();
            while let Some(payload) = read_frame_from(&mut reader).unwrap() {
                responses.push(serde_json::from_slice(&payload).unwrap());
            }
            (result, responses)
        }

        #[test]
        fn test_serve_with_answers_every_frame() {
            let (result, responses) = run(&[
                br#"{"httpMethod":"GET"}"#,
                br#"{"httpMethod":"OPTIONS"}"#,
            ]);
            assert!(result.is_ok());
            let bodies: Vec<&str> = responses.iter().map(|r| r.body.as_str()).collect();
            assert_eq!(bodies, vec![r#"{"method":"GET"}"#, r#"{"method":"OPTIONS"}"#]);
        }

        #[test]
        fn test_mistyped_ignored_fields_still_answered() {
            let (result, responses) = run(&[
                br#"{"httpMethod":"OPTIONS","headers":{"X-Num":1}}"#,
                br#"{"httpMethod":"OPTIONS"}"#,
            ]);
            assert!(result.is_ok());
            assert_eq!(responses.len(), 2);
            for response in &responses {
                assert_eq!(response.status_code, 200);
                assert_eq!(response.body, r#"{"method":"OPTIONS"}"#);
            }
        }

        #[test]
        fn test_unparsable_event_answered_and_loop_continues() {
            let (result, responses) = run(&[b"not json", br#"{"httpMethod":"GET"}"#]);
            assert!(result.is_ok());
            assert_eq!(responses.len(), 2);
            assert_eq!(responses[0], unreadable_event_response());
            assert_eq!(responses[1].body, r#"{"method":"GET"}"#);
        }

        #[test]
        fn test_framing_error_ends_loop() {
            let mut bytes = frame(br#"{"httpMethod":"GET"}"#);
            bytes.extend_from_slice(&[0, 0]);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let mut output = Vec::new();

            let result = serve_with(&runtime, &MethodEcho, &mut Cursor::new(bytes), &mut output);

            assert!(matches!(result, Err(HandlerError::IpcError(_))));
            let mut reader = Cursor::new(output);
            assert!(read_frame_from(&mut reader).unwrap().is_some());
            assert!(read_frame_from(&mut reader).unwrap().is_none());
        }
    }
}
