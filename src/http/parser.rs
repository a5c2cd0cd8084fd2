use crate::http::request::{Method, Request};
use bytes::Bytes;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty request")]
    Empty,
    #[error("invalid request line: {0:?}")]
    InvalidRequestLine(String),
}

/// Decodes one read buffer into a request.
///
/// Parsing is lenient: header lines without a colon are skipped. No
/// Content-Length framing is done; for POST the body is whatever followed
/// the blank line in `buf`.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    // Without a separator the whole buffer is treated as the head
    let headers_end = find_headers_end(buf);
    let head = String::from_utf8_lossy(&buf[..headers_end.unwrap_or(buf.len())]);

    let mut lines = head.split("\r\n");

    // Request line
    let request_line = lines.next().unwrap_or_default();
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    let [method, path, version] = parts.as_slice() else {
        return Err(ParseError::InvalidRequestLine(request_line.to_string()));
    };
    let method = Method::from(*method);

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            break;
        }

        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    // Body
    let body = match headers_end {
        Some(end) if method == Method::POST => Bytes::copy_from_slice(&buf[end + 4..]),
        _ => Bytes::new(),
    };

    Ok(Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body,
        connection: None,
    })
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
