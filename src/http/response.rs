use bytes::Bytes;

use crate::error::ServeError;

/// HTTP status codes produced by the server.
///
/// The pipeline itself only emits the five named codes. `Other` exists so
/// that extension hooks can set any code; it is sent with the reason
/// phrase "OK".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// Any code outside the table above
    Other(u16),
}

impl StatusCode {
    pub fn from_u16(code: u16) -> Self {
        match code {
            200 => StatusCode::Ok,
            400 => StatusCode::BadRequest,
            403 => StatusCode::Forbidden,
            404 => StatusCode::NotFound,
            500 => StatusCode::InternalServerError,
            other => StatusCode::Other(other),
        }
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lynx::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::Other(code) => *code,
        }
    }

    /// Returns the reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lynx::http::response::StatusCode;
    /// assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    /// assert_eq!(StatusCode::Other(302).reason_phrase(), "OK");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::Other(_) => "OK",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers keep their insertion order on the wire. Lookups and
/// replacements match names case-insensitively.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers in transmission order
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Bytes,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body("<p>hi</p>")
///     .build();
/// ```
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            response: Response {
                status,
                headers: Vec::new(),
                body: Bytes::new(),
            },
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.response.set_header(key, value);
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.response.body = body.into();
        self
    }

    /// Builds the final Response.
    ///
    /// Appends a Content-Length header matching the body if one was not set.
    pub fn build(mut self) -> Response {
        if self.response.header("Content-Length").is_none() {
            let len = self.response.body.len().to_string();
            self.response.headers.push(("Content-Length".to_string(), len));
        }
        self.response
    }
}

impl Response {
    /// Creates a simple 200 OK response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    /// Creates a 200 OK response with an HTML body.
    pub fn html(body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/html")
            .body(body)
            .build()
    }

    /// Creates a 400 Bad Request response with an empty body.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest).build()
    }

    /// Creates a 403 Forbidden response.
    pub fn forbidden() -> Self {
        ResponseBuilder::new(StatusCode::Forbidden)
            .body(&b"403 Forbidden"[..])
            .build()
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .body(&b"404 Not Found"[..])
            .build()
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError)
            .body(&b"500 Internal Server Error"[..])
            .build()
    }

    /// Maps a pipeline error onto its fixed response. Error details never
    /// reach the body.
    pub fn for_error(err: &ServeError) -> Self {
        match err.status_code() {
            StatusCode::BadRequest => Self::bad_request(),
            StatusCode::Forbidden => Self::forbidden(),
            StatusCode::NotFound => Self::not_found(),
            _ => Self::internal_error(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the value of an existing header in place, or appends it.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        let idx = self
            .headers
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.headers.remove(idx).1)
    }

    /// Swaps the body, keeping an existing Content-Length header in step.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
        if self.header("Content-Length").is_some() {
            let len = self.body.len().to_string();
            self.set_header("Content-Length", len);
        }
    }
}
