use lynx::error::ServeError;
use lynx::http::parser::ParseError;
use lynx::http::response::{Response, ResponseBuilder, StatusCode};
use lynx::http::writer::serialize_response;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::Other(418).as_u16(), 418);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
    // Unknown codes fall back to "OK"
    assert_eq!(StatusCode::from_u16(302).reason_phrase(), "OK");
}

#[test]
fn test_status_code_from_u16() {
    assert_eq!(StatusCode::from_u16(403), StatusCode::Forbidden);
    assert_eq!(StatusCode::from_u16(201), StatusCode::Other(201));
}

#[test]
fn test_response_builder_with_headers_keeps_order() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body("test")
        .build();

    let names: Vec<&str> = response.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, vec!["Content-Type", "X-Custom", "Content-Length"]);
    assert_eq!(response.header("content-type"), Some("text/plain"));
}

#[test]
fn test_response_builder_auto_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body("This is the body")
        .build();

    assert_eq!(response.header("Content-Length"), Some("16"));
}

#[test]
fn test_response_builder_explicit_content_length_not_duplicated() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "3")
        .body("abc")
        .build();

    assert_eq!(response.headers.len(), 1);
}

#[test]
fn test_set_header_replaces_in_place() {
    let mut response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Other", "1")
        .build();

    response.set_header("content-type", "text/html");

    assert_eq!(response.headers[0], ("Content-Type".to_string(), "text/html".to_string()));
    assert_eq!(response.remove_header("X-OTHER"), Some("1".to_string()));
    assert_eq!(response.header("X-Other"), None);
}

#[test]
fn test_set_body_updates_content_length() {
    let mut response = Response::ok("short");
    response.set_body("a much longer body");

    assert_eq!(response.header("Content-Length"), Some("18"));
}

#[test]
fn test_fixed_error_responses() {
    let bad = Response::bad_request();
    assert_eq!(bad.status, StatusCode::BadRequest);
    assert!(bad.body.is_empty());
    assert_eq!(bad.header("Content-Length"), Some("0"));

    assert_eq!(&Response::forbidden().body[..], b"403 Forbidden");
    assert_eq!(&Response::not_found().body[..], b"404 Not Found");
    assert_eq!(
        &Response::internal_error().body[..],
        b"500 Internal Server Error"
    );
}

#[test]
fn test_response_for_error_mapping() {
    let malformed = ServeError::from(ParseError::Empty);
    assert_eq!(Response::for_error(&malformed).status, StatusCode::BadRequest);

    let traversal = ServeError::PathTraversal("/../etc".into());
    assert_eq!(Response::for_error(&traversal).status, StatusCode::NotFound);
    assert_eq!(&Response::for_error(&traversal).body[..], b"404 Not Found");

    let forbidden = ServeError::Forbidden("/private".into());
    assert_eq!(Response::for_error(&forbidden).status, StatusCode::Forbidden);

    let io = ServeError::Io(std::io::Error::other("disk on fire"));
    let response = Response::for_error(&io);
    assert_eq!(response.status, StatusCode::InternalServerError);
    assert!(!String::from_utf8_lossy(&response.body).contains("disk"));
}

#[test]
fn test_serialize_response() {
    let response = ResponseBuilder::new(StatusCode::NotFound)
        .header("Content-Type", "text/plain")
        .body("gone")
        .build();

    let bytes = serialize_response(&response);

    assert_eq!(
        bytes,
        b"HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\nContent-Length: 4\r\n\r\ngone".to_vec()
    );
}

#[test]
fn test_serialize_binary_body_untouched() {
    let response = Response::ok(vec![0xff, 0x00, 0xfe]);
    let bytes = serialize_response(&response);

    assert!(bytes.ends_with(b"\r\n\r\n\xff\x00\xfe"));
}
