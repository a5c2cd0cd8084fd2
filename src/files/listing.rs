use std::path::Path;

use html_escape::{encode_double_quoted_attribute, encode_text};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tokio::fs;

/// Characters escaped when a file name becomes one path segment of a link.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Renders the direct children of `dir` as a list of links under `route`.
pub async fn render_listing(dir: &Path, route: &str) -> std::io::Result<String> {
    let mut entries = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let mut body = String::from("<html><body><h1>Directory listing</h1><ul>");
    for name in &names {
        let href = child_href(route, name);
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>",
            encode_double_quoted_attribute(&href),
            encode_text(name)
        ));
    }
    body.push_str("</ul></body></html>");
    Ok(body)
}

fn child_href(route: &str, name: &str) -> String {
    let segment = utf8_percent_encode(name, SEGMENT);
    if route.ends_with('/') {
        format!("{route}{segment}")
    } else {
        format!("{route}/{segment}")
    }
}
