//! URL-encoded form bodies.

use html_escape::encode_text;
use url::form_urlencoded;

/// Decoded form fields in order of first appearance. Repeated names collect
/// all their values; pairs with an empty value are dropped.
pub type FormFields = Vec<(String, Vec<String>)>;

pub fn decode_form(body: &[u8]) -> FormFields {
    let mut fields: FormFields = Vec::new();
    for (name, value) in form_urlencoded::parse(body) {
        if value.is_empty() {
            continue;
        }
        match fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value.into_owned()),
            None => fields.push((name.into_owned(), vec![value.into_owned()])),
        }
    }
    fields
}

/// HTML page echoing the decoded fields as plain text, one `name: [values]`
/// line per field.
pub fn render_form_echo(fields: &FormFields) -> String {
    let text = fields
        .iter()
        .map(|(name, values)| format!("{name:?}: {values:?}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("<html><body><pre>{}</pre></body></html>", encode_text(&text))
}
