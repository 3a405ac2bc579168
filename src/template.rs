//! Label Template Rendering
//!
//! A template is one markup document with a mandatory first section and an
//! optional second section bracketed by marker comments. Rendering resolves
//! the section form for a pair, then substitutes the placeholder tokens.
//!
//! Each placeholder token is substituted at its first occurrence only; a
//! token repeated in the template keeps its later occurrences verbatim.

use crate::images::ImageDictionary;
use crate::pairs::LabelPair;

pub const SECTION2_BEGIN: &str = "<!-- section2_begin -->";
pub const SECTION2_END: &str = "<!-- section2_end -->";

/// The label template document, read once per run.
#[derive(Debug, Clone)]
pub struct LabelTemplate {
    text: String,
}

impl LabelTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Render one pair against this template.
    ///
    /// With a bottom record the second section stays and only the marker
    /// lines are removed; without one the whole section collapses. An image
    /// reference missing from the dictionary substitutes an empty payload.
    pub fn render(&self, pair: &LabelPair, images: &ImageDictionary) -> String {
        let mut label = match pair.bottom {
            Some(_) => strip_marker_lines(&self.text),
            None => strip_second_section(&self.text),
        };

        label = substitute(label, "{type1}", &pair.top.kind);
        label = substitute(label, "{value1}", &pair.top.value);
        label = substitute(label, "{image1}", image_payload(images, &pair.top.image));

        if let Some(bottom) = &pair.bottom {
            label = substitute(label, "{type2}", &bottom.kind);
            label = substitute(label, "{value2}", &bottom.value);
            label = substitute(label, "{image2}", image_payload(images, &bottom.image));
        }

        label
    }
}

fn image_payload<'a>(images: &'a ImageDictionary, name: &str) -> &'a str {
    images.get(name).map(String::as_str).unwrap_or("")
}

/// First occurrence only.
fn substitute(text: String, token: &str, replacement: &str) -> String {
    text.replacen(token, replacement, 1)
}

/// Delete the optional second section, markers included.
fn strip_second_section(text: &str) -> String {
    let Some(begin) = text.find(SECTION2_BEGIN) else {
        return text.to_string();
    };
    match text[begin..].find(SECTION2_END) {
        Some(offset) => {
            let end = begin + offset + SECTION2_END.len();
            format!("{}{}", &text[..begin], &text[end..])
        }
        None => text.to_string(),
    }
}

/// Delete only the marker lines, leaving the section content in place.
fn strip_marker_lines(text: &str) -> String {
    let text = strip_marker_line(text, SECTION2_BEGIN);
    strip_marker_line(&text, SECTION2_END)
}

/// Remove one marker together with its trailing line break and the
/// indentation whitespace that follows it.
fn strip_marker_line(text: &str, marker: &str) -> String {
    let Some(begin) = text.find(marker) else {
        return text.to_string();
    };

    let bytes = text.as_bytes();
    let mut end = begin + marker.len();
    if bytes.get(end) == Some(&b'\r') {
        end += 1;
    }
    if bytes.get(end) == Some(&b'\n') {
        end += 1;
        while bytes.get(end).is_some_and(|b| b.is_ascii_whitespace()) {
            end += 1;
        }
    }
    format!("{}{}", &text[..begin], &text[end..])
}
