//! Field-substitution templates shared by the error view and translations.
//!
//! The only supported action is a field reference, `{{.Name}}`, optionally
//! padded with whitespace inside the braces. Anything else between `{{` and
//! `}}`, or a `{{` that is never closed, makes the template unparsable.

use std::collections::HashMap;
use thiserror::Error;

/// Why a template could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed action starting at byte {offset}")]
    Unclosed { offset: usize },

    #[error("unsupported action '{action}' at byte {offset}")]
    Unsupported { action: String, offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

/// How field values are written into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// Write values verbatim.
    None,
    /// HTML-escape values.
    Html,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                return Err(TemplateError::Unclosed {
                    offset: offset + start,
                });
            };

            let action = after_open[..end].trim();
            match parse_field(action) {
                Some(name) => segments.push(Segment::Field(name.to_string())),
                None => {
                    return Err(TemplateError::Unsupported {
                        action: action.to_string(),
                        offset: offset + start,
                    });
                }
            }

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// A template that renders `text` unchanged.
    pub fn literal(text: &str) -> Self {
        Self {
            segments: vec![Segment::Text(text.to_string())],
        }
    }

    /// Names of the fields referenced by the template, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Substitute fields. Missing fields render as the empty string.
    pub fn render(&self, values: &HashMap<&str, String>, escape: Escape) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(name) => {
                    if let Some(value) = values.get(name.as_str()) {
                        match escape {
                            Escape::None => out.push_str(value),
                            Escape::Html => push_html_escaped(&mut out, value),
                        }
                    }
                }
            }
        }
        out
    }
}

fn parse_field(action: &str) -> Option<&str> {
    let name = action.strip_prefix('.')?;
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}

fn push_html_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// HTML-escape a string.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    push_html_escaped(&mut out, value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, (*v).to_string())).collect()
    }

    #[test]
    fn test_substitutes_fields() {
        let template = Template::parse("<p>{{.Error}}</p><a href=\"{{ .Url }}\">").unwrap();
        let out = template.render(
            &values(&[("Error", "bad scheme"), ("Url", "http://example.com/")]),
            Escape::Html,
        );
        assert_eq!(out, "<p>bad scheme</p><a href=\"http://example.com/\">");
        assert_eq!(template.fields().collect::<Vec<_>>(), vec!["Error", "Url"]);
    }

    #[test]
    fn test_missing_field_is_empty() {
        let template = Template::parse("[{{.Advice}}]").unwrap();
        assert_eq!(template.render(&HashMap::new(), Escape::None), "[]");
    }

    #[test]
    fn test_html_escaping() {
        let template = Template::parse("{{.Error}}").unwrap();
        let vals = values(&[("Error", "<script>alert('x') & \"y\"</script>")]);
        assert_eq!(
            template.render(&vals, Escape::Html),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &#34;y&#34;&lt;/script&gt;"
        );
        assert_eq!(
            template.render(&vals, Escape::None),
            "<script>alert('x') & \"y\"</script>"
        );
    }

    #[test]
    fn test_unclosed_action() {
        assert_eq!(
            Template::parse("abc {{.Url"),
            Err(TemplateError::Unclosed { offset: 4 })
        );
    }

    #[test]
    fn test_unsupported_actions() {
        for source in ["{{if .ShouldRefresh}}", "{{Url}}", "{{.}}", "{{.1abc}}", "{{.a-b}}"] {
            assert!(
                matches!(Template::parse(source), Err(TemplateError::Unsupported { .. })),
                "{source} should be rejected"
            );
        }
    }

    #[test]
    fn test_plain_text_passthrough() {
        let template = Template::parse("no actions } here {").unwrap();
        assert_eq!(template.render(&HashMap::new(), Escape::Html), "no actions } here {");
        assert_eq!(escape_html("a<b"), "a&lt;b");
    }
}
