//! HTML escaping for interpolated values

use std::borrow::Cow;
use std::fmt::{Display, Write};

/// Escape `& < > " '` so text cannot open a tag or leave an attribute
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut output = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(c),
        }
    }
    Cow::Owned(output)
}

/// Fill each `{}` of `template` with the next value, escaped.
///
/// Literal text is kept verbatim. Values beyond the last `{}` are appended
/// escaped; placeholders without a value render empty.
pub fn render_template(template: &str, values: &[&dyn Display]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut segments = template.split("{}");

    if let Some(first) = segments.next() {
        output.push_str(first);
    }
    for segment in segments {
        if let Some(value) = values.next() {
            push_escaped(&mut output, value);
        }
        output.push_str(segment);
    }
    for value in values {
        push_escaped(&mut output, value);
    }
    output
}

fn push_escaped(output: &mut String, value: &dyn Display) {
    let mut text = String::new();
    // Writing to a String cannot fail
    let _ = write!(text, "{value}");
    output.push_str(&escape_html(&text));
}

/// Build markup from a template, escaping every interpolated value.
///
/// ```
/// let name = "<b>Ann</b>";
/// let markup = genma::html!("<li class=\"user\">{}</li>", name);
/// assert_eq!(markup, "<li class=\"user\">&lt;b&gt;Ann&lt;/b&gt;</li>");
/// ```
#[macro_export]
macro_rules! html {
    ($template:expr $(,)?) => {
        $crate::escape::render_template($template, &[])
    };
    ($template:expr, $($value:expr),+ $(,)?) => {
        $crate::escape::render_template(
            $template,
            &[$(&$value as &dyn ::std::fmt::Display),+],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_borrows_clean_text() {
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_escape_all_specials() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_template_placeholders() {
        let out = render_template("<p>{} is {}</p>", &[&"<i>x</i>", &42]);
        assert_eq!(out, "<p>&lt;i&gt;x&lt;/i&gt; is 42</p>");
    }

    #[test]
    fn test_template_surplus_and_missing_values() {
        assert_eq!(render_template("<p>{}</p>", &[&1, &"<2>"]), "<p>1</p>&lt;2&gt;");
        assert_eq!(render_template("<p>{}</p><p>{}</p>", &[&1]), "<p>1</p><p></p>");
    }

    #[test]
    fn test_macro() {
        let n = 3;
        assert_eq!(crate::html!("<b>{}</b>", n), "<b>3</b>");
        assert_eq!(crate::html!("<hr>"), "<hr>");
    }
}
