use url::form_urlencoded;

/// Render the landing page listing every material
#[inline]
pub fn render_index(files: &[String]) -> String {
    let mut body = String::from("<h1>Materials</h1>\n");
    if files.is_empty() {
        body.push_str("<p>No materials found.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for name in files {
            body.push_str("<li><a href=\"/materials/");
            body.push_str(&encode_segment(name));
            body.push_str("\">");
            body.push_str(&escape_html(name));
            body.push_str("</a></li>\n");
        }
        body.push_str("</ul>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>RAG Demo App</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// Percent-encode a filename for use as one URL path segment
#[inline]
pub fn encode_segment(name: &str) -> String {
    // form encoding writes spaces as '+', which is not a space inside a path
    form_urlencoded::byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[inline]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
