//! Prolog scanning for `<?xml-stylesheet?>` processing instructions
//!
//! Only the prolog is inspected: the instruction has to appear before the
//! document element to make a document standalone.

/// Media types accepted for an associated XSLT stylesheet.
const XSLT_MEDIA_TYPES: &[&str] = &["text/xsl", "text/xml"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An `xml-stylesheet` processing instruction found in a document prolog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetPi {
    pub href: String,
    pub media_type: String,
}

/// Find the first usable stylesheet instruction in the prolog of `content`.
pub fn find_stylesheet_pi(content: &[u8]) -> Option<StylesheetPi> {
    let mut rest = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    loop {
        rest = trim_start(rest);

        if rest.starts_with(b"<?") {
            let end = find(rest, b"?>")?;
            let body = &rest[2..end];
            rest = &rest[end + 2..];

            let (target, data) = split_target(body);
            if target == b"xml-stylesheet" {
                if let Some(pi) = parse_stylesheet_data(data) {
                    return Some(pi);
                }
            }
        } else if rest.starts_with(b"<!--") {
            let end = find(&rest[4..], b"-->")?;
            rest = &rest[4 + end + 3..];
        } else if rest.starts_with(b"<!DOCTYPE") {
            rest = skip_doctype(rest)?;
        } else {
            // Document element, stray text or end of input.
            return None;
        }
    }
}

fn parse_stylesheet_data(data: &[u8]) -> Option<StylesheetPi> {
    let data = std::str::from_utf8(data).ok()?;
    let mut href = None;
    let mut media_type = None;

    for (name, value) in pseudo_attributes(data) {
        match name {
            "href" => href = Some(value.to_string()),
            "type" => media_type = Some(value.trim().to_string()),
            _ => {}
        }
    }

    let media_type = media_type?;
    if !XSLT_MEDIA_TYPES.contains(&media_type.as_str()) {
        return None;
    }
    Some(StylesheetPi {
        href: href?,
        media_type,
    })
}

/// Iterate `name="value"` / `name='value'` pairs. Stops at the first
/// malformed pair.
fn pseudo_attributes(data: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut rest = data;
    std::iter::from_fn(move || {
        rest = rest.trim_start();
        let eq = rest.find('=')?;
        let name = rest[..eq].trim();
        let after = rest[eq + 1..].trim_start();
        let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let value_start = &after[1..];
        let close = value_start.find(quote)?;
        let value = &value_start[..close];
        rest = &value_start[close + 1..];
        Some((name, value))
    })
}

fn split_target(body: &[u8]) -> (&[u8], &[u8]) {
    match body.iter().position(|b| b.is_ascii_whitespace()) {
        Some(idx) => (&body[..idx], &body[idx..]),
        None => (body, &[]),
    }
}

fn skip_doctype(rest: &[u8]) -> Option<&[u8]> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (idx, &byte) in rest.iter().enumerate() {
        match quote {
            Some(q) if byte == q => quote = None,
            Some(_) => {}
            None => match byte {
                b'"' | b'\'' => quote = Some(byte),
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Some(&rest[idx + 1..]),
                _ => {}
            },
        }
    }
    None
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count();
    &bytes[skip..]
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_embedded_stylesheet_after_declaration() {
        let doc = br##"<?xml version="1.0"?>
<?xml-stylesheet type="text/xml" href="#style1"?>
<doc><xsl:stylesheet id="style1"/></doc>"##;
        let pi = find_stylesheet_pi(doc).unwrap();
        assert_eq!(pi.href, "#style1");
        assert_eq!(pi.media_type, "text/xml");
    }

    #[test]
    fn skips_comments_and_doctype() {
        let doc = br#"<!-- leading -->
<!DOCTYPE doc [ <!ENTITY e "x>y"> ]>
<?xml-stylesheet href='style.xsl' type='text/xsl'?>
<doc/>"#;
        let pi = find_stylesheet_pi(doc).unwrap();
        assert_eq!(pi.href, "style.xsl");
    }

    #[test]
    fn ignores_instruction_after_document_element() {
        let doc = br#"<doc/><?xml-stylesheet type="text/xsl" href="a.xsl"?>"#;
        assert_eq!(find_stylesheet_pi(doc), None);
    }

    #[test]
    fn requires_xslt_media_type() {
        let css = br#"<?xml-stylesheet type="text/css" href="a.css"?><doc/>"#;
        assert_eq!(find_stylesheet_pi(css), None);

        let untyped = br#"<?xml-stylesheet href="a.xsl"?><doc/>"#;
        assert_eq!(find_stylesheet_pi(untyped), None);

        for media_type in ["application/xml", "application/xslt+xml"] {
            let doc = format!(r#"<?xml-stylesheet type="{media_type}" href="a.xsl"?><doc/>"#);
            assert_eq!(find_stylesheet_pi(doc.as_bytes()), None, "{media_type}");
        }
    }

    #[test]
    fn plain_stylesheet_is_not_standalone() {
        let doc = br#"<?xml version="1.0"?>
<xsl:stylesheet version="1.0" xmlns:xsl="http://www.w3.org/1999/XSL/Transform"/>"#;
        assert_eq!(find_stylesheet_pi(doc), None);
    }

    #[test]
    fn tolerates_byte_order_mark() {
        let mut doc = UTF8_BOM.to_vec();
        doc.extend_from_slice(br#"<?xml-stylesheet type="text/xsl" href="s.xsl"?><d/>"#);
        assert!(find_stylesheet_pi(&doc).is_some());
    }
}
