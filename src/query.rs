//! Query-string encoding and parsing.
//!
//! Shared by the URL parameter store (reading/writing `location.search`)
//! and the values fetcher (encoding measure names into request URLs).

/// Percent-encodes a query component, leaving RFC 3986 unreserved
/// characters untouched.
pub fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{:02X}", byte));
            }
        }
    }
    out
}

/// Decodes percent escapes and `+`-as-space. Malformed escapes are kept
/// literally rather than failing the whole string.
pub fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                let high = (bytes[i + 1] as char).to_digit(16).unwrap_or(0) as u8;
                let low = (bytes[i + 2] as char).to_digit(16).unwrap_or(0) as u8;
                out.push((high << 4) | low);
                i += 3;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Parses a query string (with or without the leading `?`) into ordered
/// name/value pairs. Pairs without `=` get an empty value.
pub fn parse(search: &str) -> Vec<(String, String)> {
    let query = search.trim_start_matches('?');
    if query.is_empty() {
        return Vec::new();
    }

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut kv = pair.splitn(2, '=');
            let key = kv.next().unwrap_or("");
            let value = kv.next().unwrap_or("");
            (percent_decode(key), percent_decode(value))
        })
        .collect()
}

/// Serializes name/value pairs back into a query string without the
/// leading `?`.
pub fn build(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(percent_encode("Lung & Bronchus"), "Lung%20%26%20Bronchus");
        assert_eq!(percent_encode("all-sites_2020.v1~x"), "all-sites_2020.v1~x");
    }

    #[test]
    fn test_decode_roundtrip() {
        let raw = "Colon & Rectum (C18–C20)";
        assert_eq!(percent_decode(&percent_encode(raw)), raw);
    }

    #[test]
    fn test_decode_plus_and_malformed_escape() {
        assert_eq!(percent_decode("a+b"), "a b");
        assert_eq!(percent_decode("50%"), "50%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn test_parse_handles_leading_question_mark() {
        let pairs = parse("?level=county&measure=Lung%20%26%20Bronchus&flag");
        assert_eq!(
            pairs,
            vec![
                ("level".to_string(), "county".to_string()),
                ("measure".to_string(), "Lung & Bronchus".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_build_then_parse() {
        let pairs = vec![
            ("measure".to_string(), "Lung & Bronchus".to_string()),
            ("zoom".to_string(), "7.00000".to_string()),
        ];
        assert_eq!(parse(&build(&pairs)), pairs);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
        assert!(parse("?").is_empty());
    }
}
