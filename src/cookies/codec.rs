//! Encoding and decoding of the cookie string a surface returns on read,
//! e.g. `a=1; b=2`.

use cookie::Cookie;

/// Decode a cookie string into `(name, value)` pairs in order.
///
/// Each pair is split at its first `=`; a pair without `=` is a nameless
/// cookie and decodes to `("", value)`. Empty pairs are skipped.
pub fn decode_cookies(s: &str) -> Vec<(String, String)> {
    s.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (name.trim().to_string(), value.trim().to_string()),
            None => (String::new(), pair.to_string()),
        })
        .collect()
}

/// Look up the value of `name` in a cookie string.
pub fn decode_cookie(s: &str, name: &str) -> Option<String> {
    decode_cookies(s)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, value)| value)
}

/// Encode pairs into a cookie string, joined by `; `.
pub fn encode_cookies<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| {
            if name.is_empty() {
                value.to_string()
            } else {
                format!("{}={}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Percent-encode a single `name=value` pair for writing to a surface.
pub fn encode_cookie(name: &str, value: &str) -> String {
    Cookie::new(name, value).encoded().stripped().to_string()
}
