/// Reclassify a raw payload into the standard base64 alphabet.
///
/// Precedence is fixed: alphanumerics pass, `-`/`+` become `+`, `_` becomes
/// `/`, a literal `/` is dropped, everything else is dropped. The producer
/// only ever emits the URL-safe alphabet, so a literal `/` can only be noise
/// added in transit. `=` is dropped too; [`crate::pad`] restores it.
pub fn sanitize(payload: &str) -> String {
    let mut cleaned = String::with_capacity(payload.len());
    for c in payload.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' => cleaned.push(c),
            '-' | '+' => cleaned.push('+'),
            '_' => cleaned.push('/'),
            '/' => {}
            _ => {}
        }
    }
    cleaned
}
