//! `<key>` template substitution used for human readable rendering.

/// Substitute every `<key>` in `template` with its value from `fields`.
///
/// A single left-to-right pass: substituted values are never rescanned, and
/// `<...>` sequences with no matching key are copied through unchanged.
pub fn substitute(template: &str, fields: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let value = candidate.find('>').and_then(|end| {
            let key = &candidate[1..end];
            fields
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (v, end + 1))
        });
        match value {
            Some((v, consumed)) => {
                out.push_str(v);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('<');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
