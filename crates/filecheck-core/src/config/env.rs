//! Environment-variable expansion for configured paths.
//!
//! Supports `$NAME` and `${NAME}` where `NAME` is made of ASCII letters,
//! digits and underscores. References to unset variables are left exactly as
//! written.

/// Expand references using the process environment.
pub fn expand_vars(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expand references using `lookup` to resolve variable names.
pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(close) if is_name(&braced[..close]) => (&braced[..close], close + 2),
                _ => ("", 0),
            }
        } else {
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..len], len)
        };

        let reference = &rest[pos..pos + 1 + consumed];
        match (consumed, lookup(name)) {
            (0, _) => out.push('$'),
            (_, Some(value)) => out.push_str(&value),
            (_, None) => out.push_str(reference),
        }
        rest = &rest[pos + 1 + consumed..];
    }

    out.push_str(rest);
    out
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
