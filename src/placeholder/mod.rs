//! Placeholder substitution.
//!
//! # Data Flow
//! ```text
//! operand text ("{uri}", "/api/{>X-Tenant}")
//!     → Replacer::replace (scan for {key} segments)
//!     → Replacer::resolve (per key, request-scoped lookup)
//!     → substituted string (unknown keys left as written)
//! ```
//!
//! # Design Decisions
//! - Resolution is a pure read of request data
//! - Unknown keys pass through unchanged, braces included
//! - Regex quantifiers (`{2}`, `{1,3}`) are never treated as keys

pub mod request;

pub use request::RequestReplacer;

/// Substitutes `{key}` placeholders in operand text.
pub trait Replacer {
    /// Resolve a single key (without braces). `None` leaves the key as written.
    fn resolve(&self, key: &str) -> Option<String>;

    /// Replace every resolvable placeholder in `input`.
    fn replace(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let Some(end) = after.find(['{', '}']) else {
                break;
            };

            // A nested '{' restarts the scan from there.
            if after.as_bytes()[end] == b'{' {
                out.push_str(&rest[..open + 1 + end]);
                rest = &after[end..];
                continue;
            }

            let key = &after[..end];
            out.push_str(&rest[..open]);
            match is_placeholder_key(key).then(|| self.resolve(key)).flatten() {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[open..open + end + 2]),
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }
}

/// Returns true if `input` contains at least one `{key}` segment.
///
/// Used at construction time to decide whether an operand is constant.
pub fn contains_placeholder(input: &str) -> bool {
    let mut rest = input;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            Some(end) if after.as_bytes()[end] == b'}' => {
                if is_placeholder_key(&after[..end]) {
                    return true;
                }
                rest = &after[end + 1..];
            }
            Some(end) => rest = &after[end..],
            None => return false,
        }
    }
    false
}

/// Keys are non-empty and not made only of digits and commas.
fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty() && !key.chars().all(|c| c.is_ascii_digit() || c == ',')
}
