//! FQDN plausibility check for candidate hostnames.

use std::sync::LazyLock;

use regex::Regex;

/// Dot-separated labels of 1-63 alphanumerics/hyphens (no leading or trailing
/// hyphen) followed by an alphabetic TLD of 2-63 characters.
static FQDN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$").unwrap()
});

const MIN_LEN: usize = 4;
const MAX_LEN: usize = 253;

/// Returns true when `candidate` looks like a real, non-local FQDN.
///
/// Anything containing `.local` is rejected whatever its shape.
pub fn is_valid_domain(candidate: &str) -> bool {
    if candidate.contains(".local") {
        return false;
    }
    let len = candidate.len();
    (MIN_LEN..=MAX_LEN).contains(&len) && FQDN.is_match(candidate)
}
