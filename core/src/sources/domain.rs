use idna::domain_to_ascii;
use url::Url;

/// Canonical lookup key for a cited domain.
///
/// Trims, resolves full URLs to their host, converts IDNs to punycode ASCII,
/// lowercases and drops a trailing dot. Inputs that are not valid domain
/// names fall back to their trimmed lowercase form.
pub fn normalize_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    let host = if trimmed.contains("://") {
        match Url::parse(trimmed) {
            Ok(u) => u.host_str().unwrap_or(trimmed).to_string(),
            Err(_) => trimmed.to_string(),
        }
    } else {
        trimmed.to_string()
    };

    let ascii = match domain_to_ascii(&host) {
        Ok(x) if !x.is_empty() => x,
        _ => host,
    };
    ascii.to_ascii_lowercase().trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize_domain;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize_domain("  YouTube.com. "), "youtube.com");
    }

    #[test]
    fn urls_resolve_to_host() {
        assert_eq!(
            normalize_domain("https://www.statistik.at/statistiken/preise"),
            "www.statistik.at"
        );
    }

    #[test]
    fn idn_is_punycoded() {
        assert_eq!(normalize_domain("bücher.de"), "xn--bcher-kva.de");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize_domain(""), "");
    }
}
