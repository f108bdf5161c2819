//! Relying-party domain validation.
//!
//! An rpId is admissible for a request origin when it names the origin's
//! registrable domain or a registrable super-scope of it, per public-suffix
//! rules (the list's private/enterprise section included).

use url::Url;

struct ParsedHost {
    hostname: String,
    /// Registrable domain, `None` when the host has no known one
    /// (e.g. `localhost`, or a bare public suffix).
    domain: Option<String>,
    /// Subdomain labels left of the registrable domain; empty string when
    /// the host is exactly its registrable domain.
    subdomain: Option<String>,
}

fn extract_hostname(input: &str) -> Option<String> {
    let host = if input.contains("://") {
        Url::parse(input).ok()?.host_str()?.to_string()
    } else if input.parse::<std::net::Ipv6Addr>().is_ok() {
        input.to_string()
    } else {
        // Bare host, possibly with a port.
        input.split('/').next()?.split(':').next()?.to_string()
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }
    Some(host)
}

fn is_ip_literal(hostname: &str) -> bool {
    hostname
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<std::net::IpAddr>()
        .is_ok()
}

fn parse_host(input: &str) -> Option<ParsedHost> {
    let hostname = extract_hostname(input)?;
    // IP literals never have a registrable domain; the suffix list's
    // wildcard rule must not apply to dotted quads.
    let domain = if is_ip_literal(&hostname) {
        None
    } else {
        psl::domain_str(&hostname).map(str::to_string)
    };
    let subdomain = domain.as_ref().and_then(|d| {
        if hostname == *d {
            Some(String::new())
        } else {
            hostname
                .strip_suffix(d.as_str())
                .and_then(|s| s.strip_suffix('.'))
                .map(str::to_string)
        }
    });
    Some(ParsedHost {
        hostname,
        domain,
        subdomain,
    })
}

/// Decide whether `rp_id` is admissible for a request coming from `origin`.
///
/// Pure function: identical inputs always yield the identical boolean.
pub fn is_valid_rp_id(rp_id: &str, origin: &str) -> bool {
    let (Some(origin), Some(rp_id)) = (parse_host(origin), parse_host(rp_id)) else {
        return false;
    };

    // Development exception: localhost has no registrable domain.
    let localhost_valid = origin.domain.is_none()
        && origin.hostname == rp_id.hostname
        && origin.hostname == "localhost";

    // Same registrable domain, with the rpId a suffix of the origin's
    // subdomain chain.
    let domain_valid = match (
        &origin.domain,
        &rp_id.domain,
        &origin.subdomain,
        &rp_id.subdomain,
    ) {
        (Some(od), Some(rd), Some(osub), Some(rsub)) => od == rd && osub.ends_with(rsub),
        _ => false,
    };

    localhost_valid || domain_valid
}
