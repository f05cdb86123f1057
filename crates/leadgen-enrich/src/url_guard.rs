//! Syntactic checks on provider-supplied website URLs before any fetch.

use std::net::{IpAddr, Ipv6Addr};

use reqwest::Url;

use crate::error::UrlRejection;

/// Parses `raw` and accepts it only as an `http`/`https` URL with a host.
///
/// `javascript:`, `data:`, `vbscript:` and every other scheme fail, as do
/// loopback hosts unless `allow_loopback` is set. Input without a scheme is
/// not repaired.
///
/// # Errors
///
/// Returns the [`UrlRejection`] describing the first failed check.
pub fn validate_website(raw: &str, allow_loopback: bool) -> Result<Url, UrlRejection> {
    let url = Url::parse(raw.trim()).map_err(|_| UrlRejection::Unparseable)?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlRejection::UnsupportedScheme(other.to_string())),
    }

    check_host(&url, allow_loopback)?;
    Ok(url)
}

/// Host check shared by [`validate_website`] and the fetcher's redirect
/// policy, so a redirect cannot land somewhere the first URL could not.
///
/// # Errors
///
/// [`UrlRejection::MissingHost`] or [`UrlRejection::LoopbackHost`].
pub fn check_host(url: &Url, allow_loopback: bool) -> Result<(), UrlRejection> {
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlRejection::MissingHost)?
        .to_ascii_lowercase();

    if !allow_loopback && is_loopback(&host) {
        return Err(UrlRejection::LoopbackHost(host));
    }
    Ok(())
}

/// `url` has already folded shorthand IPv4 forms (`127.1`, `2130706433`)
/// into dotted quads, so parsing the host text covers every spelling.
fn is_loopback(host: &str) -> bool {
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    match bare.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => ip.is_loopback() || ip.is_unspecified(),
        Ok(IpAddr::V6(ip)) => is_local_v6(ip),
        Err(_) => false,
    }
}

fn is_local_v6(ip: Ipv6Addr) -> bool {
    ip.is_loopback()
        || ip.is_unspecified()
        || ip
            .to_ipv4_mapped()
            .is_some_and(|v4| v4.is_loopback() || v4.is_unspecified())
}
