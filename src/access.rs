//! IP allow-listing, evaluated before any hook or path handling.

use std::net::IpAddr;

use crate::config::Config;

/// Whether a peer may be served. With the whitelist disabled every peer
/// passes; otherwise its address must appear literally in the list.
/// IPv4-mapped IPv6 peers are compared in their IPv4 form.
pub fn is_allowed(config: &Config, peer: IpAddr) -> bool {
    if !config.ip_whitelist_enabled {
        return true;
    }
    config.ip_whitelist.contains(&peer.to_canonical().to_string())
}
