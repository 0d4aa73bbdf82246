use std::net::{Ipv4Addr, SocketAddr};

use rand::seq::SliceRandom;
use reqwest::Url;

use crate::config::default::DEFAULT_DNS_PORT;

/// URLs that well-known vendors use to detect captive portals.
pub const CAPTIVE_PORTALS: &[&str] = &[
    // Google Chrome
    "http://clients3.google.com/generate_204",
    // Mozilla Firefox
    "http://detectportal.firefox.com/success.txt",
    // Apple
    "http://www.apple.com/library/test/success.html",
    // Microsoft
    "http://www.msftconnecttest.com/redirect",
    // Android
    "http://connectivitycheck.android.com/generate_204",
    // Ubuntu
    "http://connectivity-check.ubuntu.com/",
    // Debian
    "http://network-test.debian.org/",
];

/// Public DNS resolvers.
pub const DNS_SERVERS: &[Ipv4Addr] = &[
    // Cloudflare
    Ipv4Addr::new(1, 1, 1, 1),
    Ipv4Addr::new(1, 0, 0, 1),
    // Google
    Ipv4Addr::new(8, 8, 8, 8),
    Ipv4Addr::new(8, 8, 4, 4),
    // OpenDNS
    Ipv4Addr::new(208, 67, 222, 222),
    Ipv4Addr::new(208, 67, 222, 220),
    // Control D
    Ipv4Addr::new(76, 76, 2, 0),
    Ipv4Addr::new(76, 76, 10, 0),
    // AdGuard
    Ipv4Addr::new(94, 140, 14, 14),
    Ipv4Addr::new(94, 140, 15, 15),
    // CleanBrowsing
    Ipv4Addr::new(185, 228, 168, 9),
    Ipv4Addr::new(185, 228, 169, 9),
    // Verisign
    Ipv4Addr::new(64, 6, 64, 6),
    Ipv4Addr::new(64, 6, 65, 6),
    // Quad9
    Ipv4Addr::new(9, 9, 9, 9),
    Ipv4Addr::new(149, 112, 112, 112),
    // Neustar
    Ipv4Addr::new(156, 154, 70, 1),
    Ipv4Addr::new(156, 154, 71, 1),
    // Yandex
    Ipv4Addr::new(77, 88, 8, 8),
    Ipv4Addr::new(77, 88, 8, 1),
    // SafeDNS
    Ipv4Addr::new(195, 46, 39, 39),
    Ipv4Addr::new(195, 46, 39, 40),
    // Norton ConnectSafe
    Ipv4Addr::new(199, 85, 126, 10),
    Ipv4Addr::new(199, 85, 127, 10),
];

/// Pick a random captive portal URL.
pub fn random_captive_portal() -> Option<&'static str> {
    CAPTIVE_PORTALS.choose(&mut rand::thread_rng()).copied()
}

/// Pick a random public DNS server as a TCP `host:port` target.
pub fn random_tcp_server() -> Option<String> {
    DNS_SERVERS
        .choose(&mut rand::thread_rng())
        .map(|ip| SocketAddr::new((*ip).into(), DEFAULT_DNS_PORT).to_string())
}

/// Pick a random well-known domain, taken from the captive portal hosts.
pub fn random_domain() -> Option<String> {
    let portal = random_captive_portal()?;
    Url::parse(portal)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_string()))
}
