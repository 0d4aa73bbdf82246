use std::net::Ipv4Addr;

use netdev::ip::Ipv4Net;
use netdev::Interface;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name prefixes of bridges, tunnels and other virtual interfaces.
const VIRTUAL_PREFIXES: &[&str] = &[
    "virbr", "vnet", "docker", "br-", "tun", "tap", "vmnet", "veth", "vbox", "wg", "kube", "cali",
    "flannel", "vmx", "vlan", "bond", "teredo",
];

/// Interface that may carry traffic to the outside world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveInterface {
    pub name: String,
    /// First non-loopback IPv4 address, if any.
    pub ipv4: Option<Ipv4Addr>,
    pub default: bool,
}

pub fn is_virtual(name: &str) -> bool {
    VIRTUAL_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

fn first_ipv4(nets: &[Ipv4Net]) -> Option<Ipv4Addr> {
    nets.iter()
        .map(|net| net.addr)
        .find(|addr| !addr.is_loopback())
}

/// Keep the interfaces that are up, not loopback and not virtual.
pub fn active_interfaces(ifaces: &[Interface]) -> Result<Vec<ActiveInterface>, ConfigError> {
    if ifaces.is_empty() {
        return Err(ConfigError::NoInterfaces);
    }
    let active = ifaces
        .iter()
        .filter(|iface| iface.is_up() && !iface.is_loopback() && !is_virtual(&iface.name))
        .map(|iface| ActiveInterface {
            name: iface.name.clone(),
            ipv4: first_ipv4(&iface.ipv4),
            default: iface.default,
        })
        .collect();
    Ok(active)
}

/// List the active interfaces of this host.
pub fn get_active_interfaces() -> Result<Vec<ActiveInterface>, ConfigError> {
    active_interfaces(&netdev::get_interfaces())
}
