use anyhow::Result;

use crate::cli::Cli;
use crate::interface::get_active_interfaces;

/// Show the active network interfaces
pub fn show(cli: &Cli) -> Result<()> {
    let ifaces = get_active_interfaces()?;
    tracing::debug!(count = ifaces.len(), "active interfaces");
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&ifaces)?);
    } else {
        crate::output::interface::print_interface_tree(&ifaces);
    }
    Ok(())
}
