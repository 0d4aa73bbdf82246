use termtree::Tree;

use crate::interface::ActiveInterface;
use crate::output::tree_label;

/// Build the tree of active interfaces.
pub fn interface_tree(ifaces: &[ActiveInterface]) -> Tree<String> {
    let mut root = Tree::new(tree_label("Interfaces"));
    for iface in ifaces {
        let mut node = Tree::new(format!(
            "{}{}",
            iface.name,
            if iface.default { " (default)" } else { "" }
        ));
        match iface.ipv4 {
            Some(ip) => node.push(Tree::new(format!("IPv4: {}", ip))),
            None => node.push(Tree::new(tree_label("IPv4: none"))),
        };
        root.push(node);
    }
    root
}

/// Print the network interfaces in a tree structure.
pub fn print_interface_tree(ifaces: &[ActiveInterface]) {
    println!("{}", interface_tree(ifaces));
}
