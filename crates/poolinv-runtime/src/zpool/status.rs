use crate::subsystem::VdevNode;

/// Build the vdev tree of `pool` from `zpool status` output
///
/// Reads the `config:` section:
///
/// ```text
/// config:
///
/// 	NAME          STATE     READ WRITE CKSUM
/// 	tank          ONLINE       0     0     0
/// 	  mirror-0    ONLINE       0     0     0
/// 	    /dev/sda  ONLINE       0     0     0
/// 	logs
/// 	  /dev/sdc    ONLINE       0     0     0
/// ```
///
/// Nesting is two spaces per level. Auxiliary top-level groups (`logs`,
/// `cache`, `spares`, ...) are attached below the root. Returns `None` when
/// the section or the pool's root entry is missing.
pub fn parse_status_config(output: &str, pool: &str) -> Option<VdevNode> {
    let mut lines = output.lines().skip_while(|l| l.trim() != "config:").skip(1);

    let header = lines.find(|l| !l.trim().is_empty())?;
    if header.split_whitespace().next() != Some("NAME") {
        return None;
    }

    let mut roots: Vec<VdevNode> = Vec::new();
    let mut stack: Vec<(usize, VdevNode)> = Vec::new();

    for line in lines {
        if line.trim().is_empty() || !line.starts_with(char::is_whitespace) {
            break;
        }
        let body = line.strip_prefix('\t').unwrap_or(line);
        let indent = body.len() - body.trim_start_matches(' ').len();
        let depth = indent / 2;
        let Some(name) = body.split_whitespace().next() else {
            continue;
        };

        while stack.last().is_some_and(|(d, _)| *d >= depth) {
            pop_into(&mut stack, &mut roots);
        }
        stack.push((depth, VdevNode::new(name)));
    }
    while !stack.is_empty() {
        pop_into(&mut stack, &mut roots);
    }

    let position = roots.iter().position(|n| n.name == pool)?;
    let mut root = roots.remove(position);
    root.children.extend(roots);
    Some(root)
}

fn pop_into(stack: &mut Vec<(usize, VdevNode)>, roots: &mut Vec<VdevNode>) {
    if let Some((_, node)) = stack.pop() {
        match stack.last_mut() {
            Some((_, parent)) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}
