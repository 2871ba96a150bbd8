//! Breadth-first shape dump for debugging and the CLI

use std::collections::VecDeque;
use std::fmt::{Display, Write};

use crate::node::{NodeArena, NodeId};

/// One line per level, each node as `value:R` or `value:B`, empty slots as `.`
///
/// Trailing empty slots on the last level are not printed; a level made only
/// of empty slots ends the dump.
pub fn render<T: Display>(arena: &NodeArena<T>, root: Option<NodeId>) -> String {
    let mut out = String::new();
    let mut level: VecDeque<Option<NodeId>> = VecDeque::from([root]);

    while level.iter().any(Option::is_some) {
        let mut next_level = VecDeque::with_capacity(level.len() * 2);
        let mut line = String::new();
        for slot in level.drain(..) {
            if !line.is_empty() {
                line.push(' ');
            }
            match slot {
                Some(id) => {
                    let node = &arena[id];
                    let _ = write!(line, "{}:{}", node.value, node.color);
                    next_level.push_back(node.left);
                    next_level.push_back(node.right);
                }
                None => line.push('.'),
            }
        }
        out.push_str(line.trim_end_matches([' ', '.']));
        out.push('\n');
        level = next_level;
    }
    out
}
