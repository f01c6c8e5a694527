//! Logging and debugging facilities for Control Schema.
//!
//! This module provides:
//! - Target names for filtering the `tracing` output of each subsystem
//! - Debug visualization for form section trees
//!
//! # Tracing Integration
//!
//! Control Schema uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("control_schema=debug,control_schema_core::section=trace")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! Use [`FormTreeDebug`] to render a form section model:
//!
//! ```
//! use control_schema_core::{FormGroup, FormNode, ValueTracker};
//! use control_schema_core::logging::{FormTreeDebug, TreeFormatOptions, TreeStyle};
//! use serde_json::json;
//!
//! let form = FormGroup::empty();
//! form.add_child("id", ValueTracker::with_value(json!("abc")));
//!
//! let debug = FormTreeDebug::with_options(TreeFormatOptions {
//!     style: TreeStyle::Ascii,
//!     ..Default::default()
//! });
//! let text = debug.format(&FormNode::Group(form));
//! assert!(text.contains("id"));
//! ```

use std::fmt::Write as FmtWrite;

use crate::section::FormNode;

/// Span names used throughout Control Schema for tracing.
pub mod span_names {
    /// Control initialization span.
    pub const INITIALIZE: &str = "control_schema::initialize";
    /// Input handling span.
    pub const HANDLE_INPUT: &str = "control_schema::handle_input";
    /// Child registration span.
    pub const REGISTER: &str = "control_schema::register";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "control_schema_core::signal";
    /// Value tracker target.
    pub const TRACKER: &str = "control_schema_core::tracker";
    /// Form section model target.
    pub const SECTION: &str = "control_schema_core::section";
    /// Control initialization and descriptor normalization target.
    pub const CONTROL: &str = "control_schema::control";
    /// Input handling target.
    pub const INPUT: &str = "control_schema::input";
    /// Container registration target.
    pub const CONTAINER: &str = "control_schema::container";
    /// Settings target.
    pub const CONFIG: &str = "control_schema::config";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for form tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show leaf values.
    pub show_values: bool,
    /// Whether to show validation status.
    pub show_status: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_values: true,
            show_status: true,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output (names and kinds only).
    pub fn minimal() -> Self {
        Self {
            show_values: false,
            show_status: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing form section trees.
#[derive(Debug, Clone, Default)]
pub struct FormTreeDebug {
    options: TreeFormatOptions,
}

impl FormTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the tree rooted at `root`.
    pub fn format(&self, root: &FormNode) -> String {
        let mut output = String::new();
        if self.options.style == TreeStyle::Compact {
            self.format_compact(root, 0, &mut output);
        } else {
            output.push_str(&self.describe("(root)", root));
            output.push('\n');
            self.format_children(root, 0, "", &mut output);
        }
        output
    }

    fn describe(&self, name: &str, node: &FormNode) -> String {
        let mut line = format!("{name} [{}]", node.kind_name());
        if self.options.show_status {
            let _ = write!(line, " {}", node.status());
        }
        if self.options.show_values && matches!(node, FormNode::Leaf(_)) {
            let _ = write!(line, " = {}", node.value());
        }
        line
    }

    fn named_children(node: &FormNode) -> Vec<(String, FormNode)> {
        match node {
            FormNode::Leaf(_) => Vec::new(),
            FormNode::Group(group) => group.children(),
            FormNode::List(list) => list
                .children()
                .into_iter()
                .enumerate()
                .map(|(index, child)| (index.to_string(), child))
                .collect(),
        }
    }

    fn format_children(&self, node: &FormNode, depth: usize, prefix: &str, output: &mut String) {
        if self.options.max_depth.is_some_and(|max| depth >= max) {
            return;
        }
        let (branch, last_branch, pipe, blank) = match self.options.style {
            TreeStyle::Ascii => ("|-- ", "`-- ", "|   ", "    "),
            _ => ("├── ", "└── ", "│   ", "    "),
        };

        let children = Self::named_children(node);
        let count = children.len();
        for (i, (name, child)) in children.into_iter().enumerate() {
            let is_last = i + 1 == count;
            let _ = writeln!(
                output,
                "{prefix}{}{}",
                if is_last { last_branch } else { branch },
                self.describe(&name, &child)
            );
            let child_prefix = format!("{prefix}{}", if is_last { blank } else { pipe });
            self.format_children(&child, depth + 1, &child_prefix, output);
        }
    }

    fn format_compact(&self, node: &FormNode, depth: usize, output: &mut String) {
        match node {
            FormNode::Leaf(tracker) => {
                if self.options.show_values {
                    output.push_str(&tracker.value().to_string());
                } else {
                    output.push('_');
                }
            }
            _ => {
                let (open, close) = if matches!(node, FormNode::List(_)) {
                    ('[', ']')
                } else {
                    ('{', '}')
                };
                output.push(open);
                if self.options.max_depth.is_some_and(|max| depth >= max) {
                    output.push_str("...");
                } else {
                    for (i, (name, child)) in Self::named_children(node).into_iter().enumerate() {
                        if i > 0 {
                            output.push_str(", ");
                        }
                        if matches!(node, FormNode::Group(_)) {
                            let _ = write!(output, "{name}: ");
                        }
                        self.format_compact(&child, depth + 1, output);
                    }
                }
                output.push(close);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{FormGroup, FormList};
    use crate::tracker::ValueTracker;
    use serde_json::json;

    fn sample() -> FormNode {
        let list = FormList::empty();
        list.push(ValueTracker::with_value(json!(1)));
        list.push(ValueTracker::with_value(json!(2)));
        let group = FormGroup::empty();
        group.add_child("name", ValueTracker::with_value(json!("Ana")));
        group.add_child("scores", list);
        FormNode::Group(group)
    }

    #[test]
    fn test_ascii_tree() {
        let debug = FormTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..TreeFormatOptions::minimal()
        });
        let text = debug.format(&sample());
        let expected = "(root) [group]\n\
                        |-- name [leaf]\n\
                        `-- scores [list]\n    \
                        |-- 0 [leaf]\n    \
                        `-- 1 [leaf]\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_unicode_tree_shows_values_and_status() {
        let text = FormTreeDebug::new().format(&sample());
        assert!(text.contains("├── name [leaf] VALID = \"Ana\""));
        assert!(text.contains("└── scores [list] VALID"));
    }

    #[test]
    fn test_compact() {
        let debug = FormTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Compact,
            ..Default::default()
        });
        assert_eq!(debug.format(&sample()), "{name: \"Ana\", scores: [1, 2]}");
    }

    #[test]
    fn test_max_depth() {
        let debug = FormTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Compact,
            max_depth: Some(1),
            ..Default::default()
        });
        assert_eq!(debug.format(&sample()), "{name: \"Ana\", scores: [...]}");
    }
}
