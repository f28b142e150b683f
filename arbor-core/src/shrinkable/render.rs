//! Shrink tree rendering for debugging and visualization.
//!
//! Shrink trees are lazy and may be infinite, so every renderer takes a bound.

use super::Shrinkable;
use crate::data::Value;

impl<T> Shrinkable<T>
where
    T: Value + std::fmt::Display,
{
    /// Render the tree structure down to `depth` levels.
    pub fn render(&self, depth: usize) -> String {
        let mut result = String::new();
        self.render_recursive(&mut result, "", true, depth);
        result
    }

    fn render_recursive(&self, result: &mut String, prefix: &str, is_last: bool, depth: usize) {
        result.push_str(prefix);
        if is_last {
            result.push_str("└── ");
        } else {
            result.push_str("├── ");
        }
        result.push_str(&format!("{}\n", self.value()));

        if depth == 0 {
            return;
        }

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        let children: Vec<Shrinkable<T>> = self.shrink().collect();
        for (i, child) in children.iter().enumerate() {
            let child_is_last = i == children.len() - 1;
            child.render_recursive(result, &child_prefix, child_is_last, depth - 1);
        }
    }

    /// Render the value followed by its first `limit` direct candidates.
    pub fn render_shrinks(&self, limit: usize) -> String {
        let candidates: Vec<String> = self
            .shrink()
            .take(limit)
            .map(|candidate| format!("{}", candidate.value()))
            .collect();
        if candidates.is_empty() {
            format!("{} (no shrinks)", self.value())
        } else {
            format!("{} → [{}]", self.value(), candidates.join(", "))
        }
    }
}
