//! Markdown listing of systems.

use std::fmt::{self, Write};

use crate::domain::System;

/// Formatting options for [`systems_markdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// End each line with `<br/>` so the list survives HTML rendering.
    pub html_breaks: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self { html_breaks: true }
    }
}

/// Write one `- {name} (#{id})` line per system, in the given order.
pub fn write_systems_markdown<W: Write>(
    out: &mut W,
    systems: &[System],
    options: MarkdownOptions,
) -> fmt::Result {
    let suffix = if options.html_breaks { "<br/>" } else { "" };
    for system in systems {
        writeln!(out, "- {} (#{}){suffix}", system.name, system.id)?;
    }
    Ok(())
}

/// Render the systems listing as a markdown bullet list.
///
/// # Examples
///
/// ```
/// use passio_go::domain::{System, SystemId};
/// use passio_go::export::{MarkdownOptions, systems_markdown};
///
/// let systems = [System::new(SystemId::new(1270), "University of Michigan")];
/// assert_eq!(
///     systems_markdown(&systems, MarkdownOptions::default()),
///     "- University of Michigan (#1270)<br/>\n"
/// );
/// ```
pub fn systems_markdown(systems: &[System], options: MarkdownOptions) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_systems_markdown(&mut out, systems, options);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SystemId;

    fn systems() -> Vec<System> {
        vec![
            System::new(SystemId::new(1270), "University of Michigan"),
            System::new(SystemId::new(567), "University of Wisconsin-Madison"),
        ]
    }

    #[test]
    fn html_breaks_by_default() {
        assert_eq!(
            systems_markdown(&systems(), MarkdownOptions::default()),
            "- University of Michigan (#1270)<br/>\n- University of Wisconsin-Madison (#567)<br/>\n"
        );
    }

    #[test]
    fn plain_lines() {
        let text = systems_markdown(&systems(), MarkdownOptions { html_breaks: false });
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "- University of Michigan (#1270)",
                "- University of Wisconsin-Madison (#567)"
            ]
        );
    }

    #[test]
    fn empty_listing() {
        assert_eq!(systems_markdown(&[], MarkdownOptions::default()), "");
    }
}
