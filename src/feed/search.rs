//! Search filter — a pure projection from the full feed to the visible
//! subset. Safe to call on every keystroke; no state, no side effects.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use std::borrow::Cow;

use crate::net::types::Message;

/// Case-insensitive substring match against message content or author name.
///
/// A blank (empty or whitespace-only) term returns the input slice borrowed,
/// so downstream consumers comparing by reference skip recomputation.
#[must_use]
pub fn filter<'a>(messages: &'a [Message], term: &str) -> Cow<'a, [Message]> {
    let needle = term.trim();
    if needle.is_empty() {
        return Cow::Borrowed(messages);
    }
    let needle = needle.to_lowercase();
    Cow::Owned(
        messages
            .iter()
            .filter(|m| matches_term(m, &needle))
            .cloned()
            .collect(),
    )
}

fn matches_term(message: &Message, needle: &str) -> bool {
    message.content.to_lowercase().contains(needle) || message.author.name.to_lowercase().contains(needle)
}
