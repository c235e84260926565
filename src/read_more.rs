//! "Read more" folding for long plot text. Lengths are counted in
//! characters, never bytes.

use std::borrow::Cow;

/// Plot length shown before "read more".
pub const PLOT_PREVIEW_LEN: usize = 200;
const ELLIPSIS: &str = "...";

/// Collapsible long text. The expansion flag belongs to the text it was set
/// for: `sync` with a different text collapses it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMore {
    text: String,
    max_length: usize,
    expanded: bool,
}

impl ReadMore {
    pub fn new(max_length: usize) -> Self {
        Self {
            text: String::new(),
            max_length,
            expanded: false,
        }
    }

    /// Point the toggle at `text`, collapsing it if the text changed.
    pub fn sync(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.expanded = false;
        }
    }

    pub fn toggle(&mut self) {
        if self.is_truncatable() {
            self.expanded = !self.expanded;
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether the text is longer than the preview and needs a toggle.
    pub fn is_truncatable(&self) -> bool {
        self.text.chars().count() > self.max_length
    }

    pub fn display(&self) -> Cow<'_, str> {
        if self.expanded || !self.is_truncatable() {
            return Cow::Borrowed(&self.text);
        }
        let cut = self
            .text
            .char_indices()
            .nth(self.max_length)
            .map_or(self.text.len(), |(idx, _)| idx);
        Cow::Owned(format!("{}{}", &self.text[..cut], ELLIPSIS))
    }

    /// Label for the toggle hint.
    pub fn toggle_label(&self) -> &'static str {
        if self.expanded {
            "Show less"
        } else {
            "Read more"
        }
    }
}

impl Default for ReadMore {
    fn default() -> Self {
        Self::new(PLOT_PREVIEW_LEN)
    }
}
