use serde::{Deserialize, Serialize};

/// A single citizen-submitted statement taken from one spreadsheet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opinion {
    /// The statement as written in the sheet, untrimmed
    pub text: String,
}

impl Opinion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Render opinions as the bulleted list embedded in the grouping prompt
pub fn format_opinion_list(opinions: &[Opinion]) -> String {
    opinions
        .iter()
        .map(|op| format!("- {}", op.text))
        .collect::<Vec<_>>()
        .join("\n")
}
