use serde::{Deserialize, Serialize};

/// Separator the grouping model is asked to place between themes
pub const THEME_SEPARATOR: &str = "\n\n";

/// One clustered group of opinions, as rendered in the grouping output.
///
/// The text is opaque: it is never parsed, only passed verbatim to the
/// drafting prompt and to the published section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeBlock {
    /// 1-based position in the raw split, counting blank segments
    pub index: usize,
    /// Raw block text
    pub text: String,
}

/// Generated policy proposal for one theme block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Index of the theme block this proposal was drafted from
    pub theme_index: usize,
    /// Free-text model output
    pub text: String,
}

/// Split the grouping model's output into theme blocks.
///
/// Splits on every double newline and drops segments that are blank after
/// trimming. Indices are assigned before blank segments are dropped, so the
/// numbering can have gaps. A theme that itself contains a blank line ends up
/// as two blocks.
pub fn split_theme_blocks(output: &str) -> Vec<ThemeBlock> {
    output
        .split(THEME_SEPARATOR)
        .enumerate()
        .filter(|(_, segment)| !segment.trim().is_empty())
        .map(|(i, segment)| ThemeBlock {
            index: i + 1,
            text: segment.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(blocks: &[ThemeBlock]) -> Vec<&str> {
        blocks.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_trailing_empty_block_dropped() {
        let blocks = split_theme_blocks("Theme A text\n\nTheme B text\n\n\n");
        assert_eq!(texts(&blocks), vec!["Theme A text", "Theme B text"]);
        assert_eq!(blocks[0].index, 1);
        assert_eq!(blocks[1].index, 2);
    }

    #[test]
    fn test_whitespace_only_blocks_dropped() {
        let blocks = split_theme_blocks("  \n\nA\n\n\t\n\nB");
        assert_eq!(texts(&blocks), vec!["A", "B"]);
        let indices: Vec<usize> = blocks.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![2, 4]);
    }

    #[test]
    fn test_index_keeps_gap_after_blank_segment() {
        let blocks = split_theme_blocks("A\n\n\n\nB");
        assert_eq!(texts(&blocks), vec!["A", "B"]);
        let indices: Vec<usize> = blocks.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_block_text_is_verbatim() {
        let blocks = split_theme_blocks("  A\nline two  \n\nB");
        assert_eq!(blocks[0].text, "  A\nline two  ");
    }

    #[test]
    fn test_blank_line_inside_theme_splits() {
        let blocks = split_theme_blocks("Title\n\nSummary\n- op");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_empty_output() {
        assert!(split_theme_blocks("").is_empty());
        assert!(split_theme_blocks("\n\n\n\n").is_empty());
    }
}
