use crate::models::{Opinion, Proposal, ThemeBlock, format_opinion_list};

/// System instruction for the grouping call
pub const GROUPING_INSTRUCTIONS: &str = "あなたは市民の声を分類・要約する政策アナリストです。";

/// System instruction for the drafting call
pub const DRAFTING_INSTRUCTIONS: &str = "あなたは日本の政策立案を支援するAIアシスタントです。";

/// Banner appended once before the theme sections
pub const SUMMARY_HEADER: &str = "\n\n---\n📝 **新しい市民提案のまとめ**\n\n";

/// Build the grouping prompt with every opinion as a bulleted list
pub fn build_grouping_prompt(opinions: &[Opinion]) -> String {
    format!(
        r#"
以下は日本の市民から集めた政治的な意見です。類似する意見をテーマごとに分類してください。

各テーマについて以下の情報を出力してください：
1. テーマのタイトル（簡潔に）
2. テーマの概要（どんな問題意識か）
3. 含まれる意見（リスト形式）

市民の意見一覧：
{}
"#,
        format_opinion_list(opinions)
    )
}

/// Build the drafting prompt for one theme block
pub fn build_drafting_prompt(block: &ThemeBlock) -> String {
    format!(
        r#"
以下の市民の意見グループに基づいて、日本の行政向けの政策提案書を作成してください。

内容：
{}

フォーマット：
1. 政策分野（タイトル）
2. 問題提起（なぜこの問題が重要か）
3. 政策提案（具体的にどうするか）
4. 正当性・期待される効果（理由）

日本語で簡潔かつ明瞭に記述してください。
"#,
        block.text
    )
}

/// Render the document section for one theme: marker, raw block, proposal
pub fn format_theme_section(block: &ThemeBlock, proposal: &Proposal) -> String {
    format!(
        "\n\n📌 テーマ {}\n{}\n\n📄 政策提案:\n{}\n",
        block.index, block.text, proposal.text
    )
}
