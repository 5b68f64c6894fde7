//! Markdown rendering for model cards.

use termimad::MadSkin;

/// Print markdown to the terminal with the default skin.
pub fn print_markdown(markdown: &str) {
    if markdown.trim().is_empty() {
        println!("(no model card)");
        return;
    }
    MadSkin::default().print_text(markdown);
}
