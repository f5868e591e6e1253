//! Markdown rendering for terminal UI

use crate::theme::Theme;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

/// Remove control characters so remote text cannot drive the terminal.
///
/// Newlines survive, tabs become four spaces, everything else in the
/// C0/C1 ranges (including ESC) is dropped.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' => out.push_str("    "),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Convert markdown text to styled ratatui Lines no wider than `width`
pub fn render_markdown<'a>(text: &str, theme: &Theme, width: usize) -> Vec<Line<'a>> {
    let text = sanitize(text);
    let width = width.max(1);

    let mut lines: Vec<Line<'a>> = Vec::new();
    let mut current_line: Vec<Span<'a>> = Vec::new();
    let mut styles: Vec<Style> = vec![theme.base_style()];
    let mut in_code_block = false;
    let mut code_block_content = String::new();
    // One entry per open list: None for bullets, Some(next number) when ordered
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut pending_prefix: Option<Span<'a>> = None;
    let mut link: Option<(String, String)> = None;
    let mut quote_depth: usize = 0;

    let flush = |lines: &mut Vec<Line<'a>>, current: &mut Vec<Span<'a>>, quote_depth: usize| {
        if current.is_empty() {
            return;
        }
        let spans = std::mem::take(current);
        if quote_depth == 0 {
            lines.extend(wrap_spans(spans, width));
        } else {
            let bar = "│ ".repeat(quote_depth);
            let inner = width.saturating_sub(bar.width()).max(1);
            for line in wrap_spans(spans, inner) {
                let mut quoted = vec![Span::styled(bar.clone(), theme.dim_style())];
                quoted.extend(line.spans);
                lines.push(Line::from(quoted));
            }
        }
    };

    let parser = Parser::new_ext(&text, Options::ENABLE_STRIKETHROUGH);

    for event in parser {
        let style = styles.last().copied().unwrap_or_default();
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { level, .. } => {
                    flush(&mut lines, &mut current_line, quote_depth);
                    styles.push(match level {
                        pulldown_cmark::HeadingLevel::H1 => theme
                            .accent_style()
                            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                        pulldown_cmark::HeadingLevel::H2 => {
                            theme.accent_style().add_modifier(Modifier::BOLD)
                        }
                        _ => theme.accent_style(),
                    });
                }
                Tag::Paragraph => {
                    flush(&mut lines, &mut current_line, quote_depth);
                }
                Tag::BlockQuote(_) => {
                    flush(&mut lines, &mut current_line, quote_depth);
                    quote_depth += 1;
                }
                Tag::CodeBlock(_) => {
                    in_code_block = true;
                    code_block_content.clear();
                    flush(&mut lines, &mut current_line, quote_depth);
                }
                Tag::List(start) => {
                    flush(&mut lines, &mut current_line, quote_depth);
                    lists.push(start);
                }
                Tag::Item => {
                    flush(&mut lines, &mut current_line, quote_depth);
                    let indent = "  ".repeat(lists.len().saturating_sub(1));
                    let marker = match lists.last_mut() {
                        Some(Some(n)) => {
                            let marker = format!("{}{}. ", indent, n);
                            *n += 1;
                            marker
                        }
                        _ => format!("{}• ", indent),
                    };
                    pending_prefix = Some(Span::styled(marker, theme.dim_style()));
                }
                Tag::Emphasis => styles.push(style.add_modifier(Modifier::ITALIC)),
                Tag::Strong => styles.push(style.add_modifier(Modifier::BOLD)),
                Tag::Strikethrough => styles.push(style.add_modifier(Modifier::CROSSED_OUT)),
                Tag::Link { dest_url, .. } => {
                    styles.push(
                        Style::default()
                            .fg(theme.link)
                            .add_modifier(Modifier::UNDERLINED),
                    );
                    link = Some((dest_url.to_string(), String::new()));
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Heading(_) => {
                    flush(&mut lines, &mut current_line, quote_depth);
                    styles.pop();
                }
                TagEnd::Paragraph => {
                    flush(&mut lines, &mut current_line, quote_depth);
                    if lists.is_empty() {
                        lines.push(Line::from(""));
                    }
                }
                TagEnd::BlockQuote(_) => {
                    flush(&mut lines, &mut current_line, quote_depth);
                    quote_depth = quote_depth.saturating_sub(1);
                }
                TagEnd::CodeBlock => {
                    in_code_block = false;
                    let code_style = theme.code_style().add_modifier(Modifier::DIM);
                    let max = width.saturating_sub(2);
                    for code_line in code_block_content.lines() {
                        let shown = truncate_to_width(code_line, max);
                        lines.push(Line::from(Span::styled(format!("  {}", shown), code_style)));
                    }
                    lines.push(Line::from(""));
                }
                TagEnd::List(_) => {
                    lists.pop();
                    if lists.is_empty() {
                        lines.push(Line::from(""));
                    }
                }
                TagEnd::Item => {
                    if let Some(prefix) = pending_prefix.take() {
                        current_line.push(prefix);
                    }
                    flush(&mut lines, &mut current_line, quote_depth);
                }
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                    styles.pop();
                }
                TagEnd::Link => {
                    styles.pop();
                    if let Some((url, label)) = link.take() {
                        if !url.is_empty() && url != label {
                            current_line.push(Span::styled(format!(" ({})", url), theme.dim_style()));
                        }
                    }
                }
                _ => {}
            },
            Event::Text(text) => {
                if in_code_block {
                    code_block_content.push_str(&text);
                } else {
                    if let Some(prefix) = pending_prefix.take() {
                        current_line.push(prefix);
                    }
                    if let Some((_, label)) = link.as_mut() {
                        label.push_str(&text);
                    }
                    current_line.push(Span::styled(text.to_string(), style));
                }
            }
            Event::Code(code) => {
                if let Some(prefix) = pending_prefix.take() {
                    current_line.push(prefix);
                }
                let code_style = theme.code_style().add_modifier(Modifier::BOLD);
                current_line.push(Span::styled(format!("`{}`", code), code_style));
            }
            Event::Html(raw) | Event::InlineHtml(raw) => {
                // Shown literally, never interpreted
                current_line.push(Span::styled(raw.to_string(), theme.dim_style()));
            }
            Event::SoftBreak => {
                current_line.push(Span::raw(" "));
            }
            Event::HardBreak => {
                flush(&mut lines, &mut current_line, quote_depth);
            }
            Event::Rule => {
                flush(&mut lines, &mut current_line, quote_depth);
                lines.push(Line::from(Span::styled(
                    "─".repeat(width.min(40)),
                    theme.dim_style(),
                )));
            }
            _ => {}
        }
    }

    if let Some(prefix) = pending_prefix.take() {
        current_line.insert(0, prefix);
    }
    flush(&mut lines, &mut current_line, quote_depth);

    // Remove trailing empty lines
    while lines.last().is_some_and(|l| {
        l.spans.is_empty() || (l.spans.len() == 1 && l.spans[0].content.is_empty())
    }) {
        lines.pop();
    }

    lines
}

/// Word-wrap styled spans to `width` columns, splitting words that cannot fit
pub fn wrap_spans<'a>(spans: Vec<Span<'a>>, width: usize) -> Vec<Line<'a>> {
    let width = width.max(1);
    let mut lines: Vec<Line<'a>> = Vec::new();
    let mut line: Vec<Span<'a>> = Vec::new();
    let mut line_width = 0usize;

    for span in spans {
        let style = span.style;
        for piece in span.content.split_inclusive(' ') {
            let mut word = piece.to_string();
            loop {
                // Trailing spaces may hang past the edge
                let visible = word.trim_end().width();
                if visible <= width.saturating_sub(line_width) {
                    break;
                }
                if line_width > 0 {
                    lines.push(Line::from(std::mem::take(&mut line)));
                    line_width = 0;
                    word = word.trim_start().to_string();
                    continue;
                }
                let (head, tail) = split_at_width(&word, width);
                lines.push(Line::from(Span::styled(head, style)));
                word = tail;
            }
            if !word.is_empty() {
                line_width += word.width();
                line.push(Span::styled(word, style));
            }
        }
    }

    if !line.is_empty() {
        lines.push(Line::from(line));
    }
    lines
}

/// Split so the head fits in `max` columns (always at least one char)
fn split_at_width(s: &str, max: usize) -> (String, String) {
    let mut used = 0;
    let mut split = s.len();
    for (i, c) in s.char_indices() {
        let w = c.to_string().width();
        if used + w > max && i > 0 {
            split = i;
            break;
        }
        used += w;
    }
    (s[..split].to_string(), s[split..].to_string())
}

/// Cut to `max` columns, marking the cut with an ellipsis
fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let (head, _) = split_at_width(s, max.saturating_sub(1));
    format!("{}…", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_simple_text() {
        let theme = Theme::dark();
        let lines = render_markdown("Hello, world!", &theme, 80);
        assert_eq!(lines.len(), 1);
        assert_eq!(text_of(&lines[0]), "Hello, world!");
    }

    #[test]
    fn test_code_block() {
        let theme = Theme::dark();
        let md = "```rust\nfn main() {}\n```";
        let lines = render_markdown(md, &theme, 80);
        assert_eq!(text_of(&lines[0]), "  fn main() {}");
    }

    #[test]
    fn test_emphasis_is_italic() {
        let theme = Theme::dark();
        let lines = render_markdown("plain *soft* plain", &theme, 80);
        let soft = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "soft")
            .expect("emphasis span");
        assert!(soft.style.add_modifier.contains(Modifier::ITALIC));
        let plain = &lines[0].spans[0];
        assert!(!plain.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_nested_emphasis_restores_outer_style() {
        let theme = Theme::dark();
        let lines = render_markdown("**bold *both* bold**", &theme, 80);
        let last = lines[0].spans.last().expect("span");
        assert!(last.style.add_modifier.contains(Modifier::BOLD));
        assert!(!last.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_ordered_list_numbers_items() {
        let theme = Theme::dark();
        let lines = render_markdown("1. first\n2. second\n3. third", &theme, 80);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["1. first", "2. second", "3. third"]);
    }

    #[test]
    fn test_bullet_list_in_loose_form_keeps_marker_with_text() {
        let theme = Theme::dark();
        let lines = render_markdown("- one\n\n- two", &theme, 80);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert!(texts.contains(&"• one".to_string()));
        assert!(texts.contains(&"• two".to_string()));
    }

    #[test]
    fn test_link_shows_destination() {
        let theme = Theme::dark();
        let lines = render_markdown("see [docs](https://docs.rs)", &theme, 80);
        assert_eq!(text_of(&lines[0]), "see docs (https://docs.rs)");
    }

    #[test]
    fn test_autolink_not_duplicated() {
        let theme = Theme::dark();
        let lines = render_markdown("<https://docs.rs>", &theme, 80);
        assert_eq!(text_of(&lines[0]), "https://docs.rs");
    }

    #[test]
    fn test_escape_sequences_are_stripped() {
        let theme = Theme::dark();
        let lines = render_markdown("safe\x1b[2J\x07 text", &theme, 80);
        let text = text_of(&lines[0]);
        assert!(!text.contains('\x1b'));
        assert!(!text.contains('\x07'));
        assert_eq!(text, "safe[2J text");
    }

    #[test]
    fn test_html_is_literal() {
        let theme = Theme::dark();
        let lines = render_markdown("a <script>x</script> b", &theme, 80);
        assert!(text_of(&lines[0]).contains("<script>"));
    }

    #[test]
    fn test_long_paragraph_wraps_to_width() {
        let theme = Theme::dark();
        let md = "the quick brown fox jumps over the lazy dog again and again";
        let lines = render_markdown(md, &theme, 20);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_of(line).trim_end().width() <= 20);
        }
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = wrap_spans(vec![Span::raw("abcdefghij")], 4);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wide_code_line_truncates_on_char_boundary() {
        let theme = Theme::dark();
        let md = "```\n日本語のコードはとても長いですね\n```";
        let lines = render_markdown(md, &theme, 12);
        assert!(text_of(&lines[0]).ends_with('…'));
    }

    #[test]
    fn test_sanitize_keeps_newlines_and_expands_tabs() {
        assert_eq!(sanitize("a\tb\nc\r"), "a    b\nc");
    }
}
