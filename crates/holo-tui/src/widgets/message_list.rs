//! Message list widget for displaying chat messages

use crate::theme::Theme;
use crate::widgets::markdown::{render_markdown, sanitize};
use crate::widgets::spinner::frame_at;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::time::Instant;

/// Shown in place of an empty conversation
pub const WELCOME_TEXT: &str = "How can I assist you in this digital realm?";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Header label
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Holo",
        }
    }
}

/// A single message in the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Widget for displaying a list of chat messages
pub struct MessageList<'a> {
    messages: &'a [ChatMessage],
    theme: &'a Theme,
    scroll: usize,
    pending: bool,
    started: Option<Instant>,
}

impl<'a> MessageList<'a> {
    /// Create a new message list
    pub fn new(messages: &'a [ChatMessage], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            scroll: 0,
            pending: false,
            started: None,
        }
    }

    /// Set scroll offset
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Show a trailing thinking row while a reply is outstanding
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Anchor the thinking animation to a fixed start
    pub fn started_at(mut self, start: Instant) -> Self {
        self.started = Some(start);
        self
    }
}

fn render_message(msg: &ChatMessage, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let (prefix, header_style) = match msg.role {
        Role::User => ("▶ ", theme.user_style()),
        Role::Assistant => ("◀ ", theme.assistant_style()),
    };
    lines.push(Line::from(Span::styled(
        format!("{}{}", prefix, msg.role.label()),
        header_style,
    )));

    let content_width = width.saturating_sub(2).max(1);
    match msg.role {
        Role::Assistant => {
            for line in render_markdown(&msg.content, theme, content_width) {
                let mut indented = vec![Span::raw("  ")];
                indented.extend(line.spans);
                lines.push(Line::from(indented));
            }
        }
        Role::User => {
            let clean = sanitize(&msg.content);
            for line in textwrap::wrap(&clean, content_width) {
                lines.push(Line::from(Span::styled(
                    format!("  {}", line),
                    theme.base_style(),
                )));
            }
        }
    }

    // Empty line between messages
    lines.push(Line::from(""));

    lines
}

fn thinking_line(theme: &Theme, started: Option<Instant>) -> Line<'static> {
    let frame = frame_at(started.map(|s| s.elapsed()).unwrap_or_default());
    Line::from(vec![
        Span::styled(format!("◀ {} ", Role::Assistant.label()), theme.assistant_style()),
        Span::styled(format!("{} thinking...", frame), theme.dim_style()),
    ])
}

fn build_lines(
    messages: &[ChatMessage],
    theme: &Theme,
    width: usize,
    pending: bool,
    started: Option<Instant>,
) -> Vec<Line<'static>> {
    let mut all_lines = Vec::new();
    for msg in messages {
        all_lines.extend(render_message(msg, theme, width));
    }
    if pending {
        all_lines.push(thinking_line(theme, started));
    }
    all_lines
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.messages.is_empty() && !self.pending {
            let top = area.y + area.height / 2;
            let welcome_area = Rect::new(area.x, top.saturating_sub(1), area.width, 1);
            Paragraph::new(Line::from(Span::styled(WELCOME_TEXT, self.theme.accent_style())))
                .alignment(Alignment::Center)
                .render(welcome_area, buf);
            return;
        }

        let all_lines = build_lines(
            self.messages,
            self.theme,
            area.width as usize,
            self.pending,
            self.started,
        );

        // Every line already fits the width
        let visible_lines: Vec<Line> = all_lines
            .into_iter()
            .skip(self.scroll)
            .take(area.height as usize)
            .collect();

        Paragraph::new(visible_lines).render(area, buf);
    }
}

/// Total rendered height of messages, including the thinking row
pub fn calculate_message_height(messages: &[ChatMessage], width: usize, pending: bool) -> usize {
    // Styling does not affect layout
    let theme = Theme::dark();
    build_lines(messages, &theme, width, pending, None).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(buf: &Buffer, area: Rect) -> Vec<String> {
        (area.y..area.y + area.height)
            .map(|y| {
                (area.x..area.x + area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_labels_by_sender() {
        let theme = Theme::dark();
        let messages = vec![ChatMessage::user("Hello"), ChatMessage::assistant("Hi there")];
        let area = Rect::new(0, 0, 30, 8);
        let mut buf = Buffer::empty(area);
        MessageList::new(&messages, &theme).render(area, &mut buf);

        let rows = rows(&buf, area);
        assert!(rows[0].starts_with("▶ You"));
        assert!(rows[1].contains("Hello"));
        assert!(rows[3].starts_with("◀ Holo"));
        assert!(rows[4].contains("Hi there"));
    }

    #[test]
    fn test_user_turn_uses_user_color() {
        let theme = Theme::dark();
        let messages = vec![ChatMessage::user("Hello")];
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        MessageList::new(&messages, &theme).render(area, &mut buf);
        assert_eq!(buf[(2, 0)].fg, theme.user);
    }

    #[test]
    fn test_thinking_row_only_while_pending() {
        let theme = Theme::dark();
        let messages = vec![ChatMessage::user("Hello")];
        let area = Rect::new(0, 0, 30, 6);

        let mut buf = Buffer::empty(area);
        MessageList::new(&messages, &theme)
            .pending(true)
            .render(area, &mut buf);
        assert!(rows(&buf, area).iter().any(|r| r.contains("thinking...")));

        let mut buf = Buffer::empty(area);
        MessageList::new(&messages, &theme).render(area, &mut buf);
        assert!(!rows(&buf, area).iter().any(|r| r.contains("thinking...")));
    }

    #[test]
    fn test_welcome_when_empty() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 60, 5);
        let mut buf = Buffer::empty(area);
        MessageList::new(&[], &theme).render(area, &mut buf);
        assert!(rows(&buf, area).iter().any(|r| r.contains(WELCOME_TEXT)));
    }

    #[test]
    fn test_height_matches_rendered_lines() {
        let theme = Theme::dark();
        let messages = vec![
            ChatMessage::user("a fairly long question that will need to wrap"),
            ChatMessage::assistant("**bold** answer\n\n1. one\n2. two\n\n```\ncode\n```"),
        ];
        let width = 16;
        let expected = build_lines(&messages, &theme, width, true, None).len();
        assert_eq!(calculate_message_height(&messages, width, true), expected);
        assert_eq!(
            calculate_message_height(&messages, width, false) + 1,
            expected
        );
    }

    #[test]
    fn test_scroll_skips_lines() {
        let theme = Theme::dark();
        let messages = vec![ChatMessage::user("first"), ChatMessage::user("second")];
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        MessageList::new(&messages, &theme)
            .scroll(3)
            .render(area, &mut buf);
        let rows = rows(&buf, area);
        assert!(rows[0].starts_with("▶ You"));
        assert!(rows[1].contains("second"));
    }

    #[test]
    fn test_user_text_is_sanitized() {
        let theme = Theme::dark();
        let lines = render_message(&ChatMessage::user("hi\x1b[31m"), &theme, 20);
        let body: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(body, "  hi[31m");
    }
}
