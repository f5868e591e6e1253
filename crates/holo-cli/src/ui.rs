//! TUI implementation for holo

use crate::commands::{CommandResult, execute_command, unknown_message};
use holo_chat::{ChatController, Sender, Snapshot};
use holo_tui::{
    App, AppState, Theme,
    input::Action,
    widgets::{ChatMessage, InputBox, MessageList, Spinner, calculate_message_height},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};
use std::time::Instant;
use tokio::task::JoinHandle;

const PAGE: usize = 10;
const WHEEL: usize = 3;
const MAX_NOTICE_LINES: usize = 10;

/// TUI application state
pub struct TuiState {
    controller: ChatController,
    /// Shown by /endpoint and in the title
    endpoint: String,
    input: InputBox,
    /// First visible line of the transcript
    scroll: usize,
    /// Stick to the bottom as the transcript grows
    follow: bool,
    theme: Theme,
    /// Output of the last slash command
    notice: Option<String>,
    spinner_start: Instant,
    /// Spawned submission; set before the controller marks itself pending
    submission: Option<JoinHandle<()>>,
    seen_turns: usize,
    was_pending: bool,
    input_width: u16,
}

impl TuiState {
    pub fn new(controller: ChatController, endpoint: impl Into<String>, theme: Theme) -> Self {
        let mut input = InputBox::new().with_placeholder("Ask a question...");
        input.set_focused(true);

        Self {
            controller,
            endpoint: endpoint.into(),
            input,
            scroll: 0,
            follow: true,
            theme,
            notice: None,
            spinner_start: Instant::now(),
            submission: None,
            seen_turns: 0,
            was_pending: false,
            input_width: 80,
        }
    }

    /// A submission is spawned or outstanding
    fn is_busy(&self) -> bool {
        self.submission.as_ref().is_some_and(|task| !task.is_finished())
            || self.controller.is_pending()
    }

    fn submit(&mut self) {
        // The UI honors the pending flag; the controller itself does not refuse
        if self.is_busy() {
            return;
        }

        let content = self.input.content().to_string();
        if let Some(result) = execute_command(&content, &self.endpoint) {
            self.input.clear();
            self.controller.update_draft("");
            match result {
                CommandResult::Message(text) => self.notice = Some(text),
                CommandResult::Unknown(command) => self.notice = Some(unknown_message(&command)),
                // Handled by the caller
                CommandResult::Exit => {}
            }
            return;
        }

        self.notice = None;
        self.follow = true;
        let controller = self.controller.clone();
        self.submission = Some(tokio::spawn(async move {
            controller.submit(&content).await;
        }));
    }

    /// Pull controller state into the widgets
    fn sync(&mut self, snapshot: &Snapshot) {
        self.input.set_busy(snapshot.pending || self.is_busy());
        if snapshot.draft != self.input.content() {
            self.input.set_content(snapshot.draft.clone());
        }

        if snapshot.transcript.len() != self.seen_turns {
            self.seen_turns = snapshot.transcript.len();
            self.follow = true;
        }

        if snapshot.pending && !self.was_pending {
            self.spinner_start = Instant::now();
            self.follow = true;
        }
        self.was_pending = snapshot.pending;
    }

    fn render_messages(&mut self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
        let title = format!(" holo │ {} ", self.controller.endpoint_label());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(title);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let messages: Vec<ChatMessage> = snapshot
            .transcript
            .iter()
            .map(|turn| match turn.sender() {
                Sender::User => ChatMessage::user(turn.text()),
                Sender::Assistant => ChatMessage::assistant(turn.text()),
            })
            .collect();

        let content_height =
            calculate_message_height(&messages, inner.width as usize, snapshot.pending);
        let max_scroll = content_height.saturating_sub(inner.height as usize);

        if self.follow {
            self.scroll = max_scroll;
        } else {
            self.scroll = self.scroll.min(max_scroll);
            if self.scroll == max_scroll {
                self.follow = true;
            }
        }

        let message_list = MessageList::new(&messages, &self.theme)
            .scroll(self.scroll)
            .pending(snapshot.pending)
            .started_at(self.spinner_start);
        frame.render_widget(message_list, inner);

        if content_height > inner.height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            let mut scrollbar_state = ScrollbarState::new(max_scroll)
                .position(self.scroll)
                .viewport_content_length(inner.height as usize);

            frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, pending: bool) {
        if pending {
            let spinner =
                Spinner::new("Thinking...", &self.theme).with_start_time(self.spinner_start);
            frame.render_widget(spinner, area);
            return;
        }

        let left_content = "Ready";
        let right_content = "Enter: send │ PgUp/PgDn: scroll │ /help │ Esc: quit";

        let left_width = left_content.chars().count();
        let right_width = right_content.chars().count();
        let available = area.width as usize;

        let line = if left_width + right_width + 2 <= available {
            let spacing = available - left_width - right_width;
            Line::from(vec![
                Span::styled(left_content, self.theme.dim_style()),
                Span::raw(" ".repeat(spacing)),
                Span::styled(right_content, self.theme.dim_style()),
            ])
        } else {
            Line::from(Span::styled(left_content, self.theme.dim_style()))
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

impl AppState for TuiState {
    fn handle_action(&mut self, action: Action) -> bool {
        if action.is_exit() {
            return false;
        }

        match action {
            Action::Submit => {
                if matches!(
                    execute_command(self.input.content(), &self.endpoint),
                    Some(CommandResult::Exit)
                ) {
                    return false;
                }
                self.submit();
            }
            Action::PageUp | Action::Up | Action::ScrollUp => {
                let step = match action {
                    Action::PageUp => PAGE,
                    Action::ScrollUp => WHEEL,
                    _ => 1,
                };
                self.scroll = self.scroll.saturating_sub(step);
                self.follow = false;
            }
            Action::PageDown | Action::Down | Action::ScrollDown => {
                let step = match action {
                    Action::PageDown => PAGE,
                    Action::ScrollDown => WHEEL,
                    _ => 1,
                };
                // Clamped against the content height on the next render
                self.scroll = self.scroll.saturating_add(step);
            }
            // Editing is frozen while a reply is outstanding
            _ if self.is_busy() => {}
            _ => {
                if self.input.handle_action(&action, self.input_width) {
                    self.notice = None;
                    self.controller.update_draft(self.input.content());
                }
            }
        }
        true
    }

    fn render(&mut self, frame: &mut Frame) {
        let snapshot = self.controller.snapshot();
        self.sync(&snapshot);

        let error = snapshot.error_message().map(str::to_string);
        let notice_height = self
            .notice
            .as_ref()
            .map(|n| n.lines().count().min(MAX_NOTICE_LINES) as u16)
            .unwrap_or(0);

        // Layout: messages (flex), notice, error banner, status bar (1), input (3)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(notice_height),
                Constraint::Length(if error.is_some() { 1 } else { 0 }),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.render_messages(frame, chunks[0], &snapshot);

        if let Some(notice) = &self.notice {
            let lines: Vec<Line> = notice
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), self.theme.accent_style())))
                .collect();
            frame.render_widget(Paragraph::new(lines), chunks[1]);
        }

        if let Some(message) = error {
            let banner = Paragraph::new(Line::from(Span::styled(
                format!("⚠ {}", message),
                self.theme.error_style(),
            )))
            .wrap(Wrap { trim: true });
            frame.render_widget(banner, chunks[2]);
        }

        self.render_status(frame, chunks[3], snapshot.pending);

        self.input_width = chunks[4].width;
        self.input
            .render(chunks[4], frame.buffer_mut(), &self.theme);
    }
}

/// Run the TUI application
pub async fn run_tui(
    controller: ChatController,
    endpoint: String,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut state = TuiState::new(controller, endpoint, theme);
    let mut app = App::new()?;
    app.run(&mut state).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use holo_ai::AskClient;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Replies "echo: <question>" once the gate opens
    struct GatedEcho {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl AskClient for GatedEcho {
        async fn ask(&self, question: &str) -> holo_ai::Result<String> {
            self.gate.notified().await;
            Ok(format!("echo: {}", question))
        }
    }

    fn state_with_gate() -> (TuiState, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let controller = ChatController::new(Arc::new(GatedEcho { gate: gate.clone() }));
        (
            TuiState::new(controller, "http://localhost/ask", Theme::dark()),
            gate,
        )
    }

    fn type_text(state: &mut TuiState, text: &str) {
        for c in text.chars() {
            state.handle_action(Action::Char(c));
        }
    }

    fn screen(state: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        terminal.draw(|frame| state.render(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    async fn until(mut check: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !check() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_typing_updates_draft() {
        let (mut state, _gate) = state_with_gate();
        type_text(&mut state, "Hello");
        assert_eq!(state.controller.snapshot().draft, "Hello");
    }

    #[tokio::test]
    async fn test_welcome_on_empty_transcript() {
        let (mut state, _gate) = state_with_gate();
        assert!(screen(&mut state).contains("How can I assist you in this digital realm?"));
    }

    #[tokio::test]
    async fn test_submit_shows_thinking_then_answer() {
        let (mut state, gate) = state_with_gate();
        type_text(&mut state, "Hello");
        assert!(state.handle_action(Action::Submit));

        let controller = state.controller.clone();
        until(|| controller.is_pending()).await;

        let pending_screen = screen(&mut state);
        assert!(pending_screen.contains("thinking..."));
        assert!(pending_screen.contains("waiting for reply"));

        // A second Enter while pending is ignored
        state.handle_action(Action::Submit);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(controller.snapshot().transcript.len(), 1);

        gate.notify_one();
        until(|| !controller.is_pending()).await;

        let done = screen(&mut state);
        assert!(done.contains("echo: Hello"));
        assert!(!done.contains("thinking..."));
        assert_eq!(state.input.content(), "");
    }

    #[tokio::test]
    async fn test_back_to_back_submits_send_once() {
        let (mut state, gate) = state_with_gate();
        type_text(&mut state, "Hello");

        // Both land before the spawned task has run
        state.handle_action(Action::Submit);
        state.handle_action(Action::Submit);
        state.handle_action(Action::Char('!'));
        assert_eq!(state.input.content(), "Hello");

        let controller = state.controller.clone();
        until(|| controller.is_pending()).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(controller.snapshot().transcript.len(), 1);

        gate.notify_one();
        until(|| !state.is_busy()).await;

        let texts: Vec<String> = controller
            .snapshot()
            .transcript
            .iter()
            .map(|turn| turn.text().to_string())
            .collect();
        assert_eq!(texts, vec!["Hello", "echo: Hello"]);
    }

    #[tokio::test]
    async fn test_blank_submit_shows_banner() {
        let (mut state, _gate) = state_with_gate();
        type_text(&mut state, "   ");
        state.handle_action(Action::Submit);

        let controller = state.controller.clone();
        until(|| controller.snapshot().last_error.is_some()).await;
        assert!(screen(&mut state).contains("Please enter a valid query."));
        assert!(controller.snapshot().transcript.is_empty());
    }

    #[tokio::test]
    async fn test_slash_commands_are_not_sent() {
        let (mut state, _gate) = state_with_gate();
        type_text(&mut state, "/endpoint");
        state.handle_action(Action::Submit);
        assert_eq!(
            state.notice.as_deref(),
            Some("Endpoint: http://localhost/ask")
        );

        type_text(&mut state, "/frobnicate");
        state.handle_action(Action::Submit);
        assert!(screen(&mut state).contains("Unknown command: /frobnicate"));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(state.controller.snapshot().transcript.is_empty());
        assert!(!state.controller.is_pending());
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut state, _gate) = state_with_gate();
        assert!(!state.handle_action(Action::Escape));
        assert!(!state.handle_action(Action::Quit));

        type_text(&mut state, "/quit");
        assert!(!state.handle_action(Action::Submit));
    }

    #[tokio::test]
    async fn test_scrolling_up_stops_following() {
        let (mut state, _gate) = state_with_gate();
        screen(&mut state);
        state.handle_action(Action::PageUp);
        assert!(!state.follow);
        // Nothing to scroll: the next render snaps back to the bottom
        screen(&mut state);
        assert!(state.follow);
    }
}
