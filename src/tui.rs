use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::Duration;

use crate::fetch::Fetcher;
use crate::models::JobRecord;
use crate::render;
use crate::search::{self, SearchQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Company,
    Position,
    Button,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Company => Focus::Position,
            Focus::Position => Focus::Button,
            Focus::Button => Focus::Company,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Company => Focus::Button,
            Focus::Position => Focus::Company,
            Focus::Button => Focus::Position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Ready,
    Invalid(String),
    Searching,
    Found(String),
    Empty(String),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Submit,
    Quit,
}

struct AppState {
    company: String,
    position: String,
    focus: Focus,
    status: Status,
    jobs: Vec<JobRecord>,
    selected: usize,
}

impl AppState {
    fn new() -> Self {
        Self {
            company: String::new(),
            position: String::new(),
            focus: Focus::Company,
            status: Status::Ready,
            jobs: Vec::new(),
            selected: 0,
        }
    }

    fn current_job(&self) -> Option<&JobRecord> {
        self.jobs.get(self.selected)
    }

    fn focused_field(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Company => Some(&mut self.company),
            Focus::Position => Some(&mut self.position),
            Focus::Button => None,
        }
    }

    fn next(&mut self) {
        if !self.jobs.is_empty() && self.selected < self.jobs.len() - 1 {
            self.selected += 1;
        }
    }

    fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Action::Quit,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Enter => return Action::Submit,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Down => self.next(),
            KeyCode::Up => self.prev(),
            KeyCode::Backspace => {
                if let Some(field) = self.focused_field() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.focused_field() {
                    field.push(c);
                }
            }
            _ => {}
        }
        Action::None
    }

    /// Validates the form. On success the state switches to busy and the
    /// previous results are cleared.
    fn begin_search(&mut self) -> Option<SearchQuery> {
        match SearchQuery::new(&self.company, &self.position) {
            Ok(query) => {
                self.status = Status::Searching;
                self.jobs.clear();
                self.selected = 0;
                Some(query)
            }
            Err(err) => {
                self.status = Status::Invalid(err.to_string());
                None
            }
        }
    }

    fn finish_search(&mut self, query: &SearchQuery, outcome: Result<Vec<JobRecord>>) {
        self.selected = 0;
        match outcome {
            Ok(jobs) if jobs.is_empty() => {
                self.status = Status::Empty(render::not_found_message(&query.position, &query.company));
                self.jobs.clear();
            }
            Ok(jobs) => {
                self.status = Status::Found(render::found_message(
                    jobs.len(),
                    &query.position,
                    &query.company,
                ));
                self.jobs = jobs;
            }
            Err(err) => {
                self.status = Status::Failed(render::error_message(&err));
                self.jobs.clear();
            }
        }
    }
}

pub fn run_form(fetcher: &Fetcher) -> Result<()> {
    let mut state = AppState::new();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, fetcher);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    fetcher: &Fetcher,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        redraw(terminal, state, &mut list_state)?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match state.handle_key(key) {
                Action::Quit => break,
                Action::Submit => {
                    let Some(query) = state.begin_search() else {
                        continue;
                    };
                    redraw(terminal, state, &mut list_state)?;

                    let outcome = search::run_query(fetcher, &query);
                    discard_pending_events()?;
                    state.finish_search(&query, outcome);
                }
                Action::None => {}
            }
        }
    }
    Ok(())
}

fn redraw<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &AppState,
    list_state: &mut ListState,
) -> Result<()> {
    list_state.select(if state.jobs.is_empty() {
        None
    } else {
        Some(state.selected)
    });
    terminal.draw(|frame| draw(frame, state, list_state))?;
    Ok(())
}

/// Drops keys pressed while a search was running so they cannot start another one.
fn discard_pending_events() -> Result<()> {
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = Paragraph::new(Span::styled(
        " Job Position Scraper",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(title, rows[0]);

    draw_input(frame, rows[1], " Company Name ", &state.company, state.focus == Focus::Company);
    draw_input(frame, rows[2], " Job Position ", &state.position, state.focus == Focus::Position);

    let button_style = if state.focus == Focus::Button {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled("[ Search Jobs ]", button_style),
    ]));
    frame.render_widget(button, rows[3]);

    let (message, style) = match &state.status {
        Status::Ready => (
            "Enter the company name and job position to check if job openings exist.".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Status::Invalid(msg) | Status::Failed(msg) => (msg.clone(), Style::default().fg(Color::Red)),
        Status::Searching => (
            "Searching for job openings...".to_string(),
            Style::default().fg(Color::Cyan),
        ),
        Status::Found(msg) => (msg.clone(), Style::default().fg(Color::Green)),
        Status::Empty(msg) => (msg.clone(), Style::default().fg(Color::Yellow)),
    };
    frame.render_widget(Paragraph::new(Span::styled(format!(" {}", message), style)), rows[4]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[5]);

    let items: Vec<ListItem> = state
        .jobs
        .iter()
        .map(|job| ListItem::new(format!("{} | {}", truncate(&job.title, 32), job.location)))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Openings ({}) ",
            state.jobs.len()
        )))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, panes[0], list_state);

    let detail = Paragraph::new(build_detail(state))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, panes[1]);

    let help = Paragraph::new(" Tab/Shift-Tab:focus  Enter:search  Up/Down:select  Esc:quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[6]);

    let cursor_row = match state.focus {
        Focus::Company => Some((rows[1], &state.company)),
        Focus::Position => Some((rows[2], &state.position)),
        Focus::Button => None,
    };
    if let Some((area, text)) = cursor_row {
        frame.set_cursor_position((cursor_x(area, text), area.y + 1));
    }
}

/// Column just past the typed text, kept inside the input box.
fn cursor_x(area: Rect, text: &str) -> u16 {
    let offset = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(offset)
        .min(area.right().saturating_sub(2))
}

fn draw_input(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let input = Paragraph::new(value.to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(label.to_string()),
    );
    frame.render_widget(input, area);
}

fn build_detail(state: &AppState) -> Text<'_> {
    let Some(job) = state.current_job() else {
        return Text::raw("");
    };

    let [title, company, location, link] = render::record_lines(job);
    let link_style = if job.url.is_some() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Text::from(vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(company),
        Line::from(location),
        Line::from(Span::styled(link, link_style)),
    ])
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use ratatui::backend::TestBackend;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn job(title: &str, url: Option<&str>) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Pune".to_string(),
            url: url.map(str::to_string),
        }
    }

    fn screen(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut list_state = ListState::default();
        redraw(&mut terminal, state, &mut list_state).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let mut state = AppState::new();
        type_text(&mut state, "Acme");
        state.handle_key(press(KeyCode::Tab));
        type_text(&mut state, "engineerx");
        state.handle_key(press(KeyCode::Backspace));

        assert_eq!(state.company, "Acme");
        assert_eq!(state.position, "engineer");
    }

    #[test]
    fn test_focus_cycles_through_button() {
        let mut state = AppState::new();
        state.handle_key(press(KeyCode::Tab));
        state.handle_key(press(KeyCode::Tab));
        assert_eq!(state.focus, Focus::Button);

        type_text(&mut state, "ignored");
        assert!(state.company.is_empty());
        assert!(state.position.is_empty());

        state.handle_key(press(KeyCode::Tab));
        assert_eq!(state.focus, Focus::Company);
        state.handle_key(press(KeyCode::BackTab));
        assert_eq!(state.focus, Focus::Button);
    }

    #[test]
    fn test_enter_submits_and_escape_quits() {
        let mut state = AppState::new();
        assert_eq!(state.handle_key(press(KeyCode::Enter)), Action::Submit);
        assert_eq!(state.handle_key(press(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert!(state.company.is_empty());
    }

    #[test]
    fn test_blank_form_is_rejected_without_searching() {
        let mut state = AppState::new();
        type_text(&mut state, "Acme");

        assert!(state.begin_search().is_none());
        assert_eq!(
            state.status,
            Status::Invalid("Please provide both a company name and a job position.".to_string())
        );
    }

    #[test]
    fn test_search_outcomes() {
        let mut state = AppState::new();
        type_text(&mut state, "Acme");
        state.handle_key(press(KeyCode::Tab));
        type_text(&mut state, "engineer");

        let query = state.begin_search().unwrap();
        assert_eq!(state.status, Status::Searching);

        state.finish_search(&query, Ok(vec![job("Backend Engineer", None), job("QA Engineer", None)]));
        assert_eq!(
            state.status,
            Status::Found("Found 2 job opening(s) for 'engineer' at Acme:".to_string())
        );
        assert_eq!(state.jobs.len(), 2);

        state.finish_search(&query, Ok(Vec::new()));
        assert_eq!(
            state.status,
            Status::Empty("No job openings found for 'engineer' at Acme.".to_string())
        );

        state.finish_search(&query, Err(anyhow!("connection refused")));
        assert_eq!(
            state.status,
            Status::Failed("An error occurred: connection refused".to_string())
        );
        assert!(state.jobs.is_empty());
    }

    #[test]
    fn test_result_selection_is_bounded() {
        let mut state = AppState::new();
        state.jobs = vec![job("A", None), job("B", None)];

        state.handle_key(press(KeyCode::Up));
        assert_eq!(state.selected, 0);
        state.handle_key(press(KeyCode::Down));
        state.handle_key(press(KeyCode::Down));
        assert_eq!(state.selected, 1);
        assert_eq!(state.current_job().map(|j| j.title.as_str()), Some("B"));
    }

    #[test]
    fn test_draw_shows_results_and_detail() {
        let mut state = AppState::new();
        type_text(&mut state, "Acme");
        state.handle_key(press(KeyCode::Tab));
        type_text(&mut state, "engineer");
        let query = state.begin_search().unwrap();
        state.finish_search(
            &query,
            Ok(vec![job("Backend Engineer", Some("https://in.linkedin.com/jobs/view/5"))]),
        );

        let text = screen(&state);
        assert!(text.contains("Found 1 job opening(s) for 'engineer' at Acme:"));
        assert!(text.contains("Title: Backend Engineer"));
        assert!(text.contains("Link: https://in.linkedin.com/jobs/view/5"));
    }

    #[test]
    fn test_draw_shows_busy_state() {
        let mut state = AppState::new();
        type_text(&mut state, "Acme");
        state.handle_key(press(KeyCode::Tab));
        type_text(&mut state, "engineer");
        state.begin_search().unwrap();

        assert!(screen(&state).contains("Searching for job openings..."));
    }

    #[test]
    fn test_cursor_stays_inside_input() {
        let area = Rect::new(0, 1, 40, 3);
        assert_eq!(cursor_x(area, ""), 1);
        assert_eq!(cursor_x(area, "Acme"), 5);
        assert_eq!(cursor_x(area, &"x".repeat(70_000)), 38);

        let far_right = Rect::new(u16::MAX - 10, 0, 10, 3);
        assert_eq!(cursor_x(far_right, &"x".repeat(70_000)), u16::MAX - 2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Senior Software Engineer", 10), "Senior ...");
        assert_eq!(truncate("Ingénieur logiciel", 8), "Ingén...");
    }
}
