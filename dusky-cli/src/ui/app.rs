use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};

use dusky_core::config::{Config, Item};
use dusky_core::dispatch::{DispatchOutcome, Dispatcher, Spawner};
use dusky_core::view::{PageView, WindowView};

use super::styles;

/// What the event loop should do after a key press
#[derive(Debug, PartialEq, Eq)]
pub enum Action<'a> {
    Continue,
    Quit,
    Run(&'a Item),
}

/// Navigation state over a built view
pub struct App<'a> {
    view: WindowView<'a>,
    page: usize,
    row: usize,
    last: Option<(String, DispatchOutcome)>,
}

impl<'a> App<'a> {
    pub fn new(view: WindowView<'a>) -> Self {
        Self {
            view,
            page: 0,
            row: 0,
            last: None,
        }
    }

    fn current_page(&self) -> Option<&PageView<'a>> {
        self.view.pages.get(self.page)
    }

    fn row_count(&self) -> usize {
        self.current_page().map(PageView::row_count).unwrap_or(0)
    }

    pub fn selected_item(&self) -> Option<&'a Item> {
        self.current_page()?.rows().nth(self.row).map(|r| r.item)
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Action<'a> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Action::Quit;
            }
            KeyCode::Enter | KeyCode::Char('r') => {
                if let Some(item) = self.selected_item() {
                    return Action::Run(item);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let n = self.row_count();
                if n > 0 {
                    self.row = (self.row + 1) % n;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let n = self.row_count();
                if n > 0 {
                    self.row = (self.row + n - 1) % n;
                }
            }
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.switch_page(1),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.switch_page(self.view.pages.len().saturating_sub(1))
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if idx < self.view.pages.len() {
                    self.page = idx;
                    self.row = 0;
                }
            }
            _ => {}
        }
        Action::Continue
    }

    fn switch_page(&mut self, step: usize) {
        let n = self.view.pages.len();
        if n > 0 {
            self.page = (self.page + step) % n;
            self.row = 0;
        }
    }

    pub fn record(&mut self, title: &str, outcome: DispatchOutcome) {
        self.last = Some((title.to_string(), outcome));
    }

    fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.draw_tabs(f, chunks[0]);
        self.draw_rows(f, chunks[1]);
        self.draw_status(f, chunks[2]);
        draw_hints(f, chunks[3]);
    }

    fn draw_tabs(&self, f: &mut Frame, area: Rect) {
        let titles: Vec<Line> = self
            .view
            .pages
            .iter()
            .enumerate()
            .map(|(i, p)| Line::styled(format!(" {} ", p.title), styles::tab(i == self.page)))
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.page)
            .divider(Span::styled("│", styles::border_subtle()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(styles::border_subtle())
                    .title(Span::styled(
                        fit_title(&self.view.title, area.width),
                        styles::text(),
                    )),
            );
        f.render_widget(tabs, area);
    }

    fn draw_rows(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_focused());

        let Some(page) = self.current_page() else {
            let empty = Paragraph::new(Line::styled("No pages configured", styles::text_muted()))
                .block(block);
            f.render_widget(empty, area);
            return;
        };

        let mut items: Vec<ListItem> = Vec::new();
        let mut selected = None;
        let mut row_idx = 0;

        for group in &page.groups {
            if !group.title.is_empty() {
                items.push(ListItem::new(Line::styled(
                    group.title.plain().to_string(),
                    styles::section_header(),
                )));
            }
            for row in &group.rows {
                if row_idx == self.row {
                    selected = Some(items.len());
                }
                row_idx += 1;

                let mut title = vec![
                    Span::styled(row.title.plain().to_string(), styles::text()),
                    Span::raw("  "),
                    Span::styled(format!("[{}]", row.action_label), styles::key_hint()),
                ];
                if row.item.terminal {
                    title.push(Span::styled(" terminal", styles::text_muted()));
                }
                let mut lines = vec![Line::from(title)];
                if !row.subtitle.is_empty() {
                    lines.push(Line::styled(
                        format!("  {}", row.subtitle.plain()),
                        styles::text_dim(),
                    ));
                }
                items.push(ListItem::new(lines));
            }
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(styles::selection())
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(selected);
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let line = match &self.last {
            Some((title, outcome)) => {
                let text = match outcome {
                    DispatchOutcome::Spawned(request) => format!("{}: {}", title, request),
                    DispatchOutcome::Skipped => format!("{}: nothing to run", title),
                    DispatchOutcome::Failed(e) => format!("{}: {}", title, e),
                };
                let style = styles::outcome(outcome);
                Line::from(vec![
                    Span::styled(format!(" {} ", styles::outcome_icon(outcome)), style),
                    Span::styled(text, style),
                ])
            }
            None => Line::styled(" Ready", styles::text_muted()),
        };
        f.render_widget(Paragraph::new(line), area);
    }
}

fn draw_hints(f: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (key, label) in [
        ("↑↓", "select"),
        ("←→/Tab", "page"),
        ("Enter", "run"),
        ("q", "quit"),
    ] {
        spans.push(Span::styled(format!(" {} ", key), styles::key_hint()));
        spans.push(Span::styled(format!("{} ", label), styles::text_dim()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn fit_title(s: &str, width: u16) -> String {
    // width includes borders; keep safe margin
    let max = width.saturating_sub(4) as usize;
    if max == 0 {
        return "".into();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "…".into();
    }
    let mut out: String = chars.into_iter().take(max - 1).collect();
    out.push('…');
    out
}

// --- Terminal setup/teardown ---
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the terminal front end until the user quits
pub fn run_tui<S: Spawner>(config: &Config, dispatcher: &Dispatcher<S>) -> io::Result<()> {
    let mut app = App::new(WindowView::build(config));
    let mut terminal = setup_terminal()?;

    let result = event_loop(&mut terminal, &mut app, dispatcher);
    restore_terminal(terminal)?;
    result
}

fn event_loop<S: Spawner>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<'_>,
    dispatcher: &Dispatcher<S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.draw(f))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let CEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        else {
            continue;
        };

        match app.handle_key(code, modifiers) {
            Action::Quit => return Ok(()),
            Action::Run(item) => {
                let outcome = dispatcher.dispatch(item);
                app.record(&item.title, outcome);
            }
            Action::Continue => {}
        }
    }
}
