//! App state and main loop: terminal setup, the one-shot task fetch, key
//! handling and drawing.

use std::{io, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::time::sleep;
use tracing::{error, info};

use crate::fetch::{fetch_tasks, TaskSource};
use crate::state::Dashboard;
use crate::types::Record;
use crate::ui::{
    header::{draw_header, Counts},
    search::draw_search,
    table::{draw_table, table_page_size, TuiTable},
    util::{clamp_scroll, scroll_by_key},
};

pub struct App {
    dashboard: Dashboard<TuiTable>,
    server: String,

    // Pending fetch; None once the records have arrived
    pending: Option<oneshot::Receiver<Vec<Record>>>,

    should_quit: bool,
    scroll_offset: usize,
    last_table_area: Option<Rect>,
}

impl App {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            dashboard: Dashboard::new(TuiTable::new()),
            server: server.into(),
            pending: None,
            should_quit: false,
            scroll_offset: 0,
            last_table_area: None,
        }
    }

    /// Seed the filter before the records arrive.
    pub fn with_query(mut self, query: &str) -> Self {
        self.dashboard = Dashboard::with_query(TuiTable::new(), query);
        self
    }

    pub fn dashboard(&self) -> &Dashboard<TuiTable> {
        &self.dashboard
    }

    pub async fn run(&mut self, source: TaskSource) -> anyhow::Result<()> {
        // Single fetch for the whole session
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let records = fetch_tasks(&source).await;
            let _ = tx.send(records);
        });
        self.pending = Some(rx);

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    self.handle_key(k);
                }
            }
            if self.should_quit {
                break;
            }

            self.poll_fetch();

            terminal.draw(|f| self.draw(f))?;

            sleep(Duration::from_millis(40)).await;
        }
        Ok(())
    }

    fn poll_fetch(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };
        let records = match rx.try_recv() {
            Ok(records) => records,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {
                error!("fetch task ended without a result");
                Vec::new()
            }
        };
        info!(count = records.len(), "task list loaded");
        self.pending = None;
        self.receive(records);
    }

    /// Install the fetched records and draw them under the current query.
    pub fn receive(&mut self, records: Vec<Record>) {
        self.dashboard.load(records);
        self.scroll_offset = 0;
    }

    pub fn handle_key(&mut self, k: KeyEvent) {
        if k.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
        match k.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('u') if ctrl => self.edit_query(|d| d.clear_query()),
            KeyCode::Char(c) if !ctrl => self.edit_query(|d| d.push_char(c)),
            KeyCode::Backspace => self.edit_query(|d| d.pop_char()),
            _ => {
                let page = self.last_table_area.map(table_page_size).unwrap_or(1);
                if scroll_by_key(&mut self.scroll_offset, k, page) {
                    clamp_scroll(&mut self.scroll_offset, self.dashboard.shown(), page);
                }
            }
        }
    }

    // Every edit re-filters and re-renders immediately.
    fn edit_query(&mut self, f: impl FnOnce(&mut Dashboard<TuiTable>)) {
        f(&mut self.dashboard);
        self.scroll_offset = 0;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(3), // search
                Constraint::Min(4),    // table
            ])
            .split(f.area());

        let counts = self.pending.is_none().then(|| Counts {
            shown: self.dashboard.shown(),
            total: self.dashboard.records().len(),
            alerts: self.dashboard.alert_count(),
        });
        draw_header(f, rows[0], &self.server, counts);
        draw_search(f, rows[1], self.dashboard.query());

        // Cache for scroll paging
        self.last_table_area = Some(rows[2]);
        draw_table(f, rows[2], self.dashboard.target(), self.scroll_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn rec(agent: &str) -> Record {
        Record {
            command_type: Some("ping".into()),
            agent: Some(agent.into()),
            target: Some("b1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn typing_filters_and_backspace_restores() {
        let mut app = App::new("http://localhost:8000");
        app.receive(vec![rec("a1"), rec("a2")]);
        assert_eq!(app.dashboard().shown(), 2);

        app.handle_key(key(KeyCode::Char('A')));
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.dashboard().query(), "A2");
        assert_eq!(app.dashboard().shown(), 1);
        assert_eq!(app.dashboard().target().rows()[0].cells[1], "a2");

        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.dashboard().shown(), 2);
    }

    #[test]
    fn ctrl_u_clears_and_esc_quits() {
        let mut app = App::new("srv").with_query("zzz");
        app.receive(vec![rec("a1")]);
        assert_eq!(app.dashboard().shown(), 0);
        assert!(app.dashboard().target().header().is_empty());

        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(app.dashboard().shown(), 1);
        assert!(!app.should_quit());

        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());
    }
}
