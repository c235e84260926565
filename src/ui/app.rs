use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::info;

use crate::detail::{DetailController, DetailView};
use crate::intent::{download_intent, stream_intent, Intent};
use crate::models::{DetailRecord, ResultSummary};
use crate::read_more::ReadMore;
use crate::search::{SearchController, Showing, NO_RESULTS_MESSAGE};
use crate::worker::{FetchEvent, FetchJob, FetchWorker};

use super::helpers::{
    build_card_lines, centered_rect, detail_meta_line, fit_width, surface_error,
};

/// Number of result cards shown in each row of the grid.
const GRID_COLUMNS: usize = 4;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the search bar, borders included.
const HEADER_HEIGHT: u16 = 3;
/// Film-strip textures drawn on top of each card. Rotated per position so the
/// grid does not look uniform.
const CARD_ART: &[&[&str]] = &[
    &["[] ", " []"],
    &["|=|", "=|="],
    &["::  ", "  ::"],
    &["<>  ", "  <>"],
    &["/\\/\\", "\\/\\/"],
    &["oOo ", " OoO"],
];
const SEARCH_PLACEHOLDER: &str = "Search for movies, TV shows...";
const NO_PLOT: &str = "No plot available.";

/// Whether keystrokes go to the grid or into the search bar.
enum Mode {
    Browsing,
    EditingQuery,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Owns both controllers
/// and the worker handle that runs their requests.
pub struct App {
    worker: FetchWorker,
    search: SearchController,
    detail: DetailController,
    plot: ReadMore,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
    trending_requested: bool,
}

impl App {
    pub fn new(worker: FetchWorker) -> Self {
        Self {
            worker,
            search: SearchController::new(),
            detail: DetailController::new(),
            plot: ReadMore::default(),
            selected: 0,
            mode: Mode::Browsing,
            status: None,
            trending_requested: false,
        }
    }

    /// Ask for the trending slice. Only the first call does anything.
    pub fn load_trending(&mut self) {
        if self.trending_requested {
            return;
        }
        self.trending_requested = true;
        self.worker.dispatch(FetchJob::Trending);
    }

    /// Apply every response the worker has finished since the last tick.
    pub fn pump(&mut self) {
        for event in self.worker.drain() {
            match event {
                FetchEvent::Trending(result) => self.search.apply_trending(result),
                FetchEvent::Search { ticket, result } => {
                    if self.search.resolve(&ticket, result) {
                        self.selected = 0;
                    }
                }
                FetchEvent::Detail { ticket, result } => {
                    self.detail.resolve(&ticket, result);
                }
            }
        }
        self.sync_plot();
        self.clamp_selection();
    }

    /// Route a key press to the modal, the search bar or the grid. Returns
    /// `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.detail.is_open() {
            self.handle_detail_key(code)?;
            return Ok(false);
        }

        match self.mode {
            Mode::EditingQuery => {
                self.handle_query_key(code);
                Ok(false)
            }
            Mode::Browsing => self.handle_browse_key(code),
        }
    }

    /// Ctrl+U empties the search bar from anywhere outside the modal.
    pub fn handle_ctrl_u(&mut self) {
        if !self.detail.is_open() {
            self.search.clear_query();
            self.clamp_selection();
        }
    }

    fn handle_query_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Down | KeyCode::Tab => self.mode = Mode::Browsing,
            KeyCode::Enter => {
                self.submit_query();
                self.mode = Mode::Browsing;
            }
            KeyCode::Backspace => {
                let mut query = self.search.query().to_string();
                query.pop();
                self.search.set_query(query);
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                let mut query = self.search.query().to_string();
                query.push(ch);
                self.search.set_query(query);
            }
            _ => {}
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('/') | KeyCode::Char('i') => {
                self.clear_status();
                self.mode = Mode::EditingQuery;
            }
            KeyCode::Left => self.move_horizontal(-1),
            KeyCode::Right => self.move_horizontal(1),
            KeyCode::Up => {
                if self.selected < GRID_COLUMNS {
                    self.mode = Mode::EditingQuery;
                } else {
                    self.move_vertical(-1);
                }
            }
            KeyCode::Down => self.move_vertical(1),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => {
                self.selected = self.search.visible_items().len().saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(summary) = self.current_item().cloned() {
                    self.clear_status();
                    self.open_detail(summary);
                } else {
                    self.set_status("Nothing selected.", StatusKind::Error);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.search.clear_error();
                self.clamp_selection();
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.search.clear_query();
                self.clamp_selection();
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_detail_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
                self.detail.close();
                self.plot = ReadMore::default();
            }
            KeyCode::Char('m') | KeyCode::Char('M') => self.plot.toggle(),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                if let Some(record) = self.intent_record() {
                    self.launch_intent(stream_intent(&record));
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                if let Some(record) = self.intent_record() {
                    self.launch_intent(download_intent(&record));
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if let Some(record) = self.intent_record() {
                    let url = record.summary.poster_url().to_string();
                    match open_link(&url).context("failed to open poster") {
                        Ok(()) => self.set_status("Opened poster.", StatusKind::Info),
                        Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_query(&mut self) {
        let query = self.search.query().to_string();
        if let Some(ticket) = self.search.submit(&query) {
            info!(query = ticket.query(), seq = ticket.seq(), "search submitted");
            self.clear_status();
            self.worker.dispatch(FetchJob::Search(ticket));
        }
    }

    fn open_detail(&mut self, summary: ResultSummary) {
        self.plot = ReadMore::default();
        if let Some(ticket) = self.detail.open(summary) {
            self.worker.dispatch(FetchJob::Detail(ticket));
        }
        self.sync_plot();
    }

    /// Record the outbound actions act on. While the lookup is in flight the
    /// seed summary is good enough to build a query from.
    fn intent_record(&self) -> Option<DetailRecord> {
        match self.detail.view() {
            DetailView::Closed => None,
            DetailView::Loading(seed) => Some(DetailRecord::from_summary(seed.clone())),
            DetailView::Loaded(record) | DetailView::LoadedWithWarning(record, _) => {
                Some(record.clone())
            }
        }
    }

    fn launch_intent(&mut self, intent: Intent) {
        info!(kind = intent.kind.label(), query = intent.query.as_str(), "opening intent");
        match open_link(&intent.url).context("failed to launch browser") {
            Ok(()) => self.set_status(
                format!("{} search opened for \"{}\".", intent.kind.label(), intent.query),
                StatusKind::Info,
            ),
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
    }

    fn sync_plot(&mut self) {
        if let Some(record) = self.detail.record() {
            let plot = record.plot.as_deref().unwrap_or(NO_PLOT);
            self.plot.sync(plot);
        }
    }

    fn current_item(&self) -> Option<&ResultSummary> {
        self.search.visible_items().get(self.selected)
    }

    fn clamp_selection(&mut self) {
        let count = self.search.visible_items().len();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    fn move_horizontal(&mut self, offset: isize) {
        let count = self.search.visible_items().len() as isize;
        let new_index = self.selected as isize + offset;
        if (0..count).contains(&new_index) {
            self.selected = new_index as usize;
        }
    }

    fn move_vertical(&mut self, offset: isize) {
        let count = self.search.visible_items().len() as isize;
        let new_index = self.selected as isize + offset * GRID_COLUMNS as isize;
        if (0..count).contains(&new_index) {
            self.selected = new_index as usize;
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT.min(area.height)),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_search_bar(frame, chunks[0]);
        self.draw_content(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if self.detail.is_open() {
            self.draw_detail(frame, area);
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let editing = matches!(self.mode, Mode::EditingQuery) && !self.detail.is_open();
        let title = if self.search.is_loading() {
            " MovieVerse - Searching... "
        } else {
            " MovieVerse "
        };
        let mut block = Block::default().borders(Borders::ALL).title(title);
        if editing {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        let inner = block.inner(area);

        let query = self.search.query();
        let text = if query.is_empty() {
            Line::from(Span::styled(
                SEARCH_PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(query.to_string())
        };
        frame.render_widget(Paragraph::new(text).block(block), area);

        if editing && inner.width > 0 {
            let offset = (query.chars().count() as u16).min(inner.width.saturating_sub(1));
            frame.set_cursor_position(Position::new(inner.x + offset, inner.y));
        }
    }

    fn draw_content(&self, frame: &mut Frame, area: Rect) {
        match self.search.showing() {
            Showing::Loading => {
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Finding your movies",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        "This will just take a moment",
                        Style::default().fg(Color::Gray),
                    )),
                ];
                frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
            }
            Showing::Error(message) => self.draw_error(frame, area, message),
            Showing::NoMatches => {
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "No movies found",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!(
                            "{NO_RESULTS_MESSAGE}. We couldn't find any movies matching your search. Try different keywords."
                        ),
                        Style::default().fg(Color::Gray),
                    )),
                ];
                frame.render_widget(
                    Paragraph::new(lines)
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    area,
                );
            }
            Showing::Results(items) => self.draw_grid(frame, area, "Search Results", items),
            Showing::Trending(items) => self.draw_grid(frame, area, "Trending Now", items),
        }
    }

    fn draw_error(&self, frame: &mut Frame, area: Rect, message: &str) {
        let panel = centered_rect(60, 50, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title("Oops! Something went wrong");
        let lines = vec![
            Line::from(""),
            Line::from(message.to_string()),
            Line::from(""),
            Line::from(Span::styled(
                "Press R to try again.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, panel);
    }

    fn draw_grid(&self, frame: &mut Frame, area: Rect, heading: &str, items: &[ResultSummary]) {
        let block = Block::default()
            .borders(Borders::TOP)
            .title(Span::styled(
                format!(" {heading} "),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if items.is_empty() {
            let message = Paragraph::new("Nothing to show yet. Press '/' to search.")
                .alignment(Alignment::Center);
            frame.render_widget(message, inner);
            return;
        }

        let row_count = items.len().div_ceil(GRID_COLUMNS);
        for (row_idx, row_chunk) in split_even(inner, row_count, Direction::Vertical)
            .into_iter()
            .enumerate()
        {
            for (col_idx, column_chunk) in split_even(row_chunk, GRID_COLUMNS, Direction::Horizontal)
                .into_iter()
                .enumerate()
            {
                let index = row_idx * GRID_COLUMNS + col_idx;
                let Some(summary) = items.get(index) else {
                    continue;
                };
                let selected = index == self.selected && matches!(self.mode, Mode::Browsing);
                let mut block = Block::default()
                    .borders(Borders::ALL)
                    .title(summary.year.clone());
                if selected {
                    block = block.style(Style::default().fg(Color::Yellow));
                }
                let pattern = CARD_ART[index % CARD_ART.len()];
                let lines = build_card_lines(
                    summary,
                    pattern,
                    column_chunk.width.saturating_sub(2),
                    column_chunk.height.saturating_sub(2),
                    selected,
                );
                frame.render_widget(Paragraph::new(lines).block(block), column_chunk);
            }
        }
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(80, 80, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Details").borders(Borders::ALL);
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let lines = match self.detail.view() {
            DetailView::Closed => return,
            DetailView::Loading(seed) => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Preparing movie details",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("Fetching all the details for {seed}"),
                    Style::default().fg(Color::Gray),
                )),
            ],
            DetailView::Loaded(record) => self.detail_lines(record, None, inner.width),
            DetailView::LoadedWithWarning(record, warning) => {
                self.detail_lines(record, Some(warning), inner.width)
            }
        };

        let alignment = if matches!(self.detail.view(), DetailView::Loading(_)) {
            Alignment::Center
        } else {
            Alignment::Left
        };
        let paragraph = Paragraph::new(lines)
            .alignment(alignment)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn detail_lines(
        &self,
        record: &DetailRecord,
        warning: Option<&String>,
        width: u16,
    ) -> Vec<Line<'static>> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let label_style = Style::default().add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(
                record.title().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                detail_meta_line(record),
                Style::default().fg(Color::Blue),
            )),
        ];

        let mut rating_line = Vec::new();
        if let Some(score) = &record.rating_score {
            rating_line.push(Span::styled(
                format!("★ {score}/10"),
                Style::default().fg(Color::Yellow),
            ));
            rating_line.push(Span::raw("  "));
        }
        if let Some(genre) = &record.genre {
            rating_line.push(Span::raw(genre.clone()));
        }
        if !rating_line.is_empty() {
            lines.push(Line::from(rating_line));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(self.plot.display().into_owned()));
        if self.plot.is_truncatable() {
            lines.push(Line::from(vec![
                Span::styled("[m]", key_style),
                Span::styled(
                    format!(" {}", self.plot.toggle_label()),
                    Style::default().fg(Color::Magenta),
                ),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Director: ", label_style),
            Span::raw(record.director.clone().unwrap_or_else(|| "N/A".into())),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Cast: ", label_style),
            Span::raw(record.cast.clone().unwrap_or_else(|| "N/A".into())),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Poster: ", label_style),
            Span::styled(
                fit_width(record.summary.poster_url(), width.saturating_sub(8) as usize),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("[s]", key_style),
            Span::styled(" Stream Now   ", Style::default().fg(Color::Green)),
            Span::styled("[d]", key_style),
            Span::styled(" Download   ", Style::default().fg(Color::Red)),
            Span::styled("[p]", key_style),
            Span::raw(" Poster"),
        ]));

        if let Some(warning) = warning {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                warning.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        lines
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        if self.detail.is_open() {
            return Line::from(vec![
                Span::styled("[m]", key_style),
                Span::raw(" Read More   "),
                Span::styled("[s]", key_style),
                Span::raw(" Stream   "),
                Span::styled("[d]", key_style),
                Span::raw(" Download   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Close"),
            ]);
        }

        match self.mode {
            Mode::EditingQuery => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Ctrl+U]", key_style),
                Span::raw(" Clear   "),
                Span::styled("[Esc/↓]", key_style),
                Span::raw(" Results"),
            ]),
            Mode::Browsing => Line::from(vec![
                Span::styled("[←↑↓→]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Details   "),
                Span::styled("[/]", key_style),
                Span::raw(" Search   "),
                Span::styled("[C]", key_style),
                Span::raw(" Clear Query   "),
                Span::styled("[R]", key_style),
                Span::raw(" Dismiss Error   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }
}

/// Split `area` into `count` equal slices along `direction`.
fn split_even(area: Rect, count: usize, direction: Direction) -> Vec<Rect> {
    let count = count.max(1) as u32;
    let chunks = Layout::default()
        .direction(direction)
        .constraints(vec![Constraint::Ratio(1, count); count as usize])
        .split(area);
    chunks.iter().cloned().collect()
}
