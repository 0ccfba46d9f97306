//! Searchable, checkbox-driven coin picker over a very large option list.
//!
//! The picker never owns the selection. Every membership change returns the
//! complete replacement list and the caller stores it. Only the rows around
//! the viewport are turned into list items, so drawing cost does not grow
//! with the number of options.

use std::ops::Range;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState,
    },
    Frame,
};

use crate::theme::Theme;
use crate::types::Candidate;

/// Rows materialized on each side of the viewport.
pub const OVERSCAN: usize = 2;

const SPINNER: &[&str] = &[
    "\u{280b}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283c}", "\u{2834}", "\u{2826}",
    "\u{2827}", "\u{2807}", "\u{280f}",
];

const CLEAR_LABEL: &str = "[Clear All]";
const DONE_LABEL: &str = "[Done]";

/// Inputs supplied by the parent on every draw and event.
#[derive(Debug, Clone, Copy)]
pub struct SelectProps<'a> {
    pub options: &'a [Candidate],
    pub selected: &'a [String],
    pub is_loading: bool,
    pub error: Option<&'a str>,
    pub placeholder: &'a str,
    /// Rows available to the option list.
    pub height: u16,
    /// Rows per option.
    pub item_height: u16,
}

impl SelectProps<'_> {
    pub fn disabled(&self) -> bool {
        self.is_loading || self.error.is_some()
    }

    pub fn item_height(&self) -> usize {
        self.item_height.max(1) as usize
    }

    /// Options that fit in the viewport, at least one.
    pub fn rows(&self) -> usize {
        (self.height as usize / self.item_height()).max(1)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }
}

/// What the panel body shows. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body<'a> {
    Spinner,
    Error(&'a str),
    Empty,
    List,
}

pub fn body<'a>(props: &SelectProps<'a>, filtered_len: usize) -> Body<'a> {
    if props.is_loading {
        Body::Spinner
    } else if let Some(err) = props.error {
        Body::Error(err)
    } else if filtered_len == 0 {
        Body::Empty
    } else {
        Body::List
    }
}

/// `needle` must already be lowercase.
pub fn matches(coin: &Candidate, needle: &str) -> bool {
    coin.name.to_lowercase().contains(needle)
        || coin
            .symbol
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains(needle))
}

/// Indices of the options matching `query`, in input order.
pub fn filter(options: &[Candidate], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..options.len()).collect();
    }
    let needle = query.to_lowercase();
    options
        .iter()
        .enumerate()
        .filter(|(_, c)| matches(c, &needle))
        .map(|(i, _)| i)
        .collect()
}

/// Removes `id` if present, otherwise appends it.
pub fn toggle(selected: &[String], id: &str) -> Vec<String> {
    if selected.iter().any(|s| s == id) {
        selected.iter().filter(|s| *s != id).cloned().collect()
    } else {
        let mut next = selected.to_vec();
        next.push(id.to_string());
        next
    }
}

#[derive(Debug, Default)]
pub struct SelectList {
    open: bool,
    query: String,
    filtered: Vec<usize>,
    /// Highlighted position in `filtered`.
    cursor: usize,
    /// First visible position in `filtered`.
    offset: usize,
    /// Options that fit in the body as last drawn. The panel can be clipped
    /// by the terminal, so this may be smaller than `SelectProps::rows`.
    viewport: Option<usize>,
    tick: usize,
    trigger_area: Rect,
    panel_area: Rect,
    list_area: Rect,
    clear_area: Rect,
    done_area: Rect,
}

impl SelectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Opens unless disabled. Returns whether the panel is open afterwards.
    pub fn open(&mut self, props: &SelectProps) -> bool {
        if !props.disabled() {
            self.open = true;
        }
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Trigger activation: closes an open panel, opens a closed one.
    pub fn toggle_open(&mut self, props: &SelectProps) {
        if self.open {
            self.close();
        } else {
            self.open(props);
        }
    }

    /// Recomputes the filtered view, e.g. after the options were replaced.
    pub fn refilter(&mut self, options: &[Candidate]) {
        self.filtered = filter(options, &self.query);
        self.cursor = 0;
        self.offset = 0;
    }

    pub fn set_query(&mut self, query: &str, options: &[Candidate]) {
        self.query = query.to_string();
        self.refilter(options);
    }

    /// Options visible at once: the drawn body if known, else the requested height.
    pub fn rows(&self, props: &SelectProps) -> usize {
        self.viewport.unwrap_or_else(|| props.rows())
    }

    /// Positions in `filtered` that get materialized for the current scroll.
    pub fn window(&self, props: &SelectProps) -> Range<usize> {
        let len = self.filtered.len();
        let start = self.offset.saturating_sub(OVERSCAN).min(len);
        let end = (self.offset + self.rows(props) + OVERSCAN).min(len);
        start..end
    }

    fn max_offset(&self, props: &SelectProps) -> usize {
        self.filtered.len().saturating_sub(self.rows(props))
    }

    /// Moves the viewport; the cursor is dragged along so it stays on screen.
    pub fn scroll(&mut self, delta: isize, props: &SelectProps) {
        let next = self.offset.saturating_add_signed(delta);
        self.offset = next.min(self.max_offset(props));
        if self.filtered.is_empty() {
            return;
        }
        let last = (self.offset + self.rows(props) - 1).min(self.filtered.len() - 1);
        self.cursor = self.cursor.clamp(self.offset, last);
    }

    /// Shifts the viewport the least amount that brings the cursor into view.
    fn follow_cursor(&mut self, props: &SelectProps) {
        let rows = self.rows(props);
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + rows {
            self.offset = self.cursor + 1 - rows;
        }
        self.offset = self.offset.min(self.max_offset(props));
    }

    pub fn move_cursor(&mut self, delta: isize, props: &SelectProps) {
        let len = self.filtered.len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
        self.follow_cursor(props);
    }

    fn toggle_at(&self, pos: usize, props: &SelectProps) -> Option<Vec<String>> {
        let coin = self.filtered.get(pos).and_then(|&i| props.options.get(i))?;
        Some(toggle(props.selected, &coin.id))
    }

    /// Keys while the panel is open. Returns the new selection on change.
    pub fn handle_key(&mut self, key: KeyEvent, props: &SelectProps) -> Option<Vec<String>> {
        if !self.open {
            return None;
        }
        let page = self.rows(props) as isize;
        match key.code {
            KeyCode::Esc => self.close(),
            KeyCode::Char('x') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Vec::new());
            }
            KeyCode::Enter => {
                if body(props, self.filtered.len()) == Body::List {
                    return self.toggle_at(self.cursor, props);
                }
            }
            KeyCode::Up => self.move_cursor(-1, props),
            KeyCode::Down => self.move_cursor(1, props),
            KeyCode::PageUp => self.move_cursor(-page, props),
            KeyCode::PageDown => self.move_cursor(page, props),
            KeyCode::Home => self.move_cursor(isize::MIN / 2, props),
            KeyCode::End => self.move_cursor(isize::MAX / 2, props),
            KeyCode::Backspace => {
                let mut query = self.query.clone();
                if query.pop().is_some() {
                    self.set_query(&query, props.options);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let query = format!("{}{}", self.query, c);
                self.set_query(&query, props.options);
            }
            _ => {}
        }
        None
    }

    /// Mouse input. Clicks outside the widget close the panel.
    pub fn handle_mouse(&mut self, ev: MouseEvent, props: &SelectProps) -> Option<Vec<String>> {
        let pos = Position::new(ev.column, ev.row);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.trigger_area.contains(pos) {
                    self.toggle_open(props);
                    return None;
                }
                if !self.open {
                    return None;
                }
                if self.clear_area.contains(pos) {
                    return Some(Vec::new());
                }
                if self.done_area.contains(pos) {
                    self.close();
                    return None;
                }
                if self.list_area.contains(pos) && body(props, self.filtered.len()) == Body::List {
                    let row = (pos.y - self.list_area.y) as usize / props.item_height();
                    let hit = self.offset + row;
                    if row < self.rows(props) && hit < self.filtered.len() {
                        self.cursor = hit;
                        return self.toggle_at(hit, props);
                    }
                    return None;
                }
                if !self.panel_area.contains(pos) {
                    self.close();
                }
                None
            }
            MouseEventKind::ScrollDown if self.open && self.panel_area.contains(pos) => {
                self.scroll(1, props);
                None
            }
            MouseEventKind::ScrollUp if self.open && self.panel_area.contains(pos) => {
                self.scroll(-1, props);
                None
            }
            _ => None,
        }
    }

    /// Panel rectangle hanging below the trigger, clipped to `bounds`.
    pub fn panel_rect(&self, props: &SelectProps, bounds: Rect) -> Rect {
        let top = self.trigger_area.bottom().min(bounds.bottom());
        let wanted = props.height.saturating_add(4);
        let height = wanted.min(bounds.bottom().saturating_sub(top));
        Rect::new(self.trigger_area.x, top, self.trigger_area.width, height)
    }

    pub fn render_trigger(&mut self, f: &mut Frame, area: Rect, props: &SelectProps, t: &Theme) {
        self.trigger_area = area;

        let border = if self.open { t.accent } else { t.border };
        let block = Block::default()
            .title(" Coins ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));

        let arrow = if self.open { " \u{25b4}" } else { " \u{25be}" };
        let line = if props.is_loading {
            Line::from(Span::styled(" Loading coins...", Style::default().fg(t.dim)))
        } else if props.error.is_some() {
            Line::from(Span::styled(" Coin list unavailable", Style::default().fg(t.error)))
        } else if props.selected.is_empty() {
            Line::from(vec![
                Span::styled(format!(" {}", props.placeholder), Style::default().fg(t.dim)),
                Span::styled(arrow, Style::default().fg(t.dim)),
            ])
        } else {
            let names: Vec<&str> = props
                .selected
                .iter()
                .map(|id| {
                    props
                        .options
                        .iter()
                        .find(|c| &c.id == id)
                        .map(|c| c.name.as_str())
                        .unwrap_or(id.as_str())
                })
                .collect();
            Line::from(vec![
                Span::styled(format!(" {}", names.join(", ")), Style::default().fg(t.fg)),
                Span::styled(
                    format!("  ({} selected)", props.selected.len()),
                    Style::default().fg(t.dim),
                ),
                Span::styled(arrow, Style::default().fg(t.dim)),
            ])
        };

        f.render_widget(Paragraph::new(line).block(block), area);
    }

    /// Draws the open panel over whatever is below the trigger.
    pub fn render_panel(&mut self, f: &mut Frame, props: &SelectProps, t: &Theme) {
        if !self.open {
            self.panel_area = Rect::default();
            self.list_area = Rect::default();
            self.clear_area = Rect::default();
            self.done_area = Rect::default();
            return;
        }

        let area = self.panel_rect(props, f.area());
        self.panel_area = area;
        f.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // search
                Constraint::Min(1),    // body
                Constraint::Length(1), // footer
            ])
            .split(inner);

        let search = if self.query.is_empty() {
            Line::from(vec![
                Span::styled(" / ", Style::default().fg(t.input_accent)),
                Span::styled("Search...", Style::default().fg(t.dim)),
            ])
        } else {
            Line::from(vec![
                Span::styled(" / ", Style::default().fg(t.input_accent)),
                Span::styled(format!("{}_", self.query), Style::default().fg(t.fg)),
            ])
        };
        f.render_widget(Paragraph::new(search), chunks[0]);

        self.list_area = chunks[1];
        self.viewport = Some((chunks[1].height as usize / props.item_height()).max(1));
        match body(props, self.filtered.len()) {
            Body::Spinner => {
                let frame = SPINNER[self.tick % SPINNER.len()];
                let p = Paragraph::new(format!(" {} Loading...", frame))
                    .style(Style::default().fg(t.dim));
                f.render_widget(p, chunks[1]);
            }
            Body::Error(err) => {
                let p = Paragraph::new(format!(" {}", err)).style(Style::default().fg(t.error));
                f.render_widget(p, chunks[1]);
            }
            Body::Empty => {
                let p = Paragraph::new(" No results found").style(Style::default().fg(t.dim));
                f.render_widget(p, chunks[1]);
            }
            Body::List => self.render_list(f, chunks[1], props, t),
        }

        self.render_footer(f, chunks[2], props, t);
    }

    /// List items for the materialized window only.
    pub fn items(&self, props: &SelectProps, t: &Theme) -> Vec<ListItem<'static>> {
        let item_height = props.item_height();
        self.window(props)
            .filter_map(|pos| props.options.get(self.filtered[pos]))
            .map(|coin| {
                let checked = props.is_selected(&coin.id);
                let (mark, mark_style) = if checked {
                    ("[x] ", Style::default().fg(t.positive))
                } else {
                    ("[ ] ", Style::default().fg(t.dim))
                };
                let mut spans = vec![
                    Span::styled(mark, mark_style),
                    Span::styled(coin.name.clone(), Style::default().fg(t.fg)),
                ];
                if coin.symbol.is_some() {
                    spans.push(Span::styled(
                        format!(" ({})", coin.ticker()),
                        Style::default().fg(t.accent),
                    ));
                }
                let mut lines = vec![Line::from(spans)];
                lines.resize(item_height, Line::default());
                ListItem::new(Text::from(lines))
            })
            .collect()
    }

    fn render_list(&mut self, f: &mut Frame, area: Rect, props: &SelectProps, t: &Theme) {
        self.cursor = self.cursor.min(self.filtered.len().saturating_sub(1));
        self.follow_cursor(props);
        let window = self.window(props);

        // Cursor is inside the viewport, so `List` keeps this offset as is.
        let mut state = ListState::default()
            .with_offset(self.offset - window.start)
            .with_selected(Some(self.cursor - window.start));

        let list = List::new(self.items(props, t)).highlight_style(
            Style::default()
                .bg(t.highlight_bg)
                .fg(t.highlight_fg)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(list, area, &mut state);

        let item_height = props.item_height();
        let mut scroll_state = ScrollbarState::new(self.filtered.len() * item_height)
            .viewport_content_length(self.rows(props) * item_height)
            .position(self.offset * item_height);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None)
            .style(Style::default().fg(t.border));
        f.render_stateful_widget(scrollbar, area, &mut scroll_state);
    }

    fn render_footer(&mut self, f: &mut Frame, area: Rect, props: &SelectProps, t: &Theme) {
        let clear_w = CLEAR_LABEL.len() as u16;
        let done_w = DONE_LABEL.len() as u16;
        self.clear_area = Rect::new(area.x + 1, area.y, clear_w.min(area.width), 1);
        self.done_area = Rect::new(
            area.x + 1 + clear_w + 2,
            area.y,
            done_w.min(area.width.saturating_sub(clear_w + 3)),
            1,
        );

        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(CLEAR_LABEL, Style::default().fg(t.negative)),
            Span::raw("  "),
            Span::styled(DONE_LABEL, Style::default().fg(t.positive)),
            Span::styled(
                format!(
                    "  {} selected \u{b7} {} matches",
                    props.selected.len(),
                    self.filtered.len()
                ),
                Style::default().fg(t.dim),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn coins() -> Vec<Candidate> {
        vec![
            Candidate::new("bitcoin", "Bitcoin", Some("btc")),
            Candidate::new("ethereum", "Ethereum", Some("eth")),
            Candidate::new("wrapped-bitcoin", "Wrapped Bitcoin", Some("wbtc")),
            Candidate::new("tether", "Tether", Some("usdt")),
            Candidate::new("nameless", "Zeta", None),
        ]
    }

    fn many(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate::new(&format!("coin-{i}"), &format!("Coin {i}"), Some("cn")))
            .collect()
    }

    fn props<'a>(options: &'a [Candidate], selected: &'a [String]) -> SelectProps<'a> {
        SelectProps {
            options,
            selected,
            is_loading: false,
            error: None,
            placeholder: "Select coins...",
            height: 10,
            item_height: 1,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn wheel(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn draw(list: &mut SelectList, p: &SelectProps) -> Terminal<TestBackend> {
        draw_sized(list, p, 24)
    }

    fn draw_sized(list: &mut SelectList, p: &SelectProps, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(60, height)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| {
                list.render_trigger(f, Rect::new(0, 0, 60, 3), p, &theme);
                list.render_panel(f, p, &theme);
            })
            .unwrap();
        terminal
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn screen_row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let start = y as usize * width;
        buffer.content[start..start + width]
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn filter_matches_name_or_symbol_case_insensitively() {
        let options = coins();
        assert_eq!(filter(&options, "BIT"), vec![0, 2]);
        assert_eq!(filter(&options, "usd"), vec![3]);
        // "Tether" contains "eth" too.
        assert_eq!(filter(&options, "Eth"), vec![1, 3]);
        // Symbol only; the name "Wrapped Bitcoin" does not contain it.
        assert_eq!(filter(&options, "WBTC"), vec![2]);
        assert_eq!(filter(&options, ""), vec![0, 1, 2, 3, 4]);
        assert!(filter(&options, "doge").is_empty());
    }

    #[test]
    fn filter_skips_absent_symbol() {
        let options = vec![
            Candidate::new("a", "Alpha", None),
            Candidate::new("b", "Beta", Some("")),
        ];
        assert_eq!(filter(&options, "alp"), vec![0]);
        assert!(filter(&options, "x").is_empty());
    }

    #[test]
    fn filter_is_idempotent() {
        let options = coins();
        let once: Vec<Candidate> = filter(&options, "e")
            .into_iter()
            .map(|i| options[i].clone())
            .collect();
        let twice: Vec<Candidate> = filter(&once, "e")
            .into_iter()
            .map(|i| once[i].clone())
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn toggles_are_exclusive_or_in_append_order() {
        let mut selected: Vec<String> = Vec::new();
        for id in ["tether", "bitcoin", "ethereum", "bitcoin", "nameless"] {
            selected = toggle(&selected, id);
        }
        assert_eq!(selected, vec!["tether", "ethereum", "nameless"]);
    }

    #[test]
    fn body_precedence() {
        let options = coins();
        let selected = Vec::new();
        let mut p = props(&options, &selected);
        p.is_loading = true;
        p.error = Some("boom");
        assert_eq!(body(&p, 3), Body::Spinner);
        p.is_loading = false;
        assert_eq!(body(&p, 3), Body::Error("boom"));
        p.error = None;
        assert_eq!(body(&p, 0), Body::Empty);
        assert_eq!(body(&p, 3), Body::List);
    }

    #[test]
    fn disabled_trigger_does_not_open() {
        let options = coins();
        let selected = Vec::new();
        let mut p = props(&options, &selected);
        let mut list = SelectList::new();

        p.is_loading = true;
        assert!(!list.open(&p));
        p.is_loading = false;
        p.error = Some("Coin list: timeout");
        list.toggle_open(&p);
        assert!(!list.is_open());

        p.error = None;
        list.toggle_open(&p);
        assert!(list.is_open());
        list.toggle_open(&p);
        assert!(!list.is_open());
    }

    #[test]
    fn window_is_bounded_independent_of_option_count() {
        let selected = Vec::new();
        let mut sizes = Vec::new();
        for n in [10, 10_000, 100_000] {
            let options = many(n);
            let p = props(&options, &selected);
            let mut list = SelectList::new();
            list.refilter(&options);
            list.move_cursor((n / 2) as isize, &p);
            let window = list.window(&p);
            assert!(window.len() <= p.rows() + 2 * OVERSCAN);
            assert_eq!(list.items(&p, &Theme::default()).len(), window.len());
            sizes.push(window.len());
        }
        assert_eq!(sizes[1], sizes[2]);
        assert!(sizes[0] <= sizes[1]);
    }

    #[test]
    fn item_height_divides_viewport() {
        let options = many(100);
        let selected = Vec::new();
        let mut p = props(&options, &selected);
        p.item_height = 2;
        let list = {
            let mut l = SelectList::new();
            l.refilter(&options);
            l
        };
        assert_eq!(p.rows(), 5);
        assert_eq!(list.window(&p), 0..7);
        let items = list.items(&p, &Theme::default());
        assert!(items.iter().all(|i| i.height() == 2));
    }

    #[test]
    fn cursor_keeps_viewport_in_range() {
        let options = many(50);
        let selected = Vec::new();
        let p = props(&options, &selected);
        let mut list = SelectList::new();
        list.refilter(&options);

        list.move_cursor(15, &p);
        assert_eq!(list.cursor(), 15);
        assert_eq!(list.offset(), 6);
        list.move_cursor(-100, &p);
        assert_eq!((list.cursor(), list.offset()), (0, 0));
        list.move_cursor(1000, &p);
        assert_eq!(list.cursor(), 49);
        assert_eq!(list.offset(), 40);
    }

    #[test]
    fn typing_filters_and_resets_scroll() {
        let options = coins();
        let selected = Vec::new();
        let p = props(&options, &selected);
        let mut list = SelectList::new();
        list.refilter(&options);
        list.open(&p);
        list.move_cursor(3, &p);

        for c in "BTC".chars() {
            assert_eq!(list.handle_key(key(KeyCode::Char(c)), &p), None);
        }
        assert_eq!(list.query(), "BTC");
        assert_eq!(list.filtered(), &[0, 2]);
        assert_eq!(list.cursor(), 0);

        list.handle_key(key(KeyCode::Backspace), &p);
        list.handle_key(key(KeyCode::Backspace), &p);
        list.handle_key(key(KeyCode::Backspace), &p);
        assert_eq!(list.filtered().len(), options.len());
    }

    #[test]
    fn enter_toggles_highlighted_without_touching_selection() {
        let options = coins();
        let selected = vec!["tether".to_string()];
        let p = props(&options, &selected);
        let mut list = SelectList::new();
        list.refilter(&options);
        list.open(&p);
        list.move_cursor(1, &p);

        let next = list.handle_key(key(KeyCode::Enter), &p);
        assert_eq!(next, Some(vec!["tether".to_string(), "ethereum".to_string()]));
        assert_eq!(selected, vec!["tether".to_string()]);
        assert!(list.is_open());
    }

    #[test]
    fn clear_all_empties_and_stays_open() {
        let options = coins();
        let selected = vec!["bitcoin".to_string(), "tether".to_string()];
        let p = props(&options, &selected);
        let mut list = SelectList::new();
        list.refilter(&options);
        list.open(&p);

        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(list.handle_key(ctrl_x, &p), Some(Vec::new()));
        assert!(list.is_open());
    }

    #[test]
    fn escape_is_done() {
        let options = coins();
        let selected = Vec::new();
        let p = props(&options, &selected);
        let mut list = SelectList::new();
        list.open(&p);
        list.handle_key(key(KeyCode::Esc), &p);
        assert!(!list.is_open());
    }

    #[test]
    fn mouse_trigger_row_outside_and_footer() {
        let options = coins();
        let selected = Vec::new();
        let p = props(&options, &selected);
        let mut list = SelectList::new();
        list.refilter(&options);

        draw(&mut list, &p);
        list.handle_mouse(click(5, 1), &p);
        assert!(list.is_open());

        draw(&mut list, &p);
        // Panel starts at row 3: border, search, then the first option on row 5.
        let next = list.handle_mouse(click(5, 6), &p);
        assert_eq!(next, Some(vec!["ethereum".to_string()]));

        // Footer sits on the last inner row of the panel.
        let footer_y = list.panel_area.bottom() - 2;
        assert_eq!(list.handle_mouse(click(3, footer_y), &p), Some(Vec::new()));
        assert!(list.is_open());

        list.handle_mouse(click(15, footer_y), &p);
        assert!(!list.is_open());

        draw(&mut list, &p);
        list.handle_mouse(click(5, 1), &p);
        draw(&mut list, &p);
        assert!(list.is_open());
        list.handle_mouse(click(5, 22), &p);
        assert!(!list.is_open());
    }

    #[test]
    fn clicks_follow_a_panel_clipped_by_the_terminal() {
        let options = many(50);
        let selected = Vec::new();
        let mut p = props(&options, &selected);
        p.height = 12;
        let mut list = SelectList::new();
        list.refilter(&options);
        list.open(&p);
        list.move_cursor(11, &p);

        // 18 rows leave 11 for the list instead of the requested 12.
        let terminal = draw_sized(&mut list, &p, 18);
        assert_eq!(list.list_area.height, 11);
        assert_eq!(list.rows(&p), 11);
        assert_eq!(list.offset(), 1);

        let first = screen_row(&terminal, list.list_area.y);
        assert!(first.contains("[ ] Coin 1 (CN)"), "{first}");
        let y = list.list_area.y;
        assert_eq!(list.handle_mouse(click(5, y), &p), Some(vec!["coin-1".to_string()]));

        let last = screen_row(&terminal, list.list_area.bottom() - 1);
        assert!(last.contains("[ ] Coin 11 (CN)"), "{last}");
        let y = list.list_area.bottom() - 1;
        assert_eq!(list.handle_mouse(click(5, y), &p), Some(vec!["coin-11".to_string()]));
    }

    #[test]
    fn wheel_scroll_keeps_cursor_on_screen() {
        let options = many(50);
        let selected = Vec::new();
        let p = props(&options, &selected);
        let mut list = SelectList::new();
        list.refilter(&options);
        list.open(&p);
        draw(&mut list, &p);

        for _ in 0..5 {
            list.handle_mouse(wheel(MouseEventKind::ScrollDown, 5, 8), &p);
        }
        assert_eq!(list.offset(), 5);
        assert_eq!(list.cursor(), 5);
        assert_eq!(
            list.handle_key(key(KeyCode::Enter), &p),
            Some(vec!["coin-5".to_string()])
        );

        list.move_cursor(9, &p);
        for _ in 0..3 {
            list.handle_mouse(wheel(MouseEventKind::ScrollUp, 5, 8), &p);
        }
        assert_eq!(list.offset(), 2);
        assert_eq!(list.cursor(), 11);
    }

    #[test]
    fn renders_no_results_and_error() {
        let options = coins();
        let selected = Vec::new();
        let mut p = props(&options, &selected);
        let mut list = SelectList::new();
        list.refilter(&options);
        list.open(&p);
        list.set_query("zzz", &options);

        let terminal = draw(&mut list, &p);
        assert!(screen(&terminal).contains("No results found"));

        p.error = Some("Coin list: CoinGecko API error 500");
        let terminal = draw(&mut list, &p);
        let text = screen(&terminal);
        assert!(text.contains("CoinGecko API error 500"));
        assert!(!text.contains("No results found"));
    }

    #[test]
    fn renders_checked_rows() {
        let options = coins();
        let selected = vec!["ethereum".to_string()];
        let p = props(&options, &selected);
        let mut list = SelectList::new();
        list.refilter(&options);
        list.open(&p);

        let text = screen(&draw(&mut list, &p));
        assert!(text.contains("[x] Ethereum (ETH)"));
        assert!(text.contains("[ ] Bitcoin (BTC)"));
        assert!(text.contains("Ethereum  (1 selected)"));
    }
}
