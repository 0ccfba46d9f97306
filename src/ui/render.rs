use chrono::DateTime;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::app::{select_props, App};
use crate::types::*;

pub fn draw(f: &mut Frame, app: &mut App) {
    // Fill background
    let bg_block = Block::default().style(Style::default().bg(app.theme.bg));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // top bar
            Constraint::Length(3), // coin picker trigger
            Constraint::Min(5),    // main
            Constraint::Length(1), // bottom bar
        ])
        .split(f.area());

    draw_top_bar(f, app, chunks[0]);

    let props = select_props(&app.stores, &app.selection, &app.config);
    app.selector.render_trigger(f, chunks[1], &props, &app.theme);

    match app.tab {
        Tab::Prices => draw_prices(f, app, chunks[2]),
        Tab::Charts => draw_charts(f, app, chunks[2]),
    }
    draw_bottom_bar(f, app, chunks[3]);

    // Picker panel overlays the main area, so it goes last.
    let props = select_props(&app.stores, &app.selection, &app.config);
    app.selector.render_panel(f, &props, &app.theme);
}

// -- Top bar --

fn draw_top_bar(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    let mut spans: Vec<Span> = vec![
        Span::styled(
            " coinboard ",
            Style::default().fg(t.title).add_modifier(Modifier::BOLD),
        ),
        Span::styled("\u{2502} ", Style::default().fg(t.dim)),
    ];

    for (i, tab) in [Tab::Prices, Tab::Charts].iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" \u{b7} ", Style::default().fg(t.dim)));
        }
        let style = if tab.index() == app.tab.index() {
            Style::default().fg(t.title).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.dim)
        };
        spans.push(Span::styled(tab.label(), style));
    }

    spans.push(Span::styled(
        format!(" \u{2502} {}", app.config.currency.to_uppercase()),
        Style::default().fg(t.accent),
    ));

    // Right-align refresh info
    let busy = app.stores.prices.loading || app.stores.charts.loading;
    let refresh_info = if busy {
        "loading...".to_string()
    } else {
        app.last_refresh_display.clone()
    };

    if !refresh_info.is_empty() {
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let pad = (area.width as usize).saturating_sub(used + refresh_info.len() + 1);
        if pad > 0 {
            spans.push(Span::raw(" ".repeat(pad)));
        }
        spans.push(Span::styled(refresh_info, Style::default().fg(t.dim)));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(t.border)),
    );
    f.render_widget(bar, area);
}

// -- Prices page --

fn draw_prices(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let prices = &app.stores.prices;

    if app.selection.is_empty() {
        let p = Paragraph::new("  No coins selected. Press o to pick coins.")
            .style(Style::default().fg(t.dim));
        f.render_widget(p, area);
        return;
    }

    if prices.data.is_empty() {
        let msg = if prices.loading {
            Paragraph::new("  Fetching prices...").style(Style::default().fg(t.dim))
        } else if let Some(ref err) = prices.error {
            Paragraph::new(format!("  Error: {}", err)).style(Style::default().fg(t.error))
        } else {
            Paragraph::new("  No data.").style(Style::default().fg(t.dim))
        };
        f.render_widget(msg, area);
        return;
    }

    let currency = app.config.currency.as_str();
    let header = Row::new(
        ["#", "Name", "Ticker", "Price", "24h%"]
            .into_iter()
            .map(|h| Cell::from(h).style(Style::default().fg(t.dim))),
    )
    .height(1);

    let rows: Vec<Row> = app
        .selection
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let (name, ticker) = match app.coin(id) {
                Some(c) => (c.name.clone(), c.ticker()),
                None => (id.clone(), String::new()),
            };
            let price = prices
                .price(id, currency)
                .map(|p| format!("{}{}", currency_symbol(currency), format_price(p)))
                .unwrap_or_else(|| "--".into());
            let change = prices.change_24h(id, currency);

            let style = if i == app.selected {
                Style::default().bg(t.highlight_bg).fg(t.highlight_fg)
            } else {
                Style::default().bg(t.bg)
            };

            Row::new(vec![
                Cell::from((i + 1).to_string()).style(Style::default().fg(t.dim)),
                Cell::from(name).style(Style::default().fg(t.fg)),
                Cell::from(ticker).style(Style::default().fg(t.accent)),
                Cell::from(price).style(Style::default().fg(t.fg)),
                pct_cell(change, &format_pct(change), t.positive, t.negative, t.dim),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(14),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE))
        .column_spacing(1);
    f.render_widget(table, area);
}

// -- Charts page --

fn draw_charts(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let charts = &app.stores.charts;

    if app.selection.is_empty() {
        let p = Paragraph::new("  No coins selected. Press o to pick coins.")
            .style(Style::default().fg(t.dim));
        f.render_widget(p, area);
        return;
    }

    let (ids, rows) = app.chart_rows();
    if rows.is_empty() {
        let msg = if charts.loading {
            Paragraph::new("  Loading chart data...").style(Style::default().fg(t.dim))
        } else if let Some(ref err) = charts.error {
            Paragraph::new(format!("  Error: {}", err)).style(Style::default().fg(t.error))
        } else {
            Paragraph::new("  No price data available. Press r to reload.")
                .style(Style::default().fg(t.dim))
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // per-series stats
            Constraint::Min(3),    // chart
        ])
        .split(area);

    let percent = app.chart_scale == ChartScale::Percent;
    let first = &rows[0];
    let last = &rows[rows.len() - 1];

    let mut stats: Vec<Span> = Vec::new();
    for (j, id) in ids.iter().enumerate() {
        let start = first.values[j].1;
        let end = last.values[j].1;
        let change = if percent {
            end
        } else if start != 0.0 {
            (end - start) / start * 100.0
        } else {
            0.0
        };
        let color = if change >= 0.0 { t.positive } else { t.negative };
        stats.push(Span::styled(
            format!(" {} ", app.coin_label(id)),
            Style::default().fg(t.series_color(j)).add_modifier(Modifier::BOLD),
        ));
        if !percent {
            stats.push(Span::styled(
                format!("{} ", format_price(end)),
                Style::default().fg(t.fg),
            ));
        }
        stats.push(Span::styled(format_pct(Some(change)), Style::default().fg(color)));
        stats.push(Span::raw("  "));
    }
    f.render_widget(Paragraph::new(Line::from(stats)), chunks[0]);

    let points: Vec<Vec<(f64, f64)>> = (0..ids.len())
        .map(|j| {
            rows.iter()
                .enumerate()
                .map(|(i, row)| (i as f64, row.values[j].1))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = ids
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(j, (id, data))| {
            Dataset::default()
                .name(app.coin_label(id))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(t.series_color(j)))
                .data(data)
        })
        .collect();

    let (lo, hi) = crate::chart::bounds(&rows).unwrap_or((0.0, 1.0));
    let pad = ((hi - lo) * 0.05).max(f64::EPSILON);
    let (lo, hi) = (lo - pad, hi + pad);
    let y_label = |v: f64| {
        if percent {
            format_pct(Some(v))
        } else {
            format_price(v)
        }
    };

    let x_max = (rows.len() - 1).max(1) as f64;
    let mid = &rows[rows.len() / 2];

    let title = format!(
        " {} \u{b7} {} \u{b7} h/l range \u{b7} p scale ",
        app.chart_view.label(),
        app.chart_scale.label()
    );

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.border)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(t.dim))
                .bounds([0.0, x_max])
                .labels([
                    format_time(first.timestamp, app.chart_view),
                    format_time(mid.timestamp, app.chart_view),
                    format_time(last.timestamp, app.chart_view),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(t.dim))
                .bounds([lo, hi])
                .labels([y_label(lo), y_label((lo + hi) / 2.0), y_label(hi)]),
        );
    f.render_widget(chart, chunks[1]);
}

// -- Bottom bar --

fn draw_bottom_bar(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    let hints = if app.selector.is_open() {
        " type to search | \u{2191}\u{2193} move | Enter toggle | Ctrl-x clear | Esc done "
    } else {
        match app.tab {
            Tab::Prices => " o pick | j/k \u{2195} | x remove | Tab \u{21c6} | r refresh | q quit ",
            Tab::Charts => " o pick | h/l range | p scale | Tab \u{21c6} | r refresh | q quit ",
        }
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(t.dim))];

    let errors = [&app.stores.prices.error, &app.stores.charts.error];
    for err in errors.into_iter().flatten() {
        spans.push(Span::styled(
            format!(" \u{2502} {}", err),
            Style::default().fg(t.error),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// -- Helpers --

fn format_time(ts_ms: f64, view: ChartView) -> String {
    let fmt = match view {
        ChartView::Day1 => "%H:%M",
        ChartView::Day7 | ChartView::Day30 => "%m-%d",
    };
    DateTime::from_timestamp_millis(ts_ms as i64)
        .map(|d| d.format(fmt).to_string())
        .unwrap_or_default()
}

pub fn format_price(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    let v = v.abs();
    let body = if v >= 1.0 {
        add_commas(&format!("{:.2}", v))
    } else if v >= 0.01 {
        format!("{:.4}", v)
    } else if v > 0.0 {
        format!("{:.6}", v)
    } else {
        "0.00".to_string()
    };
    format!("{}{}", sign, body)
}

pub fn format_pct(v: Option<f64>) -> String {
    match v {
        Some(p) => {
            let sign = if p >= 0.0 { "+" } else { "" };
            format!("{}{:.1}%", sign, p)
        }
        None => "--".to_string(),
    }
}

fn pct_cell(v: Option<f64>, formatted: &str, positive: Color, negative: Color, dim: Color) -> Cell<'static> {
    let color = match v {
        Some(p) if p > 0.0 => positive,
        Some(p) if p < 0.0 => negative,
        _ => dim,
    };
    Cell::from(formatted.to_string()).style(Style::default().fg(color))
}

fn add_commas(s: &str) -> String {
    let (int_part, frac) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    let mut result = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let int_formatted: String = result.chars().rev().collect();
    match frac {
        Some(f) => format!("{}.{}", int_formatted, f),
        None => int_formatted,
    }
}
