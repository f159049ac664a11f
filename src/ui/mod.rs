mod theme;

use crate::app::{AppModel, FilesState, SelectorOverlay};
use crate::domain::{Row as RecordRow, Selection};
use ratatui::prelude::*;
use ratatui::widgets::*;
use unicode_width::UnicodeWidthStr;

const COLUMNS: [&str; 4] = ["File Name", "Text", "Number", "Hex"];
pub const LOADING_TEXT: &str = "Loading...";
pub const NO_DATA_TEXT: &str = "No data";

/// What the table body shows, in priority order: loading, rows, empty.
#[derive(Debug, Eq, PartialEq)]
pub enum TableBody<'a> {
    Loading,
    Rows(&'a [RecordRow]),
    Empty,
}

pub fn table_body(state: &FilesState) -> TableBody<'_> {
    if state.loading {
        return TableBody::Loading;
    }
    if state.rows.is_empty() {
        TableBody::Empty
    } else {
        TableBody::Rows(&state.rows)
    }
}

pub fn render(frame: &mut Frame, model: &mut AppModel) {
    let full_area = frame.area();
    if full_area.width == 0 || full_area.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(full_area);

    render_title_bar(frame, chunks[0], model);
    render_selector(frame, chunks[1], model);
    render_table(frame, chunks[2], model);
    render_footer(frame, chunks[3], model);

    if let Some(selector) = &model.selector {
        render_selector_overlay(frame, chunks[1], full_area, model, selector);
    }

    if model.help_open {
        render_help_overlay(frame, full_area, model);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let base_style = Style::default().fg(theme::FG).bg(theme::BAR_BG);
    let title = format!(" {} ", env!("CARGO_PKG_NAME"));
    let title_style = Style::default()
        .fg(theme::ACCENT)
        .bg(theme::BAR_BG)
        .add_modifier(Modifier::BOLD);

    let used = UnicodeWidthStr::width(title.as_str()) + 2;
    let url = truncate_end(&model.api_url, (area.width as usize).saturating_sub(used));
    let remaining = (area.width as usize)
        .saturating_sub(used)
        .saturating_sub(UnicodeWidthStr::width(url.as_str()));

    let spans = vec![
        Span::styled(title, title_style),
        Span::styled("  ".to_string(), base_style),
        Span::styled(url, Style::default().fg(theme::MUTED).bg(theme::BAR_BG)),
        Span::styled(" ".repeat(remaining), base_style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)).style(base_style), area);
}

fn render_selector(frame: &mut Frame, area: Rect, model: &AppModel) {
    let border = if model.selector.is_some() {
        theme::ACCENT
    } else {
        theme::BORDER
    };
    let line = Line::from(vec![
        Span::styled("File: ", Style::default().fg(theme::MUTED)),
        Span::styled(
            model.state.selected.label().to_string(),
            Style::default().fg(theme::FG).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▾", Style::default().fg(theme::DIM)),
        Span::styled(
            format!("   {} file(s)", model.state.files.len()),
            Style::default().fg(theme::DIM),
        ),
    ]);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .padding(Padding::horizontal(1))
            .title("Select a file"),
    );
    frame.render_widget(paragraph, area);
}

fn render_table(frame: &mut Frame, area: Rect, model: &mut AppModel) {
    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(4),
        Constraint::Length(12),
        Constraint::Fill(2),
    ];
    let header = Row::new(COLUMNS.iter().map(|column| Cell::from(*column))).style(
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    );

    let body = table_body(&model.state);
    let title = match &body {
        TableBody::Rows(rows) => format!("Rows · {}", rows.len()),
        _ => "Rows".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .padding(Padding::horizontal(1))
        .title(title);

    match body {
        TableBody::Loading => {
            frame.render_widget(placeholder_table(LOADING_TEXT, header, block, widths), area)
        }
        TableBody::Empty => {
            frame.render_widget(placeholder_table(NO_DATA_TEXT, header, block, widths), area)
        }
        TableBody::Rows(rows) => {
            let table = Table::new(
                rows.iter().enumerate().map(|(index, row)| record_row(index, row)),
                widths,
            )
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(theme::FG)
                    .bg(theme::ACCENT_BG)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

            let selected = model.table_selected.min(rows.len().saturating_sub(1));
            let mut state = TableState::default()
                .with_offset(model.table_offset)
                .with_selected(Some(selected));
            frame.render_stateful_widget(table, area, &mut state);
            model.table_offset = state.offset();
        }
    }
}

fn placeholder_table<'a>(
    text: &'a str,
    header: Row<'a>,
    block: Block<'a>,
    widths: [Constraint; 4],
) -> Table<'a> {
    let row = Row::new(vec![Cell::from(text)]).style(Style::default().fg(theme::MUTED));
    Table::new(vec![row], widths).header(header).block(block)
}

fn record_row(index: usize, row: &RecordRow) -> Row<'static> {
    let style = if index % 2 == 1 {
        Style::default().bg(theme::ROW_ALT)
    } else {
        Style::default()
    };
    Row::new(vec![
        Cell::from(row.file_name.clone()),
        Cell::from(row.text.clone()),
        Cell::from(Line::from(row.number.to_string()).alignment(Alignment::Right)),
        Cell::from(row.hex.clone()),
    ])
    .style(style)
}

fn render_footer(frame: &mut Frame, area: Rect, model: &AppModel) {
    let separator = || Span::styled("  ·  ", Style::default().fg(theme::DIM));
    let mut spans: Vec<Span<'static>> = Vec::new();

    if let Some(error) = &model.state.error {
        spans.push(Span::styled(
            error.clone(),
            Style::default().fg(theme::ERROR),
        ));
    }
    if let Some(notice) = model.notice.as_deref().filter(|notice| !notice.trim().is_empty()) {
        if !spans.is_empty() {
            spans.push(separator());
        }
        spans.push(Span::styled(
            notice.to_string(),
            Style::default().fg(theme::MUTED),
        ));
    }
    if let Some(loaded_at) = model.state.loaded_at {
        if !spans.is_empty() {
            spans.push(separator());
        }
        spans.push(Span::styled(
            format!(
                "loaded {:02}:{:02}:{:02} UTC",
                loaded_at.hour(),
                loaded_at.minute(),
                loaded_at.second()
            ),
            Style::default().fg(theme::SUCCESS),
        ));
    }

    if !spans.is_empty() {
        spans.push(separator());
    }
    spans.push(Span::styled(
        "Keys: Enter=choose file  arrows=scroll  r=refresh  F1/?=help  q=quit",
        Style::default().fg(theme::DIM),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn selector_entries(files: &[String]) -> Vec<String> {
    std::iter::once(Selection::All.label().to_string())
        .chain(files.iter().cloned())
        .collect()
}

fn render_selector_overlay(
    frame: &mut Frame,
    anchor: Rect,
    bounds: Rect,
    model: &AppModel,
    selector: &SelectorOverlay,
) {
    let entries = selector_entries(&model.state.files);
    let widest = entries
        .iter()
        .map(|entry| UnicodeWidthStr::width(entry.as_str()))
        .max()
        .unwrap_or(0);

    let x = anchor.x.saturating_add(2).min(bounds.right().saturating_sub(1));
    let y = anchor.y.saturating_add(2).min(bounds.bottom().saturating_sub(1));
    let max_width = bounds.right().saturating_sub(x);
    let max_height = bounds.bottom().saturating_sub(y);
    let desired_width = u16::try_from(widest.saturating_add(6).max(24)).unwrap_or(u16::MAX);
    let desired_height = u16::try_from(entries.len().saturating_add(2)).unwrap_or(u16::MAX);
    let popup = Rect {
        x,
        y,
        width: desired_width.min(max_width),
        height: desired_height.min(max_height),
    };
    if popup.width == 0 || popup.height == 0 {
        return;
    }

    let current = model.state.selected.as_value();
    let items: Vec<ListItem> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let chosen = if index == 0 {
                current.is_empty()
            } else {
                entry == current
            };
            let marker = if chosen { "● " } else { "  " };
            ListItem::new(format!("{marker}{entry}"))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::ACCENT))
                .style(Style::default().bg(theme::SURFACE))
                .title("Files"),
        )
        .highlight_style(
            Style::default()
                .fg(theme::FG)
                .bg(theme::ACCENT_BG)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(Some(selector.highlighted));
    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut state);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, model: &AppModel) {
    let popup = centered_rect(70, 60, area);
    frame.render_widget(Clear, popup);

    let mut text = vec![
        Line::from("Table"),
        Line::from("  - Arrows / PgUp / PgDn / Home / End: move through rows"),
        Line::from("  - Enter or f: choose a file"),
        Line::from("  - r or Ctrl+R: refresh the file list"),
        Line::from(""),
        Line::from("File chooser"),
        Line::from("  - Arrows: move, Enter: show that file, Esc: close"),
        Line::from("  - \"All files\" loads every listed file in order"),
        Line::from(""),
        Line::from("Global"),
        Line::from("  - q, Ctrl+Q or Ctrl+C: quit"),
        Line::from("  - F1 or ?: toggle this help"),
    ];
    if let Some(path) = &model.log_path {
        text.push(Line::from(""));
        text.push(Line::from(format!("Log file: {}", path.display())));
    }

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1))
            .title("Help (F1 or ? to close)"),
    );
    frame.render_widget(paragraph, popup);
}

fn truncate_end(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let ellipsis = "…";
    let available = max_width.saturating_sub(UnicodeWidthStr::width(ellipsis));
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + width > available {
            break;
        }
        used += width;
        out.push(ch);
    }
    out.push_str(ellipsis);
    out
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
