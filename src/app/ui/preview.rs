use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::human_size;
use crate::app::DesignerApp;
use crate::wizard::ContractContent;

const EXCERPT_LINES: usize = 8;

pub fn draw_preview(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let config = app.wizard.config();
    let mut y = area.y + 1;
    let width = area.width - 4;

    let rows = [
        (
            "Content",
            match &config.content {
                Some(ContractContent::Text(text)) => {
                    format!("pasted text, {} chars", text.chars().count())
                }
                Some(ContractContent::File(file)) => {
                    format!("{} ({})", file.name, human_size(file.len()))
                }
                None => "missing".to_string(),
            },
        ),
        ("Color", config.primary_color.to_string()),
        (
            "Logo",
            config
                .logo
                .as_ref()
                .map(|logo| format!("{} ({})", logo.name, human_size(logo.len())))
                .unwrap_or_else(|| "none".to_string()),
        ),
    ];

    for (label, value) in rows {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{label:<10}"), app.theme.muted_style()),
                Span::styled(value, app.theme.style()),
            ])),
            Rect::new(area.x + 2, y, width, 1),
        );
        y += 1;
    }
    y += 1;

    // Document mock-up in the brand color
    let page = Rect::new(area.x + 2, y, width, area.bottom().saturating_sub(y + 1));
    if page.height < 3 {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.brand_style())
        .title(Span::styled(
            " CONTRATO ",
            app.theme.brand_style().add_modifier(Modifier::BOLD),
        ));

    let excerpt: Vec<Line> = match &config.content {
        Some(ContractContent::Text(text)) => text
            .lines()
            .take(EXCERPT_LINES)
            .map(|line| Line::styled(line.to_string(), app.theme.style()))
            .collect(),
        Some(ContractContent::File(file)) => vec![Line::styled(
            format!("Formatted from {}", file.name),
            app.theme.muted_style(),
        )],
        None => Vec::new(),
    };

    frame.render_widget(
        Paragraph::new(excerpt).block(block).wrap(Wrap { trim: false }),
        page,
    );
}
