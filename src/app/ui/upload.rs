use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::{buffer_lines, draw_field};
use crate::app::{DesignerApp, UploadSource};

pub fn draw_upload(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let mut y = area.y + 1;

    frame.render_widget(
        Paragraph::new("Contract content")
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, area.width - 4, 1),
    );
    y += 2;

    // Source tabs
    let tab = |label: &'static str, source: UploadSource| {
        if app.upload_source == source {
            Span::styled(label, app.theme.primary_style().add_modifier(Modifier::REVERSED))
        } else {
            Span::styled(label, app.theme.muted_style())
        }
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            tab(" Paste text ", UploadSource::Text),
            Span::raw("  "),
            tab(" .docx file ", UploadSource::Docx),
        ])),
        Rect::new(area.x + 2, y, area.width - 4, 1),
    );
    y += 2;

    let body = Rect::new(area.x + 2, y, area.width - 4, area.bottom().saturating_sub(y + 1));
    match app.upload_source {
        UploadSource::Text => draw_text_area(frame, body, app),
        UploadSource::Docx => {
            draw_field(
                frame,
                body,
                "File",
                &app.docx_path,
                "(path to a .docx file)",
                true,
                app,
            );
            frame.render_widget(
                Paragraph::new("Only Word documents (.docx) are accepted")
                    .style(app.theme.muted_style()),
                Rect::new(body.x, body.y + 2, body.width, 1),
            );
        }
    }
}

fn draw_text_area(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let buffer = &app.contract_text;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(format!(" {} chars ", buffer.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if buffer.is_empty() && !app.vim_mode.is_editing() {
        frame.render_widget(
            Paragraph::new("Press i and paste the contract text").style(app.theme.muted_style()),
            inner,
        );
        return;
    }

    // Keep the cursor line visible
    let (cursor_line, _) = buffer.cursor_position();
    let height = inner.height as usize;
    let scroll = (cursor_line + 1).saturating_sub(height);

    let lines = buffer_lines(buffer, true, app.vim_mode, &app.theme);
    frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);
}
