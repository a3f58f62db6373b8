use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::DesignerApp;

pub fn draw_result(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let Some(result) = app.wizard.result() else {
        return;
    };
    let mut y = area.y + 1;
    let width = area.width - 4;

    frame.render_widget(
        Paragraph::new("Your contract is ready")
            .style(app.theme.success_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, width, 1),
    );
    y += 2;

    for (label, url) in [("DOCX", &result.docx_url), ("PDF", &result.pdf_url)] {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{label:<6}"), app.theme.muted_style()),
                Span::styled(url.as_str(), app.theme.secondary_style()),
            ])),
            Rect::new(area.x + 2, y, width, 1),
        );
        y += 1;
    }
    y += 1;

    if let Some(files) = &app.downloaded {
        frame.render_widget(
            Paragraph::new(format!("Saved to {}", files.docx.parent().unwrap_or(files.docx.as_path()).display()))
                .style(app.theme.muted_style()),
            Rect::new(area.x + 2, y, width, 1),
        );
        y += 2;
    }

    let download = if app.is_downloading {
        format!(" [{}] Downloading... ", app.spinner_char())
    } else {
        " [d] Download ".to_string()
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                download,
                app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
            Span::raw("  "),
            Span::styled(" [n] New contract ", app.theme.muted_style().add_modifier(Modifier::REVERSED)),
        ])),
        Rect::new(area.x + 2, y.min(area.bottom().saturating_sub(1)), width, 1),
    );
}
