use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::DesignerApp;
use crate::submission::StageStatus;

pub fn draw_processing(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let mut y = area.y + 1;
    let width = area.width - 4;

    frame.render_widget(
        Paragraph::new("Formatting your contract")
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, width, 1),
    );
    y += 2;

    for stage in &app.snapshot.stages {
        let (status_char, style) = match stage.status {
            StageStatus::Pending => (' ', app.theme.muted_style()),
            StageStatus::Running => (app.spinner_char(), app.theme.primary_style()),
            StageStatus::Success => ('x', app.theme.success_style()),
        };
        frame.render_widget(
            Paragraph::new(format!("  [{status_char}] {}", stage.label)).style(style),
            Rect::new(area.x + 2, y, width, 1),
        );
        y += 1;
    }

    if let Some(error) = &app.snapshot.error {
        y += 1;
        frame.render_widget(
            Paragraph::new(error.as_str()).style(app.theme.error_style()),
            Rect::new(area.x + 2, y, width, 1),
        );
        y += 2;
        frame.render_widget(
            Paragraph::new(" [r] Start over ")
                .style(app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)),
            Rect::new(area.x + 2, y.min(area.bottom().saturating_sub(1)), 16, 1),
        );
    }
}
