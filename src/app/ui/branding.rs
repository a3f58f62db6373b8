use ratatui::{prelude::*, widgets::Paragraph};

use super::draw_field;
use crate::app::{BrandingField, DesignerApp};
use crate::ui::brand_color;
use crate::wizard::PrimaryColor;

pub fn draw_branding(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let mut y = area.y + 1;
    let width = area.width - 4;

    frame.render_widget(
        Paragraph::new("Visual identity")
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, width, 1),
    );
    y += 2;

    draw_field(
        frame,
        Rect::new(area.x + 2, y, width, 1),
        "Color",
        &app.color_input,
        "#RRGGBB",
        app.branding_field == BrandingField::Color,
        app,
    );
    y += 1;

    // Live swatch while the value parses
    let swatch = match app.color_input.content().parse::<PrimaryColor>() {
        Ok(color) => Line::from(vec![
            Span::styled("      ", Style::default().bg(brand_color(&color))),
            Span::styled(format!(" {color}"), app.theme.muted_style()),
        ]),
        Err(_) => Line::styled("invalid color", app.theme.error_style()),
    };
    frame.render_widget(Paragraph::new(swatch), Rect::new(area.x + 14, y, width.saturating_sub(12), 1));
    y += 2;

    draw_field(
        frame,
        Rect::new(area.x + 2, y, width, 1),
        "Logo",
        &app.logo_path,
        "(optional PNG or JPEG path)",
        app.branding_field == BrandingField::Logo,
        app,
    );
}
