mod branding;
mod preview;
mod processing;
mod result;
mod upload;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::DesignerApp;
use crate::ui::{Layout, Theme, center_rect};
use crate::vim::{InputBuffer, VimMode};
use crate::wizard::WizardStep;

/// Main draw function for the designer wizard
pub fn draw(frame: &mut Frame, app: &DesignerApp) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    let layout = Layout::new(area);

    draw_header(frame, layout.header, app);
    draw_sidebar(frame, layout.sidebar, app);
    draw_main_content(frame, layout.content, app);
    draw_message(frame, layout.message, app);
    draw_status_bar(frame, layout.status, app);

    if app.show_help {
        draw_help(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let title = format!(" {} (v{}) ", app.settings.general.title, env!("CARGO_PKG_VERSION"));
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    let backend = if app.is_dryrun() {
        "[dryrun] ".to_string()
    } else {
        format!("[{}] ", app.settings.api.base_url)
    };
    frame.render_widget(
        Paragraph::new(backend)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        area,
    );
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Steps ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let current = app.step().index();
    for (idx, step) in WizardStep::ALL.iter().enumerate() {
        if idx as u16 >= inner.height {
            break;
        }

        let (marker, style) = if idx < current {
            ("[x]", app.theme.secondary_style())
        } else if idx == current {
            (
                "[>]",
                app.theme
                    .primary_style()
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
        } else {
            ("[ ]", app.theme.muted_style())
        };

        frame.render_widget(
            Paragraph::new(format!(" {marker} {}", step.title())).style(style),
            Rect::new(inner.x, inner.y + idx as u16, inner.width, 1),
        );
    }
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.primary_style())
        .title(format!(" {} ", app.step().title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 6 || inner.width < 24 {
        return;
    }

    match app.step() {
        WizardStep::Upload => upload::draw_upload(frame, inner, app),
        WizardStep::Branding => branding::draw_branding(frame, inner, app),
        WizardStep::Preview => preview::draw_preview(frame, inner, app),
        WizardStep::Processing => processing::draw_processing(frame, inner, app),
        WizardStep::Result => result::draw_result(frame, inner, app),
    }
}

fn draw_message(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let Some(msg) = &app.message else {
        return;
    };

    let (title, border_style, text_style) = if msg.is_error {
        (" Error ", app.theme.error_style(), app.theme.error_style())
    } else {
        (" Info ", app.theme.secondary_style(), app.theme.style())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    frame.render_widget(
        Paragraph::new(Span::styled(msg.text.as_str(), text_style))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &DesignerApp) {
    let mode_span = Span::styled(
        format!(" {} ", app.vim_mode.display_name()),
        app.theme.mode_style(app.vim_mode),
    );

    let after_mode = if app.vim_mode == VimMode::Command {
        Span::styled(format!(":{}", app.command_buffer.content()), app.theme.style())
    } else {
        Span::styled(app.status_bar.left_hint.clone(), app.theme.muted_style())
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![mode_span, Span::raw(" "), after_mode])),
        Rect::new(area.x, area.y, area.width * 2 / 3, 1),
    );

    let step = app.step();
    let right_text = format!(
        "{}/{}  {}",
        step.index() + 1,
        WizardStep::ALL.len(),
        app.status_bar.right_hint
    );
    frame.render_widget(
        Paragraph::new(right_text.trim_end().to_string())
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        Rect::new(area.x + area.width / 3, area.y, area.width * 2 / 3, 1),
    );
}

fn draw_help(frame: &mut Frame, app: &DesignerApp) {
    let width = 60.min(frame.area().width.saturating_sub(4));
    let height = 22.min(frame.area().height.saturating_sub(4));
    let area = center_rect(frame.area(), width, height);

    let help_text = [
        "",
        "Steps:",
        "",
        "  Enter / l      Continue to the next step",
        "  h              Back (Branding, Preview)",
        "  Tab            Upload: switch text / .docx",
        "                 Branding: switch color / logo",
        "  r              Start over after a failure",
        "  d / n          Result: download / new contract",
        "",
        "Vim Modes:",
        "",
        "  i              Edit the focused field",
        "  Esc            Return to normal",
        "  :              Command mode",
        "",
        "Commands: :q :back :reset :download :help",
        "",
        "Press q or Esc to close",
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for (i, line) in help_text.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}

/// Render a buffer's lines with a vim-style cursor: `|` while inserting,
/// a reversed block while focused in normal mode.
fn buffer_lines(buffer: &InputBuffer, focused: bool, mode: VimMode, theme: &Theme) -> Vec<Line<'static>> {
    let (cursor_line, cursor_col) = buffer.cursor_position();

    buffer
        .content()
        .split('\n')
        .enumerate()
        .map(|(idx, text)| {
            if !focused || idx != cursor_line {
                return Line::styled(text.to_string(), theme.style());
            }

            let before: String = text.chars().take(cursor_col).collect();
            let at: Option<char> = text.chars().nth(cursor_col);
            let after: String = text.chars().skip(cursor_col + 1).collect();

            let mut spans = vec![Span::styled(before, theme.style())];
            if mode == VimMode::Insert {
                spans.push(Span::styled("|", theme.primary_style().add_modifier(Modifier::BOLD)));
                spans.push(Span::styled(at.map(String::from).unwrap_or_default(), theme.style()));
            } else {
                let under = at.map(String::from).unwrap_or_else(|| " ".to_string());
                spans.push(Span::styled(under, theme.style().add_modifier(Modifier::REVERSED)));
            }
            spans.push(Span::styled(after, theme.style()));
            Line::from(spans)
        })
        .collect()
}

/// One-line labelled input, in the same shape on every form
fn draw_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    buffer: &InputBuffer,
    placeholder: &str,
    focused: bool,
    app: &DesignerApp,
) {
    let label_style = if focused {
        app.theme.primary_style()
    } else {
        app.theme.style()
    };
    frame.render_widget(
        Paragraph::new(label.to_string()).style(label_style),
        Rect::new(area.x, area.y, 12.min(area.width), 1),
    );

    let field = Rect::new(area.x + 12, area.y, area.width.saturating_sub(12), 1);
    if !focused && buffer.is_empty() {
        frame.render_widget(
            Paragraph::new(placeholder.to_string()).style(app.theme.muted_style()),
            field,
        );
        return;
    }

    let lines = buffer_lines(buffer, focused, app.vim_mode, &app.theme);
    frame.render_widget(Paragraph::new(lines), field);
}

fn human_size(len: usize) -> String {
    if len >= 1024 * 1024 {
        format!("{:.1} MB", len as f64 / (1024.0 * 1024.0))
    } else if len >= 1024 {
        format!("{:.1} KB", len as f64 / 1024.0)
    } else {
        format!("{len} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_marker_only_on_cursor_line() {
        let buffer = InputBuffer::with_content("one\ntwo");
        let lines = buffer_lines(&buffer, true, VimMode::Insert, &Theme::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 1);
        let rendered: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(rendered, "two|");
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }
}
