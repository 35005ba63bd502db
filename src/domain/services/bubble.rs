#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::wrap_line;
use crate::domain::models::Author;
use crate::domain::models::Message;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Text,
    Heading,
    Fence,
    Code,
}

pub struct BubbleConfig {
    /// Left border + left padding + right padding + right border.
    pub border_elements_length: usize,
    /// Column kept free for the edge of the terminal.
    pub scrollbar_length: usize,
    pub outer_padding_percentage: f32,
}

/// Strips control characters so message text can never drive the terminal.
fn sanitize(text: &str) -> String {
    return text
        .chars()
        .filter(|c| return *c == '\n' || !c.is_control())
        .collect();
}

/// Text of an ATX heading: one to six `#` followed by a space or nothing.
fn heading_text(line: &str) -> Option<&str> {
    let level = line.chars().take_while(|c| return *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }

    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }

    return Some(rest.trim());
}

fn strip_inline_markers(line: &str) -> String {
    return line.replace("**", "").replace("__", "").replace('`', "");
}

/// Turns markdown text into display lines. Only block level structure is
/// interpreted, inline markers are dropped.
fn markdown_lines(text: &str) -> Vec<(LineKind, String)> {
    let mut in_codeblock = false;
    let mut lines = vec![];

    for line in sanitize(text).lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            in_codeblock = !in_codeblock;
            lines.push((LineKind::Fence, line.to_string()));
            continue;
        }

        if in_codeblock {
            lines.push((LineKind::Code, line.to_string()));
            continue;
        }

        if let Some(heading) = heading_text(trimmed) {
            lines.push((LineKind::Heading, strip_inline_markers(heading)));
            continue;
        }

        let indent = &line[..line.len() - trimmed.len()];
        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| return trimmed.strip_prefix("* "))
        {
            lines.push((
                LineKind::Text,
                format!("{indent}• {}", strip_inline_markers(item)),
            ));
            continue;
        }

        lines.push((LineKind::Text, strip_inline_markers(line)));
    }

    if lines.is_empty() {
        lines.push((LineKind::Text, "".to_string()));
    }

    return lines;
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    title: &'a str,
    window_max_width: usize,
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        title: &'a str,
        alignment: BubbleAlignment,
        window_max_width: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            title,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            border_elements_length: 4,
            scrollbar_length: 1,
            outer_padding_percentage: 0.04,
        };
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let source = markdown_lines(&self.message.display_text());
        let max_line_length = self.get_max_line_length(&source);

        let mut lines = vec![];
        for (kind, text) in source {
            let style = self.line_style(kind);
            for wrapped in wrap_line(&text, max_line_length) {
                lines.push(self.spans_to_line(wrapped, style, max_line_length));
            }
        }

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    fn line_style(&self, kind: LineKind) -> Style {
        match kind {
            LineKind::Text => return Style::default(),
            LineKind::Heading => return Style::default().add_modifier(Modifier::BOLD),
            LineKind::Fence => return Style::default().fg(Color::DarkGray),
            LineKind::Code => return Style::default().fg(Color::Cyan),
        }
    }

    fn outer_padding(&self, bubble_length: usize) -> String {
        let count = self
            .window_max_width
            .saturating_sub(bubble_length + Bubble::style_config().scrollbar_length);
        return " ".repeat(count);
    }

    fn spans_to_line(&self, text: String, style: Style, max_line_length: usize) -> Line<'static> {
        let fill = " ".repeat(max_line_length.saturating_sub(text.chars().count()));
        let bubble_length = max_line_length + Bubble::style_config().border_elements_length;

        let mut spans = vec![];
        if self.alignment == BubbleAlignment::Right {
            spans.push(Span::from(self.outer_padding(bubble_length)));
        }
        spans.push(self.border_span("│ ".to_string()));
        spans.push(Span::styled(text, style));
        spans.push(self.border_span(format!("{fill} │")));

        return Line::from(spans);
    }

    fn get_max_line_length(&self, source: &[(LineKind, String)]) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        let line_border_width = style_config.border_elements_length
            + style_config.scrollbar_length
            + min_bubble_padding_length;

        let mut max_line_length = source
            .iter()
            .map(|(_, line)| {
                return line.chars().count();
            })
            .max()
            .unwrap_or(0);

        let available = self.window_max_width.saturating_sub(line_border_width).max(1);
        if max_line_length > available {
            max_line_length = available;
        }

        let title_length = self.title.chars().count();
        if max_line_length < title_length {
            max_line_length = title_length;
        }

        return max_line_length.max(1);
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        max_line_length: usize,
    ) -> Vec<Line<'static>> {
        let title = self.title;

        // Add 2 for the padding next to the vertical bars.
        let top_bar = format!(
            "╭{title}{}╮",
            "─".repeat(max_line_length + 2 - title.chars().count())
        );
        let bottom_bar = format!("╰{}╯", "─".repeat(max_line_length + 2));

        let bubble_length = max_line_length + Bubble::style_config().border_elements_length;
        let padding = self.outer_padding(bubble_length);

        let mut res = vec![];
        if self.alignment == BubbleAlignment::Left {
            res.push(Line::from(self.border_span(top_bar)));
            res.extend(lines);
            res.push(Line::from(self.border_span(bottom_bar)));
        } else {
            res.push(Line::from(vec![
                Span::from(padding.to_string()),
                self.border_span(top_bar),
            ]));
            res.extend(lines);
            res.push(Line::from(vec![
                Span::from(padding),
                self.border_span(bottom_bar),
            ]));
        }

        return res;
    }

    fn border_span(&self, text: String) -> Span<'static> {
        if self.message.author() == Author::Assistant {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Rgb(111, 66, 193)), // Purple
                    ..Style::default()
                },
            );
        }

        return Span::from(text);
    }
}
