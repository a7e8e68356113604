//! Terminal colorization for calculator output
//!
//! Applies ANSI escape codes to the LCD frame and error notices using crossterm.

use crossterm::style::{Color, Stylize};

/// Colorize a rendered LCD frame
///
/// - Frame border: Cyan
/// - Operator glyphs: Yellow
/// - Digits and the decimal point: Green
pub fn colorize_frame(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2); // Extra space for ANSI codes
    let lines: Vec<&str> = input.lines().collect();
    let last = lines.len().saturating_sub(1);

    for (i, line) in lines.iter().enumerate() {
        if i == 0 || i == last {
            result.push_str(&format!("{}", line.to_string().with(Color::Cyan)));
        } else {
            result.push_str(&colorize_display_line(line));
        }
        result.push('\n');
    }

    // Remove trailing newline to match input format
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Colorize the middle frame line, where only the first and last characters
/// are border bars
fn colorize_display_line(line: &str) -> String {
    let count = line.chars().count();
    line.chars()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 || i + 1 == count {
                format!("{}", c.to_string().with(Color::Cyan))
            } else {
                colorize_display_char(c)
            }
        })
        .collect()
}

fn colorize_display_char(c: char) -> String {
    match c {
        '+' | '-' | 'x' | '÷' | '%' => format!("{}", c.to_string().with(Color::Yellow)),
        '0'..='9' | '.' => format!("{}", c.to_string().with(Color::Green)),
        _ => c.to_string(),
    }
}

/// Colorize an error notice
pub fn colorize_error(message: &str) -> String {
    format!("{}", message.to_string().with(Color::Red))
}
