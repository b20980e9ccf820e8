//! Terminal output: coloured messages, the doctor table and the full record view.
//!
//! The `render_*` functions build plain strings so layout can be tested; the
//! `print_*` functions add colour and write to stdout.

use colored::Colorize;
use medrepapp::api::{CmdMessage, MessageLevel};
use medrepapp::model::{Doctor, Field};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const COLUMN_GAP: &str = "  ";

/// Table columns and their maximum widths.
const COLUMNS: [(Field, usize); 6] = [
    (Field::Name, 24),
    (Field::Code, 12),
    (Field::Mobile, 14),
    (Field::CallDay, 22),
    (Field::CallTime, 9),
    (Field::Status, 15),
];
const ID_HEADER: &str = "ID";
const ID_WIDTH: usize = 26;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the table. With no rows, a single placeholder row stands in.
pub(super) fn print_table(rows: &[&Doctor], placeholder: Option<&str>, summary: Option<&str>) {
    let lines = render_table(rows, placeholder);
    let mut lines = lines.into_iter();
    if let Some(header) = lines.next() {
        println!("{}", header.bold());
    }
    for line in lines {
        if rows.is_empty() {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
    if let Some(summary) = summary {
        println!("{}", summary.dimmed());
    }
}

pub(super) fn print_record(doctor: &Doctor) {
    println!(
        "{} {}",
        doctor.id.to_string().yellow(),
        doctor.fields.name.bold()
    );
    println!("--------------------------------");
    print!("{}", render_record(doctor));
}

fn widths(rows: &[&Doctor]) -> Vec<usize> {
    let mut widths = Vec::with_capacity(COLUMNS.len() + 1);
    let id_width = rows
        .iter()
        .map(|d| d.id.as_str().width())
        .chain(std::iter::once(ID_HEADER.width()))
        .max()
        .unwrap_or(0)
        .min(ID_WIDTH);
    widths.push(id_width);

    for (field, max) in COLUMNS {
        let width = rows
            .iter()
            .map(|d| d.fields.get(field).width())
            .chain(std::iter::once(field.label().width()))
            .max()
            .unwrap_or(0)
            .min(max);
        widths.push(width);
    }
    widths
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| pad_to_width(&truncate_to_width(cell, width), width))
        .collect();
    padded.join(COLUMN_GAP).trim_end().to_string()
}

/// Header line followed by one line per row, or the placeholder line.
pub(super) fn render_table(rows: &[&Doctor], placeholder: Option<&str>) -> Vec<String> {
    let widths = widths(rows);

    let header: Vec<String> = std::iter::once(ID_HEADER.to_string())
        .chain(COLUMNS.iter().map(|(field, _)| field.label().to_string()))
        .collect();

    let mut lines = vec![render_row(&header, &widths)];

    if rows.is_empty() {
        lines.push(placeholder.unwrap_or_default().to_string());
        return lines;
    }

    for doctor in rows {
        let cells: Vec<String> = std::iter::once(doctor.id.to_string())
            .chain(COLUMNS.iter().map(|(field, _)| doctor.fields.get(*field)))
            .collect();
        lines.push(render_row(&cells, &widths));
    }
    lines
}

/// Every field as `label: value`, one per line.
pub(super) fn render_record(doctor: &Doctor) -> String {
    let label_width = Field::ALL
        .iter()
        .map(|f| f.label().width())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for field in Field::ALL {
        let label = format!("{}:", field.label());
        out.push_str(&pad_to_width(&label, label_width + 1));
        let value = doctor.fields.get(field);
        if !value.is_empty() {
            out.push(' ');
            out.push_str(&value);
        }
        out.push('\n');
    }
    out
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
