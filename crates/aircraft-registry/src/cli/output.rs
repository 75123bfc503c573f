//! Text output for the `list` and `show` commands.

use std::fmt::Write as _;

use crate::error::Result;
use crate::model::Aircraft;
use crate::ui::view::{self, AircraftRow};

use super::OutputFormat;

const TABLE_HEADERS: [&str; 7] = [
    "#",
    "Name",
    "Type",
    "Registration #",
    "Manufacturer",
    "Year",
    "ID",
];

/// Format a list of records.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_list(records: &[Aircraft], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Plain => Ok(format_plain(&view::rows(records))),
        OutputFormat::Table => Ok(format_table(&view::rows(records))),
    }
}

/// Format one record.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_record(record: &Aircraft, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(record)?);
    }

    let fields = &record.fields;
    let timestamp = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map_or_else(|| "-".to_string(), |t| t.to_rfc3339())
    };
    let mut out = String::new();
    let _ = writeln!(out, "ID:            {}", record.id);
    let _ = writeln!(out, "Name:          {}", fields.aircraft_name);
    let _ = writeln!(out, "Type:          {}", fields.aircraft_type);
    let _ = writeln!(out, "Registration:  {}", fields.registration_number);
    let _ = writeln!(out, "Manufacturer:  {}", fields.manufacturer);
    let _ = writeln!(out, "Year:          {}", fields.year);
    let _ = writeln!(out, "Description:   {}", fields.description);
    let image = if record.has_image() { record.image_url.as_str() } else { "-" };
    let _ = writeln!(out, "Image:         {image}");
    let _ = writeln!(out, "Created:       {}", timestamp(record.created_at));
    let _ = write!(out, "Updated:       {}", timestamp(record.updated_at));
    Ok(out)
}

fn format_plain(rows: &[AircraftRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                row.id, row.name, row.kind, row.registration_number, row.manufacturer, row.year
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_table(rows: &[AircraftRow]) -> String {
    if rows.is_empty() {
        return "No aircraft found.".to_string();
    }

    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|row| {
            [
                row.number.to_string(),
                row.name.clone(),
                row.kind.clone(),
                row.registration_number.clone(),
                row.manufacturer.clone(),
                row.year.clone(),
                row.id.clone(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |line: &[String]| {
        line.iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = TABLE_HEADERS.iter().map(ToString::to_string).collect();
    let mut out = vec![render(&header[..])];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(cells.iter().map(|line| render(&line[..])));
    out.join("\n")
}
