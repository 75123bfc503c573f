//! HTML rendering for the UI pages.
//!
//! Every interpolated value goes through [`escape`].

use std::fmt::Write as _;

use super::view::{AircraftRow, FormView};
use super::{FORM_SCRIPT_PATH, LIST_PAGE_PATH, LIST_SCRIPT_PATH};

/// Text shown in the table when there are no records.
pub const EMPTY_TABLE_TEXT: &str = "No aircraft found.";

const TABLE_COLUMNS: [&str; 8] = [
    "#",
    "Name",
    "Type",
    "Registration #",
    "Manufacturer",
    "Year",
    "Date Added",
    "Actions",
];

/// Escape text for use in HTML content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str, script: Option<&str>) -> String {
    let script = script
        .map(|src| format!(r#"<script src="{}" defer></script>"#, escape(src)))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<main>
{body}
</main>
{script}
</body>
</html>
"#,
        title = escape(title),
    )
}

/// The aircraft list page.
#[must_use]
pub fn list_page(rows: &[AircraftRow]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Aircraft Registry</h1>\n");
    body.push_str(r#"<div id="banner" role="status" hidden></div>"#);
    body.push('\n');
    body.push_str(r#"<p><a href="/aircraft/create" class="button">+ Add New Aircraft</a></p>"#);
    body.push_str("\n<table>\n<thead><tr>");
    for column in TABLE_COLUMNS {
        let _ = write!(body, "<th>{}</th>", escape(column));
    }
    body.push_str("</tr></thead>\n");
    let _ = write!(
        body,
        r#"<tbody id="aircraft-rows" data-source="{}">{}</tbody>"#,
        escape(&format!("{LIST_PAGE_PATH}/rows")),
        table_rows(rows)
    );
    body.push_str("\n</table>");
    page("Aircraft Registry", &body, Some(LIST_SCRIPT_PATH))
}

/// The table body, also served alone to refresh the list after a delete.
#[must_use]
pub fn table_rows(rows: &[AircraftRow]) -> String {
    if rows.is_empty() {
        return format!(
            r#"<tr><td colspan="{}">{}</td></tr>"#,
            TABLE_COLUMNS.len(),
            EMPTY_TABLE_TEXT
        );
    }

    let mut out = String::new();
    for row in rows {
        let id = escape(&row.id);
        let _ = write!(
            out,
            concat!(
                r#"<tr data-id="{id}">"#,
                "<td>{number}</td><td>{name}</td><td>{kind}</td><td>{registration}</td>",
                "<td>{manufacturer}</td><td>{year}</td><td>{date}</td>",
                r#"<td><a href="/aircraft/{id}/edit">Edit</a> "#,
                r#"<button type="button" data-delete="{id}">Delete</button></td>"#,
                "</tr>\n",
            ),
            id = id,
            number = row.number,
            name = escape(&row.name),
            kind = escape(&row.kind),
            registration = escape(&row.registration_number),
            manufacturer = escape(&row.manufacturer),
            year = escape(&row.year),
            date = escape(&row.date_added),
        );
    }
    out
}

/// The create or edit form page.
#[must_use]
pub fn form_page(view: &FormView) -> String {
    let (title, action, method, submit) = match &view.id {
        Some(id) => (
            "Edit Aircraft",
            format!("/api/aircraft/{id}"),
            "PUT",
            "Update Aircraft",
        ),
        None => (
            "Add New Aircraft",
            "/api/aircraft".to_string(),
            "POST",
            "Save Aircraft",
        ),
    };
    let fields = &view.fields;

    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(title));
    let _ = writeln!(
        body,
        "<form id=\"aircraft-form\" data-action=\"{}\" data-method=\"{}\" \
         data-redirect=\"{}\" enctype=\"multipart/form-data\">",
        escape(&action),
        method,
        LIST_PAGE_PATH,
    );
    body.push_str(&text_input("Aircraft Name", "aircraftName", &fields.aircraft_name, true));
    body.push_str(&text_input("Aircraft Type", "aircraftType", &fields.aircraft_type, true));
    body.push_str(&text_input(
        "Registration Number",
        "registrationNumber",
        &fields.registration_number,
        true,
    ));
    body.push_str(&text_input("Manufacturer", "manufacturer", &fields.manufacturer, true));
    body.push_str(&text_input("Year", "year", &fields.year, true));
    let _ = writeln!(
        body,
        r#"<label>Description <textarea name="description" rows="4">{}</textarea></label>"#,
        escape(&fields.description)
    );
    let _ = writeln!(
        body,
        r#"<input type="hidden" name="existingImage" value="{}">"#,
        escape(&view.image_url)
    );
    body.push_str(concat!(
        r#"<div id="drop-zone" tabindex="0">"#,
        "<p>Drag and drop an image here, or click to browse</p>",
        r#"<input type="file" name="image" accept=".jpg,.jpeg,.png" hidden>"#,
        r#"<p id="selected-file"></p>"#,
        "</div>\n",
    ));
    if !view.image_url.is_empty() {
        let _ = writeln!(
            body,
            r#"<img id="current-image" src="{}" alt="Current aircraft image" width="240">"#,
            escape(&view.image_url)
        );
    }
    let _ = writeln!(
        body,
        r#"<p><button type="submit">{}</button> <a href="{}">Cancel</a></p>"#,
        escape(submit),
        LIST_PAGE_PATH
    );
    body.push_str("</form>");

    page(title, &body, Some(FORM_SCRIPT_PATH))
}

fn text_input(label: &str, name: &str, value: &str, required: bool) -> String {
    format!(
        "<label>{} <input type=\"text\" name=\"{}\" value=\"{}\"{}></label>\n",
        escape(label),
        escape(name),
        escape(value),
        if required { " required" } else { "" }
    )
}

/// Page shown for an unknown record.
#[must_use]
pub fn not_found_page() -> String {
    page(
        "Aircraft not found",
        &format!(
            r#"<h1>Aircraft not found</h1>
<p><a href="{LIST_PAGE_PATH}">Back to the list</a></p>"#
        ),
        None,
    )
}

/// Page shown when loading data fails.
#[must_use]
pub fn error_page(message: &str) -> String {
    page(
        "Something went wrong",
        &format!(
            r#"<h1>Something went wrong</h1>
<p>{}</p>
<p><a href="{LIST_PAGE_PATH}">Back to the list</a></p>"#,
            escape(message)
        ),
        None,
    )
}
