//! Extract lesson records from an Untis substitution page.
//!
//! A page holds one or more days. Each day has a `.mon_title` ("18.10.2026
//! Montag, Woche A"), a `table.mon_head` containing "Stand: <timestamp>" and
//! a `table.mon_list` with the actual rows. The n-th list belongs to the n-th
//! title and header.

use super::columns::{ColumnMapping, CLASS};
use super::record::{LessonRecord, EMPTY_CELL, PLACEHOLDER};
use crate::error::{DsbError, Result};
use scraper::{ElementRef, Html, Selector};

const UPDATED_MARKER: &str = "Stand: ";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DsbError::DocumentParse(format!("Bad selector {}: {:?}", css, e)))
}

fn text_of(element: ElementRef) -> String {
    element.text().collect()
}

/// `(date, day)` from a day title.
fn parse_title(title: &str) -> Result<(String, String)> {
    let mut tokens = title.split_whitespace();
    let (Some(date), Some(day)) = (tokens.next(), tokens.next()) else {
        return Err(DsbError::DocumentParse(format!("Cannot read date and day from title {:?}", title)));
    };

    Ok((date.to_string(), day.trim_end_matches(',').to_string()))
}

/// The timestamp after "Stand: " in a header block.
fn parse_updated(header: &str) -> Result<String> {
    let (_, rest) = header
        .split_once(UPDATED_MARKER)
        .ok_or(DsbError::DocumentParse("Header has no update time".to_string()))?;
    let updated = rest.lines().next().unwrap_or("").trim();

    Ok(updated.to_string())
}

fn cell_value(raw: &str, value: &str) -> String {
    if raw == EMPTY_CELL {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

/// Records for one table row, one per class in the class cell.
///
/// A row that is too short to have the class cell breaks the document.
fn row_records(
    cells: &[String],
    mapping: &ColumnMapping,
    date: &str,
    day: &str,
    updated: &str,
) -> Result<Vec<LessonRecord>> {
    let classes: Vec<&str> = match mapping.class_index() {
        Some(i) => cells
            .get(i)
            .ok_or(DsbError::DocumentParse(format!(
                "Row has {} cells, the class is in cell {}",
                cells.len(),
                i
            )))?
            .split(", ")
            .collect(),
        None => vec![PLACEHOLDER],
    };

    let records: Vec<LessonRecord> = classes
        .into_iter()
        .map(|class| {
            let mut record = LessonRecord::new(date, day, updated);
            for (i, raw) in cells.iter().enumerate() {
                let attribute = mapping.attribute(i);
                let value = if attribute == CLASS {
                    cell_value(raw, class)
                } else {
                    cell_value(raw, raw)
                };
                record.insert(attribute, value);
            }
            record
        })
        .collect();

    Ok(records)
}

/// Parse every day table of a substitution page.
pub fn parse_timetable(html: &str, mapping: &ColumnMapping) -> Result<Vec<LessonRecord>> {
    let document = Html::parse_document(html);

    let list_selector = selector("table.mon_list")?;
    let title_selector = selector(".mon_title")?;
    let head_selector = selector("table.mon_head")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let titles: Vec<ElementRef> = document.select(&title_selector).collect();
    let heads: Vec<ElementRef> = document.select(&head_selector).collect();

    let mut results = Vec::new();
    for (ind, table) in document.select(&list_selector).enumerate() {
        let title = titles
            .get(ind)
            .ok_or(DsbError::DocumentParse(format!("No title for table {}", ind)))?;
        let head = heads
            .get(ind)
            .ok_or(DsbError::DocumentParse(format!("No header for table {}", ind)))?;

        let (date, day) = parse_title(&text_of(*title))?;
        let updated = parse_updated(&text_of(*head))?;

        // 第一行是表头
        for row in table.select(&row_selector).skip(1) {
            let cells: Vec<String> = row.select(&cell_selector).map(text_of).collect();
            if cells.len() < 2 {
                continue;
            }
            results.extend(row_records(&cells, mapping, &date, &day, &updated)?);
        }
    }

    Ok(results)
}
