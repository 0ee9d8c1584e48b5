//! Decoded details and additional info.
//!
//! The report page renders label/value pairs in three differently shaped
//! tables. Each shape has its own named strategy; none of them tries to
//! guess at shapes it was not written for.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use crate::error::{Error, Result};
use crate::record::{FieldMap, Section};
use crate::site;

use super::{BODY, CELL, ROW, element_text, selector};

// ============================================================================
// Selectors
// ============================================================================

static DETAILS_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector(site::DETAILS_TABLE_SELECTOR));
static STRIPED_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector(site::STRIPED_TABLE_SELECTOR));
static ADDITIONAL_INFO: LazyLock<Selector> =
    LazyLock::new(|| selector(site::ADDITIONAL_INFO_SELECTOR));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));

// ============================================================================
// Section Routines
// ============================================================================

/// Fills `fields` from both decoded-details tables.
///
/// The label-text-strip table is read first; its rows are kept even when
/// the striped table is missing.
///
/// # Errors
///
/// Returns [`Error::Extraction`] if either table is absent.
pub fn decoded_details(document: &Html, fields: &mut FieldMap) -> Result<()> {
    let details = first_body(
        document,
        &DETAILS_TABLE,
        Section::DecodedDetails,
        site::DETAILS_TABLE_SELECTOR,
    )?;
    label_text_strip(details, fields);

    let striped = first_body(
        document,
        &STRIPED_TABLE,
        Section::DecodedDetails,
        site::STRIPED_TABLE_SELECTOR,
    )?;
    two_line_split(striped, fields);

    Ok(())
}

/// Fills `fields` from the additional info table.
///
/// # Errors
///
/// Returns [`Error::Extraction`] if the table is absent or a row has no cell.
pub fn additional_info(document: &Html, fields: &mut FieldMap) -> Result<()> {
    let body = first_body(
        document,
        &ADDITIONAL_INFO,
        Section::AdditionalInfo,
        site::ADDITIONAL_INFO_SELECTOR,
    )?;
    first_cell_split(body, fields)
}

fn first_body<'a>(
    document: &'a Html,
    table: &Selector,
    section: Section,
    css: &str,
) -> Result<ElementRef<'a>> {
    document
        .select(table)
        .next()
        .and_then(|table| table.select(&BODY).next())
        .ok_or_else(|| Error::extraction(section, format!("no table body under {css}")))
}

// ============================================================================
// Table Strategies
// ============================================================================

/// Label-text-strip: the n-th `span` of a row holds the value of the n-th
/// `td`. The label is the cell text with the value removed, and the value is
/// the span text with the cell text removed.
///
/// Rows whose label comes out empty are skipped.
pub fn label_text_strip(body: ElementRef<'_>, fields: &mut FieldMap) {
    for row in body.select(&ROW) {
        for (span, cell) in row.select(&SPAN).zip(row.select(&CELL)) {
            let span_text = element_text(span);
            let cell_text = element_text(cell);

            let label = cell_text.replace(&span_text, "");
            let value = span_text.replace(&cell_text, "");

            let label = label.trim();
            if label.is_empty() {
                trace!(cell = %cell_text.trim(), "Skipping cell without label");
                continue;
            }
            fields.insert(label.to_string(), value.trim().to_string());
        }
    }
}

/// Two-line split: the trimmed row text is `label\nvalue`. Rows with any
/// other line count are skipped.
pub fn two_line_split(body: ElementRef<'_>, fields: &mut FieldMap) {
    for row in body.select(&ROW) {
        let text = element_text(row);
        let parts: Vec<&str> = text.trim().split('\n').collect();

        match parts.as_slice() {
            [label, value] => {
                fields.insert(label.trim().to_string(), value.trim().to_string());
            }
            _ => trace!(lines = parts.len(), "Skipping row without two lines"),
        }
    }
}

/// First-cell split: the first `td` is the label, and the value is the row
/// text with the label removed.
///
/// # Errors
///
/// Returns [`Error::Extraction`] for a row without any `td`. Rows before it
/// stay in `fields`.
pub fn first_cell_split(body: ElementRef<'_>, fields: &mut FieldMap) -> Result<()> {
    for (index, row) in body.select(&ROW).enumerate() {
        let cell = row.select(&CELL).next().ok_or_else(|| {
            Error::extraction(
                Section::AdditionalInfo,
                format!("row {} has no cells", index + 1),
            )
        })?;

        let label = element_text(cell);
        let value = element_text(row).replace(&label, "");

        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        fields.insert(label.to_string(), value.trim().to_string());
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
