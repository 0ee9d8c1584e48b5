//! Recalls and complaints.
//!
//! Both containers hold one `tbody` per incident. Each incident becomes a
//! field map keyed `<section>_<n>` (1-based), built from rows of exactly two
//! cells.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{FieldMap, IncidentMap, Section};
use crate::site;

use super::{BODY, CELL, ROW, element_text, selector};

static RECALLS: LazyLock<Selector> =
    LazyLock::new(|| selector(&format!("#{}", site::RECALLS_ID)));
static COMPLAINTS: LazyLock<Selector> =
    LazyLock::new(|| selector(&format!("#{}", site::COMPLAINTS_ID)));

/// Fills `incidents` from the container of `section`.
///
/// An incident is inserted only once all of its rows parsed, so a bad row
/// in incident `k` leaves incidents `1..k` in the map and stops there.
///
/// # Errors
///
/// Returns [`Error::Extraction`] if the container is missing, a row does not
/// have exactly two cells, or `section` is not an incident section.
pub fn extract(document: &Html, section: Section, incidents: &mut IncidentMap) -> Result<()> {
    let container_selector = match section {
        Section::Recalls => &*RECALLS,
        Section::Complaints => &*COMPLAINTS,
        other => return Err(Error::extraction(other, "not an incident section")),
    };

    let container = document
        .select(container_selector)
        .next()
        .ok_or_else(|| Error::extraction(section, format!("no #{section} container")))?;

    for (index, body) in container.select(&BODY).enumerate() {
        let key = format!("{section}_{}", index + 1);
        let fields = incident_fields(body)
            .map_err(|message| Error::extraction(section, format!("{key}: {message}")))?;
        incidents.insert(key, fields);
    }

    debug!(%section, count = incidents.len(), "Incidents extracted");
    Ok(())
}

fn incident_fields(body: ElementRef<'_>) -> std::result::Result<FieldMap, String> {
    let mut fields = FieldMap::new();

    for (index, row) in body.select(&ROW).enumerate() {
        let cells: Vec<String> = row.select(&CELL).map(cell_text).collect();
        let [label, value] = <[String; 2]>::try_from(cells).map_err(|cells| {
            format!("row {} has {} cells, expected 2", index + 1, cells.len())
        })?;
        fields.insert(label, value);
    }

    Ok(fields)
}

/// Cell text with line breaks removed.
fn cell_text(cell: ElementRef<'_>) -> String {
    element_text(cell)
        .trim_matches('\n')
        .replace('\n', "")
        .trim()
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RECALLS: &str = r#"
        <div id="recalls"><table>
            <tbody>
                <tr><td>Date</td><td>2019-03-12</td></tr>
                <tr><td>Component</td><td>
                    AIR BAGS
                </td></tr>
            </tbody>
            <tbody>
                <tr><td>Date</td><td>2020-07-01</td></tr>
                <tr><td>Summary</td><td>Inflator may rupture</td></tr>
            </tbody>
        </table></div>
        <div id="complaints"><table></table></div>
    "#;

    #[test]
    fn test_each_tbody_becomes_numbered_incident() {
        let document = Html::parse_document(TWO_RECALLS);
        let mut recalls = IncidentMap::new();

        extract(&document, Section::Recalls, &mut recalls).expect("well-formed recalls");

        assert_eq!(
            recalls.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["recalls_1", "recalls_2"]
        );
        let first = recalls.get("recalls_1").expect("first incident");
        assert_eq!(first.get("Component").map(String::as_str), Some("AIR BAGS"));
        assert_eq!(
            first.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["Date", "Component"]
        );
        let second = recalls.get("recalls_2").expect("second incident");
        assert_eq!(
            second.get("Summary").map(String::as_str),
            Some("Inflator may rupture")
        );
    }

    #[test]
    fn test_empty_container_yields_no_incidents() {
        let document = Html::parse_document(TWO_RECALLS);
        let mut complaints = IncidentMap::new();

        extract(&document, Section::Complaints, &mut complaints).expect("container present");
        assert!(complaints.is_empty());
    }

    #[test]
    fn test_bad_row_keeps_earlier_incidents_only() {
        let document = Html::parse_document(
            r#"<div id="recalls"><table>
                <tbody><tr><td>Date</td><td>2019-03-12</td></tr></tbody>
                <tbody>
                    <tr><td>Date</td><td>2020-07-01</td></tr>
                    <tr><td>Summary</td><td>Fuel pump</td><td>extra</td></tr>
                </tbody>
            </table></div>"#,
        );
        let mut recalls = IncidentMap::new();

        let err = extract(&document, Section::Recalls, &mut recalls).expect_err("three cells");

        assert_eq!(
            err.to_string(),
            "Failed to extract recalls: recalls_2: row 2 has 3 cells, expected 2"
        );
        assert_eq!(
            recalls.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["recalls_1"]
        );
    }

    #[test]
    fn test_missing_container() {
        let document = Html::parse_document("<p>nothing here</p>");
        let mut complaints = IncidentMap::new();

        let err = extract(&document, Section::Complaints, &mut complaints)
            .expect_err("no container");
        assert!(matches!(
            err,
            Error::Extraction { section: Section::Complaints, .. }
        ));
    }

    #[test]
    fn test_rejects_non_incident_section() {
        let document = Html::parse_document(TWO_RECALLS);
        let mut map = IncidentMap::new();
        assert!(extract(&document, Section::Images, &mut map).is_err());
    }
}
