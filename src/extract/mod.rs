//! Record extraction from a rendered report page.
//!
//! Every routine parses its own snapshot of the page source, so the caller
//! can fetch a fresh one per section. Routines write straight into the
//! record: when one fails, whatever it inserted before the failure stays.
//!
//! | Section | Routine | Table strategy |
//! |---------|---------|----------------|
//! | decoded details | [`details::decoded_details`] | label-text-strip, two-line split |
//! | additional info | [`details::additional_info`] | first-cell split |
//! | recalls, complaints | [`incidents::extract`] | two cells per row, one map per `tbody` |
//! | images | [`images::image_links`] | `src` attributes |

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::record::{Section, VehicleRecord};

// ============================================================================
// Submodules
// ============================================================================

pub mod details;
pub mod images;
pub mod incidents;

// ============================================================================
// Shared Selectors
// ============================================================================

pub(crate) static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
pub(crate) static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
pub(crate) static BODY: LazyLock<Selector> = LazyLock::new(|| selector("tbody"));

/// Parses a selector that is fixed at compile time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector {css:?}: {e}"))
}

/// Concatenated text of every descendant text node.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

// ============================================================================
// Entry Point
// ============================================================================

/// Runs the routine for `section` against one page snapshot.
///
/// `page_url` is only read for [`Section::Images`].
///
/// # Errors
///
/// Returns [`crate::Error::Extraction`] when the section's markup is missing
/// or malformed.
pub fn extract_section(
    section: Section,
    source: &str,
    page_url: &str,
    record: &mut VehicleRecord,
) -> Result<()> {
    let document = Html::parse_document(source);

    match section {
        Section::DecodedDetails => {
            details::decoded_details(&document, &mut record.decoded_details)
        }
        Section::AdditionalInfo => {
            details::additional_info(&document, &mut record.additional_info)
        }
        Section::Recalls => incidents::extract(&document, section, &mut record.recalls),
        Section::Complaints => incidents::extract(&document, section, &mut record.complaints),
        Section::Images => {
            images::image_links(&document, page_url, &mut record.images);
            Ok(())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
