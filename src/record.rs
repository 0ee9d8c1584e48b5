//! Vehicle record model.
//!
//! A [`VehicleRecord`] always carries the same five sections, whether or not
//! the page had data for them. Field maps keep the order rows appeared on the
//! page; sorted output is a rendering choice made in [`crate::output`].

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;

use crate::vin::Vin;

// ============================================================================
// Section
// ============================================================================

/// The five sections of a vehicle record, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Decoded VIN attributes (make, model, year, ...).
    DecodedDetails,
    /// Extra label/value rows shown under the decoder output.
    AdditionalInfo,
    /// Recall notices, one sub-section per recall table.
    Recalls,
    /// Owner complaints, one sub-section per complaint table.
    Complaints,
    /// Logo and gallery image links.
    Images,
}

impl Section {
    /// Every section, in the order they are extracted.
    pub const ALL: [Section; 5] = [
        Self::DecodedDetails,
        Self::AdditionalInfo,
        Self::Recalls,
        Self::Complaints,
        Self::Images,
    ];

    /// Returns the key this section is serialized under.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DecodedDetails => "decoded_details",
            Self::AdditionalInfo => "additional_info",
            Self::Recalls => "recalls",
            Self::Complaints => "complaints",
            Self::Images => "images",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Field maps
// ============================================================================

/// Label to value pairs scraped from one table, in page order.
///
/// Inserting an existing label replaces its value in place.
pub type FieldMap = IndexMap<String, String>;

/// Numbered incident sub-sections (`recalls_1`, `recalls_2`, ...).
pub type IncidentMap = IndexMap<String, FieldMap>;

// ============================================================================
// ImageLinks
// ============================================================================

/// Image URLs found on the report page.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImageLinks {
    /// Absolute logo URL, or empty when the page has no logo.
    pub vehicle_logo: String,
    /// Gallery image sources in page order; `None` where a slide has no `src`.
    pub vehicle_images: Vec<Option<String>>,
}

// ============================================================================
// VehicleRecord
// ============================================================================

/// Everything scraped for one VIN.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct VehicleRecord {
    /// VIN this record belongs to. Not part of the serialized sections.
    #[serde(skip)]
    pub vin: Vin,
    /// Decoded VIN attributes.
    pub decoded_details: FieldMap,
    /// Additional label/value rows.
    pub additional_info: FieldMap,
    /// Recall sub-sections.
    pub recalls: IncidentMap,
    /// Complaint sub-sections.
    pub complaints: IncidentMap,
    /// Logo and gallery links.
    pub images: ImageLinks,
}

impl VehicleRecord {
    /// Creates a record with every section present and empty.
    #[must_use]
    pub fn new(vin: Vin) -> Self {
        Self {
            vin,
            decoded_details: FieldMap::new(),
            additional_info: FieldMap::new(),
            recalls: IncidentMap::new(),
            complaints: IncidentMap::new(),
            images: ImageLinks::default(),
        }
    }
}

// ============================================================================
// ReportBatch
// ============================================================================

/// Records for a batch of VINs, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ReportBatch {
    records: Vec<VehicleRecord>,
}

impl ReportBatch {
    /// Creates an empty batch.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a completed record.
    #[inline]
    pub fn push(&mut self, record: VehicleRecord) {
        self.records.push(record);
    }

    /// Records in request order.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    /// Number of completed records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no record completed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recently completed record.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&VehicleRecord> {
        self.records.last()
    }

    /// Records keyed by VIN. A VIN requested twice maps to its last record.
    #[must_use]
    pub fn by_vin(&self) -> BTreeMap<&str, &VehicleRecord> {
        self.records.iter().map(|r| (r.vin.as_str(), r)).collect()
    }
}

impl IntoIterator for ReportBatch {
    type Item = VehicleRecord;
    type IntoIter = std::vec::IntoIter<VehicleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
