//! Markup contract with the report page.
//!
//! Every identifier, selector and phrase the scraper depends on lives here,
//! so a redesign of the target page only touches this file.

/// Report page the VIN is submitted on.
pub const REPORT_URL: &str = "https://driving-tests.org/vin-decoder/";

/// `id` of the VIN text input.
pub const VIN_INPUT_ID: &str = "vin_input";

/// XPath of the region that fills in once the decoder has answered.
pub const RESULTS_XPATH: &str = r#"//*[@id="nhtsa-26"]"#;

/// Banner shown when the VIN is unknown.
pub const ERROR_BANNER_SELECTOR: &str = ".error-report";

/// Phrase inside [`ERROR_BANNER_SELECTOR`] that means "no data for this VIN".
pub const NO_INFORMATION_TEXT: &str = "we could not find information";

/// Decoded details table read with the label-text-strip strategy.
pub const DETAILS_TABLE_SELECTOR: &str = "table.tableinfo";

/// Decoded details table read with the two-line split strategy.
pub const STRIPED_TABLE_SELECTOR: &str = "table.table.table-striped";

/// Container of the additional info rows.
pub const ADDITIONAL_INFO_SELECTOR: &str = "#report_extra";

/// Container `id` of the recall tables.
pub const RECALLS_ID: &str = "recalls";

/// Container `id` of the complaint tables.
pub const COMPLAINTS_ID: &str = "complaints";

/// Vehicle logo image.
pub const LOGO_SELECTOR: &str = "img#vehicle_logo";

/// Gallery slide images.
pub const SLIDE_SELECTOR: &str = "img.slick-slide";
