//! Logo and gallery image links.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::record::ImageLinks;
use crate::site;

use super::selector;

static LOGO: LazyLock<Selector> = LazyLock::new(|| selector(site::LOGO_SELECTOR));
static SLIDES: LazyLock<Selector> = LazyLock::new(|| selector(site::SLIDE_SELECTOR));

/// Fills `images` from the logo and the gallery slides.
///
/// A missing logo leaves `vehicle_logo` empty. Every slide contributes one
/// entry, `None` when it has no `src`.
pub fn image_links(document: &Html, page_url: &str, images: &mut ImageLinks) {
    images.vehicle_logo = document
        .select(&LOGO)
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(|src| resolve_logo(page_url, src))
        .unwrap_or_default();

    if !images.vehicle_logo.is_empty() {
        info!(url = %images.vehicle_logo, "Found vehicle logo");
    }

    images.vehicle_images = document
        .select(&SLIDES)
        .map(|img| img.value().attr("src").map(str::to_string))
        .collect();

    debug!(count = images.vehicle_images.len(), "Collected slide images");
}

/// Absolute sources are kept and scheme-relative ones (`//host/...`) take
/// the page's scheme. Anything else is appended to the page URL.
#[must_use]
pub fn resolve_logo(page_url: &str, src: &str) -> String {
    if Url::parse(src).is_ok() {
        return src.to_string();
    }

    if src.starts_with("//") {
        if let Ok(resolved) = Url::parse(page_url).and_then(|base| base.join(src)) {
            return resolved.into();
        }
    }

    format!("{page_url}{src}")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://driving-tests.org/vin-decoder/";

    #[test]
    fn test_relative_logo_is_appended_to_page_url() {
        assert_eq!(
            resolve_logo(PAGE_URL, "img/logos/honda.png"),
            "https://driving-tests.org/vin-decoder/img/logos/honda.png"
        );
    }

    #[test]
    fn test_absolute_logo_is_kept() {
        assert_eq!(
            resolve_logo(PAGE_URL, "https://cdn.example.test/honda.png"),
            "https://cdn.example.test/honda.png"
        );
    }

    #[test]
    fn test_scheme_relative_logo_takes_page_scheme() {
        assert_eq!(
            resolve_logo(PAGE_URL, "//cdn.example.test/logos/honda.png"),
            "https://cdn.example.test/logos/honda.png"
        );
        assert_eq!(
            resolve_logo("http://localhost:8080/report/", "//cdn.example.test/x.png"),
            "http://cdn.example.test/x.png"
        );
    }

    #[test]
    fn test_slides_keep_order_and_missing_sources() {
        let document = Html::parse_document(
            r#"<img id="vehicle_logo" src="img/honda.png">
               <img class="slick-slide" src="a.jpg">
               <img class="slick-slide">
               <img class="slick-slide" src="c.jpg">"#,
        );
        let mut images = ImageLinks::default();

        image_links(&document, PAGE_URL, &mut images);

        assert_eq!(
            images.vehicle_logo,
            "https://driving-tests.org/vin-decoder/img/honda.png"
        );
        assert_eq!(
            images.vehicle_images,
            vec![Some("a.jpg".to_string()), None, Some("c.jpg".to_string())]
        );
    }

    #[test]
    fn test_no_logo_and_no_slides() {
        let document = Html::parse_document(r#"<img id="vehicle_logo">"#);
        let mut images = ImageLinks::default();

        image_links(&document, PAGE_URL, &mut images);

        assert_eq!(images.vehicle_logo, "");
        assert!(images.vehicle_images.is_empty());
    }
}
