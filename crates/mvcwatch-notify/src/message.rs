//! Notification message rendering.

use mvcwatch_scraper::AvailabilityResult;

pub fn availability_subject(service: &str) -> String {
    format!("DMV availability found {service}")
}

/// Render the availability alert body.
///
/// Each result renders as one line: office name (when the slot joined one),
/// the slot text with the page's ` <br/> ` separator collapsed to a single
/// space, then a deep link `<wizard_url>/<location id>`. Lines are wrapped
/// in the fixed greeting/sign-off. Callers must check non-emptiness first;
/// the empty case is the "no availability" branch and dispatches nothing.
pub fn render_availability(
    results: &[AvailabilityResult],
    service: &str,
    wizard_url: &str,
) -> String {
    debug_assert!(!results.is_empty(), "callers check non-emptiness first");

    let mut lines = String::new();
    for result in results {
        if let Some(name) = &result.name {
            lines.push_str(name);
            lines.push(' ');
        }
        lines.push_str(&result.first_open_slot.replace(" <br/> ", " "));
        lines.push_str(". Url: ");
        lines.push_str(wizard_url);
        lines.push('/');
        lines.push_str(result.location_id.as_str());
        lines.push('\n');
    }

    format!("Hi,\nWe found NJ DMV availability for {service}:\n{lines}\nCheers,\nBot")
}

pub fn stock_subject() -> String {
    "Stock refresh: found availability".to_string()
}

/// Fixed body for the stock checker; the polled page doubles as the link.
pub fn render_stock_alert(checkout_url: &str) -> String {
    format!("Go check out {checkout_url}\n\nEnjoy,\nBot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvcwatch_scraper::LocationId;

    fn result(id: &str, name: Option<&str>, text: &str) -> AvailabilityResult {
        AvailabilityResult {
            location_id: LocationId::new(id),
            name: name.map(str::to_string),
            first_open_slot: text.to_string(),
            earliest_date: None,
        }
    }

    #[test]
    fn line_carries_name_normalised_text_and_deep_link() {
        let results = vec![result(
            "2",
            Some("Paterson"),
            "3 Appointments Available <br/> Next Available: 01/15/2030 10:00 AM",
        )];
        let body = render_availability(&results, "initial", "https://example.test/wizard/15");
        assert!(body.contains(
            "Paterson 3 Appointments Available Next Available: 01/15/2030 10:00 AM. Url: https://example.test/wizard/15/2\n"
        ));
        assert!(!body.contains("<br/>"), "separator must be collapsed");
    }

    #[test]
    fn lines_appear_in_result_order_inside_the_template() {
        let results = vec![
            result("1", Some("Newark"), "slot a"),
            result("2", Some("Paterson"), "slot b"),
        ];
        let body = render_availability(&results, "initial", "https://example.test/15");
        let newark = body.find("Newark").expect("first line present");
        let paterson = body.find("Paterson").expect("second line present");
        assert!(newark < paterson);
        assert!(body.starts_with("Hi,\nWe found NJ DMV availability for initial:\n"));
        assert!(body.ends_with("\nCheers,\nBot"));
    }

    #[test]
    fn unjoined_result_omits_the_name_segment() {
        let results = vec![result("9", None, "slot text")];
        let body = render_availability(&results, "initial", "https://example.test/15");
        assert!(body.contains("slot text. Url: https://example.test/15/9\n"));
    }

    #[test]
    fn subject_names_the_service() {
        assert_eq!(
            availability_subject("nondriverid"),
            "DMV availability found nondriverid"
        );
    }

    #[test]
    fn stock_alert_links_the_polled_page() {
        let body = render_stock_alert("https://shop.example/checkout");
        assert!(body.contains("https://shop.example/checkout"));
    }
}
