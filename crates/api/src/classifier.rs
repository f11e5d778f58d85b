//! AJAX request classification.

use ajaxgate_core::{AjaxCycle, RequestParams, fields};

/// Classify a request: `Some` iff it carries the AJAX marker field.
///
/// The returned cycle raises the native AJAX compat flags and picks the
/// error reporting mode; the dispatcher hands both to every responder.
pub fn classify(params: &RequestParams, debug: bool) -> Option<AjaxCycle> {
    if !params.exists(fields::AJAX_MARKER) {
        return None;
    }
    Some(AjaxCycle::new(debug))
}

#[cfg(test)]
mod tests {
    use ajaxgate_core::ErrorReporting;

    use super::*;

    #[test]
    fn marker_presence_decides() {
        assert!(classify(&RequestParams::from_pairs([("vcv-action", "x")]), false).is_none());

        let cycle = classify(&RequestParams::from_pairs([("vcv-ajax", "")]), false).unwrap();
        assert!(cycle.compat.ajax_request_call && cycle.compat.doing_ajax);
        assert_eq!(cycle.error_reporting, ErrorReporting::Suppressed);
    }

    #[test]
    fn debug_enables_verbose_errors() {
        let cycle = classify(&RequestParams::from_pairs([("vcv-ajax", "1")]), true).unwrap();
        assert_eq!(cycle.error_reporting, ErrorReporting::Verbose);
        assert_eq!(
            cycle.error_reporting.client_message("Malformed payload", &"bad base64"),
            "Malformed payload: bad base64"
        );
    }
}
