//! ServiceExceptionReport rendering for failed MapML requests.

use quick_xml::escape::{escape, partial_escape};
use wms_common::WmsError;

use super::MapMlResponse;

/// Content type of exception documents.
pub const EXCEPTION_CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

/// Exception code used for every failed GetMapML request.
pub const INVALID_REQUEST: &str = "InvalidRequest";

/// Render `error` as a `ServiceExceptionReport` with an optional `code`.
pub fn render_exception(error: &WmsError, code: Option<&str>) -> MapMlResponse {
    let message = error.to_string();
    let code_attr = code
        .map(|c| format!(" code=\"{}\"", escape(c)))
        .unwrap_or_default();

    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<ServiceExceptionReport>
<ServiceException{}>
{}
</ServiceException>
</ServiceExceptionReport>
"#,
        code_attr,
        partial_escape(&message)
    );

    MapMlResponse {
        content_type: EXCEPTION_CONTENT_TYPE,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_with_code() {
        let err = WmsError::MissingParameter("LAYER".to_string());
        let response = render_exception(&err, Some(INVALID_REQUEST));
        assert_eq!(response.content_type, "text/xml; charset=UTF-8");
        assert!(response.body.starts_with("<?xml version=\"1.0\""));
        assert!(response.body.contains("<ServiceException code=\"InvalidRequest\">"));
        assert!(response.body.contains("Missing required parameter: LAYER"));
    }

    #[test]
    fn test_exception_without_code_escapes_message() {
        let err = WmsError::invalid_parameter("LAYER", "no layer named <a&b>");
        let response = render_exception(&err, None);
        assert!(response.body.contains("<ServiceException>\n"));
        assert!(response.body.contains("no layer named &lt;a&amp;b&gt;"));
    }
}
