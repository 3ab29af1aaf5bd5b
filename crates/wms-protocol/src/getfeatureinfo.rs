//! WMS GetFeatureInfo output
//!
//! Formats query results gathered by the map engine. The `text/mapml` format
//! is what the query link in MapML image mode asks for.

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use crate::mapml::{MapMlResponse, MAPML_CONTENT_TYPE};

/// Supported GetFeatureInfo response formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum InfoFormat {
    /// text/mapml - MapML feature document
    #[serde(rename = "text/mapml")]
    #[default]
    MapMl,
    /// application/json - Machine-readable JSON
    #[serde(rename = "application/json")]
    Json,
}

impl InfoFormat {
    /// Parse from MIME type string
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "text/mapml" => Some(InfoFormat::MapMl),
            "application/json" => Some(InfoFormat::Json),
            _ => None,
        }
    }

    /// Get MIME type string
    pub fn to_mime(&self) -> &'static str {
        match self {
            InfoFormat::MapMl => MAPML_CONTENT_TYPE,
            InfoFormat::Json => "application/json",
        }
    }
}

/// One attribute column of a queried layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryItem {
    pub name: String,
    /// Hidden items are not written
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

/// A feature hit; `values` line up with the layer's items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryFeature {
    pub id: i64,
    pub values: Vec<String>,
}

/// Query results for one layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerQueryResult {
    pub layer_name: String,
    /// `geomtype` metadata of the layer, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,
    pub items: Vec<QueryItem>,
    pub features: Vec<QueryFeature>,
}

/// GetFeatureInfo response container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureQueryResults {
    pub layers: Vec<LayerQueryResult>,
}

impl FeatureQueryResults {
    pub fn new(layers: Vec<LayerQueryResult>) -> Self {
        Self { layers }
    }

    /// Format as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as a MapML document with one `<feature>` per hit.
    pub fn to_mapml(&self) -> String {
        let mut doc = String::from("<mapml>\n");
        doc.push_str("  <head>\n");
        doc.push_str("  <title>GetFeatureInfo Results</title>\n");
        doc.push_str("  <meta charset=\"utf-8\" />\n");
        doc.push_str("  <meta http-equiv=\"Content-Type\" content=\"text/mapml\" />\n");
        doc.push_str("  </head>\n");
        doc.push_str("  <body>\n");
        doc.push_str("    <extent />\n");

        for layer in self.layers.iter().filter(|l| !l.features.is_empty()) {
            let name = escape(&layer.layer_name);

            if layer
                .geometry_type
                .as_deref()
                .is_some_and(|g| g.to_ascii_lowercase().contains("25d"))
            {
                doc.push_str(&format!(
                    "<!-- WARNING: 25d requested for layer '{}' but MapML only supports 2D. -->\n",
                    name
                ));
            }

            for feature in &layer.features {
                doc.push_str(&format!(
                    "      <feature id=\"{}.{}\" class=\"{}\">\n",
                    name, feature.id, name
                ));
                doc.push_str("        <properties>\n");
                doc.push_str("          <table>\n");
                doc.push_str("            <thead>\n");
                doc.push_str("              <tr>\n");
                doc.push_str("                <th role=\"columnheader\" scope=\"col\">Property Name</th>\n");
                doc.push_str("                <th role=\"columnheader\" scope=\"col\">Property Value</th>\n");
                doc.push_str("              </tr>\n");
                doc.push_str("            </thead>\n");

                for (item, value) in layer.items.iter().zip(&feature.values) {
                    if !item.visible {
                        continue;
                    }
                    let item_name = escape(&item.name);
                    doc.push_str("            <tbody>\n");
                    doc.push_str("              <tr>\n");
                    doc.push_str(&format!("                <th scope=\"row\">{}</th>\n", item_name));
                    doc.push_str(&format!(
                        "                <td itemprop=\"{}\">{}</td>\n",
                        item_name,
                        escape(value)
                    ));
                    doc.push_str("              </tr>\n");
                    doc.push_str("            </tbody>\n");
                }

                doc.push_str("          </table>\n");
                doc.push_str("        </properties>\n");
                doc.push_str("      </feature>\n");
            }
        }

        doc.push_str("  </body>\n");
        doc.push_str("</mapml>\n");
        doc
    }

    /// Render in the requested format.
    pub fn render(&self, format: InfoFormat) -> Result<MapMlResponse, serde_json::Error> {
        let body = match format {
            InfoFormat::MapMl => self.to_mapml(),
            InfoFormat::Json => self.to_json()?,
        };
        Ok(MapMlResponse {
            content_type: format.to_mime(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> FeatureQueryResults {
        FeatureQueryResults::new(vec![
            LayerQueryResult {
                layer_name: "roads".to_string(),
                geometry_type: None,
                items: vec![
                    QueryItem {
                        name: "name".to_string(),
                        visible: true,
                    },
                    QueryItem {
                        name: "internal_id".to_string(),
                        visible: false,
                    },
                    QueryItem {
                        name: "lanes".to_string(),
                        visible: true,
                    },
                ],
                features: vec![QueryFeature {
                    id: 42,
                    values: vec!["Main & 1st".to_string(), "x".to_string(), "4".to_string()],
                }],
            },
            LayerQueryResult {
                layer_name: "empty".to_string(),
                geometry_type: None,
                items: vec![],
                features: vec![],
            },
        ])
    }

    #[test]
    fn test_info_format_parsing() {
        assert_eq!(InfoFormat::from_mime("TEXT/MAPML"), Some(InfoFormat::MapMl));
        assert_eq!(InfoFormat::from_mime("application/json"), Some(InfoFormat::Json));
        assert_eq!(InfoFormat::from_mime("text/html"), None);
    }

    #[test]
    fn test_mapml_query_document() {
        let doc = results().to_mapml();
        assert!(doc.starts_with("<mapml>\n  <head>\n"));
        assert!(doc.contains("<title>GetFeatureInfo Results</title>"));
        assert!(doc.contains("<feature id=\"roads.42\" class=\"roads\">"));
        assert!(doc.contains("<td itemprop=\"name\">Main &amp; 1st</td>"));
        assert!(doc.contains("<td itemprop=\"lanes\">4</td>"));
        assert!(!doc.contains("internal_id"));
        assert!(!doc.contains("class=\"empty\""));
        assert!(doc.ends_with("</body>\n</mapml>\n"));
    }

    #[test]
    fn test_25d_warning() {
        let mut results = results();
        results.layers[0].geometry_type = Some("polygon25D".to_string());
        assert!(results
            .to_mapml()
            .contains("<!-- WARNING: 25d requested for layer 'roads'"));
    }

    #[test]
    fn test_render_json() {
        let response = results().render(InfoFormat::Json).unwrap();
        assert_eq!(response.content_type, "application/json");
        assert!(response.body.contains("\"layer_name\": \"roads\""));
    }
}
