//! Assembly of the `<mapml>` document: head metadata and body skeleton.

use wms_common::metadata::lookup_metadata2;
use wms_common::{LayerDefinition, MapDefinition};

use super::crs::{CrsResolver, ALTERNATE_PROJECTIONS};
use super::xml::Element;
use super::MAPML_NAMESPACES;

/// Inputs for the `<head>` element.
pub struct HeadContext<'a> {
    pub map: &'a MapDefinition,
    pub layer: &'a LayerDefinition,
    /// LAYER as requested
    pub requested: &'a str,
    pub whole_map: bool,
    /// PROJECTION keyword as requested
    pub projection: &'a str,
    pub style: &'a str,
    /// Base URL ending in `?` or `&`
    pub script_url: &'a str,
    /// SERVICE value used in alternate links
    pub service: &'a str,
    pub resolver: &'a CrsResolver<'a>,
}

/// Build `<head>`: title, meta, license, legend and alternate projections.
pub fn build_head(ctx: &HeadContext<'_>) -> Element {
    let mut head = Element::new("head");

    let title = if ctx.whole_map {
        ctx.map.metadata.lookup(MAPML_NAMESPACES, "title")
    } else {
        ctx.layer.metadata.lookup(MAPML_NAMESPACES, "title")
    };
    if let Some(title) = title {
        head.push(Element::new("title").text(title));
    }

    head.push(Element::new("meta").attr("charset", "UTF-8"));
    head.push(
        Element::new("meta")
            .attr("http-equiv", "Content-Type")
            .attr("content", format!("text/mapml;projection={}", ctx.projection)),
    );

    let attribution = |name| {
        lookup_metadata2(
            &ctx.layer.metadata,
            &ctx.map.metadata,
            Some(MAPML_NAMESPACES),
            name,
        )
    };
    let license_href = attribution("attribution_onlineresource");
    let license_title = attribution("attribution_title");
    if license_href.is_some() || license_title.is_some() {
        head.push(
            Element::new("link")
                .attr("rel", "license")
                .attr_opt("href", license_href)
                .attr_opt("title", license_title),
        );
    }

    head.push(Element::new("link").attr("rel", "legend").attr(
        "href",
        format!(
            "{}SERVICE=WMS&REQUEST=GetLegendGraphic&VERSION=1.3.0&FORMAT=image/png\
             &LAYER={}&STYLE={}&SLD_VERSION=1.1.0",
            ctx.script_url, ctx.requested, ctx.style
        ),
    ));

    for keyword in ALTERNATE_PROJECTIONS {
        if keyword.eq_ignore_ascii_case(ctx.projection) || ctx.resolver.probe(keyword).is_none() {
            continue;
        }
        head.push(
            Element::new("link")
                .attr("rel", "alternate")
                .attr("projection", keyword)
                .attr(
                    "href",
                    format!(
                        "{}SERVICE={}&REQUEST=GetMapML&LAYER={}&STYLE={}&PROJECTION={}",
                        ctx.script_url, ctx.service, ctx.requested, ctx.style, keyword
                    ),
                ),
        );
    }

    head
}

/// Wrap a head and the extent content into `<mapml>`.
pub fn assemble_document(head: Element, projection: &str, extent_children: Vec<Element>) -> Element {
    let mut extent = Element::new("extent").attr("units", projection);
    extent.children = extent_children;

    Element::new("mapml")
        .child(head)
        .child(Element::new("body").child(extent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapml::crs::MetadataCrsPolicy;
    use wms_common::{BoundingBox, CrsCode};

    fn map() -> MapDefinition {
        MapDefinition::new(
            "demo",
            CrsCode::Epsg3857,
            BoundingBox::new(-1000.0, -1000.0, 1000.0, 1000.0),
        )
        .with_metadata("wms_title", "Demo Map")
        .with_metadata("ows_srs", "EPSG:3857 EPSG:3978 CRS:84 EPSG:4326")
        .with_metadata("ows_attribution_title", "Demo contributors")
        .with_layer(LayerDefinition::new("roads").with_metadata("wms_title", "Roads"))
    }

    fn head_for(map: &MapDefinition, requested: &str, whole_map: bool, projection: &str) -> Element {
        let policy = MetadataCrsPolicy::default();
        let resolver = CrsResolver::new(map, &map.layers[0], &policy);
        build_head(&HeadContext {
            map,
            layer: &map.layers[0],
            requested,
            whole_map,
            projection,
            style: "",
            script_url: "http://localhost/wms?",
            service: "WMS",
            resolver: &resolver,
        })
    }

    #[test]
    fn test_title_layer_or_map() {
        let map = map();
        let head = head_for(&map, "roads", false, "OSMTILE");
        assert_eq!(head.find("title").and_then(|t| t.text.as_deref()), Some("Roads"));

        let head = head_for(&map, "demo", true, "OSMTILE");
        assert_eq!(head.find("title").and_then(|t| t.text.as_deref()), Some("Demo Map"));
    }

    #[test]
    fn test_meta_and_license() {
        let map = map();
        let head = head_for(&map, "roads", false, "osmtile");
        let metas: Vec<_> = head.find_all("meta").collect();
        assert_eq!(metas[0].attribute("charset"), Some("UTF-8"));
        assert_eq!(metas[1].attribute("content"), Some("text/mapml;projection=osmtile"));

        let license = head
            .find_all("link")
            .find(|l| l.attribute("rel") == Some("license"))
            .unwrap();
        assert_eq!(license.attribute("title"), Some("Demo contributors"));
        assert_eq!(license.attribute("href"), None);
    }

    #[test]
    fn test_alternates_exclude_current_and_disabled() {
        let map = map();
        let head = head_for(&map, "roads", false, "osmtile");
        let alternates: Vec<_> = head
            .find_all("link")
            .filter(|l| l.attribute("rel") == Some("alternate"))
            .filter_map(|l| l.attribute("projection"))
            .collect();
        assert_eq!(alternates, vec!["CBMTILE", "WGS84"]);
    }

    #[test]
    fn test_legend_link() {
        let map = map();
        let head = head_for(&map, "roads", false, "OSMTILE");
        let legend = head
            .find_all("link")
            .find(|l| l.attribute("rel") == Some("legend"))
            .and_then(|l| l.attribute("href"))
            .unwrap();
        assert_eq!(
            legend,
            "http://localhost/wms?SERVICE=WMS&REQUEST=GetLegendGraphic&VERSION=1.3.0&FORMAT=image/png&LAYER=roads&STYLE=&SLD_VERSION=1.1.0"
        );
    }
}
