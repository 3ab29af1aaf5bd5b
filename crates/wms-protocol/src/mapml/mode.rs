//! MapML output modes and the `<extent>` content each one produces.

use std::fmt;
use std::str::FromStr;

use wms_common::{AxisOrder, CrsCode, WmsError};

use super::extent::Extent;
use super::xml::Element;

/// How the layer is exposed to MapML clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMlMode {
    /// Full-viewport WMS GetMap requests plus a GetFeatureInfo query link
    #[default]
    Image,
    /// 256x256 WMS GetMap tiles
    Tile,
    /// mapserv CGI `mode=tile` requests
    CgiTile,
    /// Reserved for WFS feature links; produces an empty extent
    Features,
}

impl MapMlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapMlMode::Image => "image",
            MapMlMode::Tile => "tile",
            MapMlMode::CgiTile => "cgitile",
            MapMlMode::Features => "features",
        }
    }

    /// Build the children of `<extent>` for this mode.
    pub fn extent_children(&self, ctx: &ModeContext<'_>) -> Vec<Element> {
        match self {
            MapMlMode::Image => image_children(ctx),
            MapMlMode::Tile => tile_children(ctx),
            MapMlMode::CgiTile => cgitile_children(ctx),
            MapMlMode::Features => Vec::new(),
        }
    }
}

impl fmt::Display for MapMlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapMlMode {
    type Err = WmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(MapMlMode::Image),
            "tile" => Ok(MapMlMode::Tile),
            "cgitile" => Ok(MapMlMode::CgiTile),
            "features" => Ok(MapMlMode::Features),
            _ => Err(WmsError::invalid_parameter(
                "MAPML_MODE",
                "Requested MapML output mode not supported. Use one of image, tile, cgitile or features.",
            )),
        }
    }
}

/// Everything a mode needs to build its templates.
#[derive(Debug, Clone, Copy)]
pub struct ModeContext<'a> {
    /// Base URL ending in `?` or `&`
    pub script_url: &'a str,
    /// LAYER as requested
    pub layer: &'a str,
    pub style: &'a str,
    pub extent: &'a Extent,
    /// The request named the whole map
    pub whole_map: bool,
}

/// A `location` input bounded by one axis of the extent.
fn bounded_input(name: &str, units: &str, position: &str, axis: &str, min: f64, max: f64) -> Element {
    Element::new("input")
        .attr("name", name)
        .attr("type", "location")
        .attr("units", units)
        .attr("position", position)
        .attr("axis", axis)
        .attr_g("min", min)
        .attr_g("max", max)
}

/// The four corner inputs named `{prefix}xmin` ... `{prefix}ymax`.
fn corner_inputs(prefix: &str, units: &str, extent: &Extent) -> Vec<Element> {
    let b = &extent.bbox;
    vec![
        bounded_input(&format!("{prefix}xmin"), units, "top-left", "easting", b.min_x, b.max_x),
        bounded_input(&format!("{prefix}ymin"), units, "bottom-left", "northing", b.min_y, b.max_y),
        bounded_input(&format!("{prefix}xmax"), units, "top-right", "easting", b.min_x, b.max_x),
        bounded_input(&format!("{prefix}ymax"), units, "top-left", "northing", b.min_y, b.max_y),
    ]
}

/// WMS 1.3.0 BBOX template; lat/lon CRSs swap the axes.
fn bbox_template(crs: CrsCode, prefix: &str) -> String {
    match crs.axis_order_wms_1_3() {
        AxisOrder::LatLon => format!("{{{prefix}ymin}},{{{prefix}xmin}},{{{prefix}ymax}},{{{prefix}xmax}}"),
        AxisOrder::XY => format!("{{{prefix}xmin}},{{{prefix}ymin}},{{{prefix}xmax}},{{{prefix}ymax}}"),
    }
}

fn integer_input(name: &str, kind: &str, units: &str, axis: &str, min: i64, max: i64) -> Element {
    Element::new("input")
        .attr("name", name)
        .attr("type", kind)
        .attr("units", units)
        .attr("axis", axis)
        .attr_int("min", min)
        .attr_int("max", max)
}

fn image_children(ctx: &ModeContext<'_>) -> Vec<Element> {
    let crs = ctx.extent.crs;
    let bbox = bbox_template(crs, "");

    let mut children = vec![
        Element::new("input").attr("name", "w").attr("type", "width"),
        Element::new("input").attr("name", "h").attr("type", "height"),
    ];
    children.extend(corner_inputs("", "pcrs", ctx.extent));

    children.push(Element::new("link").attr("rel", "image").attr(
        "tref",
        format!(
            "{}SERVICE=WMS&REQUEST=GetMap&FORMAT=image/png&TRANSPARENT=TRUE&VERSION=1.3.0\
             &LAYERS={}&STYLES={}&WIDTH={{w}}&HEIGHT={{h}}&CRS={}&BBOX={}&m4h=t",
            ctx.script_url, ctx.layer, ctx.style, crs, bbox
        ),
    ));

    // Pixel position inputs for GetFeatureInfo
    for axis in ["i", "j"] {
        children.push(
            Element::new("input")
                .attr("name", axis)
                .attr("type", "location")
                .attr("axis", axis)
                .attr("units", "map")
                .attr_int("min", 0)
                .attr_int("max", 0),
        );
    }

    children.push(Element::new("link").attr("rel", "query").attr(
        "tref",
        format!(
            "{}SERVICE=WMS&REQUEST=GetFeatureInfo&INFO_FORMAT=text/mapml&FEATURE_COUNT=1\
             &TRANSPARENT=TRUE&VERSION=1.3.0&LAYERS={}&STYLES={}&QUERY_LAYERS={}\
             &WIDTH={{w}}&HEIGHT={{h}}&CRS={}&BBOX={}&x={{i}}&y={{j}}&m4h=t",
            ctx.script_url, ctx.layer, ctx.style, ctx.layer, crs, bbox
        ),
    ));

    children
}

fn tile_children(ctx: &ModeContext<'_>) -> Vec<Element> {
    let crs = ctx.extent.crs;
    let mut children = corner_inputs("t", "tilematrix", ctx.extent);

    children.push(Element::new("link").attr("rel", "tile").attr(
        "tref",
        format!(
            "{}SERVICE=WMS&REQUEST=GetMap&FORMAT=image/png&TRANSPARENT=TRUE&VERSION=1.3.0\
             &LAYERS={}&STYLES={}&WIDTH=256&HEIGHT=256&CRS={}&BBOX={}&m4h=t",
            ctx.script_url,
            ctx.layer,
            ctx.style,
            crs,
            bbox_template(crs, "t")
        ),
    ));

    children
}

fn cgitile_children(ctx: &ModeContext<'_>) -> Vec<Element> {
    // mapserv CGI addresses the whole map as "all"
    let layer = if ctx.whole_map { "all" } else { ctx.layer };

    vec![
        Element::new("input")
            .attr("name", "z")
            .attr("type", "zoom")
            .attr_int("value", 10)
            .attr_int("min", 4)
            .attr_int("max", 15),
        integer_input("y", "location", "tilematrix", "row", 0, 32768),
        integer_input("x", "location", "tilematrix", "column", 0, 32768),
        Element::new("link").attr("rel", "tile").attr(
            "tref",
            format!(
                "{}mode=tile&tilemode=gmap&FORMAT=image/png&LAYERS={}&tile={{x}}+{{y}}+{{z}}&m4h=t",
                ctx.script_url, layer
            ),
        ),
    ]
}
