//! The extent advertised in a MapML document.

use tracing::debug;
use wms_common::{BoundingBox, CrsCode, MapDefinition, RectReprojector, WmsError, WmsResult};

/// A rectangle in a specific CRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub bbox: BoundingBox,
    pub crs: CrsCode,
}

/// The map extent expressed in `target`.
///
/// Always the map-wide extent, whichever layer was requested.
pub fn resolve_extent(
    map: &MapDefinition,
    target: CrsCode,
    reprojector: &dyn RectReprojector,
) -> WmsResult<Extent> {
    if !map.extent.is_valid() {
        return Err(WmsError::ConfigurationError(
            "Map extent is empty or inverted".to_string(),
        ));
    }

    let bbox = if map.projection == target {
        map.extent
    } else {
        reprojector.reproject_rect(map.projection, target, &map.extent)?
    };

    debug!(
        from = %map.projection,
        to = %target,
        min_x = bbox.min_x,
        min_y = bbox.min_y,
        max_x = bbox.max_x,
        max_y = bbox.max_y,
        "Resolved MapML extent"
    );

    Ok(Extent { bbox, crs: target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Shift {
        calls: Cell<usize>,
    }

    impl RectReprojector for Shift {
        fn reproject_rect(&self, _: CrsCode, _: CrsCode, rect: &BoundingBox) -> WmsResult<BoundingBox> {
            self.calls.set(self.calls.get() + 1);
            Ok(BoundingBox::new(
                rect.min_x + 1.0,
                rect.min_y + 1.0,
                rect.max_x + 1.0,
                rect.max_y + 1.0,
            ))
        }
    }

    struct Failing;

    impl RectReprojector for Failing {
        fn reproject_rect(&self, _: CrsCode, _: CrsCode, _: &BoundingBox) -> WmsResult<BoundingBox> {
            Err(WmsError::ReprojectionFailure("no transform".to_string()))
        }
    }

    fn map() -> MapDefinition {
        MapDefinition::new(
            "demo",
            CrsCode::Epsg3857,
            BoundingBox::new(-10.0, -20.0, 10.0, 20.0),
        )
    }

    #[test]
    fn test_same_crs_is_not_reprojected() {
        let shift = Shift { calls: Cell::new(0) };
        let extent = resolve_extent(&map(), CrsCode::Epsg3857, &shift).unwrap();
        assert_eq!(extent.bbox, map().extent);
        assert_eq!(shift.calls.get(), 0);
    }

    #[test]
    fn test_reprojected() {
        let shift = Shift { calls: Cell::new(0) };
        let extent = resolve_extent(&map(), CrsCode::Epsg3978, &shift).unwrap();
        assert_eq!(extent.crs, CrsCode::Epsg3978);
        assert_eq!(extent.bbox.min_x, -9.0);
        assert_eq!(shift.calls.get(), 1);
    }

    #[test]
    fn test_reprojection_failure_propagates() {
        let err = resolve_extent(&map(), CrsCode::Epsg5936, &Failing).unwrap_err();
        assert!(matches!(err, WmsError::ReprojectionFailure(_)));
    }

    #[test]
    fn test_inverted_map_extent() {
        let mut map = map();
        map.extent = BoundingBox::empty();
        let err = resolve_extent(&map, CrsCode::Epsg3857, &Failing).unwrap_err();
        assert!(matches!(err, WmsError::ConfigurationError(_)));
    }
}
