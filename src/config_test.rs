#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn grid_config_defaults_match_world_camera() {
    let cfg = GridConfig::default();
    assert_eq!(cfg.zoom, 1.2);
    assert_eq!(cfg.tilt, 0.55);
    assert_eq!(cfg.rot, -45.0);
    assert!(cfg.min_zoom < cfg.zoom && cfg.zoom < cfg.max_zoom);
}

#[test]
fn from_json_fills_missing_fields() {
    let cfg = GridConfig::from_json(r#"{"hexSize": 32, "maxZoom": 5}"#).unwrap();
    assert_eq!(cfg.hex_size, 32.0);
    assert_eq!(cfg.max_zoom, 5.0);
    assert_eq!(cfg.zoom, DEFAULT_ZOOM);
    assert_eq!(cfg.min_zoom, DEFAULT_MIN_ZOOM);
}

#[test]
fn from_json_accepts_snake_case_and_rotation_alias() {
    let cfg = GridConfig::from_json(r#"{"grid_alpha": 0.8, "rotation": 30}"#).unwrap();
    assert_eq!(cfg.grid_alpha, 0.8);
    assert_eq!(cfg.rot, 30.0);
}

#[test]
fn from_json_rejects_inverted_zoom_bounds() {
    let err = GridConfig::from_json(r#"{"minZoom": 4, "maxZoom": 2}"#).unwrap_err();
    assert!(err.to_string().contains("zoom bounds"));
}

#[test]
fn from_json_rejects_non_positive_hex_size() {
    let err = GridConfig::from_json(r#"{"hexSize": 0}"#).unwrap_err();
    assert!(matches!(err, GridError::Parse(_)));
}

#[test]
fn validate_rejects_nan_fields_built_in_code() {
    let cfg = GridConfig { min_zoom: f64::NAN, ..GridConfig::default() };
    assert!(matches!(cfg.validate(), Err(GridError::Parse(_))));
    let cfg = GridConfig { hex_size: f64::NAN, ..GridConfig::default() };
    assert!(matches!(cfg.validate(), Err(GridError::Parse(_))));
    assert!(GridConfig::default().validate().is_ok());
}

#[test]
fn from_json_rejects_garbage() {
    assert!(matches!(GridConfig::from_json("not json"), Err(GridError::Parse(_))));
}

#[test]
fn render_style_partial_json_keeps_defaults() {
    let style: RenderStyle = serde_json::from_str(r##"{"roadColor": "#fff"}"##).unwrap();
    assert_eq!(style.road_color, "#fff");
    assert_eq!(style.background, RenderStyle::default().background);
}

#[test]
fn url_source_fixed_resolves_to_itself() {
    let src = UrlSource::from("/api/world");
    assert_eq!(src.resolve(), "/api/world");
}

#[test]
fn url_source_dynamic_is_evaluated_per_call() {
    let counter = std::cell::Cell::new(0);
    let counter = std::rc::Rc::new(counter);
    let seen = std::rc::Rc::clone(&counter);
    let src = UrlSource::Dynamic(Box::new(move || {
        seen.set(seen.get() + 1);
        format!("/api/city/{}", seen.get())
    }));
    assert_eq!(src.resolve(), "/api/city/1");
    assert_eq!(src.resolve(), "/api/city/2");
    assert_eq!(counter.get(), 2);
}

#[test]
fn engine_config_for_canvas_uses_default_keys() {
    let cfg = EngineConfig::for_canvas("world-canvas");
    assert_eq!(cfg.canvas_id, "world-canvas");
    assert_eq!(cfg.empty_terrain, DEFAULT_EMPTY_TERRAIN);
    assert_eq!(cfg.bridge_terrain, DEFAULT_BRIDGE_TERRAIN);
    assert!(!cfg.auto_center_on_resize);
    assert!(cfg.fetch_map_url.is_none());
}
