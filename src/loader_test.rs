use serde_json::json;

use super::*;

fn two_by_two() -> Value {
    json!({
        "grid": [
            [{ "terrain": "plains" }, { "terrain": "city", "code": "C1" }],
            [{ "terrain": "river" }, { "terrain": "plains", "has_road": true }]
        ],
        "rows": 2,
        "cols": 2
    })
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn default_parser_reads_plain_payload() {
    let data = default_parser(two_by_two()).unwrap();
    assert_eq!(data.grid.len(), 2);
    assert_eq!(data.rows, Some(2));
    assert_eq!(data.grid[0][1].code.as_deref(), Some("C1"));
}

#[test]
fn default_parser_rejects_wrong_shape() {
    let err = default_parser(json!({ "tiles": [] })).unwrap_err();
    assert!(matches!(err, GridError::Parse(_)));
}

#[test]
fn build_grid_rejects_empty_payload() {
    let err = build_grid(json!({ "grid": [] }), &default_parser).unwrap_err();
    assert!(matches!(err, GridError::EmptyGrid));
}

#[test]
fn build_grid_rejects_absurd_declared_width() {
    let raw = json!({ "grid": [[{ "terrain": "plains" }]], "rows": 1, "cols": u64::MAX });
    let err = build_grid(raw, &default_parser).unwrap_err();
    assert!(matches!(err, GridError::Parse(_)));
}

#[test]
fn custom_parser_unwraps_nested_payload() {
    let parser = |raw: Value| -> Result<MapData, GridError> {
        let inner = raw.get("city").cloned().ok_or_else(|| GridError::Parse("missing city".into()))?;
        default_parser(inner)
    };
    let grid = build_grid(json!({ "city": two_by_two() }), &parser).unwrap();
    assert_eq!(grid.rows(), 2);
    assert_eq!(grid.get(HexCoord::new(1, 1)).map(|c| c.has_road), Some(true));
}

// =============================================================
// Hex detail
// =============================================================

#[test]
fn hex_detail_url_appends_query() {
    assert_eq!(hex_detail_url("/api/hex", HexCoord::new(3, 4)), "/api/hex?row=3&col=4");
    assert_eq!(hex_detail_url("/api/hex?world=2", HexCoord::new(0, 11)), "/api/hex?world=2&row=0&col=11");
}
