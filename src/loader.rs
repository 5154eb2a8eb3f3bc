//! Map and hex-detail loading over HTTP.
//!
//! The engine never talks to the network directly. It goes through the
//! [`Fetch`] trait so the browser uses [`HttpFetch`] (`gloo-net`) and tests
//! use an in-memory stub.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures map to [`GridError::Fetch`], non-2xx responses to
//! [`GridError::Status`], and bad payloads to [`GridError::Parse`] or
//! [`GridError::EmptyGrid`]. Callers decide whether to log or propagate.

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;

use serde_json::Value;

use crate::error::GridError;
use crate::grid::{Grid, HexCoord, MapData};

/// Turns a raw map payload into grid data. World and city payloads differ.
pub type MapParser = Box<dyn Fn(Value) -> Result<MapData, GridError>>;

/// Minimal async JSON GET.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Fetch `url` and decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Fetch`], [`GridError::Status`], or [`GridError::Parse`].
    async fn get_json(&self, url: &str) -> Result<Value, GridError>;
}

/// Browser fetcher backed by `gloo-net`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetch;

impl Fetch for HttpFetch {
    async fn get_json(&self, url: &str) -> Result<Value, GridError> {
        let resp = gloo_net::http::Request::get(url)
            .send()
            .await
            .map_err(|e| GridError::Fetch(e.to_string()))?;
        let status = resp.status();
        if !(200..300).contains(&status) {
            return Err(GridError::Status(status));
        }
        resp.json::<Value>().await.map_err(|e| GridError::Parse(e.to_string()))
    }
}

/// Parser for the plain `{ grid, rows?, cols? }` payload.
///
/// # Errors
///
/// Returns [`GridError::Parse`] if the payload does not have that shape.
pub fn default_parser(raw: Value) -> Result<MapData, GridError> {
    Ok(serde_json::from_value(raw)?)
}

/// Parse a fetched payload and build a grid from it.
///
/// # Errors
///
/// Propagates parser errors and [`GridError::EmptyGrid`].
pub fn build_grid(raw: Value, parser: &dyn Fn(Value) -> Result<MapData, GridError>) -> Result<Grid, GridError> {
    Grid::from_map_data(parser(raw)?)
}

/// `base` with `row` and `col` query parameters appended.
#[must_use]
pub fn hex_detail_url(base: &str, coord: HexCoord) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}row={}&col={}", coord.row, coord.col)
}
