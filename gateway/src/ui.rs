//! Embedded single-page dashboard

/// Dashboard page. Talks to `/api/v1` only; map tiles, Leaflet, Plotly and
/// Font Awesome load from public CDNs.
pub const INDEX_HTML: &str = include_str!("../static/index.html");
