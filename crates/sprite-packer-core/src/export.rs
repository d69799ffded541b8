use crate::model::PackingResult;
use serde::Serialize;
use serde_json::{Value, json};

/// Serialize a layout as `{ width, height, efficiency, placements, stats }`.
///
/// Each placement is `{ x, y, w, h, payload }`, enough for a compositor to blit images
/// and for a stylesheet generator to emit one rule per item.
pub fn to_json<P: Serialize>(result: &PackingResult<P>) -> Value {
    let placements: Vec<Value> = result
        .placements
        .iter()
        .map(|p| {
            json!({
                "x": p.x,
                "y": p.y,
                "w": p.item.width,
                "h": p.item.height,
                "payload": &p.item.payload,
            })
        })
        .collect();
    json!({
        "width": result.width,
        "height": result.height,
        "efficiency": result.efficiency(),
        "placements": placements,
        "stats": &result.stats,
    })
}
