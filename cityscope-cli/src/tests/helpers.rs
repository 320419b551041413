//! Request fixtures written to temporary directories.

use camino::Utf8PathBuf;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

/// A temporary workspace holding a request file.
#[derive(Debug)]
pub(super) struct RequestFile {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl RequestFile {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _dir: dir,
            path: root.join("request.json"),
        }
    }

    pub(super) fn with_json(value: &Value) -> Self {
        let file = Self::new();
        file.write(value.to_string().as_bytes());
        file
    }

    pub(super) fn write(&self, contents: &[u8]) {
        fs::write(&self.path, contents).expect("write request file");
    }

    pub(super) fn path(&self) -> Utf8PathBuf {
        self.path.clone()
    }
}

fn square(min_x: f64) -> Value {
    json!([[[
        [min_x, 0.0],
        [min_x + 0.01, 0.0],
        [min_x + 0.01, 0.01],
        [min_x, 0.01],
        [min_x, 0.0]
    ]]])
}

/// Three adjacent regions west to east with rents 1000, 2000 and 3000.
///
/// Weights only reward affordability, so the expected ranking is
/// `west`, `centre`, `east`.
pub(super) fn three_region_request() -> Value {
    json!({
        "regions": [
            { "id": "east", "city": "Vancouver", "population": 30000.0, "polygons": square(0.02) },
            { "id": "west", "city": "Vancouver", "population": 10000.0, "polygons": square(0.0) },
            { "id": "centre", "city": "Burnaby", "population": 20000.0, "polygons": square(0.01) }
        ],
        "points": [
            { "id": 1, "x": 0.005, "y": 0.005, "category": "school" },
            { "id": 2, "x": 0.015, "y": 0.005, "tags": { "highway": "bus_stop" } },
            { "id": 3, "x": 0.025, "y": 0.005, "category": "parks" },
            { "id": 4, "x": 9.0, "y": 9.0, "category": "mall" }
        ],
        "rents": [
            { "region_id": "west", "year": 2024, "bed_type": "1br", "avg_rent": 1000.0 },
            { "region_id": "centre", "year": 2024, "bed_type": "1br", "avg_rent": 2000.0 },
            { "region_id": "east", "year": 2024, "bed_type": "1br", "avg_rent": 3000.0 },
            { "region_id": "east", "year": 2023, "bed_type": "1br", "avg_rent": 100.0 }
        ],
        "rent_key": { "bed_type": "1br", "year": 2024 },
        "weights": { "rent": 1.0, "transit": 0.0, "amenities": 0.0, "size": 0.0, "schools": 0.0 }
    })
}

/// Region ids of a printed table, in output order.
pub(super) fn region_ids(regions: &Value) -> Vec<String> {
    regions
        .as_array()
        .expect("regions array")
        .iter()
        .map(|region| {
            region["metrics"]["region_id"]
                .as_str()
                .expect("region id")
                .to_owned()
        })
        .collect()
}
