//! Olive parcel models

use serde::{Deserialize, Serialize};

use crate::types::{LonLat, ParcelGeometry};

/// A monitored parcel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parcel {
    pub id: String,
    pub name: String,
    pub region: String,
    pub geometry: ParcelGeometry,
    pub area_hectares: f64,
    pub trees_count: u32,
}

/// Built-in demonstration parcels in the Tunisian olive belt
pub fn demo_parcels() -> Vec<Parcel> {
    vec![
        Parcel {
            id: "sfax-north-001".to_string(),
            name: "Sfax Northern Grove".to_string(),
            region: "Sfax".to_string(),
            geometry: rectangle(10.7012, 34.8234, 10.7156, 34.8298),
            area_hectares: 45.2,
            trees_count: 1800,
        },
        Parcel {
            id: "sousse-coastal-002".to_string(),
            name: "Sousse Coastal Olives".to_string(),
            region: "Sousse".to_string(),
            geometry: rectangle(10.5934, 35.8012, 10.6078, 35.8089),
            area_hectares: 32.8,
            trees_count: 1200,
        },
        Parcel {
            id: "kairouan-inland-003".to_string(),
            name: "Kairouan Heritage Field".to_string(),
            region: "Kairouan".to_string(),
            geometry: rectangle(10.0912, 35.6756, 10.1023, 35.6834),
            area_hectares: 28.5,
            trees_count: 950,
        },
    ]
}

/// Look up a demo parcel by id
pub fn find_demo_parcel(id: &str) -> Option<Parcel> {
    demo_parcels().into_iter().find(|p| p.id == id)
}

/// Closed axis-aligned ring from south-west to north-east corners
fn rectangle(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> ParcelGeometry {
    ParcelGeometry::new(vec![
        LonLat::new(min_lon, min_lat),
        LonLat::new(min_lon, max_lat),
        LonLat::new(max_lon, max_lat),
        LonLat::new(max_lon, min_lat),
        LonLat::new(min_lon, min_lat),
    ])
}
