use bson::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::render::render_tour;

pub const SUCCESS: &str = "success";

/// Generic message for errors whose details must not leak.
pub const GENERIC_ERROR: &str = "Something went very wrong";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub status: String,
    pub results: usize,
    pub data: ToursData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToursData {
    pub tours: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourResponse {
    pub status: String,
    pub data: TourData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourData {
    pub tour: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ListResponse {
    pub fn new(tours: &[Document]) -> Self {
        ListResponse {
            status: SUCCESS.into(),
            results: tours.len(),
            data: ToursData {
                tours: tours.iter().map(render_tour).collect(),
            },
        }
    }
}

impl TourResponse {
    pub fn new(tour: &Document) -> Self {
        TourResponse {
            status: SUCCESS.into(),
            data: TourData {
                tour: render_tour(tour),
            },
        }
    }
}
