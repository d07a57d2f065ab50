mod config;
mod error;
mod handler;
mod render;
mod response;

pub use config::{Environment, ToursConfig};
pub use error::ToursHttpError;
pub use handler::{
    PRIVATE_FIELDS, TOP_RATED_BUDGET, TOURS_PATH, ToursHttp, hidden_secret_tours,
    top_rated_budget_preset,
};
pub use render::render_tour;
pub use response::{ErrorResponse, GENERIC_ERROR, ListResponse, TourData, TourResponse, ToursData};
