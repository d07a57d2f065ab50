use bson::Document;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Method, Request, Response, StatusCode};
use serde::Serialize;
use tours_db::{MemoryCollection, seed};
use tours_query::{FieldFilter, FilterSpec, Operator, QueryParams, QueryTranslator};

use crate::config::{Environment, ToursConfig};
use crate::error::ToursHttpError;
use crate::response::{ErrorResponse, GENERIC_ERROR, ListResponse, TourResponse};

pub const TOURS_PATH: &str = "/api/v1/tours";
pub const TOP_RATED_BUDGET: &str = "top-rated-budget-tours";

/// Stored on every tour but only returned when a query selects them by name.
pub const PRIVATE_FIELDS: &[&str] = &["createdAt"];

/// Tours with `secretTour: true` never leave the collection.
pub fn hidden_secret_tours() -> FilterSpec {
    FilterSpec::new().with("secretTour", FieldFilter::compare(Operator::Ne, true))
}

/// Preset parameters of the top-rated budget tours alias. They override
/// whatever the request supplied for the same keys.
pub fn top_rated_budget_preset(params: &mut QueryParams) {
    params.insert("limit", "5");
    params.insert("sort", "-ratingsAverage,price");
    params.insert("select", "name,price,ratingsAverage,summary,difficulty");
}

/// Request handler for the tours resource.
pub struct ToursHttp {
    tours: MemoryCollection,
    config: ToursConfig,
}

impl ToursHttp {
    /// The collection is scoped to hide secret tours and keeps
    /// [`PRIVATE_FIELDS`] out of reads, replacing any scope or hidden fields
    /// it had.
    pub fn new(tours: MemoryCollection, config: ToursConfig) -> Self {
        Self {
            tours: tours
                .with_scope(hidden_secret_tours())
                .with_hidden_fields(PRIVATE_FIELDS.iter().copied()),
            config,
        }
    }

    pub fn collection(&self) -> &MemoryCollection {
        &self.tours
    }

    pub fn config(&self) -> &ToursConfig {
        &self.config
    }

    pub fn handle(&self, req: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let path = req.uri().path().trim_end_matches('/');
        let method = req.method();
        tracing::debug!(%method, path, "handling request");

        let result = match (method, route(path)) {
            (&Method::GET, Some(Route::Tours)) => self.list(query_params(&req)),
            (&Method::POST, Some(Route::Tours)) => self.create(req.body()),
            (&Method::GET, Some(Route::TopRatedBudget)) => {
                let mut params = query_params(&req);
                top_rated_budget_preset(&mut params);
                self.list(params)
            }
            (&Method::GET, Some(Route::Tour(id))) => self.get(id),
            (&Method::PATCH, Some(Route::Tour(id))) => self.update(id, req.body()),
            (&Method::DELETE, Some(Route::Tour(id))) => self.delete(id),
            _ => Err(ToursHttpError::RouteNotFound(req.uri().path().to_string())),
        };

        match result {
            Ok(response) => response,
            Err(e) => self.error_response(&e),
        }
    }

    fn list(&self, params: QueryParams) -> Result<Response<Vec<u8>>, ToursHttpError> {
        let directives = QueryTranslator::with_options(&params, &self.config.query).translate()?;
        tracing::debug!(?directives, "translated query");

        let tours = directives.apply(self.tours.query()).exec();
        json_response(StatusCode::OK, &ListResponse::new(&tours))
    }

    fn get(&self, id: &str) -> Result<Response<Vec<u8>>, ToursHttpError> {
        let tour = self
            .tours
            .find_by_id(id)
            .ok_or_else(|| ToursHttpError::NotFound(id.to_string()))?;
        json_response(StatusCode::OK, &TourResponse::new(&tour))
    }

    fn create(&self, body: &[u8]) -> Result<Response<Vec<u8>>, ToursHttpError> {
        let mut docs = vec![parse_body(body)?];
        seed::stamp_defaults(&mut docs);

        let mut tour = docs[0].clone();
        let ids = self.tours.insert_many(docs)?;
        let Some(id) = ids.into_iter().next() else {
            return Err(ToursHttpError::Body("no tour in request body".into()));
        };

        // secret tours are created but never found
        let tour = match self.tours.find_by_id(&id) {
            Some(found) => found,
            None => {
                if !tour.contains_key("_id") {
                    tour.insert("_id", id);
                }
                for field in PRIVATE_FIELDS {
                    tour.remove(*field);
                }
                tour
            }
        };
        json_response(StatusCode::CREATED, &TourResponse::new(&tour))
    }

    fn update(&self, id: &str, body: &[u8]) -> Result<Response<Vec<u8>>, ToursHttpError> {
        let changes = parse_body(body)?;
        let tour = self
            .tours
            .update_one(id, changes)?
            .ok_or_else(|| ToursHttpError::NotFound(id.to_string()))?;
        json_response(StatusCode::OK, &TourResponse::new(&tour))
    }

    fn delete(&self, id: &str) -> Result<Response<Vec<u8>>, ToursHttpError> {
        if !self.tours.delete_one(id) {
            return Err(ToursHttpError::NotFound(id.to_string()));
        }
        let mut response = Response::new(Vec::new());
        *response.status_mut() = StatusCode::NO_CONTENT;
        Ok(response)
    }

    fn error_response(&self, e: &ToursHttpError) -> Response<Vec<u8>> {
        let status = e.status_code();
        if e.is_operational() {
            tracing::warn!(%status, error = %e, "request rejected");
        } else {
            tracing::error!(%status, error = ?e, "request failed");
        }

        let body = match self.config.environment {
            Environment::Development => ErrorResponse {
                status: e.status_label().into(),
                message: e.to_string(),
                detail: Some(format!("{e:?}")),
            },
            Environment::Production if e.is_operational() => ErrorResponse {
                status: e.status_label().into(),
                message: e.to_string(),
                detail: None,
            },
            Environment::Production => ErrorResponse {
                status: e.status_label().into(),
                message: GENERIC_ERROR.into(),
                detail: None,
            },
        };

        match serde_json::to_vec(&body) {
            Ok(bytes) => raw_json_response(status, bytes),
            Err(_) => raw_json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!(r#"{{"status":"error","message":"{GENERIC_ERROR}"}}"#).into_bytes(),
            ),
        }
    }
}

enum Route<'a> {
    Tours,
    TopRatedBudget,
    Tour(&'a str),
}

fn route(path: &str) -> Option<Route<'_>> {
    let rest = path.strip_prefix(TOURS_PATH)?;
    if rest.is_empty() {
        return Some(Route::Tours);
    }
    match rest.strip_prefix('/')? {
        TOP_RATED_BUDGET => Some(Route::TopRatedBudget),
        id if !id.is_empty() && !id.contains('/') => Some(Route::Tour(id)),
        _ => None,
    }
}

fn parse_body(body: &[u8]) -> Result<Document, ToursHttpError> {
    serde_json::from_slice(body).map_err(|e| ToursHttpError::Body(e.to_string()))
}

fn query_params<T>(req: &Request<T>) -> QueryParams {
    req.uri()
        .query()
        .map(QueryParams::parse)
        .unwrap_or_default()
}

fn json_response(
    status: StatusCode,
    body: &impl Serialize,
) -> Result<Response<Vec<u8>>, ToursHttpError> {
    Ok(raw_json_response(status, serde_json::to_vec(body)?))
}

fn raw_json_response(status: StatusCode, body: Vec<u8>) -> Response<Vec<u8>> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes() {
        assert!(matches!(route("/api/v1/tours"), Some(Route::Tours)));
        assert!(matches!(
            route("/api/v1/tours/top-rated-budget-tours"),
            Some(Route::TopRatedBudget)
        ));
        assert!(matches!(route("/api/v1/tours/t1"), Some(Route::Tour("t1"))));
        assert!(route("/api/v1/tours/t1/reviews").is_none());
        assert!(route("/api/v1/toursx").is_none());
        assert!(route("/api/v1/users").is_none());
    }

    #[test]
    fn preset_overrides_request_values() {
        let mut params = QueryParams::parse("limit=50&sort=name&difficulty=easy");
        top_rated_budget_preset(&mut params);
        assert_eq!(params.get("limit"), Some(&"5".into()));
        assert_eq!(params.get("sort"), Some(&"-ratingsAverage,price".into()));
        assert_eq!(params.get("difficulty"), Some(&"easy".into()));
    }
}
