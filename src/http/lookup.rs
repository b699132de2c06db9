use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::carrier::{city_search, warehouse_listing, CarrierError, LookupRequest};
use crate::http::request::read_lookup_body;
use crate::http::response::ApiError;
use crate::http::server::AppState;

/// `POST /api/novaposhta`: the body is the carrier envelope.
pub async fn novaposhta(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    let body = read_lookup_body(request).await?;
    relay(&state, LookupRequest::PassThrough(body)).await
}

/// `POST /api/getCities`: `{query}` or a full envelope.
pub async fn get_cities(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    let body = read_lookup_body(request).await?;
    relay(&state, city_search(body)?).await
}

/// `POST /api/getWarehouses`: `{cityRef}` / `{CityRef}` or a full envelope.
pub async fn get_warehouses(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    let body = read_lookup_body(request).await?;
    relay(&state, warehouse_listing(body)?).await
}

async fn relay(state: &AppState, lookup: LookupRequest) -> Result<Response, ApiError> {
    match state.carrier.lookup(lookup).await {
        Ok(reply) => Ok((reply.status, Json(reply.body)).into_response()),
        Err(e) => {
            match &e {
                CarrierError::Transport(_) | CarrierError::Decode { .. } => {
                    tracing::error!(error = %e, "Carrier proxy error");
                }
                _ => tracing::warn!(error = %e, "Carrier lookup refused"),
            }
            Err(e.into())
        }
    }
}
