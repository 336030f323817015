//! Restaurant HTTP handlers. DTO validation and mapping happen here; the
//! lifecycle rules live in `service::restaurant`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};
use utoipa::IntoParams;

use service::restaurant::domain::{Restaurant, RestaurantId};
use service::restaurant::dto::{NewEntityDto, RestaurantDto, RestaurantShortDto};
use service::restaurant::{mapper, UpdateOutcome};

use crate::errors::{ApiError, ErrorCode};
use crate::routes::ServerState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RestaurantQuery {
    /// Wins over `city` when both are given. `?id=` counts as absent.
    #[serde(default, deserialize_with = "blank_as_none")]
    #[param(value_type = Option<i64>)]
    pub id: Option<RestaurantId>,
    pub city: Option<String>,
}

fn blank_as_none<'de, D>(de: D) -> Result<Option<RestaurantId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(de)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn persisted_id(r: &Restaurant) -> Result<RestaurantId, ApiError> {
    r.id.ok_or_else(|| {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Exception, "restaurant persisted without id")
    })
}

fn created(id: RestaurantId) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/restaurant/{}", id))],
        Json(NewEntityDto { id }),
    )
        .into_response()
}

fn to_dtos(list: Vec<Restaurant>) -> Json<Vec<RestaurantDto>> {
    Json(list.iter().map(mapper::to_dto).collect())
}

#[utoipa::path(
    post, path = "/restaurant", tag = "restaurant",
    request_body = crate::openapi::RestaurantDtoDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::NewEntityDtoDoc),
        (status = 400, description = "Payload validation failed", body = crate::errors::ErrorDescription),
        (status = 422, description = "Duplicate restaurant", body = crate::errors::ErrorDescription)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<RestaurantDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(dto) = payload?;
    dto.validate_new()?;
    let candidate = mapper::from_dto(dto)?;
    let saved = state.restaurants.create(candidate).await?;
    let id = persisted_id(&saved)?;
    info!(id, "restaurant create request served");
    Ok(created(id))
}

#[utoipa::path(
    get, path = "/restaurant", tag = "restaurant",
    responses((status = 200, description = "All restaurants", body = [crate::openapi::RestaurantDtoDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<RestaurantDto>>, ApiError> {
    let all = state.restaurants.find_all().await?;
    debug!(count = all.len(), "list restaurants");
    Ok(to_dtos(all))
}

#[utoipa::path(
    get, path = "/restaurant/{id}", tag = "restaurant",
    params(("id" = i64, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::RestaurantDtoDoc),
        (status = 404, description = "Not Found", body = crate::errors::ErrorDescription)
    )
)]
pub async fn get_one(
    State(state): State<ServerState>,
    id: Result<Path<RestaurantId>, PathRejection>,
) -> Result<Json<RestaurantDto>, ApiError> {
    let Path(id) = id?;
    find_or_not_found(&state, id).await
}

async fn find_or_not_found(state: &ServerState, id: RestaurantId) -> Result<Json<RestaurantDto>, ApiError> {
    let found = state
        .restaurants
        .find_by_id(id)
        .await?
        .ok_or_else(|| service::errors::ServiceError::not_found(id))?;
    Ok(Json(mapper::to_dto(&found)))
}

/// Updates rating and votes; an unknown id creates the restaurant instead.
#[utoipa::path(
    put, path = "/restaurant/{id}", tag = "restaurant",
    params(("id" = i64, Path, description = "Restaurant id")),
    request_body = crate::openapi::RestaurantShortDtoDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::NewEntityDtoDoc),
        (status = 201, description = "Created", body = crate::openapi::NewEntityDtoDoc),
        (status = 400, description = "Payload validation failed", body = crate::errors::ErrorDescription)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<RestaurantId>, PathRejection>,
    payload: Result<Json<RestaurantShortDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let Json(short) = payload?;
    let candidate = mapper::from_dto(short.into_dto(Some(id)))?;
    match state.restaurants.update_or_create(candidate).await? {
        UpdateOutcome::Updated(r) => Ok(Json(NewEntityDto { id: persisted_id(&r)? }).into_response()),
        UpdateOutcome::Created(r) => Ok(created(persisted_id(&r)?)),
    }
}

#[utoipa::path(
    delete, path = "/restaurant/{id}", tag = "restaurant",
    params(("id" = i64, Path, description = "Restaurant id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::errors::ErrorDescription)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<RestaurantId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.restaurants.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/restaurant/query", tag = "restaurant",
    params(RestaurantQuery),
    responses(
        (status = 200, description = "One restaurant when `id` is given, otherwise a list filtered by city"),
        (status = 404, description = "Not Found", body = crate::errors::ErrorDescription)
    )
)]
pub async fn query(
    State(state): State<ServerState>,
    q: Result<Query<RestaurantQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(q) = q?;
    if let Some(id) = q.id {
        return Ok(find_or_not_found(&state, id).await?.into_response());
    }
    match q.city.as_deref() {
        Some(city) if !city.trim().is_empty() => {
            Ok(to_dtos(state.restaurants.find_all_by_city(city).await?).into_response())
        }
        _ => Ok(Json(Vec::<RestaurantDto>::new()).into_response()),
    }
}

#[utoipa::path(
    get, path = "/restaurant/sort", tag = "restaurant",
    responses((status = 200, description = "Highest rating first", body = [crate::openapi::RestaurantDtoDoc]))
)]
pub async fn sorted(State(state): State<ServerState>) -> Result<Json<Vec<RestaurantDto>>, ApiError> {
    Ok(to_dtos(state.restaurants.find_all_order_by_average_rating().await?))
}

/// Method fallback for the restaurant paths.
pub async fn not_supported(method: Method) -> ApiError {
    ApiError::not_supported(format!("Request method '{}' is not supported", method))
}

#[cfg(test)]
mod tests {
    use axum::http::Uri;

    use super::*;

    fn parse(uri: &'static str) -> Result<RestaurantQuery, QueryRejection> {
        Query::<RestaurantQuery>::try_from_uri(&Uri::from_static(uri)).map(|Query(q)| q)
    }

    #[test]
    fn blank_id_is_treated_as_absent() {
        let q = parse("/restaurant/query?id=&city=Austin").unwrap();
        assert_eq!(q.id, None);
        assert_eq!(q.city.as_deref(), Some("Austin"));

        assert_eq!(parse("/restaurant/query?id=%20").unwrap().id, None);
        assert_eq!(parse("/restaurant/query?city=Austin").unwrap().id, None);
    }

    #[test]
    fn numeric_id_still_parses_and_garbage_is_rejected() {
        assert_eq!(parse("/restaurant/query?id=7").unwrap().id, Some(7));
        assert!(parse("/restaurant/query?id=seven").is_err());
    }
}
