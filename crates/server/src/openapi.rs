use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::errors::{ErrorCode, ErrorDescription, ErrorSeverity};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct RestaurantDtoDoc {
    pub id: Option<i64>,
    pub name: String,
    pub city: String,
    pub estimated_cost: i32,
    /// Decimal as text, e.g. `"4.2"`.
    pub average_rating: String,
    pub votes: i32,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct RestaurantShortDtoDoc {
    pub average_rating: Option<String>,
    pub votes: Option<i32>,
}

#[derive(ToSchema)]
pub struct NewEntityDtoDoc { pub id: i64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::restaurants::create,
        crate::restaurants::list,
        crate::restaurants::get_one,
        crate::restaurants::update,
        crate::restaurants::delete,
        crate::restaurants::query,
        crate::restaurants::sorted,
    ),
    components(
        schemas(
            HealthResponse,
            RestaurantDtoDoc,
            RestaurantShortDtoDoc,
            NewEntityDtoDoc,
            ErrorDescription,
            ErrorCode,
            ErrorSeverity,
        )
    ),
    tags(
        (name = "health"),
        (name = "restaurant")
    )
)]
pub struct ApiDoc;
