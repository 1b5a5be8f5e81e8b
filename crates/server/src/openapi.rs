use utoipa::OpenApi;
use utoipa::ToSchema;

/// Any JSON object; collections are schemaless.
#[derive(ToSchema)]
pub struct DocumentDoc {
    pub _id: Option<String>,
}

/// Identity submitted to `/jwt`; embedded verbatim in the token.
#[derive(ToSchema)]
pub struct IdentityDoc {
    pub email: Option<String>,
}

#[derive(ToSchema)]
pub struct ConfirmationDoc {
    #[schema(rename = "confirmationStatus")]
    pub confirmation_status: Option<String>,
}

#[derive(ToSchema)]
pub struct SuccessDoc { pub success: bool }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct InsertOneResultDoc {
    pub acknowledged: bool,
    #[schema(rename = "insertedId")]
    pub inserted_id: String,
}

#[derive(ToSchema)]
pub struct UpdateResultDoc {
    pub acknowledged: bool,
    #[schema(rename = "matchedCount")]
    pub matched_count: u64,
    #[schema(rename = "modifiedCount")]
    pub modified_count: u64,
    #[schema(rename = "upsertedId")]
    pub upserted_id: Option<String>,
    #[schema(rename = "upsertedCount")]
    pub upserted_count: u64,
}

#[derive(ToSchema)]
pub struct DeleteResultDoc {
    pub acknowledged: bool,
    #[schema(rename = "deletedCount")]
    pub deleted_count: u64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::liveness,
        crate::routes::auth::issue_jwt,
        crate::routes::applied_users::create,
        crate::routes::applied_users::list,
        crate::routes::applied_users::find_one,
        crate::routes::services::list,
        crate::routes::services::search,
        crate::routes::services::get,
        crate::routes::products::create,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::bookings::create,
        crate::routes::bookings::list_all,
        crate::routes::bookings::list_mine,
        crate::routes::bookings::delete,
        crate::routes::bookings::update_status,
    ),
    components(
        schemas(
            DocumentDoc,
            IdentityDoc,
            ConfirmationDoc,
            SuccessDoc,
            MessageDoc,
            InsertOneResultDoc,
            UpdateResultDoc,
            DeleteResultDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "appliedUsers"),
        (name = "services"),
        (name = "products"),
        (name = "bookings"),
    )
)]
pub struct ApiDoc;
