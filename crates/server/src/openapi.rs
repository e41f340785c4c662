use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest { pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct RefreshRequest { pub refresh_token: String }

#[derive(utoipa::ToSchema)]
pub struct VerifyEmailRequest { pub token: String }

#[derive(utoipa::ToSchema)]
pub struct EmailRequest { pub email: String }

#[derive(utoipa::ToSchema)]
pub struct ResetPasswordRequest { pub token: String, pub new_password: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::logout,
        crate::routes::auth::logout_all,
        crate::routes::auth::me,
        crate::routes::auth::verify_email,
        crate::routes::auth::resend_verification,
        crate::routes::auth::password_reset_request,
        crate::routes::auth::password_reset_confirm,
        crate::routes::customers::create,
        crate::routes::customers::list,
        crate::routes::technicians::create,
        crate::routes::technicians::list,
        crate::routes::work_orders::create,
        crate::routes::work_orders::list,
        crate::routes::work_orders::assign,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            VerifyEmailRequest,
            EmailRequest,
            ResetPasswordRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "customers"),
        (name = "technicians"),
        (name = "work-orders")
    )
)]
pub struct ApiDoc;
