// Copyright (C) 2026 NPLBAM contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Form, Json, Router,
    extract::{
        State as AxumState,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use nplbam_accounts::{
    AccountForm, AccountFormValidator, AccountInfo, AccountPolicy, AccountValidation,
    MIN_PASSWORD_ENTROPY_BITS, PasswordStrength, USER_LEVEL_MAX,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use tracing::{info, warn};

/// NPLBAM Accounts Server - account form validation over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Highest user level an account may be given
    #[arg(long, default_value_t = USER_LEVEL_MAX)]
    user_level_max: u8,

    /// Minimum password entropy, in bits
    #[arg(long, default_value_t = MIN_PASSWORD_ENTROPY_BITS)]
    min_entropy_bits: u32,
}

impl Args {
    const fn policy(&self) -> AccountPolicy {
        AccountPolicy::new(self.user_level_max, self.min_entropy_bits)
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The validator, configured from the command line.
    validator: AccountFormValidator,
}

/// API request for estimating a password's strength.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct PasswordStrengthApiRequest {
    /// The candidate password.
    password: String,
}

/// API response for a validated account form.
#[derive(Debug, Clone, Serialize)]
struct AccountValidationApiResponse {
    /// Whether the form passed every check.
    valid: bool,
    /// The validated account, for redisplay.
    account: AccountInfo,
    /// User-facing error messages, in check order.
    errors: Vec<String>,
}

impl From<AccountValidation> for AccountValidationApiResponse {
    fn from(validation: AccountValidation) -> Self {
        let (account, errors): (AccountInfo, Vec<String>) = validation.into_parts();
        Self {
            valid: account.valid,
            account,
            errors,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Always true.
    error: bool,
    /// A human-readable error message.
    message: String,
}

/// An HTTP error carrying a status and a message.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<FormRejection> for HttpError {
    fn from(rejection: FormRejection) -> Self {
        warn!(status = %rejection.status(), "Rejected account form body");
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), "Rejected password strength body");
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Validates an account form and logs the outcome.
fn validate_account_form(
    app_state: &AppState,
    form: &AccountForm,
    editing_existing: bool,
) -> AccountValidationApiResponse {
    let validation: AccountValidation = app_state.validator.validate(form, editing_existing);

    info!(
        username = %form.username,
        editing_existing,
        valid = validation.is_valid(),
        error_count = validation.errors.len(),
        "Account form validated"
    );

    AccountValidationApiResponse::from(validation)
}

/// Handler for POST `/new_account` endpoint.
///
/// A blank password is an error when creating an account.
async fn handle_new_account(
    AxumState(app_state): AxumState<AppState>,
    form: Result<Form<AccountForm>, FormRejection>,
) -> Result<Json<AccountValidationApiResponse>, HttpError> {
    let Form(form) = form?;
    Ok(Json(validate_account_form(&app_state, &form, false)))
}

/// Handler for POST `/edit_account` endpoint.
///
/// A blank password keeps the account's current password.
async fn handle_edit_account(
    AxumState(app_state): AxumState<AppState>,
    form: Result<Form<AccountForm>, FormRejection>,
) -> Result<Json<AccountValidationApiResponse>, HttpError> {
    let Form(form) = form?;
    Ok(Json(validate_account_form(&app_state, &form, true)))
}

/// Handler for POST `/password_strength` endpoint.
async fn handle_password_strength(
    AxumState(app_state): AxumState<AppState>,
    req: Result<Json<PasswordStrengthApiRequest>, JsonRejection>,
) -> Result<Json<PasswordStrength>, HttpError> {
    let Json(req) = req?;
    let strength: PasswordStrength = app_state.validator.estimator().estimate(&req.password);

    info!(
        entropy_bits = strength.entropy_bits,
        meets_minimum = strength.meets_minimum,
        "Handled password strength request"
    );

    Ok(Json(strength))
}

/// Handler for GET `/policy` endpoint.
async fn handle_get_policy(AxumState(app_state): AxumState<AppState>) -> Json<AccountPolicy> {
    Json(*app_state.validator.policy())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/new_account", post(handle_new_account))
        .route("/edit_account", post(handle_edit_account))
        .route("/password_strength", post(handle_password_strength))
        .route("/policy", get(handle_get_policy))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing NPLBAM Accounts Server");

    let policy: AccountPolicy = args.policy();
    info!(
        user_level_max = policy.user_level_max,
        min_password_entropy_bits = policy.min_password_entropy_bits,
        "Using account policy"
    );

    let app_state: AppState = AppState {
        validator: AccountFormValidator::new(policy),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
