use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rolodex_core::application::{
    CreateCustomer, CustomerCommandHandler, CustomerQueryHandler, CustomerView, DeleteCustomer,
    UpdateCustomer,
};
use rolodex_core::domain::CustomerId;
use rolodex_core::errors::{ApplicationError, InterfaceError};
use rolodex_core::ports::CustomerRepository;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct CustomersState {
    commands: Arc<CustomerCommandHandler>,
    queries: Arc<CustomerQueryHandler>,
}

impl CustomersState {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self {
            commands: Arc::new(CustomerCommandHandler::new(Arc::clone(&repository))),
            queries: Arc::new(CustomerQueryHandler::new(repository)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
    pub correlation_id: String,
}

/// Body of `PUT /api/customers/{id}`. The id is optional; when present it has
/// to name the same customer as the path.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub id: Option<Uuid>,
    pub phone_number: String,
    pub email: String,
    pub bank_account_number: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn router(repository: Arc<dyn CustomerRepository>) -> Router {
    Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/api/customers/by-email/{email}", get(get_customer_by_email))
        .with_state(CustomersState::new(repository))
}

pub async fn create_customer(
    State(state): State<CustomersState>,
    payload: Result<Json<CreateCustomer>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerView>), ApiError> {
    let correlation_id = new_correlation_id();
    let Json(command) = payload.map_err(|rejection| malformed_body(rejection, &correlation_id))?;

    let commands = Arc::clone(&state.commands);
    let view = spawn_command(&correlation_id, move |cancellation| async move {
        commands.create_with_cancellation(command, &cancellation).await
    })
    .await?;

    info!(
        event_name = "customer.created",
        correlation_id = %correlation_id,
        customer_id = %view.id,
        "customer created"
    );
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list_customers(
    State(state): State<CustomersState>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let correlation_id = new_correlation_id();
    let customers = state
        .queries
        .list_all()
        .await
        .map_err(|error| application_error(error, &correlation_id))?;
    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<CustomersState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerView>, ApiError> {
    let correlation_id = new_correlation_id();
    let id = parse_id(&id, &correlation_id)?;

    state
        .queries
        .get_by_id(&id)
        .await
        .map_err(|error| application_error(error, &correlation_id))?
        .map(Json)
        .ok_or_else(|| application_error(ApplicationError::NotFound(id), &correlation_id))
}

pub async fn get_customer_by_email(
    State(state): State<CustomersState>,
    Path(email): Path<String>,
) -> Result<Json<CustomerView>, ApiError> {
    let correlation_id = new_correlation_id();

    state
        .queries
        .get_by_email(&email)
        .await
        .map_err(|error| application_error(error, &correlation_id))?
        .map(Json)
        .ok_or_else(|| {
            interface_error(InterfaceError::NotFound {
                message: format!("no customer with email `{email}`"),
                correlation_id: correlation_id.clone(),
            })
        })
}

pub async fn update_customer(
    State(state): State<CustomersState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Result<Json<CustomerView>, ApiError> {
    let correlation_id = new_correlation_id();
    let id = parse_id(&id, &correlation_id)?;
    let Json(request) = payload.map_err(|rejection| malformed_body(rejection, &correlation_id))?;

    if let Some(body_id) = request.id.filter(|body_id| *body_id != id.0) {
        return Err(interface_error(InterfaceError::BadRequest {
            message: format!("body id `{body_id}` does not match path id `{id}`"),
            correlation_id,
        }));
    }

    let command = UpdateCustomer {
        id,
        phone_number: request.phone_number,
        email: request.email,
        bank_account_number: request.bank_account_number,
    };
    let commands = Arc::clone(&state.commands);
    let view = spawn_command(&correlation_id, move |cancellation| async move {
        commands.update_with_cancellation(command, &cancellation).await
    })
    .await?;

    info!(
        event_name = "customer.updated",
        correlation_id = %correlation_id,
        customer_id = %view.id,
        "customer contact details updated"
    );
    Ok(Json(view))
}

pub async fn delete_customer(
    State(state): State<CustomersState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let correlation_id = new_correlation_id();
    let id = parse_id(&id, &correlation_id)?;

    let commands = Arc::clone(&state.commands);
    spawn_command(&correlation_id, move |cancellation| async move {
        commands.delete_with_cancellation(DeleteCustomer { id }, &cancellation).await
    })
    .await?;

    info!(
        event_name = "customer.deleted",
        correlation_id = %correlation_id,
        customer_id = %id,
        "customer deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Runs a command on its own task. If the request future is dropped (client
/// gone), the guard cancels the token and the command stops before writing.
async fn spawn_command<T, F, Fut>(correlation_id: &str, command: F) -> Result<T, ApiError>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, ApplicationError>> + Send + 'static,
    T: Send + 'static,
{
    let cancellation = CancellationToken::new();
    let _cancel_on_drop = cancellation.clone().drop_guard();

    let outcome = tokio::spawn(command(cancellation)).await.map_err(|error| {
        interface_error(InterfaceError::Internal {
            message: format!("command task failed: {error}"),
            correlation_id: correlation_id.to_string(),
        })
    })?;

    outcome.map_err(|error| application_error(error, correlation_id))
}

fn parse_id(raw: &str, correlation_id: &str) -> Result<CustomerId, ApiError> {
    CustomerId::parse(raw).map_err(|error| {
        interface_error(InterfaceError::BadRequest {
            message: format!("`{raw}` is not a valid customer id: {error}"),
            correlation_id: correlation_id.to_string(),
        })
    })
}

fn malformed_body(rejection: JsonRejection, correlation_id: &str) -> ApiError {
    interface_error(InterfaceError::BadRequest {
        message: rejection.body_text(),
        correlation_id: correlation_id.to_string(),
    })
}

fn application_error(error: ApplicationError, correlation_id: &str) -> ApiError {
    interface_error(error.into_interface(correlation_id))
}

fn interface_error(error: InterfaceError) -> ApiError {
    let status = match &error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::Conflict { .. } => StatusCode::CONFLICT,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        warn!(
            event_name = "customer.request.failed",
            correlation_id = %error.correlation_id(),
            status = status.as_u16(),
            error = %error,
            "customer request failed"
        );
    } else {
        info!(
            event_name = "customer.request.rejected",
            correlation_id = %error.correlation_id(),
            status = status.as_u16(),
            detail = %error.message(),
            "customer request rejected"
        );
    }

    let body = ErrorBody {
        error: error.user_message().to_string(),
        detail: error.message().to_string(),
        correlation_id: error.correlation_id().to_string(),
    };
    (status, Json(body))
}

fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        extract::{Path, State},
        http::{Request, StatusCode},
        Json,
    };
    use chrono::NaiveDate;
    use rolodex_core::application::CreateCustomer;
    use rolodex_db::InMemoryCustomerRepository;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{
        create_customer, delete_customer, get_customer, router, update_customer, CustomersState,
        ErrorBody, UpdateCustomerRequest,
    };

    fn state() -> State<CustomersState> {
        State(CustomersState::new(Arc::new(InMemoryCustomerRepository::new())))
    }

    fn ada() -> CreateCustomer {
        CreateCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10).expect("date"),
            phone_number: "+44 7400 123456".to_string(),
            email: "Ada@Example.com".to_string(),
            bank_account_number: "GB82 WEST 1234 5698 7654 32".to_string(),
        }
    }

    #[tokio::test]
    async fn create_returns_created_with_normalized_projection() {
        let (status, Json(view)) =
            create_customer(state(), Ok(Json(ada()))).await.expect("create succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(view.email, "ada@example.com");
        assert_eq!(view.phone_number, "+447400123456");
        assert_eq!(view.bank_account_number, "GB82WEST12345698765432");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict_with_correlation_id() {
        let state = state();
        let (status, _) =
            create_customer(state.clone(), Ok(Json(ada()))).await.expect("first create");
        assert_eq!(status, StatusCode::CREATED);

        let mut twin = ada();
        twin.first_name = "Augusta".to_string();
        let (status, Json(body)) =
            create_customer(state, Ok(Json(twin))).await.expect_err("duplicate email");

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.detail.contains("email"));
        assert!(!body.correlation_id.is_empty());
    }

    #[tokio::test]
    async fn invalid_email_is_a_bad_request_naming_the_field() {
        let mut invalid = ada();
        invalid.email = "not-an-email".to_string();

        let (status, Json(body)) =
            create_customer(state(), Ok(Json(invalid))).await.expect_err("invalid email");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.detail.starts_with("email"));
    }

    #[tokio::test]
    async fn get_rejects_malformed_ids_and_reports_missing_ones() {
        let (status, _) = get_customer(state(), Path("not-a-uuid".to_string()))
            .await
            .expect_err("malformed id");
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_customer(state(), Path(uuid::Uuid::new_v4().to_string()))
            .await
            .expect_err("missing customer");
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_rejects_mismatched_body_id() {
        let state = state();
        let (_, Json(view)) = create_customer(state.clone(), Ok(Json(ada()))).await.expect("create");

        let (status, Json(body)) = update_customer(
            state,
            Path(view.id.to_string()),
            Ok(Json(UpdateCustomerRequest {
                id: Some(uuid::Uuid::new_v4()),
                phone_number: "+14155552671".to_string(),
                email: "ada@example.com".to_string(),
                bank_account_number: "GB82WEST12345698765432".to_string(),
            })),
        )
        .await
        .expect_err("id mismatch");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.detail.contains("does not match"));
    }

    #[tokio::test]
    async fn update_then_delete_round_trip() {
        let state = state();
        let (_, Json(view)) = create_customer(state.clone(), Ok(Json(ada()))).await.expect("create");

        let Json(updated) = update_customer(
            state.clone(),
            Path(view.id.to_string()),
            Ok(Json(UpdateCustomerRequest {
                id: Some(view.id),
                phone_number: "+1 415 555 2671".to_string(),
                email: "countess@example.com".to_string(),
                bank_account_number: "DE89 3704 0044 0532 0130 00".to_string(),
            })),
        )
        .await
        .expect("update");
        assert_eq!(updated.email, "countess@example.com");
        assert_eq!(updated.first_name, "Ada");

        let status =
            delete_customer(state.clone(), Path(view.id.to_string())).await.expect("delete");
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = delete_customer(state, Path(view.id.to_string()))
            .await
            .expect_err("second delete");
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn router_serves_customer_resource_end_to_end() {
        let app = router(Arc::new(InMemoryCustomerRepository::new()));

        let created = app
            .clone()
            .oneshot(
                Request::post("/api/customers")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "firstName": "Grace",
                            "lastName": "Hopper",
                            "dateOfBirth": "1906-12-09",
                            "phoneNumber": "+1 201 555 0123",
                            "email": "grace@example.com",
                            "bankAccountNumber": "DE89370400440532013000",
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(created.status(), StatusCode::CREATED);

        let found = app
            .clone()
            .oneshot(
                Request::get("/api/customers/by-email/GRACE@example.com")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(found.status(), StatusCode::OK);
        let bytes = to_bytes(found.into_body(), usize::MAX).await.expect("body");
        let view: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(view["lastName"], "Hopper");
        assert_eq!(view["dateOfBirth"], "1906-12-09");

        let listed = app
            .oneshot(Request::get("/api/customers").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let bytes = to_bytes(listed.into_body(), usize::MAX).await.expect("body");
        let views: Vec<Value> = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(views.len(), 1);
    }

    #[tokio::test]
    async fn malformed_json_gets_the_error_envelope() {
        let app = router(Arc::new(InMemoryCustomerRepository::new()));

        let response = app
            .oneshot(
                Request::post("/api/customers")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"firstName": "Grace", "dateOfBirth": "yesterday"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body: ErrorBody = serde_json::from_slice(&bytes).expect("error body");
        assert!(!body.error.is_empty());
        assert!(!body.correlation_id.is_empty());
    }
}
