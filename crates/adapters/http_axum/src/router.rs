//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use fieldhub_app::ports::{AppointmentRepository, DirectoryRepository, ServiceRecordRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the JSON API under `/api` next to an unauthenticated `/health`
/// check. Includes a [`TraceLayer`] that logs each HTTP request/response at
/// the `DEBUG` level using the `tracing` ecosystem.
pub fn build<R, A, D>(state: AppState<R, A, D>) -> Router
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{USER_ID_HEADER, USER_ROLE_HEADER};
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use fieldhub_app::services::appointment_service::AppointmentService;
    use fieldhub_app::services::service_record_service::ServiceRecordService;
    use fieldhub_domain::appointment::Appointment;
    use fieldhub_domain::directory::{Client, Device, Technician};
    use fieldhub_domain::error::FieldHubError;
    use fieldhub_domain::id::{
        AppointmentId, ClientId, DeviceId, ServiceRecordId, TechnicianId, UserId,
    };
    use fieldhub_domain::query::{AppointmentFilter, Page, PageRequest, ServiceRecordFilter};
    use fieldhub_domain::rules::LifecycleRules;
    use fieldhub_domain::service_record::ServiceRecord;
    use tower::ServiceExt;

    struct StubServiceRecordRepo;
    struct StubAppointmentRepo;
    struct StubDirectory;

    impl ServiceRecordRepository for StubServiceRecordRepo {
        async fn create(&self, record: ServiceRecord) -> Result<ServiceRecord, FieldHubError> {
            Ok(record)
        }
        async fn get_by_id(
            &self,
            _id: ServiceRecordId,
        ) -> Result<Option<ServiceRecord>, FieldHubError> {
            Ok(None)
        }
        async fn find_by_appointment(
            &self,
            _appointment_id: AppointmentId,
        ) -> Result<Option<ServiceRecord>, FieldHubError> {
            Ok(None)
        }
        async fn query(
            &self,
            _filter: ServiceRecordFilter,
            page: PageRequest,
        ) -> Result<Page<ServiceRecord>, FieldHubError> {
            Ok(Page::new(vec![], 0, page))
        }
        async fn update(&self, record: ServiceRecord) -> Result<ServiceRecord, FieldHubError> {
            Ok(record)
        }
        async fn delete(&self, _id: ServiceRecordId) -> Result<(), FieldHubError> {
            Ok(())
        }
    }

    impl AppointmentRepository for StubAppointmentRepo {
        async fn create(&self, appointment: Appointment) -> Result<Appointment, FieldHubError> {
            Ok(appointment)
        }
        async fn get_by_id(&self, _id: AppointmentId) -> Result<Option<Appointment>, FieldHubError> {
            Ok(None)
        }
        async fn query(
            &self,
            _filter: AppointmentFilter,
            page: PageRequest,
        ) -> Result<Page<Appointment>, FieldHubError> {
            Ok(Page::new(vec![], 0, page))
        }
        async fn update(&self, appointment: Appointment) -> Result<Appointment, FieldHubError> {
            Ok(appointment)
        }
        async fn delete(&self, _id: AppointmentId) -> Result<(), FieldHubError> {
            Ok(())
        }
    }

    impl DirectoryRepository for StubDirectory {
        async fn get_client(&self, _id: ClientId) -> Result<Option<Client>, FieldHubError> {
            Ok(None)
        }
        async fn get_device(&self, _id: DeviceId) -> Result<Option<Device>, FieldHubError> {
            Ok(None)
        }
        async fn get_technician(
            &self,
            _id: TechnicianId,
        ) -> Result<Option<Technician>, FieldHubError> {
            Ok(None)
        }
    }

    fn test_app() -> Router {
        let rules = LifecycleRules::default();
        let state = AppState::new(
            ServiceRecordService::new(StubServiceRecordRepo, StubDirectory, rules.clone()),
            AppointmentService::new(StubAppointmentRepo, StubDirectory, rules),
        );
        build(state)
    }

    fn request(method: &str, uri: &str, role: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_ID_HEADER, UserId::new().to_string())
            .header(USER_ROLE_HEADER, role)
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_200_when_health_check_called() {
        let app = test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_return_401_when_caller_headers_missing() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/service-records")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_return_401_when_role_unknown() {
        let app = test_app();

        let response = app
            .oneshot(
                request("GET", "/api/appointments", "janitor")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_return_empty_page_when_no_records() {
        let app = test_app();

        let response = app
            .oneshot(
                request("GET", "/api/service-records?page=2&per_page=5", "technician")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 0);
        assert_eq!(body["page"], 2);
        assert_eq!(body["per_page"], 5);
        assert!(body["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_400_when_id_is_not_a_uuid() {
        let app = test_app();

        let response = app
            .oneshot(
                request("GET", "/api/service-records/not-a-uuid", "admin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("id"));
    }

    #[tokio::test]
    async fn should_return_404_when_appointment_unknown() {
        let app = test_app();

        let response = app
            .oneshot(
                request(
                    "GET",
                    &format!("/api/appointments/{}", AppointmentId::new()),
                    "dispatcher",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_404_when_converting_unknown_appointment() {
        let app = test_app();

        let response = app
            .oneshot(
                request(
                    "POST",
                    &format!("/api/appointments/{}/convert", AppointmentId::new()),
                    "technician",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_403_when_technician_deletes_record() {
        let app = test_app();

        let response = app
            .oneshot(
                request(
                    "DELETE",
                    &format!("/api/service-records/{}", ServiceRecordId::new()),
                    "technician",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn should_return_400_when_booking_lacks_client() {
        let app = test_app();

        let response = app
            .oneshot(
                request("POST", "/api/appointments", "dispatcher")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "client_id is required");
    }

    #[tokio::test]
    async fn should_return_400_json_when_body_has_unknown_service_type() {
        let app = test_app();

        let response = app
            .oneshot(
                request("POST", "/api/service-records", "technician")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"service_type":"bogus"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = json_body(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("invalid value"), "{message}");
        assert!(message.contains("for body"), "{message}");
    }

    #[tokio::test]
    async fn should_return_400_json_when_body_is_not_json() {
        let app = test_app();

        let response = app
            .oneshot(
                request("PATCH", &format!("/api/appointments/{}", AppointmentId::new()), "admin")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn should_return_400_json_when_query_has_unknown_status() {
        let app = test_app();

        let response = app
            .oneshot(
                request("GET", "/api/service-records?status=bogus", "admin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("for query"), "{message}");
    }

    #[tokio::test]
    async fn should_return_400_json_when_conversion_body_is_malformed() {
        let app = test_app();

        let response = app
            .oneshot(
                request(
                    "POST",
                    &format!("/api/appointments/{}/convert", AppointmentId::new()),
                    "admin",
                )
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"service_type":42}"#))
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
    }
}
