use axum::{Router, extract::State, response::Response, routing::get};
use serde_json::json;
use tune_core::{AttributeTable, RegistryError, Tunable};

use super::{pause, reply};

/// Hello-world and health endpoints.
#[derive(Debug, Clone)]
pub struct MockService {
    pub delay_hello_world: Tunable<i64>,
    pub hello_world_rs: Tunable<String>,
    pub hello_status_code: Tunable<i32>,
    pub response_value: Tunable<i32>,
    pub delay_hello: Tunable<i64>,
    pub hello_rs: Tunable<String>,

    pub delay_health_check: Tunable<i64>,
    pub health_check_rs: Tunable<String>,
    pub health_status_code: Tunable<i32>,
    pub health_true: Tunable<bool>,
}

impl Default for MockService {
    fn default() -> Self {
        Self {
            delay_hello_world: Tunable::new(1000),
            hello_world_rs: Tunable::new("Hello World!".into()),
            hello_status_code: Tunable::new(200),
            response_value: Tunable::new(5030),
            delay_hello: Tunable::new(111),
            hello_rs: Tunable::new("Hello!".into()),
            delay_health_check: Tunable::new(500),
            health_check_rs: Tunable::new("OK".into()),
            health_status_code: Tunable::new(200),
            health_true: Tunable::new(true),
        }
    }
}

impl MockService {
    pub const NAME: &'static str = "MockService";

    pub fn table(&self) -> Result<AttributeTable, RegistryError> {
        AttributeTable::builder(Self::NAME)
            .long("delayHelloWorld", &self.delay_hello_world)
            .text("stringHelloWorldRs", &self.hello_world_rs)
            .int("intHelloStatusCode", &self.hello_status_code)
            .int("intResponseValue", &self.response_value)
            .long("delayHello", &self.delay_hello)
            .text("stringHell", &self.hello_rs)
            .long("delayHealthCheck", &self.delay_health_check)
            .text("stringHealthCheckRs", &self.health_check_rs)
            .int("intHealthStatusCode", &self.health_status_code)
            .bool("isHealthTrue", &self.health_true)
            .build()
    }

    pub fn routes(&self) -> Router {
        Router::new()
            .route("/hello", get(hello))
            .route("/health", get(health))
            .with_state(self.clone())
    }
}

async fn hello(State(svc): State<MockService>) -> Response {
    pause(svc.delay_hello_world.get()).await;
    reply(
        svc.hello_status_code.get(),
        json!({
            "message": svc.hello_world_rs.get(),
            "responseValue": svc.response_value.get().to_string(),
        }),
    )
}

async fn health(State(svc): State<MockService>) -> Response {
    pause(svc.delay_health_check.get()).await;
    reply(
        svc.health_status_code.get(),
        json!({
            "status": svc.health_check_rs.get(),
            "isHealthy": svc.health_true.get().to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use tune_core::{Fleet, StaticLevel};
    use tune_model::Category;

    use super::*;

    fn quick() -> MockService {
        let svc = MockService::default();
        svc.delay_hello_world.set(0);
        svc.delay_health_check.set(0);
        svc
    }

    async fn call(svc: &MockService, uri: &str) -> (StatusCode, Value) {
        let res = svc
            .routes()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn table_exposes_every_attribute() {
        let table = MockService::default().table().unwrap();

        assert_eq!(table.len(), 10);
        assert_eq!(
            table.extract(Category::Delay).get("delayHelloWorld").map(String::as_str),
            Some("1000")
        );
        assert_eq!(
            table.extract(Category::Is).get("isHealthTrue").map(String::as_str),
            Some("true")
        );
    }

    #[tokio::test]
    async fn hello_reflects_defaults() {
        let (status, body) = call(&quick(), "/hello").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hello World!");
        assert_eq!(body["responseValue"], "5030");
    }

    #[tokio::test]
    async fn applied_document_changes_responses() {
        let svc = quick();
        let fleet = Fleet::builder().register(svc.table().unwrap()).build();

        let doc = serde_json::from_value(serde_json::json!({
            "intParams": {"intHealthStatusCode": "503"},
            "stringParams": {"stringHealthCheckRs": "DEGRADED"},
            "booleanVariables": {"isHealthTrue": "false"}
        }))
        .unwrap();
        fleet.distribute(&doc, &StaticLevel::default());

        let (status, body) = call(&svc, "/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "DEGRADED");
        assert_eq!(body["isHealthy"], "false");
    }

    #[tokio::test(start_paused = true)]
    async fn hello_waits_for_configured_delay() {
        let svc = MockService::default();
        svc.delay_hello_world.set(250);
        let started = tokio::time::Instant::now();

        let (status, _) = call(&svc, "/hello").await;

        assert_eq!(status, StatusCode::OK);
        assert!(started.elapsed() >= std::time::Duration::from_millis(250));
    }
}
