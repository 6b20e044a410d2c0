use axum::{Router, extract::State, response::Response, routing::get};
use serde_json::json;
use tune_core::{AttributeTable, RegistryError, Tunable};

use super::{pause, reply};

/// Login and data-fetch endpoints.
///
/// The upper-case attributes are not used by any handler; they are exposed to the
/// controller as naming examples.
#[derive(Debug, Clone)]
pub struct UserService {
    pub delay_user_login: Tunable<i64>,
    pub user_login_response: Tunable<String>,
    pub user_login_status_code: Tunable<i32>,
    pub user_id: Tunable<i32>,

    pub delay_data_fetch: Tunable<i64>,
    pub data_fetch_result: Tunable<String>,
    pub data_fetch_status_code: Tunable<i32>,
    pub data_available: Tunable<bool>,

    pub delay_user_action: Tunable<i64>,
    pub user_status: Tunable<String>,
    pub legacy_user_id: Tunable<i32>,
    pub user_active: Tunable<bool>,
}

impl Default for UserService {
    fn default() -> Self {
        Self {
            delay_user_login: Tunable::new(1200),
            user_login_response: Tunable::new("User logged in successfully".into()),
            user_login_status_code: Tunable::new(200),
            user_id: Tunable::new(12345),
            delay_data_fetch: Tunable::new(600),
            data_fetch_result: Tunable::new("Data retrieved".into()),
            data_fetch_status_code: Tunable::new(200),
            data_available: Tunable::new(true),
            delay_user_action: Tunable::new(1500),
            user_status: Tunable::new("ACTIVE".into()),
            legacy_user_id: Tunable::new(99999),
            user_active: Tunable::new(true),
        }
    }
}

impl UserService {
    pub const NAME: &'static str = "UserService";

    pub fn table(&self) -> Result<AttributeTable, RegistryError> {
        AttributeTable::builder(Self::NAME)
            .long("delayUserLogin", &self.delay_user_login)
            .text("stringUserLoginResponse", &self.user_login_response)
            .int("intUserLoginStatusCode", &self.user_login_status_code)
            .int("intUserId", &self.user_id)
            .long("delayDataFetch", &self.delay_data_fetch)
            .text("stringDataFetchResult", &self.data_fetch_result)
            .int("intDataFetchStatusCode", &self.data_fetch_status_code)
            .bool("isDataAvailable", &self.data_available)
            .long("DELAY_USER_ACTION", &self.delay_user_action)
            .text("STRING_USER_STATUS", &self.user_status)
            .int("INT_USER_ID", &self.legacy_user_id)
            .bool("IS_USER_ACTIVE", &self.user_active)
            .build()
    }

    pub fn routes(&self) -> Router {
        Router::new()
            .route("/user/login", get(login))
            .route("/user/data", get(data))
            .with_state(self.clone())
    }
}

async fn login(State(svc): State<UserService>) -> Response {
    pause(svc.delay_user_login.get()).await;
    reply(
        svc.user_login_status_code.get(),
        json!({
            "result": svc.user_login_response.get(),
            "userId": svc.user_id.get().to_string(),
        }),
    )
}

async fn data(State(svc): State<UserService>) -> Response {
    pause(svc.delay_data_fetch.get()).await;
    reply(
        svc.data_fetch_status_code.get(),
        json!({
            "data": svc.data_fetch_result.get(),
            "isAvailable": svc.data_available.get().to_string(),
        }),
    )
}
