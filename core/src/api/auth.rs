//! Sign-in and the current admin's profile.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::bind;
use crate::error::ApiError;
use crate::fetcher::{to_mutation_fetcher, to_query_fetcher, BoxedMutation, BoxedQuery};
use crate::request::RequestConfig;
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug)]
pub struct AuthApi {
    pub login: BoxedMutation<Credentials, LoginResponse>,
    pub logout: BoxedMutation<(), ()>,
    pub get_profile: BoxedQuery<(), Profile>,
    pub change_password: BoxedMutation<ChangePassword, ()>,
}

impl AuthApi {
    pub(crate) fn new(transport: &Arc<Transport>) -> Self {
        Self {
            login: to_mutation_fetcher("loginApi", bind(transport, login))
                .invalidates(&["getProfileApi"]),
            logout: to_mutation_fetcher("logoutApi", bind(transport, logout)),
            get_profile: to_query_fetcher("getProfileApi", bind(transport, get_profile)),
            change_password: to_mutation_fetcher("changePasswordApi", bind(transport, change_password)),
        }
    }

    pub fn query_keys(&self) -> Vec<&str> {
        vec![
            self.login.query_key(),
            self.logout.query_key(),
            self.get_profile.query_key(),
            self.change_password.query_key(),
        ]
    }
}

async fn login(transport: Arc<Transport>, credentials: Credentials) -> Result<LoginResponse, ApiError> {
    transport
        .public_request("/auth/login", RequestConfig::post().json(&credentials)?)
        .await
}

async fn logout(transport: Arc<Transport>, _: ()) -> Result<(), ApiError> {
    transport.private_request("/auth/logout", RequestConfig::post()).await
}

async fn get_profile(transport: Arc<Transport>, _: ()) -> Result<Profile, ApiError> {
    transport.private_request("/auth/me", RequestConfig::get()).await
}

async fn change_password(transport: Arc<Transport>, input: ChangePassword) -> Result<(), ApiError> {
    transport
        .private_request("/auth/password", RequestConfig::patch().json(&input)?)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_reads_camel_case() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"accessToken":"t","user":{"id":"u1","email":"a@allure.vn","fullName":"An","role":"admin"}}"#,
        )
        .unwrap();
        assert_eq!(response.access_token, "t");
        assert!(response.user.permissions.is_empty());
    }

    #[test]
    fn change_password_writes_camel_case() {
        let json = serde_json::to_value(ChangePassword {
            current_password: "old".to_string(),
            new_password: "new".to_string(),
        })
        .unwrap();
        assert_eq!(json["currentPassword"], "old");
        assert_eq!(json["newPassword"], "new");
    }
}
