//! Admin users and their roles.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{bind, item_path};
use crate::error::ApiError;
use crate::fetcher::{to_mutation_fetcher, to_query_fetcher, BoxedMutation, BoxedQuery};
use crate::request::RequestConfig;
use crate::transport::Transport;
use crate::types::{ListQuery, Paginated};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    #[serde(flatten)]
    pub list: ListQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug)]
pub struct UsersApi {
    pub get_users: BoxedQuery<UserFilter, Paginated<User>>,
    pub get_user: BoxedQuery<String, User>,
    pub create_user: BoxedMutation<CreateUser, User>,
    pub update_user: BoxedMutation<(String, UpdateUser), User>,
    pub delete_user: BoxedMutation<String, ()>,
    pub get_roles: BoxedQuery<(), Vec<Role>>,
    pub create_role: BoxedMutation<RoleInput, Role>,
    pub update_role: BoxedMutation<(String, RoleInput), Role>,
    pub delete_role: BoxedMutation<String, ()>,
}

impl UsersApi {
    pub(crate) fn new(transport: &Arc<Transport>) -> Self {
        Self {
            get_users: to_query_fetcher("getUsersApi", bind(transport, get_users)),
            get_user: to_query_fetcher("getUserApi", bind(transport, get_user)),
            create_user: to_mutation_fetcher("createUserApi", bind(transport, create_user))
                .invalidates(&["getUsersApi"]),
            update_user: to_mutation_fetcher("updateUserApi", bind(transport, update_user))
                .invalidates(&["getUsersApi", "getUserApi"]),
            delete_user: to_mutation_fetcher("deleteUserApi", bind(transport, delete_user))
                .invalidates(&["getUsersApi"]),
            get_roles: to_query_fetcher("getRolesApi", bind(transport, get_roles)),
            create_role: to_mutation_fetcher("createRoleApi", bind(transport, create_role))
                .invalidates(&["getRolesApi"]),
            update_role: to_mutation_fetcher("updateRoleApi", bind(transport, update_role))
                .invalidates(&["getRolesApi"]),
            // users embed a role id, so their lists go stale too
            delete_role: to_mutation_fetcher("deleteRoleApi", bind(transport, delete_role))
                .invalidates(&["getRolesApi", "getUsersApi"]),
        }
    }

    pub fn query_keys(&self) -> Vec<&str> {
        vec![
            self.get_users.query_key(),
            self.get_user.query_key(),
            self.create_user.query_key(),
            self.update_user.query_key(),
            self.delete_user.query_key(),
            self.get_roles.query_key(),
            self.create_role.query_key(),
            self.update_role.query_key(),
            self.delete_role.query_key(),
        ]
    }
}

async fn get_users(transport: Arc<Transport>, filter: UserFilter) -> Result<Paginated<User>, ApiError> {
    transport
        .private_request("/users", RequestConfig::get().params(&filter)?)
        .await
}

async fn get_user(transport: Arc<Transport>, id: String) -> Result<User, ApiError> {
    transport
        .private_request(&item_path("/users", &id), RequestConfig::get())
        .await
}

async fn create_user(transport: Arc<Transport>, input: CreateUser) -> Result<User, ApiError> {
    transport
        .private_request("/users", RequestConfig::post().json(&input)?)
        .await
}

async fn update_user(transport: Arc<Transport>, (id, input): (String, UpdateUser)) -> Result<User, ApiError> {
    transport
        .private_request(&item_path("/users", &id), RequestConfig::patch().json(&input)?)
        .await
}

async fn delete_user(transport: Arc<Transport>, id: String) -> Result<(), ApiError> {
    transport
        .private_request(&item_path("/users", &id), RequestConfig::delete())
        .await
}

async fn get_roles(transport: Arc<Transport>, _: ()) -> Result<Vec<Role>, ApiError> {
    transport.private_request("/roles", RequestConfig::get()).await
}

async fn create_role(transport: Arc<Transport>, input: RoleInput) -> Result<Role, ApiError> {
    transport
        .private_request("/roles", RequestConfig::post().json(&input)?)
        .await
}

async fn update_role(transport: Arc<Transport>, (id, input): (String, RoleInput)) -> Result<Role, ApiError> {
    transport
        .private_request(&item_path("/roles", &id), RequestConfig::put().json(&input)?)
        .await
}

async fn delete_role(transport: Arc<Transport>, id: String) -> Result<(), ApiError> {
    transport
        .private_request(&item_path("/roles", &id), RequestConfig::delete())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{self, json_body, Recorder, BASE_URL};
    use crate::http::HttpMethod;
    use serde_json::json;

    #[test]
    fn create_user_omits_missing_phone() {
        let json = serde_json::to_value(CreateUser {
            email: "staff@allure.vn".to_string(),
            full_name: "Staff".to_string(),
            password: "secret".to_string(),
            role_id: "r1".to_string(),
            phone: None,
        })
        .unwrap();
        assert!(json.get("phone").is_none());
        assert_eq!(json["roleId"], "r1");
    }

    #[tokio::test]
    async fn list_sends_role_and_activity_filters() {
        let recorder = Recorder::replying(r#"{"data":null}"#);
        let filter = UserFilter {
            role_id: Some("r-1".to_string()),
            is_active: Some(false),
            ..UserFilter::default()
        };
        let _ = testing::api(&recorder).users.get_users.call(filter).await;

        assert_eq!(recorder.last().url, format!("{BASE_URL}/users?isActive=false&roleId=r-1"));
    }

    #[tokio::test]
    async fn user_update_patches_only_given_fields() {
        let recorder = Recorder::replying(r#"{"data":null}"#);
        let update = UpdateUser {
            is_active: Some(false),
            ..UpdateUser::default()
        };
        let _ = testing::api(&recorder)
            .users
            .update_user
            .call(("u-1".to_string(), update))
            .await;

        let req = recorder.last();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, format!("{BASE_URL}/users/u-1"));
        assert_eq!(json_body(&req), json!({"isActive": false}));
    }

    #[tokio::test]
    async fn role_routes() {
        let recorder = Recorder::replying(r#"{"data":null}"#);
        let api = testing::api(&recorder);
        let role = RoleInput {
            name: "Staff".to_string(),
            description: None,
            permissions: vec!["bookings:read".to_string()],
        };
        let _ = api.users.update_role.call(("r-1".to_string(), role)).await;
        api.users.delete_role.call("r-1".to_string()).await.unwrap();

        let seen = recorder.requests();
        assert_eq!(seen[0].method, HttpMethod::Put);
        assert_eq!(seen[0].url, format!("{BASE_URL}/roles/r-1"));
        assert_eq!(json_body(&seen[0]), json!({"name": "Staff", "permissions": ["bookings:read"]}));
        assert_eq!(seen[1].method, HttpMethod::Delete);
        assert_eq!(seen[1].url, format!("{BASE_URL}/roles/r-1"));
    }
}
