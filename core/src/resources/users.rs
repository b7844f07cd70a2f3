//! `/admin/realms/{realm}/users`

use serde::Serialize;
use serde_json::json;

use crate::descriptor::RequestDescriptor;
use crate::error::ApiError;
use crate::executor::Executor;
use crate::representations::{CreatedId, UserRepresentation};

pub const PREFIX: &str = "/admin/realms/{realm}/users";

pub const FIND: RequestDescriptor = RequestDescriptor::get("/");
pub const CREATE: RequestDescriptor = RequestDescriptor::post("/").created_id_in_location("id");
pub const FIND_ONE: RequestDescriptor = RequestDescriptor::get("/{id}").url_params(&["id"]).catch_not_found();
pub const UPDATE: RequestDescriptor = RequestDescriptor::update("/{id}").url_params(&["id"]);
pub const DEL: RequestDescriptor = RequestDescriptor::delete("/{id}").url_params(&["id"]);

pub const OPERATIONS: &[(&str, RequestDescriptor)] = &[
    ("find", FIND),
    ("create", CREATE),
    ("findOne", FIND_ONE),
    ("update", UPDATE),
    ("del", DEL),
];

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

pub struct Users<'a> {
    exec: Executor<'a>,
}

impl<'a> Users<'a> {
    pub fn new(exec: Executor<'a>) -> Self {
        Self { exec }
    }

    pub async fn find(&self, query: &UserQuery) -> Result<Vec<UserRepresentation>, ApiError> {
        self.exec.execute(&FIND, query).await
    }

    pub async fn create(&self, user: &UserRepresentation) -> Result<CreatedId, ApiError> {
        self.exec.execute(&CREATE, user).await
    }

    pub async fn find_one(&self, id: &str) -> Result<Option<UserRepresentation>, ApiError> {
        self.exec.execute(&FIND_ONE, &json!({ "id": id })).await
    }

    pub async fn update(&self, id: &str, user: &UserRepresentation) -> Result<(), ApiError> {
        self.exec.execute_with(&UPDATE, &json!({ "id": id }), user).await
    }

    pub async fn del(&self, id: &str) -> Result<(), ApiError> {
        self.exec.execute(&DEL, &json!({ "id": id })).await
    }
}
