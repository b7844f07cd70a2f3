//! `/admin/realms/{realm}/clients`

use serde::Serialize;
use serde_json::{json, Value};

use crate::descriptor::RequestDescriptor;
use crate::error::ApiError;
use crate::executor::Executor;
use crate::representations::{
    ClientRepresentation, CreatedId, CreatedRole, CredentialRepresentation, PolicyRepresentation,
    ResourcePermissionRepresentation, ResourceRepresentation, RoleRepresentation, UserRepresentation,
};

pub const PREFIX: &str = "/admin/realms/{realm}/clients";

pub const FIND: RequestDescriptor = RequestDescriptor::get("/");
pub const CREATE: RequestDescriptor = RequestDescriptor::post("/").created_id_in_location("id");
pub const FIND_ONE: RequestDescriptor = RequestDescriptor::get("/{id}").url_params(&["id"]).catch_not_found();
pub const UPDATE: RequestDescriptor = RequestDescriptor::update("/{id}").url_params(&["id"]);
pub const DEL: RequestDescriptor = RequestDescriptor::delete("/{id}").url_params(&["id"]);

pub const CREATE_ROLE: RequestDescriptor = RequestDescriptor::post("/{id}/roles")
    .url_params(&["id"])
    .created_id_in_location("roleName");
pub const LIST_ROLES: RequestDescriptor = RequestDescriptor::get("/{id}/roles").url_params(&["id"]);
pub const FIND_ROLE: RequestDescriptor = RequestDescriptor::get("/{id}/roles/{roleName}")
    .url_params(&["id", "roleName"])
    .catch_not_found();
pub const UPDATE_ROLE: RequestDescriptor =
    RequestDescriptor::update("/{id}/roles/{roleName}").url_params(&["id", "roleName"]);
pub const DEL_ROLE: RequestDescriptor =
    RequestDescriptor::delete("/{id}/roles/{roleName}").url_params(&["id", "roleName"]);
pub const FIND_USERS_WITH_ROLE: RequestDescriptor =
    RequestDescriptor::get("/{id}/roles/{roleName}/users").url_params(&["id", "roleName"]);

pub const GET_SERVICE_ACCOUNT_USER: RequestDescriptor =
    RequestDescriptor::get("/{id}/service-account-user").url_params(&["id"]);

pub const GENERATE_NEW_CLIENT_SECRET: RequestDescriptor =
    RequestDescriptor::post("/{id}/client-secret").url_params(&["id"]);
pub const GET_CLIENT_SECRET: RequestDescriptor = RequestDescriptor::get("/{id}/client-secret").url_params(&["id"]);

pub const GET_CLIENT_PERMISSIONS: RequestDescriptor =
    RequestDescriptor::get("/{id}/authz/resource-server/permission").url_params(&["id"]);
pub const GET_PERMISSION: RequestDescriptor =
    RequestDescriptor::get("/{id}/authz/resource-server/permission/resource/{permissionId}")
        .url_params(&["id", "permissionId"]);
pub const GET_PERMISSION_RESOURCES: RequestDescriptor =
    RequestDescriptor::get("/{id}/authz/resource-server/permission/{permissionId}/resources")
        .url_params(&["id", "permissionId"]);
pub const GET_PERMISSION_POLICIES: RequestDescriptor =
    RequestDescriptor::get("/{id}/authz/resource-server/policy/{permissionId}/associatedPolicies")
        .url_params(&["id", "permissionId"]);
pub const UPDATE_PERMISSION: RequestDescriptor =
    RequestDescriptor::update("/{id}/authz/resource-server/permission/{permissionId}")
        .url_params(&["id", "permissionId"]);
pub const CREATE_PERMISSION: RequestDescriptor =
    RequestDescriptor::post("/{id}/authz/resource-server/permission/").url_params(&["id"]);
pub const DELETE_PERMISSION: RequestDescriptor =
    RequestDescriptor::delete("/{id}/authz/resource-server/permission/{permissionId}")
        .url_params(&["id", "permissionId"]);

pub const GET_CLIENT_RESOURCES: RequestDescriptor =
    RequestDescriptor::get("/{id}/authz/resource-server/resource").url_params(&["id"]);
pub const CREATE_CLIENT_RESOURCE: RequestDescriptor =
    RequestDescriptor::post("/{id}/authz/resource-server/resource").url_params(&["id"]);
pub const UPDATE_RESOURCE: RequestDescriptor =
    RequestDescriptor::update("/{id}/authz/resource-server/resource/{resourceId}")
        .url_params(&["id", "resourceId"]);
pub const DELETE_RESOURCE: RequestDescriptor =
    RequestDescriptor::delete("/{id}/authz/resource-server/resource/{resourceId}")
        .url_params(&["id", "resourceId"]);

pub const GET_POLICIES: RequestDescriptor =
    RequestDescriptor::get("/{id}/authz/resource-server/policy?permission=false").url_params(&["id"]);
pub const DELETE_POLICY: RequestDescriptor =
    RequestDescriptor::delete("/{id}/authz/resource-server/policy/{policyId}").url_params(&["id", "policyId"]);
pub const CREATE_POLICY: RequestDescriptor =
    RequestDescriptor::post("/{id}/authz/resource-server/policy/{type}").url_params(&["id", "type"]);
pub const UPDATE_POLICY: RequestDescriptor =
    RequestDescriptor::update("/{id}/authz/resource-server/policy/{type}/{policyId}")
        .url_params(&["id", "type", "policyId"]);

/// Every clients operation, keyed by name.
pub const OPERATIONS: &[(&str, RequestDescriptor)] = &[
    ("find", FIND),
    ("create", CREATE),
    ("findOne", FIND_ONE),
    ("update", UPDATE),
    ("del", DEL),
    ("createRole", CREATE_ROLE),
    ("listRoles", LIST_ROLES),
    ("findRole", FIND_ROLE),
    ("updateRole", UPDATE_ROLE),
    ("delRole", DEL_ROLE),
    ("findUsersWithRole", FIND_USERS_WITH_ROLE),
    ("getServiceAccountUser", GET_SERVICE_ACCOUNT_USER),
    ("generateNewClientSecret", GENERATE_NEW_CLIENT_SECRET),
    ("getClientSecret", GET_CLIENT_SECRET),
    ("getClientPermissions", GET_CLIENT_PERMISSIONS),
    ("getPermission", GET_PERMISSION),
    ("getPermissionResources", GET_PERMISSION_RESOURCES),
    ("getPermissionPolicies", GET_PERMISSION_POLICIES),
    ("updatePermission", UPDATE_PERMISSION),
    ("createPermission", CREATE_PERMISSION),
    ("deletePermission", DELETE_PERMISSION),
    ("getClientResources", GET_CLIENT_RESOURCES),
    ("createClientResource", CREATE_CLIENT_RESOURCE),
    ("updateResource", UPDATE_RESOURCE),
    ("deleteResource", DELETE_RESOURCE),
    ("getPolicies", GET_POLICIES),
    ("deletePolicy", DELETE_POLICY),
    ("createPolicy", CREATE_POLICY),
    ("updatePolicy", UPDATE_POLICY),
];

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewable_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Page {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

pub struct Clients<'a> {
    exec: Executor<'a>,
}

impl<'a> Clients<'a> {
    pub fn new(exec: Executor<'a>) -> Self {
        Self { exec }
    }

    pub async fn find(&self, query: &ClientQuery) -> Result<Vec<ClientRepresentation>, ApiError> {
        self.exec.execute(&FIND, query).await
    }

    pub async fn create(&self, client: &ClientRepresentation) -> Result<CreatedId, ApiError> {
        self.exec.execute(&CREATE, client).await
    }

    pub async fn find_one(&self, id: &str) -> Result<Option<ClientRepresentation>, ApiError> {
        self.exec.execute(&FIND_ONE, &json!({ "id": id })).await
    }

    /// Replaces the client with its current representation merged with `client`.
    pub async fn update(&self, id: &str, client: &ClientRepresentation) -> Result<(), ApiError> {
        self.exec.execute_with(&UPDATE, &json!({ "id": id }), client).await
    }

    pub async fn del(&self, id: &str) -> Result<(), ApiError> {
        self.exec.execute(&DEL, &json!({ "id": id })).await
    }

    pub async fn create_role(&self, id: &str, role: &RoleRepresentation) -> Result<CreatedRole, ApiError> {
        self.exec.execute_with(&CREATE_ROLE, &json!({ "id": id }), role).await
    }

    pub async fn list_roles(&self, id: &str) -> Result<Vec<RoleRepresentation>, ApiError> {
        self.exec.execute(&LIST_ROLES, &json!({ "id": id })).await
    }

    pub async fn find_role(&self, id: &str, role_name: &str) -> Result<Option<RoleRepresentation>, ApiError> {
        self.exec
            .execute(&FIND_ROLE, &json!({ "id": id, "roleName": role_name }))
            .await
    }

    pub async fn update_role(&self, id: &str, role_name: &str, role: &RoleRepresentation) -> Result<(), ApiError> {
        self.exec
            .execute_with(&UPDATE_ROLE, &json!({ "id": id, "roleName": role_name }), role)
            .await
    }

    pub async fn del_role(&self, id: &str, role_name: &str) -> Result<(), ApiError> {
        self.exec
            .execute(&DEL_ROLE, &json!({ "id": id, "roleName": role_name }))
            .await
    }

    pub async fn find_users_with_role(
        &self,
        id: &str,
        role_name: &str,
        page: Page,
    ) -> Result<Vec<UserRepresentation>, ApiError> {
        self.exec
            .execute_with(&FIND_USERS_WITH_ROLE, &json!({ "id": id, "roleName": role_name }), &page)
            .await
    }

    pub async fn get_service_account_user(&self, id: &str) -> Result<UserRepresentation, ApiError> {
        self.exec.execute(&GET_SERVICE_ACCOUNT_USER, &json!({ "id": id })).await
    }

    pub async fn generate_new_client_secret(&self, id: &str) -> Result<CredentialRepresentation, ApiError> {
        self.exec.execute(&GENERATE_NEW_CLIENT_SECRET, &json!({ "id": id })).await
    }

    pub async fn get_client_secret(&self, id: &str) -> Result<CredentialRepresentation, ApiError> {
        self.exec.execute(&GET_CLIENT_SECRET, &json!({ "id": id })).await
    }

    pub async fn get_client_permissions(&self, id: &str) -> Result<Vec<PolicyRepresentation>, ApiError> {
        self.exec.execute(&GET_CLIENT_PERMISSIONS, &json!({ "id": id })).await
    }

    pub async fn get_permission(&self, id: &str, permission_id: &str) -> Result<Value, ApiError> {
        self.exec
            .execute(&GET_PERMISSION, &json!({ "id": id, "permissionId": permission_id }))
            .await
    }

    pub async fn get_permission_resources(&self, id: &str, permission_id: &str) -> Result<Value, ApiError> {
        self.exec
            .execute(&GET_PERMISSION_RESOURCES, &json!({ "id": id, "permissionId": permission_id }))
            .await
    }

    pub async fn get_permission_policies(&self, id: &str, permission_id: &str) -> Result<Value, ApiError> {
        self.exec
            .execute(&GET_PERMISSION_POLICIES, &json!({ "id": id, "permissionId": permission_id }))
            .await
    }

    pub async fn update_permission(
        &self,
        id: &str,
        permission_id: &str,
        permission: &ResourcePermissionRepresentation,
    ) -> Result<(), ApiError> {
        self.exec
            .execute_with(
                &UPDATE_PERMISSION,
                &json!({ "id": id, "permissionId": permission_id }),
                permission,
            )
            .await
    }

    pub async fn create_permission(
        &self,
        id: &str,
        permission: &ResourcePermissionRepresentation,
    ) -> Result<ResourcePermissionRepresentation, ApiError> {
        self.exec
            .execute_with(&CREATE_PERMISSION, &json!({ "id": id }), permission)
            .await
    }

    pub async fn delete_permission(&self, id: &str, permission_id: &str) -> Result<(), ApiError> {
        self.exec
            .execute(&DELETE_PERMISSION, &json!({ "id": id, "permissionId": permission_id }))
            .await
    }

    pub async fn get_client_resources(&self, id: &str) -> Result<Vec<ResourceRepresentation>, ApiError> {
        self.exec.execute(&GET_CLIENT_RESOURCES, &json!({ "id": id })).await
    }

    pub async fn create_client_resource(
        &self,
        id: &str,
        resource: &ResourceRepresentation,
    ) -> Result<ResourceRepresentation, ApiError> {
        self.exec
            .execute_with(&CREATE_CLIENT_RESOURCE, &json!({ "id": id }), resource)
            .await
    }

    pub async fn update_resource(
        &self,
        id: &str,
        resource_id: &str,
        resource: &ResourceRepresentation,
    ) -> Result<(), ApiError> {
        self.exec
            .execute_with(&UPDATE_RESOURCE, &json!({ "id": id, "resourceId": resource_id }), resource)
            .await
    }

    pub async fn delete_resource(&self, id: &str, resource_id: &str) -> Result<(), ApiError> {
        self.exec
            .execute(&DELETE_RESOURCE, &json!({ "id": id, "resourceId": resource_id }))
            .await
    }

    pub async fn get_policies(&self, id: &str) -> Result<Vec<PolicyRepresentation>, ApiError> {
        self.exec.execute(&GET_POLICIES, &json!({ "id": id })).await
    }

    pub async fn delete_policy(&self, id: &str, policy_id: &str) -> Result<(), ApiError> {
        self.exec
            .execute(&DELETE_POLICY, &json!({ "id": id, "policyId": policy_id }))
            .await
    }

    /// `kind` selects the policy provider, e.g. `role` or `client`.
    pub async fn create_policy(
        &self,
        id: &str,
        kind: &str,
        policy: &PolicyRepresentation,
    ) -> Result<PolicyRepresentation, ApiError> {
        self.exec
            .execute_with(&CREATE_POLICY, &json!({ "id": id, "type": kind }), policy)
            .await
    }

    pub async fn update_policy(
        &self,
        id: &str,
        kind: &str,
        policy_id: &str,
        policy: &PolicyRepresentation,
    ) -> Result<(), ApiError> {
        self.exec
            .execute_with(
                &UPDATE_POLICY,
                &json!({ "id": id, "type": kind, "policyId": policy_id }),
                policy,
            )
            .await
    }
}
