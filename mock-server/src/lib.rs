//! In-memory emulation of the realm-scoped admin API.
//!
//! Mirrors the behaviours the client engine depends on: `201 Created` with a
//! `Location` header on create, `404` for unknown ids, and whole-object
//! replacement on `PUT` (fields missing from the body are dropped). Every
//! route requires `Authorization: Bearer <ACCESS_TOKEN>`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const ACCESS_TOKEN: &str = "mock-admin-token";

type Object = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Realm {
    clients: HashMap<String, Object>,
    client_roles: HashMap<String, BTreeMap<String, Object>>,
    client_secrets: HashMap<String, String>,
    authz: HashMap<String, ResourceServer>,
    users: HashMap<String, Object>,
}

/// Authorization services of one client. Permissions reference resources and
/// policies by id in their `resources` and `policies` arrays.
#[derive(Debug, Default)]
pub struct ResourceServer {
    resources: BTreeMap<String, Object>,
    permissions: BTreeMap<String, Object>,
    policies: BTreeMap<String, Object>,
}

pub type Db = Arc<RwLock<HashMap<String, Realm>>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

/// Router with the `master` and `test` realms.
pub fn app() -> Router {
    app_with_realms(&["master", "test"])
}

pub fn app_with_realms(realms: &[&str]) -> Router {
    let db: Db = Arc::new(RwLock::new(
        realms.iter().map(|name| (name.to_string(), Realm::default())).collect(),
    ));
    Router::new()
        .route("/admin/realms/{realm}/clients", get(list_clients).post(create_client))
        .route(
            "/admin/realms/{realm}/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/roles",
            get(list_roles).post(create_role),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/roles/{role_name}",
            get(get_role).put(update_role).delete(delete_role),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/client-secret",
            get(get_client_secret).post(regenerate_client_secret),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/resource",
            get(list_resources).post(create_resource),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/resource/{key}",
            get(get_resource).put(update_resource).delete(delete_resource),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/permission",
            get(list_permissions),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/permission/",
            post(create_permission),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/permission/resource/{key}",
            get(get_permission),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/permission/{key}",
            get(get_permission).put(update_permission).delete(delete_permission),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/permission/{key}/resources",
            get(permission_resources),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/policy",
            get(list_policies),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/policy/{key}",
            post(create_policy).delete(delete_policy),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/policy/{key}/associatedPolicies",
            get(associated_policies),
        )
        .route(
            "/admin/realms/{realm}/clients/{id}/authz/resource-server/policy/{key}/{policy_id}",
            get(get_policy).put(update_policy),
        )
        .route("/admin/realms/{realm}/users", get(list_users).post(create_user))
        .route(
            "/admin/realms/{realm}/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let expected = format!("Bearer {ACCESS_TOKEN}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "HTTP 401 Unauthorized"}))).into_response();
    }
    next.run(request).await
}

// --- clients ---

async fn list_clients(
    State(db): State<Db>,
    Path(realm): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Object>>> {
    let realms = db.read().await;
    let realm = find_realm(&realms, &realm)?;
    let mut clients: Vec<Object> = realm
        .clients
        .values()
        .filter(|c| match query.get("clientId") {
            Some(wanted) => str_field(c, "clientId") == Some(wanted.as_str()),
            None => true,
        })
        .cloned()
        .collect();
    clients.sort_by(|a, b| str_field(a, "clientId").cmp(&str_field(b, "clientId")));
    Ok(Json(paginate(clients, &query)))
}

async fn create_client(
    State(db): State<Db>,
    Path(realm_name): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Object>,
) -> ApiResult<Response> {
    let client_id = required(&body, "clientId")?;
    let mut realms = db.write().await;
    let realm = find_realm_mut(&mut realms, &realm_name)?;
    if realm.clients.values().any(|c| str_field(c, "clientId") == Some(client_id.as_str())) {
        return Err(error(StatusCode::CONFLICT, format!("Client {client_id} already exists")));
    }

    let id = str_field(&body, "id")
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    body.insert("id".to_string(), Value::String(id.clone()));
    let secret = body
        .remove("secret")
        .and_then(|s| s.as_str().map(str::to_string))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    realm.clients.insert(id.clone(), body);
    realm.client_secrets.insert(id.clone(), secret);
    realm.client_roles.insert(id.clone(), BTreeMap::new());
    realm.authz.insert(id.clone(), ResourceServer::default());
    tracing::info!(realm = %realm_name, %id, %client_id, "client created");

    Ok(created(&headers, &format!("/admin/realms/{realm_name}/clients/{id}")))
}

async fn get_client(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
) -> ApiResult<Json<Object>> {
    let realms = db.read().await;
    let realm = find_realm(&realms, &realm)?;
    let client = realm.clients.get(&id).ok_or_else(|| not_found("Could not find client"))?;
    Ok(Json(client.clone()))
}

async fn update_client(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
    Json(mut body): Json<Object>,
) -> ApiResult<StatusCode> {
    required(&body, "clientId")?;
    let mut realms = db.write().await;
    let realm = find_realm_mut(&mut realms, &realm)?;
    let client = realm.clients.get_mut(&id).ok_or_else(|| not_found("Could not find client"))?;
    body.insert("id".to_string(), Value::String(id));
    *client = body;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_client(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let mut realms = db.write().await;
    let realm = find_realm_mut(&mut realms, &realm)?;
    realm.clients.remove(&id).ok_or_else(|| not_found("Could not find client"))?;
    realm.client_roles.remove(&id);
    realm.client_secrets.remove(&id);
    realm.authz.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// --- client roles ---

async fn list_roles(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Object>>> {
    let realms = db.read().await;
    let realm = find_realm(&realms, &realm)?;
    let roles = realm.client_roles.get(&id).ok_or_else(|| not_found("Could not find client"))?;
    Ok(Json(roles.values().cloned().collect()))
}

async fn create_role(
    State(db): State<Db>,
    Path((realm_name, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(mut body): Json<Object>,
) -> ApiResult<Response> {
    let name = required(&body, "name")?;
    let mut realms = db.write().await;
    let realm = find_realm_mut(&mut realms, &realm_name)?;
    let roles = realm.client_roles.get_mut(&id).ok_or_else(|| not_found("Could not find client"))?;
    if roles.contains_key(&name) {
        return Err(error(StatusCode::CONFLICT, format!("Role with name {name} already exists")));
    }

    body.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    body.insert("clientRole".to_string(), Value::Bool(true));
    body.insert("containerId".to_string(), Value::String(id.clone()));
    roles.insert(name.clone(), body);

    let location = format!(
        "/admin/realms/{realm_name}/clients/{id}/roles/{}",
        urlencoding::encode(&name)
    );
    Ok(created(&headers, &location))
}

async fn get_role(
    State(db): State<Db>,
    Path((realm, id, role_name)): Path<(String, String, String)>,
) -> ApiResult<Json<Object>> {
    let realms = db.read().await;
    let realm = find_realm(&realms, &realm)?;
    let role = realm
        .client_roles
        .get(&id)
        .and_then(|roles| roles.get(&role_name))
        .ok_or_else(|| not_found("Could not find role"))?;
    Ok(Json(role.clone()))
}

async fn update_role(
    State(db): State<Db>,
    Path((realm, id, role_name)): Path<(String, String, String)>,
    Json(mut body): Json<Object>,
) -> ApiResult<StatusCode> {
    let new_name = required(&body, "name")?;
    let mut realms = db.write().await;
    let realm = find_realm_mut(&mut realms, &realm)?;
    let roles = realm.client_roles.get_mut(&id).ok_or_else(|| not_found("Could not find client"))?;
    let current = roles.remove(&role_name).ok_or_else(|| not_found("Could not find role"))?;

    for key in ["id", "clientRole", "containerId"] {
        if let Some(value) = current.get(key) {
            body.insert(key.to_string(), value.clone());
        }
    }
    roles.insert(new_name, body);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_role(
    State(db): State<Db>,
    Path((realm, id, role_name)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    let mut realms = db.write().await;
    let realm = find_realm_mut(&mut realms, &realm)?;
    realm
        .client_roles
        .get_mut(&id)
        .and_then(|roles| roles.remove(&role_name))
        .ok_or_else(|| not_found("Could not find role"))?;
    Ok(StatusCode::NO_CONTENT)
}

// --- client secret ---

async fn get_client_secret(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let realms = db.read().await;
    let realm = find_realm(&realms, &realm)?;
    let secret = realm.client_secrets.get(&id).ok_or_else(|| not_found("Could not find client"))?;
    Ok(Json(json!({"type": "secret", "value": secret})))
}

async fn regenerate_client_secret(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let mut realms = db.write().await;
    let realm = find_realm_mut(&mut realms, &realm)?;
    let secret = realm.client_secrets.get_mut(&id).ok_or_else(|| not_found("Could not find client"))?;
    *secret = Uuid::new_v4().to_string();
    Ok(Json(json!({"type": "secret", "value": secret})))
}

// --- authorization services ---

const NO_RESOURCE: &str = "Resource does not exist";
const NO_POLICY: &str = "Policy not found";

async fn list_resources(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Object>>> {
    let realms = db.read().await;
    let server = resource_server(&realms, &realm, &id)?;
    Ok(Json(server.resources.values().cloned().collect()))
}

async fn create_resource(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
    Json(body): Json<Object>,
) -> ApiResult<(StatusCode, Json<Object>)> {
    let mut realms = db.write().await;
    let server = resource_server_mut(&mut realms, &realm, &id)?;
    let resource = insert_named(&mut server.resources, "_id", body)?;
    Ok((StatusCode::CREATED, Json(resource)))
}

async fn get_resource(
    State(db): State<Db>,
    Path((realm, id, key)): Path<(String, String, String)>,
) -> ApiResult<Json<Object>> {
    let realms = db.read().await;
    let server = resource_server(&realms, &realm, &id)?;
    let resource = server.resources.get(&key).ok_or_else(|| not_found(NO_RESOURCE))?;
    Ok(Json(resource.clone()))
}

async fn update_resource(
    State(db): State<Db>,
    Path((realm, id, key)): Path<(String, String, String)>,
    Json(body): Json<Object>,
) -> ApiResult<StatusCode> {
    let mut realms = db.write().await;
    let server = resource_server_mut(&mut realms, &realm, &id)?;
    replace_named(&mut server.resources, "_id", &key, body, NO_RESOURCE)
}

async fn delete_resource(
    State(db): State<Db>,
    Path((realm, id, key)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    let mut realms = db.write().await;
    let server = resource_server_mut(&mut realms, &realm, &id)?;
    server.resources.remove(&key).ok_or_else(|| not_found(NO_RESOURCE))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_permissions(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Object>>> {
    let realms = db.read().await;
    let server = resource_server(&realms, &realm, &id)?;
    Ok(Json(server.permissions.values().cloned().collect()))
}

async fn create_permission(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
    Json(mut body): Json<Object>,
) -> ApiResult<(StatusCode, Json<Object>)> {
    body.entry("type").or_insert_with(|| Value::String("resource".to_string()));
    let mut realms = db.write().await;
    let server = resource_server_mut(&mut realms, &realm, &id)?;
    let permission = insert_named(&mut server.permissions, "id", body)?;
    Ok((StatusCode::CREATED, Json(permission)))
}

async fn get_permission(
    State(db): State<Db>,
    Path((realm, id, key)): Path<(String, String, String)>,
) -> ApiResult<Json<Object>> {
    let realms = db.read().await;
    let server = resource_server(&realms, &realm, &id)?;
    let permission = server.permissions.get(&key).ok_or_else(|| not_found(NO_POLICY))?;
    Ok(Json(permission.clone()))
}

async fn update_permission(
    State(db): State<Db>,
    Path((realm, id, key)): Path<(String, String, String)>,
    Json(body): Json<Object>,
) -> ApiResult<StatusCode> {
    let mut realms = db.write().await;
    let server = resource_server_mut(&mut realms, &realm, &id)?;
    replace_named(&mut server.permissions, "id", &key, body, NO_POLICY)
}

async fn delete_permission(
    State(db): State<Db>,
    Path((realm, id, key)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    let mut realms = db.write().await;
    let server = resource_server_mut(&mut realms, &realm, &id)?;
    server.permissions.remove(&key).ok_or_else(|| not_found(NO_POLICY))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn permission_resources(
    State(db): State<Db>,
    Path((realm, id, key)): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<Object>>> {
    let realms = db.read().await;
    let server = resource_server(&realms, &realm, &id)?;
    let permission = server.permissions.get(&key).ok_or_else(|| not_found(NO_POLICY))?;
    Ok(Json(referenced(permission, "resources", &server.resources)))
}

async fn list_policies(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Object>>> {
    let realms = db.read().await;
    let server = resource_server(&realms, &realm, &id)?;
    Ok(Json(server.policies.values().cloned().collect()))
}

/// `key` is the policy type.
async fn create_policy(
    State(db): State<Db>,
    Path((realm, id, key)): Path<(String, String, String)>,
    Json(mut body): Json<Object>,
) -> ApiResult<(StatusCode, Json<Object>)> {
    body.insert("type".to_string(), Value::String(key));
    let mut realms = db.write().await;
    let server = resource_server_mut(&mut realms, &realm, &id)?;
    let policy = insert_named(&mut server.policies, "id", body)?;
    Ok((StatusCode::CREATED, Json(policy)))
}

/// `key` is the policy id.
async fn delete_policy(
    State(db): State<Db>,
    Path((realm, id, key)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    let mut realms = db.write().await;
    let server = resource_server_mut(&mut realms, &realm, &id)?;
    server.policies.remove(&key).ok_or_else(|| not_found(NO_POLICY))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `key` is the permission id.
async fn associated_policies(
    State(db): State<Db>,
    Path((realm, id, key)): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<Object>>> {
    let realms = db.read().await;
    let server = resource_server(&realms, &realm, &id)?;
    let permission = server.permissions.get(&key).ok_or_else(|| not_found(NO_POLICY))?;
    Ok(Json(referenced(permission, "policies", &server.policies)))
}

async fn get_policy(
    State(db): State<Db>,
    Path((realm, id, kind, policy_id)): Path<(String, String, String, String)>,
) -> ApiResult<Json<Object>> {
    let realms = db.read().await;
    let server = resource_server(&realms, &realm, &id)?;
    let policy = server
        .policies
        .get(&policy_id)
        .filter(|p| str_field(p, "type") == Some(kind.as_str()))
        .ok_or_else(|| not_found(NO_POLICY))?;
    Ok(Json(policy.clone()))
}

async fn update_policy(
    State(db): State<Db>,
    Path((realm, id, kind, policy_id)): Path<(String, String, String, String)>,
    Json(mut body): Json<Object>,
) -> ApiResult<StatusCode> {
    body.insert("type".to_string(), Value::String(kind));
    let mut realms = db.write().await;
    let server = resource_server_mut(&mut realms, &realm, &id)?;
    replace_named(&mut server.policies, "id", &policy_id, body, NO_POLICY)
}

// --- users ---

async fn list_users(
    State(db): State<Db>,
    Path(realm): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Object>>> {
    let realms = db.read().await;
    let realm = find_realm(&realms, &realm)?;
    let contains = |user: &Object, field: &str, needle: &str| {
        str_field(user, field).is_some_and(|v| v.to_lowercase().contains(&needle.to_lowercase()))
    };

    let mut users: Vec<Object> = realm
        .users
        .values()
        .filter(|u| {
            let search = query.get("search").map_or(true, |s| {
                ["username", "email", "firstName", "lastName"]
                    .iter()
                    .any(|field| contains(u, field, s))
            });
            let fields = ["username", "email", "firstName", "lastName"]
                .iter()
                .all(|field| query.get(*field).map_or(true, |s| contains(u, field, s)));
            search && fields
        })
        .cloned()
        .collect();
    users.sort_by(|a, b| str_field(a, "username").cmp(&str_field(b, "username")));
    Ok(Json(paginate(users, &query)))
}

async fn create_user(
    State(db): State<Db>,
    Path(realm_name): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Object>,
) -> ApiResult<Response> {
    let username = required(&body, "username")?.to_lowercase();
    let mut realms = db.write().await;
    let realm = find_realm_mut(&mut realms, &realm_name)?;
    if realm.users.values().any(|u| str_field(u, "username") == Some(username.as_str())) {
        return Err(error(StatusCode::CONFLICT, "User exists with same username".to_string()));
    }

    let id = Uuid::new_v4().to_string();
    body.insert("id".to_string(), Value::String(id.clone()));
    body.insert("username".to_string(), Value::String(username));
    realm.users.insert(id.clone(), body);
    tracing::info!(realm = %realm_name, %id, "user created");

    Ok(created(&headers, &format!("/admin/realms/{realm_name}/users/{id}")))
}

async fn get_user(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
) -> ApiResult<Json<Object>> {
    let realms = db.read().await;
    let realm = find_realm(&realms, &realm)?;
    let user = realm.users.get(&id).ok_or_else(|| not_found("User not found"))?;
    Ok(Json(user.clone()))
}

async fn update_user(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
    Json(mut body): Json<Object>,
) -> ApiResult<StatusCode> {
    required(&body, "username")?;
    let mut realms = db.write().await;
    let realm = find_realm_mut(&mut realms, &realm)?;
    let user = realm.users.get_mut(&id).ok_or_else(|| not_found("User not found"))?;
    body.insert("id".to_string(), Value::String(id));
    *user = body;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_user(
    State(db): State<Db>,
    Path((realm, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let mut realms = db.write().await;
    let realm = find_realm_mut(&mut realms, &realm)?;
    realm.users.remove(&id).ok_or_else(|| not_found("User not found"))?;
    Ok(StatusCode::NO_CONTENT)
}

// --- helpers ---

fn find_realm<'a>(realms: &'a HashMap<String, Realm>, name: &str) -> ApiResult<&'a Realm> {
    realms.get(name).ok_or_else(|| not_found("Realm not found."))
}

fn find_realm_mut<'a>(realms: &'a mut HashMap<String, Realm>, name: &str) -> ApiResult<&'a mut Realm> {
    realms.get_mut(name).ok_or_else(|| not_found("Realm not found."))
}

fn resource_server<'a>(
    realms: &'a HashMap<String, Realm>,
    realm: &str,
    client: &str,
) -> ApiResult<&'a ResourceServer> {
    let realm = find_realm(realms, realm)?;
    realm.authz.get(client).ok_or_else(|| not_found("Could not find client"))
}

fn resource_server_mut<'a>(
    realms: &'a mut HashMap<String, Realm>,
    realm: &str,
    client: &str,
) -> ApiResult<&'a mut ResourceServer> {
    let realm = find_realm_mut(realms, realm)?;
    realm.authz.get_mut(client).ok_or_else(|| not_found("Could not find client"))
}

/// Stores `body` under a fresh id written to `id_field`. Names are unique.
fn insert_named(store: &mut BTreeMap<String, Object>, id_field: &str, mut body: Object) -> ApiResult<Object> {
    let name = required(&body, "name")?;
    if store.values().any(|o| str_field(o, "name") == Some(name.as_str())) {
        return Err(error(StatusCode::CONFLICT, format!("{name} already exists")));
    }
    let id = Uuid::new_v4().to_string();
    body.insert(id_field.to_string(), Value::String(id.clone()));
    store.insert(id, body.clone());
    Ok(body)
}

/// Replaces the whole object stored under `id`, keeping only its id.
fn replace_named(
    store: &mut BTreeMap<String, Object>,
    id_field: &str,
    id: &str,
    mut body: Object,
    missing: &str,
) -> ApiResult<StatusCode> {
    required(&body, "name")?;
    let current = store.get_mut(id).ok_or_else(|| not_found(missing))?;
    body.insert(id_field.to_string(), Value::String(id.to_string()));
    *current = body;
    Ok(StatusCode::NO_CONTENT)
}

/// Objects of `store` whose ids are listed in `object[field]`.
fn referenced(object: &Object, field: &str, store: &BTreeMap<String, Object>) -> Vec<Object> {
    object
        .get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .filter_map(|id| store.get(id).cloned())
        .collect()
}

fn str_field<'a>(object: &'a Object, field: &str) -> Option<&'a str> {
    object.get(field).and_then(Value::as_str)
}

fn required(body: &Object, field: &str) -> ApiResult<String> {
    match str_field(body, field) {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(error(StatusCode::BAD_REQUEST, format!("{field} is required"))),
    }
}

fn paginate(items: Vec<Object>, query: &HashMap<String, String>) -> Vec<Object> {
    let first = query.get("first").and_then(|v| v.parse().ok()).unwrap_or(0);
    let max = query.get("max").and_then(|v| v.parse().ok()).unwrap_or(usize::MAX);
    items.into_iter().skip(first).take(max).collect()
}

fn created(headers: &HeaderMap, path: &str) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let location = format!("http://{host}{path}");
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::CREATED, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::CREATED.into_response(),
    }
}

fn not_found(message: &str) -> (StatusCode, Json<Value>) {
    error(StatusCode::NOT_FOUND, message.to_string())
}

fn error(status: StatusCode, message: String) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "errorMessage": message })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn required_rejects_blank_fields() {
        assert!(required(&object(json!({"clientId": "  "})), "clientId").is_err());
        assert!(required(&object(json!({})), "clientId").is_err());
        assert_eq!(required(&object(json!({"clientId": "x"})), "clientId").unwrap(), "x");
    }

    #[test]
    fn paginate_applies_first_and_max() {
        let items: Vec<Object> = (0..5).map(|i| object(json!({ "n": i }))).collect();
        let query: HashMap<String, String> =
            [("first", "1"), ("max", "2")].into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let page = paginate(items, &query);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["n"], 1);
    }

    #[test]
    fn referenced_skips_unknown_ids() {
        let mut store = BTreeMap::new();
        store.insert("r1".to_string(), object(json!({"_id": "r1", "name": "docs"})));
        let permission = object(json!({"resources": ["r1", "gone", 7]}));
        let found = referenced(&permission, "resources", &store);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], "docs");
        assert!(referenced(&permission, "policies", &store).is_empty());
    }

    #[test]
    fn replace_named_keeps_only_the_id() {
        let mut store = BTreeMap::new();
        let created = insert_named(&mut store, "_id", object(json!({"name": "docs", "uris": ["/a"]}))).unwrap();
        let id = created["_id"].as_str().unwrap().to_string();
        assert!(insert_named(&mut store, "_id", object(json!({"name": "docs"}))).is_err());

        let status = replace_named(&mut store, "_id", &id, object(json!({"name": "docs2"})), NO_RESOURCE).unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(Value::Object(store[&id].clone()), json!({"_id": id, "name": "docs2"}));
        assert!(replace_named(&mut store, "_id", "nope", object(json!({"name": "x"})), NO_RESOURCE).is_err());
    }

    #[test]
    fn created_builds_absolute_location() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("127.0.0.1:9999"));
        let response = created(&headers, "/admin/realms/master/users/u1");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "http://127.0.0.1:9999/admin/realms/master/users/u1"
        );
    }
}
