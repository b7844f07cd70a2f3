//! Full admin lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the typed client
//! facades over real HTTP through `ReqwestTransport`. Validates that path
//! resolution, query and body serialization, created-id extraction and the
//! fetch-merge-put update all line up with a server that replaces whole
//! objects on `PUT`.

use std::sync::Arc;
use std::time::Duration;

use kcadmin_core::representations::{
    ClientRepresentation, DecisionStrategy, PolicyRepresentation, ResourcePermissionRepresentation,
    ResourceRepresentation, RoleRepresentation, UserRepresentation,
};
use kcadmin_core::resources::{ClientQuery, UserQuery};
use kcadmin_core::{AdminClient, AmbientContext, ApiError, ReqwestTransport};
use serde_json::json;

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

fn admin(base_url: &str, realm: &str) -> AdminClient {
    let context = AmbientContext::new(base_url, realm).with_access_token(mock_server::ACCESS_TOKEN);
    let transport = ReqwestTransport::with_timeout(Duration::from_secs(5)).unwrap();
    AdminClient::new(Arc::new(transport), context)
}

#[tokio::test(flavor = "multi_thread")]
async fn client_lifecycle() {
    let base_url = start_server().await;
    let admin = admin(&base_url, "master");
    let clients = admin.clients();

    // Step 1: create and read back.
    let created = clients
        .create(&ClientRepresentation {
            client_id: Some("web".to_string()),
            description: Some("front end".to_string()),
            enabled: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!created.id.is_empty());

    let fetched = clients.find_one(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id.as_deref(), Some(created.id.as_str()));
    assert_eq!(fetched.client_id.as_deref(), Some("web"));

    // Step 2: find with a query.
    clients
        .create(&ClientRepresentation {
            client_id: Some("api".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let all = clients.find(&ClientQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    let only_web = clients
        .find(&ClientQuery {
            client_id: Some("web".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(only_web.len(), 1);
    assert_eq!(only_web[0].id, fetched.id);

    // Step 3: partial update keeps the fields it does not mention.
    clients
        .update(
            &created.id,
            &ClientRepresentation {
                description: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let updated = clients.find_one(&created.id).await.unwrap().unwrap();
    assert_eq!(updated.description.as_deref(), Some("renamed"));
    assert_eq!(updated.client_id.as_deref(), Some("web"));
    assert_eq!(updated.enabled, Some(true));

    // Step 4: secrets.
    let secret = clients.get_client_secret(&created.id).await.unwrap();
    let regenerated = clients.generate_new_client_secret(&created.id).await.unwrap();
    assert_eq!(regenerated.kind.as_deref(), Some("secret"));
    assert_ne!(secret.value, regenerated.value);
    assert_eq!(clients.get_client_secret(&created.id).await.unwrap(), regenerated);

    // Step 5: delete, then absence is reported as `None`.
    clients.del(&created.id).await.unwrap();
    assert!(clients.find_one(&created.id).await.unwrap().is_none());
    let err = clients.del(&created.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test(flavor = "multi_thread")]
async fn client_role_lifecycle() {
    let base_url = start_server().await;
    let admin = admin(&base_url, "master");
    let clients = admin.clients();
    let client = clients
        .create(&ClientRepresentation {
            client_id: Some("web".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let created = clients
        .create_role(
            &client.id,
            &RoleRepresentation {
                name: Some("read only".to_string()),
                description: Some("viewer".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.role_name, "read only");

    let role = clients.find_role(&client.id, "read only").await.unwrap().unwrap();
    assert_eq!(role.client_role, Some(true));
    assert_eq!(role.container_id.as_deref(), Some(client.id.as_str()));

    clients
        .update_role(
            &client.id,
            "read only",
            &RoleRepresentation {
                description: Some("read-only viewer".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let roles = clients.list_roles(&client.id).await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name.as_deref(), Some("read only"));
    assert_eq!(roles[0].description.as_deref(), Some("read-only viewer"));
    assert_eq!(roles[0].id, role.id);

    clients.del_role(&client.id, "read only").await.unwrap();
    assert!(clients.find_role(&client.id, "read only").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn authorization_services_lifecycle() {
    let base_url = start_server().await;
    let admin = admin(&base_url, "master");
    let clients = admin.clients();
    let client = clients
        .create(&ClientRepresentation {
            client_id: Some("docs-api".to_string()),
            authorization_services_enabled: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    // Step 1: a resource, a role policy and a permission tying them together.
    let resource = clients
        .create_client_resource(
            &client.id,
            &ResourceRepresentation {
                name: Some("documents".to_string()),
                uris: Some(vec!["/documents/*".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let resource_id = resource.id.clone().unwrap();

    let policy = clients
        .create_policy(
            &client.id,
            "role",
            &PolicyRepresentation {
                name: Some("only-editors".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let policy_id = policy.id.clone().unwrap();
    assert_eq!(policy.kind.as_deref(), Some("role"));

    let permission = clients
        .create_permission(
            &client.id,
            &ResourcePermissionRepresentation {
                name: Some("edit-documents".to_string()),
                resources: Some(vec![resource_id.clone()]),
                policies: Some(vec![policy_id.clone()]),
                decision_strategy: Some(DecisionStrategy::Unanimous),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let permission_id = permission.id.clone().unwrap();

    let permissions = clients.get_client_permissions(&client.id).await.unwrap();
    assert_eq!(permissions.len(), 1);
    let resources = clients.get_permission_resources(&client.id, &permission_id).await.unwrap();
    assert_eq!(resources[0]["_id"], json!(resource_id));
    let associated = clients.get_permission_policies(&client.id, &permission_id).await.unwrap();
    assert_eq!(associated[0]["name"], "only-editors");

    // Step 2: partial updates keep everything they do not mention.
    clients
        .update_permission(
            &client.id,
            &permission_id,
            &ResourcePermissionRepresentation {
                description: Some("editors may change documents".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let stored = clients.get_permission(&client.id, &permission_id).await.unwrap();
    assert_eq!(stored["description"], "editors may change documents");
    assert_eq!(stored["name"], "edit-documents");
    assert_eq!(stored["resources"], json!([resource_id]));
    assert_eq!(stored["decisionStrategy"], "UNANIMOUS");

    clients
        .update_resource(
            &client.id,
            &resource_id,
            &ResourceRepresentation {
                display_name: Some("Documents".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let resources = clients.get_client_resources(&client.id).await.unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].display_name.as_deref(), Some("Documents"));
    assert_eq!(resources[0].name.as_deref(), Some("documents"));
    assert_eq!(resources[0].uris, Some(vec!["/documents/*".to_string()]));

    clients
        .update_policy(
            &client.id,
            "role",
            &policy_id,
            &PolicyRepresentation {
                description: Some("editors only".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let policies = clients.get_policies(&client.id).await.unwrap();
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].name.as_deref(), Some("only-editors"));
    assert_eq!(policies[0].description.as_deref(), Some("editors only"));

    // Step 3: updating something that is gone never sends the PUT.
    let err = clients
        .update_policy(&client.id, "role", "missing", &PolicyRepresentation::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UpdateFetchFailed { .. }));

    // Step 4: delete everything.
    clients.delete_permission(&client.id, &permission_id).await.unwrap();
    clients.delete_resource(&client.id, &resource_id).await.unwrap();
    clients.delete_policy(&client.id, &policy_id).await.unwrap();
    assert!(clients.get_client_permissions(&client.id).await.unwrap().is_empty());
    assert!(clients.get_client_resources(&client.id).await.unwrap().is_empty());
    assert!(clients.get_policies(&client.id).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn user_lifecycle_in_a_second_realm() {
    let base_url = start_server().await;
    let master = admin(&base_url, "master");
    let test = master.with_realm("test");

    for name in ["alice", "bob", "bobby"] {
        test.users()
            .create(&UserRepresentation {
                username: Some(name.to_string()),
                enabled: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
    }
    assert!(master.users().find(&UserQuery::default()).await.unwrap().is_empty());

    let bobs = test
        .users()
        .find(&UserQuery {
            search: Some("bob".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(bobs.len(), 2);

    let page = test
        .users()
        .find(&UserQuery {
            first: Some(1),
            max: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].username.as_deref(), Some("bob"));

    let bob_id = page[0].id.clone().unwrap();
    test.users()
        .update(
            &bob_id,
            &UserRepresentation {
                email: Some("bob@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let bob = test.users().find_one(&bob_id).await.unwrap().unwrap();
    assert_eq!(bob.email.as_deref(), Some("bob@example.com"));
    assert_eq!(bob.username.as_deref(), Some("bob"));
    assert_eq!(bob.enabled, Some(true));

    test.users().del(&bob_id).await.unwrap();
    assert!(test.users().find_one(&bob_id).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn server_errors_are_reported() {
    let base_url = start_server().await;
    let admin = admin(&base_url, "master");

    // Update of a missing client fails on the prior fetch.
    let err = admin
        .clients()
        .update("missing", &ClientRepresentation::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UpdateFetchFailed { .. }));
    assert!(err.is_not_found());

    // Conflicts carry the server's error body.
    let web = ClientRepresentation {
        client_id: Some("web".to_string()),
        ..Default::default()
    };
    admin.clients().create(&web).await.unwrap();
    match admin.clients().create(&web).await.unwrap_err() {
        ApiError::Remote { status, body, .. } => {
            assert_eq!(status, 409);
            assert_eq!(body.unwrap()["errorMessage"], "Client web already exists");
        }
        other => panic!("unexpected error: {other}"),
    }

    // Without a token every call is rejected.
    let mut anonymous = admin.clone();
    anonymous.set_access_token(None);
    let err = anonymous.clients().find(&ClientQuery::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    // Unknown realms are a plain 404.
    let err = admin
        .with_realm("nope")
        .users()
        .find(&UserQuery::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
