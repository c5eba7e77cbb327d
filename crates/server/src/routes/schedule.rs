use crate::{
    current_user::CurrentUser,
    dtos::schedule::{
        ActivityResponse, CreateScheduleRequest, DeleteScheduleParams, MessageResponse,
        ScheduleQueryParams, ScheduleResponse, UpdateScheduleRequest,
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use database::{
    entities::{schedules, users},
    services::{activity_log::ActivityAction, error::ServiceError, schedule::ScheduleService},
};
use models::visibility::Viewer;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/schedules",
            get(get_schedules)
                .post(create_schedule)
                .put(update_schedule)
                .delete(delete_schedule),
        )
        .route("/schedules/{id}", get(get_schedule_by_id))
        .route("/schedules/{id}/history", get(get_schedule_history))
}

/// List the active schedule entries visible to the caller
#[utoipa::path(
    get,
    path = "/schedules",
    params(ScheduleQueryParams),
    responses(
        (status = 200, description = "Entries ordered by date and start time", body = Vec<ScheduleResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn get_schedules(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<ScheduleQueryParams>, QueryRejection>,
) -> Result<Json<Vec<ScheduleResponse>>, ApiError> {
    let Query(params) = params?;
    let viewer = Viewer::from(&user);
    let entries =
        ScheduleService::list(&state.db, &viewer, &params.filters(), params.limit).await?;

    Ok(Json(entries.into_iter().map(ScheduleResponse::from).collect()))
}

/// Get a single entry, including inactive ones, if the caller may see it
#[utoipa::path(
    get,
    path = "/schedules/{id}",
    params(
        ("id" = Uuid, Path, description = "Schedule entry ID")
    ),
    responses(
        (status = 200, description = "Entry found", body = ScheduleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Entry not found or not visible"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn get_schedule_by_id(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let Path(id) = id?;
    let viewer = Viewer::from(&user);

    ScheduleService::get(&state.db, &viewer, id)
        .await?
        .map(|details| Json(ScheduleResponse::from(details)))
        .ok_or(ApiError::not_found("Schedule"))
}

/// Audit trail of an entry, oldest first
#[utoipa::path(
    get,
    path = "/schedules/{id}/history",
    params(
        ("id" = Uuid, Path, description = "Schedule entry ID")
    ),
    responses(
        (status = 200, description = "Audit records", body = Vec<ActivityResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not manage schedules"),
        (status = 404, description = "Entry not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn get_schedule_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
    let Path(id) = id?;
    let history = ScheduleService::history(&state.db, &user, id).await?;

    Ok(Json(history.into_iter().map(ActivityResponse::from).collect()))
}

/// Create a schedule entry
#[utoipa::path(
    post,
    path = "/schedules",
    request_body = CreateScheduleRequest,
    responses(
        (status = 201, description = "Entry created", body = ScheduleResponse),
        (status = 400, description = "Missing required fields or malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not manage schedules"),
        (status = 404, description = "Subject or group not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CreateScheduleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ScheduleResponse>), ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return Err(reject(&state, &user, ActivityAction::Create, rejection.body_text()).await);
        }
    };

    let entry =
        ScheduleService::create(&state.db, state.notifier.as_ref(), &user, request.into()).await?;

    Ok((StatusCode::CREATED, Json(with_refs(&state, entry).await?)))
}

/// Update selected fields of a schedule entry
#[utoipa::path(
    put,
    path = "/schedules",
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Entry updated", body = ScheduleResponse),
        (status = 400, description = "Missing id or malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not manage schedules"),
        (status = 404, description = "Entry, subject or group not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<UpdateScheduleRequest>, JsonRejection>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return Err(reject(&state, &user, ActivityAction::Update, rejection.body_text()).await);
        }
    };

    let entry =
        ScheduleService::update(&state.db, state.notifier.as_ref(), &user, request.into()).await?;

    Ok(Json(with_refs(&state, entry).await?))
}

/// Soft-delete a schedule entry
#[utoipa::path(
    delete,
    path = "/schedules",
    params(DeleteScheduleParams),
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not manage schedules"),
        (status = 404, description = "Entry not found or already deleted"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<DeleteScheduleParams>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            return Err(reject(&state, &user, ActivityAction::Delete, rejection.body_text()).await);
        }
    };

    let entry =
        ScheduleService::soft_delete(&state.db, state.notifier.as_ref(), &user, params.id).await?;

    Ok(Json(MessageResponse {
        message: "Schedule deleted".to_string(),
        id: entry.id,
    }))
}

/// Audits a mutating request whose body or query could not be read
async fn reject(
    state: &AppState,
    user: &users::Model,
    action: ActivityAction,
    message: String,
) -> ApiError {
    ScheduleService::reject(&state.db, user, action, ServiceError::Validation(message))
        .await
        .into()
}

async fn with_refs(state: &AppState, entry: schedules::Model) -> Result<ScheduleResponse, ApiError> {
    let details = ScheduleService::with_refs(&state.db, vec![entry])
        .await?
        .pop()
        .ok_or(ApiError::not_found("Schedule"))?;

    Ok(ScheduleResponse::from(details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Extension,
        body::{Body, to_bytes},
        http::{Method, Request, header},
    };
    use database::{
        entities::{activity_logs, groups, subgroups, subjects, user_groups, users::GroupIds},
        services::notify::LogNotifier,
    };
    use models::role::Role;
    use sea_orm::{
        ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, Database,
        DatabaseConnection, EntityTrait, QueryFilter, Schema,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use tower_oauth2_resource_server::claims::DefaultClaims;

    async fn setup() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let backend = db.get_database_backend();
        let schema = Schema::new(backend);

        let statements = [
            schema.create_table_from_entity(groups::Entity),
            schema.create_table_from_entity(users::Entity),
            schema.create_table_from_entity(subjects::Entity),
            schema.create_table_from_entity(subgroups::Entity),
            schema.create_table_from_entity(user_groups::Entity),
            schema.create_table_from_entity(schedules::Entity),
            schema.create_table_from_entity(activity_logs::Entity),
        ];

        for statement in statements {
            db.execute(backend.build(&statement)).await.unwrap();
        }

        db
    }

    async fn insert_user(db: &DatabaseConnection, subject: &str, role: Role) -> users::Model {
        users::ActiveModel {
            id: Set(Uuid::new_v4()),
            auth_subject: Set(subject.to_string()),
            name: Set(subject.to_string()),
            role: Set(role),
            group_id: Set(None),
            mentored_group_ids: Set(GroupIds::default()),
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn insert_subject(db: &DatabaseConnection, name: &str) -> subjects::Model {
        subjects::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            lecturer_id: Set(None),
        }
        .insert(db)
        .await
        .unwrap()
    }

    fn claims(subject: &str) -> DefaultClaims {
        DefaultClaims {
            iss: None,
            sub: Some(subject.to_string()),
            aud: vec![],
            jti: None,
        }
    }

    /// The schedule routes with the given claims standing in for a validated token
    fn app(db: &DatabaseConnection, claims: Option<DefaultClaims>) -> Router {
        let routes = match claims {
            Some(claims) => router().layer(Extension(claims)),
            None => router(),
        };

        routes.with_state(AppState::new(db.clone(), Arc::new(LogNotifier)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn failures(db: &DatabaseConnection) -> Vec<activity_logs::Model> {
        activity_logs::Entity::find()
            .filter(activity_logs::Column::Status.eq("FAILURE"))
            .all(db)
            .await
            .unwrap()
    }

    fn create_body(subject_id: Uuid) -> String {
        json!({
            "subjectId": subject_id,
            "date": "2024-10-02",
            "startTime": "09:00:00",
            "endTime": "10:30:00",
            "location": "Room 1",
            "subgroupId": 1
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_create_returns_created_entry() {
        let db = setup().await;
        insert_user(&db, "admin", Role::Admin).await;
        let subject = insert_subject(&db, "Economics").await;
        let app = app(&db, Some(claims("admin")));

        let (status, body) = send(
            &app,
            Method::POST,
            "/schedules",
            Some(&create_body(subject.id)),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["dayOfWeek"], "Wednesday");
        assert_eq!(body["subject"]["name"], "Economics");
        assert_eq!(body["subgroupId"], Value::Null);
        assert_eq!(body["isActive"], true);

        let (status, body) = send(&app, Method::GET, "/schedules", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_unknown_or_missing_subject_claim_is_unauthorized() {
        let db = setup().await;
        insert_user(&db, "admin", Role::Admin).await;

        for app in [app(&db, Some(claims("nobody"))), app(&db, None)] {
            let (status, body) = send(&app, Method::GET, "/schedules", None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["error"], "Authentication required");
        }
    }

    #[tokio::test]
    async fn test_missing_fields_and_forbidden_roles() {
        let db = setup().await;
        insert_user(&db, "admin", Role::Admin).await;
        insert_user(&db, "student", Role::Student).await;
        let subject = insert_subject(&db, "Economics").await;

        let (status, body) = send(
            &app(&db, Some(claims("admin"))),
            Method::POST,
            "/schedules",
            Some("{}"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Missing required fields: subjectId, date, startTime, endTime"
        );

        let (status, body) = send(
            &app(&db, Some(claims("student"))),
            Method::POST,
            "/schedules",
            Some(&create_body(subject.id)),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_unreadable_mutations_are_json_errors_and_audited() {
        let db = setup().await;
        let admin = insert_user(&db, "admin", Role::Admin).await;
        let app = app(&db, Some(claims("admin")));

        let requests = [
            (Method::POST, "/schedules", Some("{not json")),
            (Method::PUT, "/schedules", Some(r#"{ "id": 5 }"#)),
            (Method::DELETE, "/schedules?id=a&id=b", None),
        ];

        for (method, uri, body) in requests {
            let (status, body) = send(&app, method.clone(), uri, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
            assert!(body["error"].is_string(), "{method} {uri}");
        }

        let failures = failures(&db).await;
        assert_eq!(failures.len(), 3);
        assert!(failures.iter().all(|log| log.user_id == Some(admin.id)));

        let mut actions: Vec<_> = failures.iter().map(|log| log.action.as_str()).collect();
        actions.sort();
        assert_eq!(actions, vec!["CREATE", "DELETE", "UPDATE"]);
    }

    #[tokio::test]
    async fn test_malformed_ids_are_not_found() {
        let db = setup().await;
        insert_user(&db, "admin", Role::Admin).await;
        let app = app(&db, Some(claims("admin")));

        let body = json!({
            "subjectId": "not-a-uuid",
            "date": "2024-10-02",
            "startTime": "09:00:00",
            "endTime": "10:30:00"
        })
        .to_string();
        let (status, body) = send(&app, Method::POST, "/schedules", Some(&body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Subject not found");

        let (status, body) = send(&app, Method::PUT, "/schedules", Some(r#"{ "id": "x" }"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Schedule not found");

        let (status, body) = send(&app, Method::DELETE, "/schedules?id=abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Schedule not found");

        assert_eq!(failures(&db).await.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let db = setup().await;
        insert_user(&db, "admin", Role::Admin).await;
        let subject = insert_subject(&db, "Economics").await;
        let app = app(&db, Some(claims("admin")));

        let (_, created) = send(
            &app,
            Method::POST,
            "/schedules",
            Some(&create_body(subject.id)),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();
        let uri = format!("/schedules?id={id}");

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Schedule deleted");
        assert_eq!(body["id"], id.as_str());

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Schedule not found");

        let (status, body) = send(&app, Method::GET, "/schedules", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = send(&app, Method::GET, &format!("/schedules/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isActive"], false);

        let (status, body) =
            send(&app, Method::GET, &format!("/schedules/{id}/history"), None).await;
        assert_eq!(status, StatusCode::OK);
        let actions: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|log| (log["action"].clone(), log["status"].clone()))
            .collect();
        assert!(actions.contains(&(json!("CREATE"), json!("SUCCESS"))));
        assert!(actions.contains(&(json!("DELETE"), json!("SUCCESS"))));
        assert!(actions.contains(&(json!("DELETE"), json!("FAILURE"))));
    }

    #[tokio::test]
    async fn test_unreadable_reads_are_json_errors() {
        let db = setup().await;
        insert_user(&db, "admin", Role::Admin).await;
        let app = app(&db, Some(claims("admin")));

        for uri in ["/schedules/not-a-uuid", "/schedules?date=yesterday"] {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/schedules/{}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Schedule not found");
    }
}
