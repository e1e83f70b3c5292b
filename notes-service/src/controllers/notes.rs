//! Notes REST API — create, list, update and delete over the notes table.

use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError, web};
use notes_types::{CreateNoteRequest, CreatedResponse, MessageResponse, UpdateNoteRequest};

use crate::AppState;
use crate::error::{NoteError, NoteResult};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(web::resource("/insert2").route(web::post().to(insert_note)))
        .service(web::resource("/update2/{id}").route(web::put().to(update_note)))
        .service(web::resource("/viewAll2/").route(web::get().to(list_notes)))
        .service(web::resource("/delete2/{id}").route(web::delete().to(delete_note)));
}

/// Unparseable bodies get the same 400 as a missing field
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("[NOTES] Rejected request body: {}", err);
    NoteError::Validation(err.to_string()).into()
}

/// Presence check only: a key sent as `null` counts as present
fn required<T>(value: Option<T>, field: &str) -> NoteResult<T> {
    value.ok_or_else(|| NoteError::Validation(format!("{} is required", field)))
}

fn log_failure(action: &str, err: &NoteError) {
    match err {
        NoteError::Validation(_) | NoteError::NotFound(_) => {
            log::warn!("[NOTES] {} rejected: {}", action, err)
        }
        _ => log::error!("[NOTES] {} failed: {}", action, err),
    }
}

/// POST /insert2
async fn insert_note(
    data: web::Data<AppState>,
    body: web::Json<CreateNoteRequest>,
) -> NoteResult<HttpResponse> {
    let CreateNoteRequest {
        note_name,
        note_description,
    } = body.into_inner();

    let result = required(note_name, "note_name").and_then(|name| {
        let description = required(note_description, "note_description")?;
        log::info!(
            "[NOTES] Inserting note: name={:?}, description={:?}",
            name,
            description
        );
        data.db.insert_note(name.as_deref(), description.as_deref())
    });

    match result {
        Ok(id) => {
            log::info!("[NOTES] Inserted note ID: {}", id);
            Ok(HttpResponse::Created().json(CreatedResponse { id }))
        }
        Err(e) => {
            log_failure("Insert", &e);
            Err(e)
        }
    }
}

/// PUT /update2/{id}
async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateNoteRequest>,
) -> NoteResult<HttpResponse> {
    let id = path.into_inner();
    let UpdateNoteRequest {
        note_name,
        note_description,
    } = body.into_inner();

    match data
        .db
        .update_note(id, note_name.as_deref(), note_description.as_deref())
    {
        Ok(()) => {
            log::info!("[NOTES] Updated note ID: {}", id);
            Ok(HttpResponse::Ok().json(MessageResponse::new("Note updated successfully")))
        }
        Err(e) => {
            log_failure("Update", &e);
            Err(e)
        }
    }
}

/// GET /viewAll2/
async fn list_notes(data: web::Data<AppState>) -> NoteResult<HttpResponse> {
    match data.db.list_notes() {
        Ok(notes) => Ok(HttpResponse::Ok().json(notes)),
        Err(e) => {
            log_failure("List", &e);
            Err(e)
        }
    }
}

/// DELETE /delete2/{id}
async fn delete_note(data: web::Data<AppState>, path: web::Path<i64>) -> NoteResult<HttpResponse> {
    let id = path.into_inner();

    match data.db.delete_note(id) {
        Ok(()) => {
            log::info!("[NOTES] Deleted note ID: {}", id);
            Ok(HttpResponse::Ok().json(MessageResponse::new("deleted successfully")))
        }
        Err(e) => {
            log_failure("Delete", &e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::db::sqlite::test_support::{temp_database, temp_database_with_pool};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;

    fn state(db: Database) -> web::Data<AppState> {
        web::Data::new(AppState::new(Arc::new(db)))
    }

    macro_rules! notes_app {
        ($db:expr) => {
            test::init_service(App::new().app_data($db.clone()).configure(config)).await
        };
    }

    #[actix_web::test]
    async fn test_full_lifecycle() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);

        let req = test::TestRequest::post()
            .uri("/insert2")
            .set_json(json!({"note_name": "Milk", "note_description": "2%"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"id": 1}));

        let req = test::TestRequest::get().uri("/viewAll2/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!([{"id": 1, "note_name": "Milk", "note_description": "2%"}])
        );

        let req = test::TestRequest::put()
            .uri("/update2/1")
            .set_json(json!({"note_name": "Milk", "note_description": "Whole"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"message": "Note updated successfully"}));

        let req = test::TestRequest::get().uri("/viewAll2/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["note_description"], "Whole");

        let req = test::TestRequest::delete().uri("/delete2/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"message": "deleted successfully"}));

        let req = test::TestRequest::get().uri("/viewAll2/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn test_insert_missing_field_is_rejected_without_insert() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);

        for payload in [
            json!({"note_name": "Milk"}),
            json!({"note_description": "2%"}),
            json!({}),
        ] {
            let req = test::TestRequest::post()
                .uri("/insert2")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({"error": "Missing required fields"}));
        }

        assert_eq!(data.db.count_notes().unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_insert_accepts_empty_strings() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);

        let req = test::TestRequest::post()
            .uri("/insert2")
            .set_json(json!({"note_name": "", "note_description": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(data.db.count_notes().unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_insert_malformed_body_is_bad_request() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);

        let req = test::TestRequest::post()
            .uri("/insert2")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Missing required fields"}));
    }

    #[actix_web::test]
    async fn test_update_unknown_id_is_not_found() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);
        let id = data.db.insert_note(Some("Milk"), Some("2%")).unwrap();

        let req = test::TestRequest::put()
            .uri("/update2/42")
            .set_json(json!({"note_name": "Bread", "note_description": "Rye"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"message": "ID not found"}));

        let note = data.db.get_note(id).unwrap().unwrap();
        assert_eq!(note.note_name, "Milk");
    }

    #[actix_web::test]
    async fn test_update_without_description_clears_it() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);
        let id = data.db.insert_note(Some("Milk"), Some("2%")).unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/update2/{}", id))
            .set_json(json!({"note_name": "Milk"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/viewAll2/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!([{"id": id, "note_name": "Milk", "note_description": null}])
        );
    }

    #[actix_web::test]
    async fn test_update_without_name_fails_and_keeps_row() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);
        let id = data.db.insert_note(Some("Milk"), Some("2%")).unwrap();

        // A missing name is written as NULL, which the NOT NULL column refuses
        let req = test::TestRequest::put()
            .uri(&format!("/update2/{}", id))
            .set_json(json!({"note_description": "Whole"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Failed to update"}));

        let note = data.db.get_note(id).unwrap().unwrap();
        assert_eq!(note.note_name, "Milk");
        assert_eq!(note.note_description.as_deref(), Some("2%"));
    }

    #[actix_web::test]
    async fn test_update_empty_body_on_unknown_id_is_not_found() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);

        let req = test::TestRequest::put()
            .uri("/update2/999")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"message": "ID not found"}));
    }

    #[actix_web::test]
    async fn test_insert_null_description_is_stored_as_null() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);

        let req = test::TestRequest::post()
            .uri("/insert2")
            .set_json(json!({"note_name": "Milk", "note_description": null}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["id"].as_i64().unwrap();

        let note = data.db.get_note(id).unwrap().unwrap();
        assert_eq!(note.note_name, "Milk");
        assert!(note.note_description.is_none());
    }

    #[actix_web::test]
    async fn test_failed_insert_leaves_table_unchanged() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);
        data.db.insert_note(Some("Eggs"), Some("Dozen")).unwrap();

        // Present but null name reaches the store and fails NOT NULL
        let req = test::TestRequest::post()
            .uri("/insert2")
            .set_json(json!({"note_name": null, "note_description": "2%"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Failed to insert note"}));

        assert_eq!(data.db.count_notes().unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_insert_without_connection_is_storage_unavailable() {
        let (_dir, db) = temp_database_with_pool(1, Duration::from_millis(100));
        let data = state(db);
        let app = notes_app!(data);

        let held = data.db.conn().unwrap();
        let req = test::TestRequest::post()
            .uri("/insert2")
            .set_json(json!({"note_name": "Milk", "note_description": "2%"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Database connection failed"}));

        drop(held);
        assert_eq!(data.db.count_notes().unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_delete_unknown_id_is_not_found() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);
        data.db.insert_note(Some("Milk"), Some("2%")).unwrap();

        let req = test::TestRequest::delete().uri("/delete2/99").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"message": "ID not found"}));
        assert_eq!(data.db.count_notes().unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_non_integer_id_is_not_routed() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);

        let req = test::TestRequest::delete().uri("/delete2/abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_list_empty_is_ok() {
        let (_dir, db) = temp_database();
        let data = state(db);
        let app = notes_app!(data);

        let req = test::TestRequest::get().uri("/viewAll2/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn test_missing_table_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::config::DbConfig {
            database: dir.path().join("bare.db").to_string_lossy().to_string(),
            ..Default::default()
        };
        // Schema deliberately not ensured
        let data = state(Database::open(&config).unwrap());
        let app = notes_app!(data);

        let req = test::TestRequest::get().uri("/viewAll2/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Failed to retrieve records"}));
    }
}
