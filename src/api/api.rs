use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::models::todo::{TodoPayload, ValidationErrors};
use crate::repository::database::Database;
use crate::Response;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Serialize)]
struct ValidationErrorResponse {
    message: String,
    errors: ValidationErrors,
}

fn validation_failed(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(ValidationErrorResponse {
        message: "The given data was invalid.".to_string(),
        errors,
    })
}

fn server_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(Response {
        message: "Server Error".to_string(),
    })
}

fn store_error(err: StoreError) -> HttpResponse {
    match err {
        StoreError::NotFound => HttpResponse::NotFound().json(Response {
            message: "Resource not found".to_string(),
        }),
        other => {
            log::error!("storage failure: {other}");
            server_error()
        }
    }
}

#[get("/todo")]
pub async fn get_todos(db: web::Data<Database>, query: web::Query<ListQuery>) -> HttpResponse {
    match db.get_todos(query.page) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => store_error(err),
    }
}

#[post("/todo")]
pub async fn create_todo(db: web::Data<Database>, payload: web::Json<TodoPayload>) -> HttpResponse {
    let (description, checked) = match payload.into_inner().validate() {
        Ok(fields) => fields,
        Err(errors) => return validation_failed(errors),
    };
    match db.create_todo(&description, checked) {
        Ok(todo) => HttpResponse::Created().json(todo),
        Err(err) => store_error(err),
    }
}

#[get("/todo/{id}")]
pub async fn get_todo_by_id(db: web::Data<Database>, id: web::Path<String>) -> HttpResponse {
    // A non-numeric id surfaces as a server fault, not a 400.
    let todo_id = match id.parse::<i32>() {
        Ok(todo_id) => todo_id,
        Err(_) => return server_error(),
    };
    match db.get_todo_by_id(todo_id) {
        Ok(todo) => HttpResponse::Ok().json(todo),
        Err(err) => store_error(err),
    }
}

#[put("/todo/{id}")]
pub async fn update_todo_by_id(
    db: web::Data<Database>,
    id: web::Path<String>,
    payload: web::Json<TodoPayload>,
) -> HttpResponse {
    let todo_id = match id.parse::<i32>() {
        Ok(todo_id) => todo_id,
        Err(_) => return server_error(),
    };
    let (description, checked) = match payload.into_inner().validate() {
        Ok(fields) => fields,
        Err(errors) => return validation_failed(errors),
    };
    match db.update_todo_by_id(todo_id, &description, checked) {
        Ok(todo) => HttpResponse::Ok().json(todo),
        Err(err) => store_error(err),
    }
}

#[delete("/todo/{id}")]
pub async fn delete_todo_by_id(db: web::Data<Database>, id: web::Path<String>) -> HttpResponse {
    let todo_id = match id.parse::<i32>() {
        Ok(todo_id) => todo_id,
        Err(_) => return server_error(),
    };
    // Deleting an absent id still reports success.
    match db.delete_todo_by_id(todo_id) {
        Ok(()) => HttpResponse::Ok().json(Response {
            message: "OKAY".to_string(),
        }),
        Err(err) => store_error(err),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .service(create_todo)
            .service(get_todo_by_id)
            .service(get_todos)
            .service(delete_todo_by_id)
            .service(update_todo_by_id),
    );
}
