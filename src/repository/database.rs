use chrono::prelude::*;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::errors::StoreError;
use crate::models::todo::{NewTodo, Page, Todo};
use crate::repository::schema::todos::dsl::*;

pub const PAGE_SIZE: i64 = 10;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

type DBPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

#[derive(Clone)]
pub struct Database {
    pool: DBPool,
}

impl Database {
    /// Builds the connection pool and creates the todos table on a fresh
    /// database. Startup failures here are fatal.
    pub fn new(database_url: &str) -> Self {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool: DBPool = r2d2::Pool::builder()
            .build(manager)
            .expect("Failed to create pool.");
        let mut conn = pool.get().expect("Failed to get connection for migrations.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations.");
        Database { pool }
    }

    /// Returns one page of todos in primary-key order, 10 per page.
    /// Page numbers below 1 are clamped to 1.
    pub fn get_todos(&self, page: i64) -> Result<Page<Todo>, StoreError> {
        let mut conn = self.pool.get()?;
        let current_page = page.max(1);
        let total: i64 = todos.count().get_result(&mut conn)?;
        // page is caller-supplied and unbounded, so the offset must not overflow
        let offset = (current_page - 1).saturating_mul(PAGE_SIZE);
        let data = todos
            .order(id.asc())
            .limit(PAGE_SIZE)
            .offset(offset)
            .load::<Todo>(&mut conn)?;
        let last_page = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
        Ok(Page {
            data,
            current_page,
            per_page: PAGE_SIZE,
            total,
            last_page,
        })
    }

    pub fn create_todo(&self, new_description: &str, new_checked: bool) -> Result<Todo, StoreError> {
        let mut conn = self.pool.get()?;
        let now = Utc::now().naive_utc();
        let todo = diesel::insert_into(todos)
            .values(&NewTodo {
                description: new_description,
                checked: new_checked,
                created_at: now,
                updated_at: now,
            })
            .get_result::<Todo>(&mut conn)?;
        Ok(todo)
    }

    pub fn get_todo_by_id(&self, todo_id: i32) -> Result<Todo, StoreError> {
        let mut conn = self.pool.get()?;
        let todo = todos.find(todo_id).first::<Todo>(&mut conn)?;
        Ok(todo)
    }

    /// Overwrites both fields unconditionally and refreshes `updated_at`.
    /// There is no partial update.
    pub fn update_todo_by_id(
        &self,
        todo_id: i32,
        new_description: &str,
        new_checked: bool,
    ) -> Result<Todo, StoreError> {
        let mut conn = self.pool.get()?;
        let todo = diesel::update(todos.find(todo_id))
            .set((
                description.eq(new_description),
                checked.eq(new_checked),
                updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<Todo>(&mut conn)?;
        Ok(todo)
    }

    /// Removes the row if present. Deleting an absent id is success, not an
    /// error; the row count is deliberately ignored.
    pub fn delete_todo_by_id(&self, todo_id: i32) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        diesel::delete(todos.find(todo_id)).execute(&mut conn)?;
        Ok(())
    }
}
