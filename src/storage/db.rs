use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Result;

use crate::core::error::AppResult;
use crate::registration::users::{NewUser, RegisterError, UserStore};

/// Структура, представляющая зарегистрированного пользователя.
pub struct UserRecord {
    /// Идентификатор чата (строка, первичный ключ)
    pub identity: String,
    /// ФИО пользователя
    pub full_name: String,
    /// Телефон в формате +7XXXXXXXXXX (уникален среди всех записей)
    pub phone: String,
    /// Дата рождения в формате ДД.ММ.ГГГГ
    pub birth_date: String,
    /// Дата и время регистрации (ГГГГ-ММ-ДД ЧЧ:ММ:СС)
    pub registered_at: String,
}

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and bootstraps
/// the schema on the first connection.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    let conn = pool.get()?;
    if let Err(e) = init_schema(&conn) {
        log::error!("Failed to initialize users schema: {}", e);
    }

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is automatically returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Создает таблицу users, если она не существует.
fn init_schema(conn: &rusqlite::Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            chat_id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            phone TEXT UNIQUE NOT NULL,
            birth_date TEXT NOT NULL,
            registered_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Проверяет, зарегистрирован ли пользователь.
pub fn is_registered(conn: &DbConnection, identity: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM users WHERE chat_id = ?1")?;
    stmt.exists([identity])
}

/// Возвращает приветственное имя пользователя (имя и отчество без фамилии),
/// либо `None`, если запись не найдена.
pub fn get_greeting_name(conn: &DbConnection, identity: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT full_name FROM users WHERE chat_id = ?1")?;
    let mut rows = stmt.query([identity])?;

    if let Some(row) = rows.next()? {
        let full_name: String = row.get(0)?;
        Ok(Some(greeting_from_full_name(&full_name)))
    } else {
        Ok(None)
    }
}

/// Строит приветствие из ФИО: имя и отчество, без фамилии.
pub fn greeting_from_full_name(full_name: &str) -> String {
    let parts: Vec<&str> = full_name.split_whitespace().collect();
    if parts.len() >= 2 {
        parts[1..].join(" ")
    } else {
        full_name.to_string()
    }
}

/// Outcome of [`insert_user`].
#[derive(Debug)]
pub enum InsertOutcome {
    /// Record inserted
    Inserted,
    /// A record with the same phone (or identity) already exists;
    /// the store was not mutated
    Duplicate,
}

/// Регистрирует пользователя. Вставка ровно одна; конфликт уникальности
/// телефона не изменяет базу и возвращает [`InsertOutcome::Duplicate`].
pub fn insert_user(conn: &DbConnection, user: &NewUser<'_>) -> Result<InsertOutcome> {
    let registered_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let result = conn.execute(
        "INSERT INTO users (chat_id, full_name, phone, birth_date, registered_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![user.identity, user.full_name, user.phone, user.birth_date, registered_at],
    );

    match result {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Ok(InsertOutcome::Duplicate)
        }
        Err(e) => Err(e),
    }
}

/// Возвращает запись пользователя по идентификатору чата.
pub fn get_user(conn: &DbConnection, identity: &str) -> Result<Option<UserRecord>> {
    let mut stmt = conn
        .prepare("SELECT chat_id, full_name, phone, birth_date, registered_at FROM users WHERE chat_id = ?1")?;
    let mut rows = stmt.query([identity])?;

    if let Some(row) = rows.next()? {
        Ok(Some(UserRecord {
            identity: row.get(0)?,
            full_name: row.get(1)?,
            phone: row.get(2)?,
            birth_date: row.get(3)?,
            registered_at: row.get(4)?,
        }))
    } else {
        Ok(None)
    }
}

/// SQLite-backed implementation of the registration layer's
/// [`UserStore`] seam.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: Arc<DbPool>,
}

impl SqliteUserStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl UserStore for SqliteUserStore {
    fn is_registered(&self, identity: &str) -> anyhow::Result<bool> {
        let conn = get_connection(&self.pool)?;
        Ok(is_registered(&conn, identity)?)
    }

    fn greeting_name(&self, identity: &str) -> anyhow::Result<Option<String>> {
        let conn = get_connection(&self.pool)?;
        Ok(get_greeting_name(&conn, identity)?)
    }

    fn register(&self, user: &NewUser<'_>) -> Result<(), RegisterError> {
        let conn = get_connection(&self.pool).map_err(|e| RegisterError::Store(e.into()))?;
        match insert_user(&conn, user).map_err(|e| RegisterError::Store(e.into()))? {
            InsertOutcome::Inserted => Ok(()),
            InsertOutcome::Duplicate => Err(RegisterError::DuplicatePhone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pool() -> DbPool {
        // Single connection so the in-memory database is shared
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).unwrap();
        init_schema(&pool.get().unwrap()).unwrap();
        pool
    }

    fn new_user<'a>(identity: &'a str, full_name: &'a str, phone: &'a str) -> NewUser<'a> {
        NewUser {
            identity,
            full_name,
            phone,
            birth_date: "13.03.2003",
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        assert!(!is_registered(&conn, "100").unwrap());

        let outcome = insert_user(&conn, &new_user("100", "Иванов Иван Иванович", "+79781234567")).unwrap();
        assert!(matches!(outcome, InsertOutcome::Inserted));

        assert!(is_registered(&conn, "100").unwrap());
        let record = get_user(&conn, "100").unwrap().unwrap();
        assert_eq!(record.full_name, "Иванов Иван Иванович");
        assert_eq!(record.phone, "+79781234567");
        assert_eq!(record.birth_date, "13.03.2003");
    }

    #[test]
    fn test_duplicate_phone_does_not_mutate_store() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        insert_user(&conn, &new_user("100", "Иванов Иван Иванович", "+79781234567")).unwrap();
        let outcome = insert_user(&conn, &new_user("200", "Петров Пётр Петрович", "+79781234567")).unwrap();
        assert!(matches!(outcome, InsertOutcome::Duplicate));

        assert!(!is_registered(&conn, "200").unwrap());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_greeting_drops_family_name() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        insert_user(&conn, &new_user("100", "Иванов Иван Иванович", "+79781234567")).unwrap();
        assert_eq!(get_greeting_name(&conn, "100").unwrap(), Some("Иван Иванович".to_string()));
        assert_eq!(get_greeting_name(&conn, "999").unwrap(), None);
    }

    #[test]
    fn test_greeting_from_single_word_name() {
        assert_eq!(greeting_from_full_name("Иванов"), "Иванов");
    }
}
