use rusqlite::Connection;

pub mod tables {
    pub const SESSION: &str = "session";

    #[cfg(test)]
    pub const ALL_TABLES: &[&str] = &[SESSION];
}

pub mod columns {
    pub const KEY: &str = "key";
    pub const VALUE: &str = "value";
    pub const UPDATED_AT: &str = "updated_at";
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS session (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

pub fn init(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA)
}
