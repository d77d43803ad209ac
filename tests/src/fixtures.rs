use quarry::Dialect;

/// DDL for one test relation, per dialect.
#[derive(Debug)]
pub struct Fixture {
    pub name: &'static str,
    sqlite: &'static str,
    postgresql: &'static str,
}

impl Fixture {
    pub fn ddl(&self, dialect: Dialect) -> &'static str {
        match dialect {
            Dialect::Sqlite => self.sqlite,
            Dialect::Postgresql => self.postgresql,
            Dialect::Mysql => panic!("no MySQL fixture for `{}`", self.name),
        }
    }
}

pub const USERS: Fixture = Fixture {
    name: "users",
    sqlite: "CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE
    )",
    postgresql: "CREATE TABLE users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE
    )",
};

/// Requires [`USERS`].
pub const TASKS: Fixture = Fixture {
    name: "tasks",
    sqlite: "CREATE TABLE tasks (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users (id),
        title TEXT NOT NULL,
        done BOOLEAN NOT NULL DEFAULT 0
    )",
    postgresql: "CREATE TABLE tasks (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users (id),
        title TEXT NOT NULL,
        done BOOLEAN NOT NULL DEFAULT false
    )",
};

/// At most one profile per user. Requires [`USERS`].
pub const PROFILES: Fixture = Fixture {
    name: "profiles",
    sqlite: "CREATE TABLE profiles (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL UNIQUE REFERENCES users (id),
        bio TEXT NOT NULL
    )",
    postgresql: "CREATE TABLE profiles (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL UNIQUE REFERENCES users (id),
        bio TEXT NOT NULL
    )",
};

/// A tree: each category points at its parent.
pub const CATEGORIES: Fixture = Fixture {
    name: "categories",
    sqlite: "CREATE TABLE categories (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        parent_id INTEGER REFERENCES categories (id)
    )",
    postgresql: "CREATE TABLE categories (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        parent_id BIGINT REFERENCES categories (id)
    )",
};

/// Self-reference aliases for [`CATEGORIES`].
pub const CATEGORIES_CONFIG: &str = r#"
[[relations.categories.self_references]]
attributes = ["parent_id"]
alias = "parent"
inverse = "children"
"#;

/// One column per commonly used semantic type.
pub const SAMPLES: Fixture = Fixture {
    name: "samples",
    sqlite: "CREATE TABLE samples (
        id INTEGER PRIMARY KEY,
        flag BOOLEAN,
        amount DECIMAL(10, 2),
        born DATE,
        seen_at TIMESTAMP,
        external_id UUID,
        payload JSON
    )",
    postgresql: "CREATE TABLE samples (
        id BIGSERIAL PRIMARY KEY,
        flag BOOLEAN,
        amount NUMERIC(10, 2),
        born DATE,
        seen_at TIMESTAMP,
        external_id UUID,
        payload JSONB
    )",
};

/// Same attributes as [`USERS`], with keys copied rather than generated.
pub const ARCHIVED_USERS: Fixture = Fixture {
    name: "archived_users",
    sqlite: "CREATE TABLE archived_users (
        id INTEGER NOT NULL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT
    )",
    postgresql: "CREATE TABLE archived_users (
        id BIGINT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT
    )",
};
