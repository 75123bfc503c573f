//! `SQLite` schema definitions for the document store.
//!
//! Documents of every collection share one table; each row holds the JSON
//! body of a single document.

/// SQL statement to create the documents table.
pub const CREATE_DOCUMENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (collection, id)
)
";

/// SQL statement to create an index for listing a collection in creation order.
pub const CREATE_COLLECTION_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_documents_collection_created
ON documents(collection, created_at)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Statements that must exist before the schema version can be read.
pub const BOOTSTRAP_STATEMENTS: &[&str] = &[CREATE_METADATA_TABLE];

/// Statements of migration 1: the documents table and its listing index.
pub const V1_STATEMENTS: &[&str] = &[CREATE_DOCUMENTS_TABLE, CREATE_COLLECTION_INDEX];
