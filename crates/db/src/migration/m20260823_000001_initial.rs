//! Initial schema: folders and documents.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS documents CASCADE; DROP TABLE IF EXISTS folders CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Folders: flat per-owner namespace
CREATE TABLE folders (
    id UUID PRIMARY KEY,
    owner_id UUID NOT NULL,
    name VARCHAR(100) NOT NULL,
    description VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Index for an owner's folder listing
CREATE INDEX idx_folders_owner ON folders(owner_id, created_at DESC);

-- Documents: file and text kinds in one table
CREATE TABLE documents (
    id UUID PRIMARY KEY,
    owner_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    -- RESTRICT backs the empty-folder delete rule at the schema level
    folder_id UUID REFERENCES folders(id) ON DELETE RESTRICT,
    kind VARCHAR(8) NOT NULL,
    storage_key TEXT,
    original_name TEXT,
    size_bytes BIGINT,
    mime_type TEXT,
    content TEXT,
    template_id VARCHAR(64),
    uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_documents_kind CHECK (kind IN ('file', 'text')),
    -- File documents must carry their blob metadata
    CONSTRAINT chk_documents_file_fields CHECK (
        kind <> 'file' OR (
            storage_key IS NOT NULL
            AND original_name IS NOT NULL
            AND size_bytes IS NOT NULL
            AND mime_type IS NOT NULL
        )
    )
);

-- Index for an owner's document listing (newest first)
CREATE INDEX idx_documents_owner ON documents(owner_id, uploaded_at DESC);

-- Index for folder filtering and emptiness checks
CREATE INDEX idx_documents_folder ON documents(owner_id, folder_id);
";
