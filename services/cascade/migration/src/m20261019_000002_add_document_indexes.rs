use sea_orm_migration::prelude::*;

/// Expression indexes backing the cascade scans: routines by owning client
/// and by trainer, and the partial index the expiry sweep filters on.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_documents_client_id \
             ON documents (collection, (fields->>'clientId'))",
        )
        .await?;
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_documents_trainer_id \
             ON documents (collection, (fields->>'trainerId'))",
        )
        .await?;
        // Same expression and collation as the sweep's range filter, partial
        // on the inlined `isPublic` equality.
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_documents_public_expiry \
             ON documents (collection, ((fields->>'publicExpiresAt') COLLATE \"C\")) \
             WHERE fields->'isPublic' = 'true'::jsonb",
        )
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP INDEX IF EXISTS idx_documents_public_expiry")
            .await?;
        db.execute_unprepared("DROP INDEX IF EXISTS idx_documents_trainer_id")
            .await?;
        db.execute_unprepared("DROP INDEX IF EXISTS idx_documents_client_id")
            .await?;
        Ok(())
    }
}
