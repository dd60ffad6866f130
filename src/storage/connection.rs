use crate::storage::entity::{achievement, homepage, publication, team, theme, website};
use log::info;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
    Statement,
};
use std::time::Duration;

pub async fn establish_connection(
    db_url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let in_memory = db_url.contains(":memory:");

    let mut opt = ConnectOptions::new(db_url.to_owned());
    opt.connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Info);

    if in_memory {
        // every pooled connection would get its own empty database
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(max_connections.max(1))
            .min_connections(1)
            .idle_timeout(Duration::from_secs(8))
            .max_lifetime(Duration::from_secs(8));
    }

    let db = Database::connect(opt).await?;

    if !in_memory {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            "PRAGMA journal_mode=WAL;".to_string(),
        ))
        .await?;
    }

    create_table(&db, team::Entity).await?;
    create_table(&db, publication::Entity).await?;
    create_table(&db, achievement::Entity).await?;
    create_table(&db, website::Entity).await?;
    create_table(&db, homepage::Entity).await?;
    create_table(&db, theme::Entity).await?;

    // team_id lookups drive both list endpoints and the cascade
    for stmt in [
        "CREATE INDEX IF NOT EXISTS idx_publications_team_id ON publications(team_id);",
        "CREATE INDEX IF NOT EXISTS idx_achievements_team_id ON achievements(team_id);",
        "CREATE INDEX IF NOT EXISTS idx_websites_team_id ON websites(team_id);",
        "CREATE INDEX IF NOT EXISTS idx_homepages_team_id ON homepages(team_id);",
    ] {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            stmt.to_string(),
        ))
        .await?;
    }

    info!("Database connection established and tables initialized.");

    Ok(db)
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let stmt = builder.build(schema.create_table_from_entity(entity).if_not_exists());
    db.execute(stmt).await?;
    Ok(())
}
