use campus_market::{
    db::{create_pool, orm_from_pool, run_migrations},
    services::filter::CATEGORY_FILTERS,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Seeding only needs the database, not the full service config.
    let database_url = std::env::var("DATABASE_URL")?;

    let pool = create_pool(&database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm_from_pool(&pool)).await?;

    let seeded = seed_categories(&pool).await?;
    println!("Seed completed. {seeded} new categories");
    Ok(())
}

/// Insert one category per filter button, skipping the catch-all.
async fn seed_categories(pool: &sqlx::PgPool) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for option in CATEGORY_FILTERS.iter().filter(|o| o.slug != "all") {
        let result = sqlx::query(
            r#"
            INSERT INTO categories (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(option.name)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
        println!("Ensured category {}", option.name);
    }
    Ok(inserted)
}
