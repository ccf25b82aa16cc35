use std::sync::Arc;

use log::info;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::models::{Task, Todo, User};
use crate::repository::{MemoryRepository, PgRepository, Repository};

/// One repository per entity, shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub todos: Arc<dyn Repository<Todo>>,
    pub tasks: Arc<dyn Repository<Task>>,
    pub users: Arc<dyn Repository<User>>,
}

impl Repositories {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            todos: Arc::new(PgRepository::<Todo>::new(pool.clone())),
            tasks: Arc::new(PgRepository::<Task>::new(pool.clone())),
            users: Arc::new(PgRepository::<User>::new(pool.clone())),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            todos: Arc::new(MemoryRepository::<Todo>::new()),
            tasks: Arc::new(MemoryRepository::<Task>::new()),
            users: Arc::new(MemoryRepository::<User>::new()),
        }
    }
}

/// The opened backing store. Created first at startup, closed last at shutdown.
pub struct Storage {
    pool: Option<PgPool>,
    repositories: Repositories,
}

impl Storage {
    /// Opens the Postgres pool and applies pending migrations, or sets up the
    /// in-process store for `memory://`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        if config.is_memory() {
            info!("using in-memory storage");
            return Ok(Self {
                pool: None,
                repositories: Repositories::in_memory(),
            });
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("migration failed: {}", e)))?;
        info!(
            "connected to postgres (max {} connections), migrations applied",
            config.max_connections
        );

        Ok(Self {
            repositories: Repositories::postgres(&pool),
            pool: Some(pool),
        })
    }

    pub fn repositories(&self) -> Repositories {
        self.repositories.clone()
    }

    pub async fn close(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
            info!("database pool closed");
        }
    }
}
