use mongodb::{
    bson::doc, options::ClientOptions, options::IndexOptions, Client as MongoClient, Collection,
    Database, IndexModel,
};
use service_core::error::AppError;

/// A live MongoDB session. Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Connect and ping. The driver connects lazily, so the ping is what
    /// proves the database is reachable before the service takes traffic.
    pub async fn connect(uri: &str, database: &str, app_name: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");

        let mut client_options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        client_options.app_name = Some(app_name.to_string());

        let client = MongoClient::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        let mongo = Self { client, db };

        mongo.health_check().await?;
        tracing::info!(database = %database, "Successfully connected to MongoDB database");

        Ok(mongo)
    }

    pub async fn initialize_indexes(&self, collection: &str) -> Result<(), AppError> {
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("name_lookup".to_string())
                    .build(),
            )
            .build();

        self.db
            .collection::<mongodb::bson::Document>(collection)
            .create_index(name_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create name index on {}: {}", collection, e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on {}.name", collection);

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}
