use mongodb::{Client, Collection, Database};
use std::error::Error;

pub mod collections {
    pub const USERS: &str = "users";
    pub const CLASSES: &str = "classes";
    pub const COURSES: &str = "courses";
    pub const SECTIONS: &str = "course_sections";
    pub const SUB_SECTIONS: &str = "course_sub_sections";
    pub const RATINGS: &str = "course_ratings";
    pub const ATTENDANCE: &str = "attendance";
    pub const OTPS: &str = "password_otps";
    pub const BLACKLIST: &str = "blacklisted_tokens";
}

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("elearning");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the service relies on. The unique attendance
    /// index is load-bearing: it is what makes the find-or-create in the
    /// marking workflow safe under concurrent requests.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        let users = self
            .db
            .collection::<mongodb::bson::Document>(collections::USERS);
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique())
            .build();
        match users.create_index(email_index).await {
            Ok(_) => log::info!("   Index ready: users(email) unique"),
            Err(e) => log::debug!("   Index users(email): {}", e),
        }

        let attendance = self
            .db
            .collection::<mongodb::bson::Document>(collections::ATTENDANCE);
        let day_key_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "course_id": 1, "date": 1 })
            .options(unique())
            .build();
        match attendance.create_index(day_key_index).await {
            Ok(_) => log::info!("   Index ready: attendance(user_id, course_id, date) unique"),
            Err(e) => log::debug!("   Index attendance(user_id, course_id, date): {}", e),
        }

        let blacklist = self
            .db
            .collection::<mongodb::bson::Document>(collections::BLACKLIST);
        let token_index = IndexModel::builder()
            .keys(doc! { "token": 1 })
            .options(unique())
            .build();
        match blacklist.create_index(token_index).await {
            Ok(_) => log::info!("   Index ready: blacklisted_tokens(token) unique"),
            Err(e) => log::debug!("   Index blacklisted_tokens(token): {}", e),
        }

        let otps = self
            .db
            .collection::<mongodb::bson::Document>(collections::OTPS);
        let otp_email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique())
            .build();
        match otps.create_index(otp_email_index).await {
            Ok(_) => log::info!("   Index ready: password_otps(email) unique"),
            Err(e) => log::debug!("   Index password_otps(email): {}", e),
        }

        let ratings = self
            .db
            .collection::<mongodb::bson::Document>(collections::RATINGS);
        let rating_course_index = IndexModel::builder()
            .keys(doc! { "course_id": 1 })
            .build();
        match ratings.create_index(rating_course_index).await {
            Ok(_) => log::info!("   Index ready: course_ratings(course_id)"),
            Err(e) => log::debug!("   Index course_ratings(course_id): {}", e),
        }

        log::info!("Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub async fn health_check(&self) -> Result<(), mongodb::error::Error> {
        self.db.list_collection_names().await?;
        Ok(())
    }
}
