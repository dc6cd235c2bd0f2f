#![allow(dead_code)]

use std::net::TcpListener;

use groupshare::configuration::{get_configuration, DatabaseSettings, Settings};
use groupshare::startup::run;
use reqwest::Response;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub settings: Settings,
    pub client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut settings = get_configuration().expect("Failed to read configuration.");
    settings.database.database_name = uuid::Uuid::new_v4().to_string();
    // Cheapest cost bcrypt accepts; keeps the suite fast.
    settings.hashing.cost = 4;
    let db_pool = configure_database(&settings.database).await;

    let server = run(listener, db_pool.clone(), &settings).expect("Failed to start server");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool,
        settings,
        client: reqwest::Client::new(),
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

impl TestApp {
    pub async fn post_signup(&self, body: &Value) -> Response {
        self.client
            .post(&format!("{}/signup", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login(&self, body: &Value) -> Response {
        self.client
            .post(&format!("{}/login", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn signup(&self, username: &str) -> i64 {
        let response = self
            .post_signup(&json!({
                "username": username,
                "email": format!("{}@x.com", username),
                "password": "pw"
            }))
            .await;
        assert_eq!(201, response.status().as_u16(), "signup of {} failed", username);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["user_id"].as_i64().expect("No user id in response")
    }

    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_login(&json!({ "username": username, "password": "pw" }))
            .await;
        assert_eq!(200, response.status().as_u16(), "login of {} failed", username);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["accessToken"]
            .as_str()
            .expect("No access token in response")
            .to_string()
    }

    /// Signs up and logs in, returning the session token.
    pub async fn signup_and_login(&self, username: &str) -> String {
        self.signup(username).await;
        self.login(username).await
    }

    pub async fn create_group(&self, token: &str, name: &str, members: &[&str]) -> Response {
        self.client
            .post(&format!("{}/createGroup", &self.address))
            .header("token", token)
            .json(&json!({ "groupname": name, "members": members }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn add_members(&self, token: &str, name: &str, members: &[&str]) -> Response {
        self.client
            .post(&format!("{}/addUserToGroup", &self.address))
            .header("token", token)
            .json(&json!({ "groupname": name, "members": members }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn group_details(&self, token: &str, name: &str) -> Response {
        self.client
            .get(&format!(
                "{}/groupDetails?groupname={}",
                &self.address,
                urlencoding::encode(name)
            ))
            .header("token", token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_group(&self, token: &str, name: &str) -> Response {
        self.client
            .delete(&format!(
                "{}/group?groupname={}",
                &self.address,
                urlencoding::encode(name)
            ))
            .header("token", token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn group_count(&self, name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM groups WHERE group_name = $1")
            .bind(name)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count groups")
    }

    pub async fn membership_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM groupmembers")
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count memberships")
    }

    pub async fn members_of(&self, name: &str) -> Vec<String> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT u.username
            FROM users u
            JOIN groupmembers gm ON gm.user_id = u.user_id
            JOIN groups g ON g.group_id = gm.group_id
            WHERE g.group_name = $1
            ORDER BY u.username
            "#,
        )
        .bind(name)
        .fetch_all(&self.db_pool)
        .await
        .expect("Failed to fetch members")
    }
}

pub async fn error_body(response: Response) -> Value {
    response.json().await.expect("Failed to parse error body")
}
