use std::{env, sync::Arc};

use anyhow::Context;
use todo_server::{AppConfig, Credential, Store};
use todo_store::{MemoryStore, SqliteStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let credential = credential_from_env()?;
    let http_log = env::var("HTTP_LOG")
        .map(|value| value != "0" && value != "false")
        .unwrap_or(true);

    let store: Store = match env::var("TODO_DB") {
        Ok(path) => Arc::new(
            SqliteStore::open(&path)
                .with_context(|| format!("opening sqlite database at {path}"))?,
        ),
        Err(_) => Arc::new(MemoryStore::new()),
    };

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    todo_server::run(listener, store, AppConfig { credential, http_log }).await?;
    Ok(())
}

fn credential_from_env() -> anyhow::Result<Credential> {
    if let (Ok(username), Ok(password)) = (env::var("AUTH_USERNAME"), env::var("AUTH_PASSWORD")) {
        return Ok(Credential::Pair { username, password });
    }
    if let Ok(secret) = env::var("AUTH_CREDENTIALS") {
        return Ok(Credential::Single(secret));
    }
    anyhow::bail!("set AUTH_USERNAME/AUTH_PASSWORD or AUTH_CREDENTIALS to the accepted credential")
}
