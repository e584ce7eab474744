use std::env;

/// Which `LedgerStore` backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Memory,
}

/// Status line used for translated domain errors. The JSON body is the same
/// in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatusMode {
    /// Always 200, with the real code only in the body.
    Legacy,
    /// The body's code is also the HTTP status.
    Semantic,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub store: StoreKind,
    pub error_status: ErrorStatusMode,
}

fn parse_store(raw: &str) -> Option<StoreKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "mongo" | "mongodb" => Some(StoreKind::Mongo),
        "memory" | "mem" => Some(StoreKind::Memory),
        _ => None,
    }
}

fn parse_error_status(raw: &str) -> Option<ErrorStatusMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "legacy" => Some(ErrorStatusMode::Legacy),
        "semantic" => Some(ErrorStatusMode::Semantic),
        _ => None,
    }
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "rustledger".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let store = match env::var("LEDGER_STORE") {
        Ok(raw) => parse_store(&raw).unwrap_or_else(|| {
            tracing::warn!("unknown LEDGER_STORE {raw:?}, falling back to mongo");
            StoreKind::Mongo
        }),
        Err(_) => StoreKind::Mongo,
    };

    let error_status = match env::var("ERROR_STATUS") {
        Ok(raw) => parse_error_status(&raw).unwrap_or_else(|| {
            tracing::warn!("unknown ERROR_STATUS {raw:?}, falling back to legacy");
            ErrorStatusMode::Legacy
        }),
        Err(_) => ErrorStatusMode::Legacy,
    };

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        store,
        error_status,
    }
}

