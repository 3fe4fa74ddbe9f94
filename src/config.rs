use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use std::path::PathBuf;

/// File the loader falls back to when no CSV is uploaded.
const DEFAULT_CSV_FILE: &str = "countriesMBTI_16types.csv";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub max_file_size: usize,
    pub default_csv_path: PathBuf,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let default_csv_path = std::env::var("MBTI_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CSV_FILE));

        let max_file_size = std::env::var("MBTI_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10 * 1024 * 1024); // 10MB

        Ok(Config { max_file_size, default_csv_path })
    }
}
