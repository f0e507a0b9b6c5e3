use std::{env, fs, path::Path, path::PathBuf, time::Duration};

use crate::{domain::UserId, errors::Error, store::DuplicatePolicy, Result};

/// Typed configuration, read from the environment (and an optional `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    /// Group chat that receives event announcements.
    pub target_chat_id: i64,
    pub administrators: Vec<i64>,

    pub duplicate_policy: DuplicatePolicy,
    pub send_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let target_chat_id = lookup("TELEGRAM_TARGET_CHAT_ID")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                Error::Config(
                    "TELEGRAM_TARGET_CHAT_ID environment variable is required (integer chat id)"
                        .to_string(),
                )
            })?;

        let administrators = parse_csv_i64(lookup("TELEGRAM_ADMINISTRATORS"))?;

        let duplicate_policy = match lookup("STB_DUPLICATE_POLICY") {
            None => DuplicatePolicy::Toggle,
            Some(raw) => parse_duplicate_policy(&raw)?,
        };

        let send_timeout = Duration::from_millis(
            lookup("STB_SEND_TIMEOUT_MS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(10_000),
        );

        let log_file = lookup("STB_LOG_FILE")
            .and_then(non_empty)
            .map(PathBuf::from);

        Ok(Self {
            telegram_bot_token,
            target_chat_id,
            administrators,
            duplicate_policy,
            send_timeout,
            log_file,
        })
    }

    pub fn is_administrator(&self, user_id: UserId) -> bool {
        self.administrators.contains(&user_id.0)
    }
}

fn parse_duplicate_policy(raw: &str) -> Result<DuplicatePolicy> {
    match raw.trim().to_lowercase().as_str() {
        "" | "toggle" => Ok(DuplicatePolicy::Toggle),
        "reject" => Ok(DuplicatePolicy::Reject),
        other => Err(Error::Config(format!(
            "STB_DUPLICATE_POLICY must be `toggle` or `reject`, got `{other}`"
        ))),
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

/// Admin ids are security-relevant, so a malformed entry is an error rather
/// than silently dropped.
fn parse_csv_i64(v: Option<String>) -> Result<Vec<i64>> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| Error::Config(format!("invalid administrator id `{s}`")))
        })
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
