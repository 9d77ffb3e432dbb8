//! Daily token sequencer
//!
//! Builds visit tokens of the form `[EL-]<CODE>[XT]-<DDMM>-<SEQ4>`, where
//! `SEQ4` comes from a per-location, per-day counter that is incremented
//! atomically in the backing store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;

use crate::error::AppResult;

/// Destination value that marks a visit as handed to an external provider
const EXTERNAL_PROVIDER: &str = "EXTERNAL PROVIDER";

/// Code used when nothing usable can be derived from the location
const UNKNOWN_CODE: &str = "UNKN";

const DEFAULT_LOCATION_CODES: &[(&str, &str)] = &[
    ("AL QOUZ", "QOZ"),
    ("DIC 2", "DIC2"),
    ("DIC 3", "DIC3"),
    ("DIC 5", "DIC5"),
    ("DIP 1", "DIP1"),
    ("DIP 2", "DIP2"),
    ("JEBAL ALI 1", "JAB1"),
    ("JEBAL ALI 2", "JAB2"),
    ("JEBAL ALI 3", "JAB3"),
    ("JEBAL ALI 4", "JAB4"),
    ("KHAWANEEJ", "KWJ"),
    ("RUWAYYAH", "RUW"),
    ("SAJJA", "SAJJ"),
    ("SAIF", "SAIF"),
    ("SONAPUR 1", "SONA1"),
    ("SONAPUR 2", "SONA2"),
    ("SONAPUR 3", "SONA3"),
    ("SONAPUR 4", "SONA4"),
    ("SONAPUR 5", "SONA5"),
    ("SONAPUR 6", "SONA6"),
    ("SONAPUR 7", "SONA7"),
    ("RAHABA", "RAH"),
];

/// Storage for the per-location daily counters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter for `(location_id, date_key)`,
    /// creating it at zero first if absent, and return the new value.
    async fn increment(&self, location_id: &str, date_key: &str) -> AppResult<i64>;
}

/// Trim, uppercase and collapse internal whitespace
fn normalize_location(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Location name to short code table
#[derive(Debug, Clone)]
pub struct LocationCodes {
    codes: IndexMap<String, String>,
}

impl Default for LocationCodes {
    fn default() -> Self {
        Self::new(&IndexMap::new())
    }
}

impl LocationCodes {
    /// Built-in table extended (or overridden) by configured entries
    pub fn new(overrides: &IndexMap<String, String>) -> Self {
        let mut codes = IndexMap::new();
        for (name, code) in DEFAULT_LOCATION_CODES {
            codes.insert(normalize_location(name), code.to_string());
        }
        for (name, code) in overrides {
            let code = code.trim().to_uppercase();
            if !code.is_empty() {
                codes.insert(normalize_location(name), code);
            }
        }
        Self { codes }
    }

    /// Resolve the short code for a location name
    pub fn resolve(&self, raw: &str) -> String {
        if let Some(code) = self.codes.get(&normalize_location(raw)) {
            return code.clone();
        }
        let fallback: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .take(4)
            .collect::<String>()
            .to_uppercase();
        if fallback.is_empty() {
            UNKNOWN_CODE.to_string()
        } else {
            fallback
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Inputs that shape a token
#[derive(Debug, Clone, Default)]
pub struct TokenRequest {
    pub location_id: String,
    pub sent_to: Option<String>,
    pub eligible_for_sick_leave: bool,
}

impl TokenRequest {
    fn is_external(&self) -> bool {
        self.sent_to
            .as_deref()
            .is_some_and(|s| s.trim().to_uppercase() == EXTERNAL_PROVIDER)
    }
}

/// Render a counter value as exactly four digits
///
/// Values above 9999 keep their last four digits.
pub fn format_sequence(seq: i64) -> String {
    format!("{:04}", seq.rem_euclid(10_000))
}

/// Generates unique daily tokens for visits
#[derive(Clone)]
pub struct TokenSequencer {
    store: Arc<dyn CounterStore>,
    codes: Arc<LocationCodes>,
}

impl TokenSequencer {
    pub fn new(store: Arc<dyn CounterStore>, codes: LocationCodes) -> Self {
        Self {
            store,
            codes: Arc::new(codes),
        }
    }

    /// Generate a token for today (server-local date)
    pub async fn generate(&self, request: &TokenRequest) -> AppResult<String> {
        self.generate_on(chrono::Local::now().date_naive(), request)
            .await
    }

    /// Generate a token for the given calendar day
    pub async fn generate_on(&self, date: NaiveDate, request: &TokenRequest) -> AppResult<String> {
        let date_key = date.format("%Y-%m-%d").to_string();
        let location = request.location_id.trim();
        let code = self.codes.resolve(location);

        let seq = self.store.increment(location, &date_key).await?;
        if seq > 9_999 {
            tracing::warn!(
                location = %location,
                date_key = %date_key,
                seq,
                "Daily token sequence exceeded 9999, truncating to four digits"
            );
        }

        let mut prefix = code;
        if request.is_external() {
            prefix.push_str("XT");
        }
        if request.eligible_for_sick_leave {
            prefix.insert_str(0, "EL-");
        }

        Ok(format!(
            "{}-{:02}{:02}-{}",
            prefix,
            date.day(),
            date.month(),
            format_sequence(seq)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Counter store kept in memory, atomic under its lock
    #[derive(Default)]
    struct MemoryStore {
        counters: Mutex<HashMap<(String, String), i64>>,
    }

    impl MemoryStore {
        fn starting_at(location: &str, date_key: &str, seq: i64) -> Self {
            let store = Self::default();
            store
                .counters
                .lock()
                .unwrap()
                .insert((location.to_string(), date_key.to_string()), seq);
            store
        }
    }

    #[async_trait]
    impl CounterStore for MemoryStore {
        async fn increment(&self, location_id: &str, date_key: &str) -> AppResult<i64> {
            let mut counters = self.counters.lock().unwrap();
            let seq = counters
                .entry((location_id.to_string(), date_key.to_string()))
                .or_insert(0);
            *seq += 1;
            Ok(*seq)
        }
    }

    fn sequencer(store: MemoryStore) -> TokenSequencer {
        TokenSequencer::new(Arc::new(store), LocationCodes::default())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(location: &str) -> TokenRequest {
        TokenRequest {
            location_id: location.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_token_shapes() {
        let seq = sequencer(MemoryStore::starting_at("AL QOUZ", "2025-12-05", 2));
        let date = day(2025, 12, 5);

        let token = seq.generate_on(date, &request("AL QOUZ")).await.unwrap();
        assert_eq!(token, "QOZ-0512-0003");

        let external = TokenRequest {
            location_id: "AL QOUZ".into(),
            sent_to: Some("  external provider ".into()),
            eligible_for_sick_leave: false,
        };
        let token = seq.generate_on(date, &external).await.unwrap();
        assert_eq!(token, "QOZXT-0512-0004");

        let eligible = TokenRequest {
            eligible_for_sick_leave: true,
            ..external
        };
        let token = seq.generate_on(date, &eligible).await.unwrap();
        assert_eq!(token, "EL-QOZXT-0512-0005");
    }

    #[test]
    fn test_location_resolution() {
        let codes = LocationCodes::default();
        assert_eq!(codes.len(), 22);
        assert_eq!(codes.resolve("AL QOUZ"), "QOZ");
        assert_eq!(codes.resolve("  jebal   ali 3 "), "JAB3");
        assert_eq!(codes.resolve("Sonapur 7"), "SONA7");
        assert_eq!(codes.resolve("WADI RAYAN"), "WADI");
        assert_eq!(codes.resolve("a b"), "AB");
        assert_eq!(codes.resolve("   "), "UNKN");
    }

    #[test]
    fn test_configured_codes_extend_and_override() {
        let mut overrides = IndexMap::new();
        overrides.insert("wadi rayan".to_string(), "wdr".to_string());
        overrides.insert("SAJJA".to_string(), "SJA".to_string());
        let codes = LocationCodes::new(&overrides);
        assert_eq!(codes.resolve("Wadi Rayan"), "WDR");
        assert_eq!(codes.resolve("SAJJA"), "SJA");
        assert_eq!(codes.resolve("RAHABA"), "RAH");
    }

    #[test]
    fn test_format_sequence() {
        assert_eq!(format_sequence(1), "0001");
        assert_eq!(format_sequence(9999), "9999");
        assert_eq!(format_sequence(10_000), "0000");
        assert_eq!(format_sequence(10_001), "0001");
    }

    #[tokio::test]
    async fn test_overflow_keeps_last_four_digits() {
        let seq = sequencer(MemoryStore::starting_at("SAIF", "2025-01-09", 10_000));
        let token = seq
            .generate_on(day(2025, 1, 9), &request("SAIF"))
            .await
            .unwrap();
        assert_eq!(token, "SAIF-0901-0001");
    }

    #[tokio::test]
    async fn test_new_day_restarts_sequence() {
        let seq = sequencer(MemoryStore::default());
        for _ in 0..3 {
            seq.generate_on(day(2025, 3, 1), &request("RAHABA"))
                .await
                .unwrap();
        }
        let token = seq
            .generate_on(day(2025, 3, 2), &request("RAHABA"))
            .await
            .unwrap();
        assert_eq!(token, "RAH-0203-0001");
    }

    #[tokio::test]
    async fn test_counter_key_is_trimmed_location() {
        let seq = sequencer(MemoryStore::default());
        let date = day(2025, 6, 30);
        seq.generate_on(date, &request(" SAJJA ")).await.unwrap();
        let token = seq.generate_on(date, &request("SAJJA")).await.unwrap();
        assert_eq!(token, "SAJJ-3006-0002");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_generation_has_no_duplicates_or_gaps() {
        let seq = sequencer(MemoryStore::default());
        let date = day(2025, 12, 5);
        let n = 200;

        let mut handles = Vec::with_capacity(n);
        for _ in 0..n {
            let seq = seq.clone();
            handles.push(tokio::spawn(async move {
                seq.generate_on(date, &request("DIC 3")).await
            }));
        }

        let mut numbers = Vec::with_capacity(n);
        for handle in handles {
            let token = handle.await.unwrap().unwrap();
            let tail = token.rsplit('-').next().unwrap();
            numbers.push(tail.parse::<usize>().unwrap());
        }
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=n).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_token_format() {
        let pattern = regex::Regex::new(r"^(EL-)?[A-Z0-9]{3,6}(XT)?-\d{4}-\d{4}$").unwrap();
        let seq = sequencer(MemoryStore::default());
        let date = day(2024, 2, 29);
        for (location, sent_to, eligible) in [
            ("KHAWANEEJ", None, false),
            ("Sonapur 4", Some("External Provider"), true),
            ("Wadi Rayan", Some("Clinic"), false),
        ] {
            let req = TokenRequest {
                location_id: location.into(),
                sent_to: sent_to.map(String::from),
                eligible_for_sick_leave: eligible,
            };
            let token = seq.generate_on(date, &req).await.unwrap();
            assert!(pattern.is_match(&token), "unexpected token {}", token);
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockCounterStore::new();
        store
            .expect_increment()
            .times(1)
            .returning(|_, _| Err(AppError::Internal("counter unavailable".into())));
        let seq = TokenSequencer::new(Arc::new(store), LocationCodes::default());

        let result = seq.generate_on(day(2025, 1, 1), &request("SAIF")).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_store_receives_trimmed_location_and_date_key() {
        let mut store = MockCounterStore::new();
        store
            .expect_increment()
            .withf(|loc, key| loc == "DIP 1" && key == "2025-07-04")
            .times(1)
            .returning(|_, _| Ok(12));
        let seq = TokenSequencer::new(Arc::new(store), LocationCodes::default());

        let token = seq
            .generate_on(day(2025, 7, 4), &request("  DIP 1"))
            .await
            .unwrap();
        assert_eq!(token, "DIP1-0407-0012");
    }
}
