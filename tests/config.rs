use rate_window_core::config::{RateCounterConfig, RateLimitConfig, TickLimitConfig, TimeTableConfig};
use rate_window_core::limiters::{RateCounter, RateLimit, TickLimit};
use rate_window_core::{LimitError, RingBufferTimeTable, TimeTableError};

#[test]
fn test_table_config_defaults() {
    let config: TimeTableConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, TimeTableConfig::default());
    assert_eq!(config.resolved_max_buffer_size(), 4096);

    let table = RingBufferTimeTable::try_from(config).unwrap();
    assert_eq!(table.current_buffer_size(), 64);
    assert_eq!(table.max_buffer_size(), 4096);
}

#[test]
fn test_table_config_derives_max_from_buffer_size() {
    let config: TimeTableConfig = serde_json::from_str(r#"{"buffer_size": 16}"#).unwrap();
    assert_eq!(config.resolved_max_buffer_size(), 1024);

    let config: TimeTableConfig =
        serde_json::from_str(r#"{"buffer_size": 16, "max_buffer_size": 32}"#).unwrap();
    assert_eq!(config, TimeTableConfig::new(16, 32));
}

#[test]
fn test_invalid_table_config() {
    let config = TimeTableConfig::new(8, 4);
    assert_eq!(
        RingBufferTimeTable::try_from(config).unwrap_err(),
        TimeTableError::InvalidConfig { buffer_size: 8, max_buffer_size: 4 }
    );
}

#[test]
fn test_rate_limit_config() {
    let config: RateLimitConfig = serde_json::from_str(r#"{"amount": 100}"#).unwrap();
    assert_eq!(config.period, 1000);
    assert_eq!(config.table, TimeTableConfig::default());

    let limit: RateLimit = config.try_into().unwrap();
    assert_eq!(limit.amount(), 100);
    assert_eq!(limit.period(), 1000);

    // amount has no default
    assert!(serde_json::from_str::<RateLimitConfig>("{}").is_err());
}

#[test]
fn test_rate_limit_config_with_bad_table() {
    let config: RateLimitConfig =
        serde_json::from_str(r#"{"amount": 10, "table": {"buffer_size": 1}}"#).unwrap();
    let result: Result<RateLimit, _> = config.try_into();
    assert!(matches!(
        result,
        Err(LimitError::Table(TimeTableError::InvalidConfig { buffer_size: 1, .. }))
    ));
}

#[test]
fn test_rate_counter_config() {
    let config: RateCounterConfig = serde_json::from_str(r#"{"period": 250}"#).unwrap();
    let counter: RateCounter = config.try_into().unwrap();
    assert_eq!(counter.period(), 250);

    let config = RateCounterConfig {
        period: -1,
        ..RateCounterConfig::default()
    };
    let result: Result<RateCounter, _> = config.try_into();
    assert!(result.is_err());
}

#[test]
fn test_tick_limit_config() {
    let config: TickLimitConfig =
        serde_json::from_str(r#"{"amount": 10, "period": 60000, "table": {"buffer_size": 4}}"#)
            .unwrap();
    let limit: TickLimit = config.try_into().unwrap();
    assert_eq!(limit.amount(), 10);
    assert_eq!(limit.period(), 60000);

    let config = TickLimitConfig {
        amount: 0,
        ..TickLimitConfig::default()
    };
    let result: Result<TickLimit, _> = config.try_into();
    assert_eq!(
        result.unwrap_err(),
        LimitError::InvalidConfig("amount must be greater than 0")
    );
}

#[test]
fn test_config_round_trip_omits_derived_max() {
    let json = serde_json::to_string(&RateLimitConfig::default()).unwrap();
    assert_eq!(json, r#"{"amount":1,"period":1000,"table":{"buffer_size":64}}"#);
}
