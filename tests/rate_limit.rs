use rate_window_core::clock::{Clock, ManualClock};
use rate_window_core::limiters::{AcquireOptions, RateLimit};
use rate_window_core::{LimitError, RingBufferTimeTable, TimeTableError};

fn new_rate_limit(amount: i64, period: i64) -> (RateLimit<ManualClock>, ManualClock) {
    let clock = ManualClock::new(0);
    let limit =
        RateLimit::with_parts(amount, period, RingBufferTimeTable::default(), clock.clone()).unwrap();
    (limit, clock)
}

#[test]
fn test_new_with_invalid_parameters() {
    assert_eq!(
        RateLimit::new(0, 1000).unwrap_err(),
        LimitError::InvalidConfig("amount must be greater than 0")
    );
    assert_eq!(
        RateLimit::new(10, -1).unwrap_err(),
        LimitError::InvalidConfig("period must not be negative")
    );
    let limit = RateLimit::new(10, 0).unwrap();
    assert_eq!(limit.amount(), 10);
    assert_eq!(limit.period(), 0);
}

#[test]
fn test_acquire_within_quota() {
    let (mut limit, clock) = new_rate_limit(100, 1000);
    assert_eq!(limit.acquire(10), Ok(0));
    clock.advance(100);
    assert_eq!(limit.acquire(80), Ok(0));
    assert_eq!(limit.current_rate(), 90);
}

#[test]
fn test_wait_times() {
    let (mut limit, clock) = new_rate_limit(100, 1000);
    assert_eq!(limit.acquire(10), Ok(0));
    clock.advance(100);
    assert_eq!(limit.acquire(80), Ok(0));

    // 10 units missing; the entry at 0 leaves the window after 1000
    clock.advance(100);
    assert_eq!(limit.acquire(20), Ok(801));
    clock.advance(800);
    assert_eq!(limit.acquire(20), Ok(1));
    clock.advance(1);
    assert_eq!(limit.acquire(20), Ok(0));
}

#[test]
fn test_current_rate_over_time() {
    let (mut limit, clock) = new_rate_limit(100, 1000);
    limit.acquire(10).unwrap();
    clock.set(100);
    limit.acquire(80).unwrap();
    clock.set(1001);
    assert_eq!(limit.acquire(20), Ok(0));

    assert_eq!(limit.current_rate(), 100);
    clock.advance(100);
    assert_eq!(limit.current_rate(), 20);
    clock.advance(1899);
    assert_eq!(limit.current_rate(), 0);
}

#[test]
fn test_absolute_time() {
    let (mut limit, clock) = new_rate_limit(100, 1000);
    limit.acquire(60).unwrap();
    clock.set(10);
    let options = AcquireOptions::WAIT.absolute();
    assert_eq!(limit.acquire_with(60, options), Ok(1001));
    // A granted request still reports no wait
    assert_eq!(limit.acquire_at(1001, 60, options), Ok(0));
}

#[test]
fn test_reservations() {
    let (mut limit, clock) = new_rate_limit(100, 1000);
    clock.set(3000);

    assert_eq!(limit.reserve(40), Ok(0));
    assert_eq!(limit.current_rate(), 40);
    clock.advance(100);
    assert_eq!(limit.reserve(50), Ok(0));
    assert_eq!(limit.current_rate(), 90);
    clock.advance(100);
    assert_eq!(limit.reserve(50), Ok(801));

    // The reservation only counts once its tick arrives
    assert_eq!(limit.current_rate(), 90);
    clock.advance(800);
    assert_eq!(limit.current_rate(), 90);
    clock.advance(1);
    assert_eq!(limit.current_rate(), 100);
    clock.advance(100);
    assert_eq!(limit.current_rate(), 50);
    clock.advance(901);
    assert_eq!(limit.current_rate(), 0);
}

#[test]
fn test_stacked_reservations_queue_up() {
    let (mut limit, clock) = new_rate_limit(100, 1000);
    assert_eq!(limit.reserve(100), Ok(0));
    clock.advance(100);
    assert_eq!(limit.reserve(100), Ok(901));
    clock.advance(100);
    assert_eq!(limit.reserve(100), Ok(1802));

    let absolute = AcquireOptions::RESERVE.absolute();
    assert_eq!(limit.acquire_with(100, absolute), Ok(3003));
}

#[test]
fn test_unreserved_wait_does_not_record() {
    let (mut limit, _clock) = new_rate_limit(100, 1000);
    assert_eq!(limit.acquire_at(0, 100, AcquireOptions::WAIT), Ok(0));
    assert_eq!(limit.acquire_at(10, 50, AcquireOptions::WAIT), Ok(991));
    assert_eq!(limit.acquire_at(20, 50, AcquireOptions::WAIT), Ok(981));
    assert_eq!(limit.current_rate_at(20), 100);
}

#[test]
fn test_request_beyond_capacity() {
    let (mut limit, _clock) = new_rate_limit(100, 1000);
    assert_eq!(
        limit.acquire(101),
        Err(LimitError::BeyondCapacity { acquiring: 101, capacity: 100 })
    );
    // Also when other usage exists, nothing is recorded
    limit.acquire(30).unwrap();
    assert!(matches!(
        limit.reserve(150),
        Err(LimitError::BeyondCapacity { acquiring: 150, .. })
    ));
    assert_eq!(limit.current_rate(), 30);
}

#[test]
fn test_clock_going_backwards() {
    let (mut limit, clock) = new_rate_limit(100, 1000);
    clock.set(50);
    limit.acquire(10).unwrap();
    clock.set(40);
    assert_eq!(
        limit.acquire(10),
        Err(LimitError::Table(TimeTableError::ExpiredTick { last_tick: 50, tick: 40 }))
    );
    assert_eq!(limit.current_rate_at(50), 10);
}

#[test]
fn test_clear_resets_window() {
    let (mut limit, clock) = new_rate_limit(100, 1000);
    limit.acquire(100).unwrap();
    limit.reserve(100).unwrap();
    limit.clear();
    assert_eq!(limit.current_rate(), 0);
    // Time may restart after a clear
    clock.set(0);
    assert_eq!(limit.acquire(100), Ok(0));
}

#[test]
fn test_zero_period_window() {
    let (mut limit, _clock) = new_rate_limit(10, 0);
    assert_eq!(limit.acquire_at(5, 10, AcquireOptions::WAIT), Ok(0));
    assert_eq!(limit.acquire_at(5, 1, AcquireOptions::WAIT), Ok(1));
    assert_eq!(limit.acquire_at(6, 10, AcquireOptions::WAIT), Ok(0));
}

#[test]
fn test_closure_clock() {
    let clock = ManualClock::new(0);
    let handle = clock.clone();
    let mut limit = RateLimit::with_parts(
        5,
        100,
        RingBufferTimeTable::new(2, 8).unwrap(),
        move || handle.now(),
    )
    .unwrap();
    assert_eq!(limit.acquire(5), Ok(0));
    clock.advance(50);
    assert_eq!(limit.acquire(1), Ok(51));
}

#[test]
fn test_negative_request_rejected() {
    let (mut limit, _clock) = new_rate_limit(100, 1000);
    assert_eq!(
        limit.acquire(-1),
        Err(LimitError::Table(TimeTableError::NegativeAmount { amount: -1 }))
    );
    assert_eq!(limit.acquire(0), Ok(0));
    assert_eq!(limit.current_rate(), 0);
}

#[test]
fn test_negative_tick_rejected() {
    let (mut limit, _clock) = new_rate_limit(10, 1000);
    assert_eq!(limit.acquire_at(0, 10, AcquireOptions::WAIT), Ok(0));

    // Rejected on the delay path too, where nothing would be recorded
    assert_eq!(
        limit.acquire_at(-5, 5, AcquireOptions::WAIT),
        Err(LimitError::Table(TimeTableError::NegativeTick { tick: -5 }))
    );
    assert_eq!(
        limit.acquire_at(i64::MIN, 5, AcquireOptions::WAIT),
        Err(LimitError::Table(TimeTableError::NegativeTick { tick: i64::MIN }))
    );
    assert_eq!(
        limit.acquire_at(-1, 5, AcquireOptions::RESERVE.absolute()),
        Err(LimitError::Table(TimeTableError::NegativeTick { tick: -1 }))
    );

    // A negative tick sees no usage and leaves the window alone
    assert_eq!(limit.current_rate_at(-5), 0);
    assert_eq!(limit.current_rate_at(i64::MIN), 0);
    assert_eq!(limit.current_rate_at(0), 10);
    assert_eq!(limit.acquire_at(10, 5, AcquireOptions::WAIT), Ok(991));
}
