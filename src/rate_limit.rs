use parking_lot::Mutex;
use tokio::time::Instant;

// Token bucket - one per client identity
//
// Refill happens lazily on access: elapsed time * rate is added before every
// admission check, so no per-bucket timer exists.
pub struct TokenBucket {
    capacity: u32,
    refill_rate: f64, // tokens per second
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64, // fractional tokens are kept between calls
    last_refill: Instant,
}

impl TokenBucket {
    // New bucket starts full
    pub fn new(capacity: u32, refill_rate: f64) -> Self {
        Self::new_at(capacity, refill_rate, Instant::now())
    }

    pub fn new_at(capacity: u32, refill_rate: f64, now: Instant) -> Self {
        Self {
            capacity,
            refill_rate,
            state: Mutex::new(BucketState {
                tokens: capacity as f64,
                last_refill: now,
            }),
        }
    }

    // Take one token if available
    pub fn try_admit(&self) -> bool {
        self.try_admit_at(Instant::now())
    }

    pub fn try_admit_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock();

        // saturating: a caller may pass a `now` taken before another thread refilled
        let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_rate).min(self.capacity as f64);
        if now > state.last_refill {
            state.last_refill = now;
        }

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            return true;
        }

        false
    }

    // Current token count (after the last refill, no refill applied here)
    pub fn tokens(&self) -> f64 {
        self.state.lock().tokens
    }
}
