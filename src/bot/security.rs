use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Rate-limiter tuning
#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    /// Length of one counting window
    pub window_secs: i64,
    /// Actions allowed per window
    pub max_actions: u32,
    /// Windows a user may overrun before tripping a flood ban
    pub strikes_to_ban: u32,
    /// How long a flood ban lasts
    pub ban_secs: i64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window_secs: 10,
            max_actions: 8,
            strikes_to_ban: 3,
            ban_secs: 300,
        }
    }
}

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    /// Over the window limit; the action is dropped
    Limited,
    /// Flood-banned until the given time
    Banned { until: DateTime<Utc> },
}

#[derive(Debug, Default)]
struct Entry {
    window_start: Option<DateTime<Utc>>,
    count: u32,
    strikes: u32,
    banned_until: Option<DateTime<Utc>>,
}

/// Fixed-window per-user action counters with a flood ban
///
/// Counters live in memory only and reset on restart.
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Mutex<HashMap<i64, Entry>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one action for the chat and returns the verdict
    pub async fn check(&self, chat_id: i64) -> Verdict {
        self.check_at(chat_id, Utc::now()).await
    }

    /// Clock-injected variant of `check`
    pub async fn check_at(&self, chat_id: i64, now: DateTime<Utc>) -> Verdict {
        let mut entries = self.entries.lock().await;

        // Drop chats whose window and ban have both lapsed; otherwise
        // the map grows with every chat id ever seen.
        let window = Duration::seconds(self.config.window_secs);
        entries.retain(|id, entry| {
            if *id == chat_id {
                return true;
            }
            let ban_live = entry.banned_until.is_some_and(|until| now < until);
            let window_live = entry.window_start.is_some_and(|start| now - start < window);
            ban_live || window_live
        });

        let entry = entries.entry(chat_id).or_default();

        if let Some(until) = entry.banned_until {
            if now < until {
                return Verdict::Banned { until };
            }
            // Ban lapsed; start clean.
            *entry = Entry::default();
        }

        match entry.window_start {
            Some(start) if now - start < window => entry.count += 1,
            _ => {
                entry.window_start = Some(now);
                entry.count = 1;
            }
        }

        if entry.count <= self.config.max_actions {
            return Verdict::Allowed;
        }

        // Count each overrun window once.
        if entry.count == self.config.max_actions + 1 {
            entry.strikes += 1;
        }

        if entry.strikes >= self.config.strikes_to_ban {
            let until = now + Duration::seconds(self.config.ban_secs);
            entry.banned_until = Some(until);
            tracing::warn!(chat_id, %until, "Flood ban tripped");
            return Verdict::Banned { until };
        }

        Verdict::Limited
    }

    /// How many chats currently have live counters
    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> RateLimiter {
        RateLimiter::new(RateLimiterConfig {
            window_secs: 10,
            max_actions: 3,
            strikes_to_ban: 2,
            ban_secs: 60,
        })
    }

    #[tokio::test]
    async fn admits_under_the_threshold() {
        let limiter = limiter();
        let now = Utc::now();

        for _ in 0..3 {
            assert_eq!(limiter.check_at(1, now).await, Verdict::Allowed);
        }
    }

    #[tokio::test]
    async fn rejects_over_the_threshold() {
        let limiter = limiter();
        let now = Utc::now();

        for _ in 0..3 {
            limiter.check_at(1, now).await;
        }
        assert_eq!(limiter.check_at(1, now).await, Verdict::Limited);
    }

    #[tokio::test]
    async fn window_rollover_resets_the_count() {
        let limiter = limiter();
        let now = Utc::now();

        for _ in 0..4 {
            limiter.check_at(1, now).await;
        }
        let later = now + Duration::seconds(11);
        assert_eq!(limiter.check_at(1, later).await, Verdict::Allowed);
    }

    #[tokio::test]
    async fn repeat_offender_gets_flood_banned() {
        let limiter = limiter();
        let now = Utc::now();

        // First overrun window: one strike.
        for _ in 0..4 {
            limiter.check_at(1, now).await;
        }
        // Second overrun window: strike two, ban.
        let next = now + Duration::seconds(11);
        for _ in 0..3 {
            limiter.check_at(1, next).await;
        }
        let verdict = limiter.check_at(1, next).await;
        assert!(matches!(verdict, Verdict::Banned { .. }));

        // Still banned a little later.
        let soon = next + Duration::seconds(30);
        assert!(matches!(
            limiter.check_at(1, soon).await,
            Verdict::Banned { .. }
        ));
    }

    #[tokio::test]
    async fn ban_lapses() {
        let limiter = limiter();
        let now = Utc::now();

        for _ in 0..4 {
            limiter.check_at(1, now).await;
        }
        let next = now + Duration::seconds(11);
        for _ in 0..4 {
            limiter.check_at(1, next).await;
        }

        let after_ban = next + Duration::seconds(61);
        assert_eq!(limiter.check_at(1, after_ban).await, Verdict::Allowed);
    }

    #[tokio::test]
    async fn lapsed_chats_are_pruned() {
        let limiter = limiter();
        let now = Utc::now();

        limiter.check_at(1, now).await;
        limiter.check_at(2, now).await;
        assert_eq!(limiter.tracked().await, 2);

        // Both windows lapse; the next check keeps only the caller.
        let later = now + Duration::seconds(11);
        limiter.check_at(3, later).await;
        assert_eq!(limiter.tracked().await, 1);
    }

    #[tokio::test]
    async fn banned_chats_survive_pruning() {
        let limiter = limiter();
        let now = Utc::now();

        // Ban chat 1 (two overrun windows).
        for _ in 0..4 {
            limiter.check_at(1, now).await;
        }
        let next = now + Duration::seconds(11);
        for _ in 0..4 {
            limiter.check_at(1, next).await;
        }

        // Chat 1's window lapsed but its ban has not.
        let later = next + Duration::seconds(15);
        limiter.check_at(2, later).await;
        assert_eq!(limiter.tracked().await, 2);
        assert!(matches!(
            limiter.check_at(1, later).await,
            Verdict::Banned { .. }
        ));
    }

    #[tokio::test]
    async fn chats_are_counted_separately() {
        let limiter = limiter();
        let now = Utc::now();

        for _ in 0..4 {
            limiter.check_at(1, now).await;
        }
        assert_eq!(limiter.check_at(2, now).await, Verdict::Allowed);
    }
}
