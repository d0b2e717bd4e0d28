use alloc::sync::Arc;

/// A predicate over the scroll velocity, in pixels per second (signed: negative is backward).
pub type VelocityPredicate = Arc<dyn Fn(i64) -> bool + Send + Sync>;

/// Tuning for placeholder rendering during fast scrolling.
#[derive(Clone)]
pub struct ScrollSeekConfig {
    /// Entering seek mode: checked on every scroll sample while not seeking.
    pub enter: VelocityPredicate,
    /// Leaving seek mode: must hold for `debounce_ms` before placeholders are dropped.
    pub exit: VelocityPredicate,
    pub debounce_ms: u64,
}

impl ScrollSeekConfig {
    pub fn new(
        enter: impl Fn(i64) -> bool + Send + Sync + 'static,
        exit: impl Fn(i64) -> bool + Send + Sync + 'static,
        debounce_ms: u64,
    ) -> Self {
        Self {
            enter: Arc::new(enter),
            exit: Arc::new(exit),
            debounce_ms,
        }
    }

    /// Seeks while the absolute velocity exceeds `px_per_sec`.
    pub fn threshold(px_per_sec: u64, debounce_ms: u64) -> Self {
        Self::new(
            move |v| v.unsigned_abs() > px_per_sec,
            move |v| v.unsigned_abs() <= px_per_sec,
            debounce_ms,
        )
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }
}

impl core::fmt::Debug for ScrollSeekConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollSeekConfig")
            .field("debounce_ms", &self.debounce_ms)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeekPhase {
    #[default]
    Idle,
    Scrolling,
    Seeking,
}

/// Classifies a stream of `(offset, now_ms)` scroll samples as idle, scrolling or seeking.
///
/// The detector is clock-agnostic: timestamps come from the adapter, and [`Self::tick`] must be
/// called periodically so that debounces elapse without new samples.
#[derive(Clone, Debug)]
pub struct ScrollSeekDetector {
    config: Option<ScrollSeekConfig>,
    idle_delay_ms: u64,
    phase: SeekPhase,
    velocity: i64,
    last_sample: Option<(u64, u64)>,
    calm_since: Option<u64>,
}

impl ScrollSeekDetector {
    pub fn new(config: Option<ScrollSeekConfig>, idle_delay_ms: u64) -> Self {
        Self {
            config,
            idle_delay_ms,
            phase: SeekPhase::Idle,
            velocity: 0,
            last_sample: None,
            calm_since: None,
        }
    }

    pub fn config(&self) -> Option<&ScrollSeekConfig> {
        self.config.as_ref()
    }

    pub fn set_config(&mut self, config: Option<ScrollSeekConfig>) {
        self.config = config;
        if self.config.is_none() && self.phase == SeekPhase::Seeking {
            self.phase = SeekPhase::Scrolling;
            self.calm_since = None;
        }
    }

    pub fn idle_delay_ms(&self) -> u64 {
        self.idle_delay_ms
    }

    pub fn set_idle_delay_ms(&mut self, delay_ms: u64) {
        self.idle_delay_ms = delay_ms;
    }

    pub fn phase(&self) -> SeekPhase {
        self.phase
    }

    /// Last computed velocity in pixels per second.
    pub fn velocity(&self) -> i64 {
        self.velocity
    }

    pub fn is_scrolling(&self) -> bool {
        self.phase != SeekPhase::Idle
    }

    pub fn is_seeking(&self) -> bool {
        self.phase == SeekPhase::Seeking
    }

    /// Feeds a scroll sample and returns the resulting phase.
    pub fn sample(&mut self, offset: u64, now_ms: u64) -> SeekPhase {
        let velocity = match self.last_sample {
            Some((prev, at)) => {
                let dt = now_ms.saturating_sub(at).max(1) as i128;
                let delta = offset as i128 - prev as i128;
                (delta * 1000 / dt).clamp(i64::MIN as i128, i64::MAX as i128) as i64
            }
            None => 0,
        };
        self.velocity = velocity;
        self.last_sample = Some((offset, now_ms));

        let Some(config) = &self.config else {
            self.phase = SeekPhase::Scrolling;
            return self.phase;
        };

        if self.phase == SeekPhase::Seeking {
            if (config.exit)(velocity) {
                let since = *self.calm_since.get_or_insert(now_ms);
                if now_ms.saturating_sub(since) >= config.debounce_ms {
                    vtrace!(velocity, now_ms, "ScrollSeekDetector: exit");
                    self.phase = SeekPhase::Scrolling;
                    self.calm_since = None;
                }
            } else {
                self.calm_since = None;
            }
        } else if (config.enter)(velocity) {
            vtrace!(velocity, now_ms, "ScrollSeekDetector: enter");
            self.phase = SeekPhase::Seeking;
            self.calm_since = None;
        } else {
            self.phase = SeekPhase::Scrolling;
        }
        self.phase
    }

    /// Moves the reference sample to `offset` without measuring a velocity. Used for jumps the
    /// list made itself, which must not read as fast scrolling.
    pub fn rebase(&mut self, offset: u64, now_ms: u64) {
        self.last_sample = Some((offset, now_ms));
        self.velocity = 0;
    }

    /// Advances timers without a new sample: leaves seek mode once the debounce has elapsed since
    /// scrolling calmed down (or stopped), and goes idle after the idle delay.
    pub fn tick(&mut self, now_ms: u64) -> SeekPhase {
        let Some((_, at)) = self.last_sample else {
            return self.phase;
        };
        let quiet_ms = now_ms.saturating_sub(at);

        if self.phase == SeekPhase::Seeking {
            let debounce_ms = self.config.as_ref().map_or(0, |c| c.debounce_ms);
            let calm_since = self.calm_since.unwrap_or(at);
            if now_ms.saturating_sub(calm_since) < debounce_ms {
                return self.phase;
            }
            vtrace!(now_ms, "ScrollSeekDetector: exit (settled)");
            self.calm_since = None;
            self.phase = SeekPhase::Scrolling;
        }

        if self.phase == SeekPhase::Scrolling && quiet_ms >= self.idle_delay_ms {
            self.phase = SeekPhase::Idle;
            self.velocity = 0;
        }
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = SeekPhase::Idle;
        self.velocity = 0;
        self.last_sample = None;
        self.calm_since = None;
    }
}
