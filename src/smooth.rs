use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smooth {
    from: f32,
    to: f32,
}

impl Smooth {
    pub const fn new(value: f32) -> Self {
        Self {
            from: value,
            to: value,
        }
    }

    pub const fn interpolate(&self, t: f32) -> f32 {
        t * self.to + (1.0 - t) * self.from
    }

    pub const fn target(&self) -> f32 {
        self.to
    }

    pub const fn set(&mut self, to: f32) {
        self.to = to;
    }

    pub const fn stabilize(&mut self) {
        self.from = self.to;
    }

    pub const fn shift_set(&mut self, to: f32, t: f32) {
        self.from = self.interpolate(t);
        self.to = to;
    }
}

#[derive(Clone, Debug)]
pub struct TimedSmooth {
    smooth: Smooth,
    last_modified: Instant,
    now_cached: Instant,
    transition: Duration,
}

impl TimedSmooth {
    pub fn new(value: f32, transition: Duration) -> Self {
        let now = Instant::now();

        Self {
            smooth: Smooth::new(value),
            last_modified: now,
            now_cached: now,
            transition,
        }
    }

    fn ratio(&self) -> f32 {
        if self.transition.is_zero() {
            return 1.0;
        }
        let elapsed = self.now_cached.saturating_duration_since(self.last_modified);
        (elapsed.as_secs_f32() / self.transition.as_secs_f32()).min(1.0)
    }

    fn ratio_curved(&self) -> f32 {
        let r = self.ratio();
        r * (2.0 - r)
    }

    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    pub fn update_at(&mut self, now: Instant) {
        self.now_cached = now;
    }

    pub fn interpolate(&self) -> f32 {
        self.smooth.interpolate(self.ratio_curved())
    }

    pub fn target(&self) -> f32 {
        self.smooth.target()
    }

    pub fn shift_set(&mut self, to: f32) {
        self.smooth.shift_set(to, self.ratio_curved());
        self.last_modified = self.now_cached;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_blends_and_settles() {
        let mut s = Smooth::new(1.0);
        s.set(3.0);
        assert_eq!(s.interpolate(0.5), 2.0);
        s.stabilize();
        assert_eq!(s.interpolate(0.0), 3.0);
    }

    #[test]
    fn timed_smooth_eases_out() {
        let start = Instant::now();
        let mut s = TimedSmooth::new(0.0, Duration::from_millis(100));
        s.update_at(start);
        s.shift_set(10.0);

        s.update_at(start + Duration::from_millis(50));
        let mid = s.interpolate();
        assert!(mid > 5.0 && mid < 10.0, "{mid}");

        s.update_at(start + Duration::from_millis(250));
        assert_eq!(s.interpolate(), 10.0);
    }

    #[test]
    fn retarget_mid_flight_starts_from_current_value() {
        let start = Instant::now();
        let mut s = TimedSmooth::new(0.0, Duration::from_millis(100));
        s.update_at(start);
        s.shift_set(10.0);
        s.update_at(start + Duration::from_millis(50));
        let here = s.interpolate();

        s.shift_set(-10.0);
        assert_eq!(s.interpolate(), here);
        assert_eq!(s.target(), -10.0);
    }
}
