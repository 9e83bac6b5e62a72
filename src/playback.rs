use crate::smooth::Smooth;
use std::time::Duration;

pub struct Playback {
    position: f64,
    total: f64,
    paused: bool,
    speed: Smooth,
    pub end: bool,
}

impl Playback {
    const SKIP_SECS: f64 = 5.0;
    const MIN_SPEED: f32 = 0.1;
    const MAX_SPEED: f32 = 4.0;

    pub fn new(total_ms: f64) -> Self {
        Self {
            position: 0.0,
            total: if total_ms.is_finite() { total_ms.max(0.0) / 1000.0 } else { 0.0 },
            paused: false,
            speed: Smooth::new(1.0),
            end: false,
        }
    }

    pub fn tick(&mut self, elapsed: Duration) -> f64 {
        if !self.paused && !self.end {
            let speed = self.speed.interpolate(0.5) as f64;
            self.position += elapsed.as_secs_f64() * speed;

            if self.position >= self.total {
                self.position = self.total;
                self.end = true;
            }
        }

        self.speed.stabilize();
        self.position
    }

    pub const fn position(&self) -> f64 {
        self.position
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub const fn progress(&self) -> f32 {
        if self.total > 0.0 {
            (self.position / self.total) as f32
        } else {
            0.0
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub const fn speed(&self) -> f32 {
        self.speed.target()
    }

    pub fn set_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.speed.set(speed.clamp(Self::MIN_SPEED, Self::MAX_SPEED));
        }
    }

    pub fn seek(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.position = seconds.clamp(0.0, self.total);
            self.end = self.position >= self.total && self.total > 0.0;
        }
    }

    pub fn skip(&mut self, mult: i32) {
        self.seek(self.position + Self::SKIP_SECS * mult as f64);
    }

    pub fn restart(&mut self) {
        self.position = 0.0;
        self.end = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_forward_until_the_end() {
        let mut p = Playback::new(2000.0);
        assert_eq!(p.tick(Duration::from_millis(500)), 0.5);
        assert_eq!(p.progress(), 0.25);

        p.tick(Duration::from_secs(10));
        assert!(p.end);
        assert_eq!(p.position(), 2.0);
    }

    #[test]
    fn pause_holds_position() {
        let mut p = Playback::new(10_000.0);
        p.tick(Duration::from_secs(1));
        p.toggle_pause();
        assert_eq!(p.tick(Duration::from_secs(3)), 1.0);
    }

    #[test]
    fn speed_change_ramps_over_one_tick() {
        let mut p = Playback::new(10_000.0);
        p.set_speed(3.0);
        assert_eq!(p.speed(), 3.0);
        assert_eq!(p.tick(Duration::from_secs(1)), 2.0);
        assert_eq!(p.tick(Duration::from_secs(1)), 5.0);
    }

    #[test]
    fn speed_is_clamped() {
        let mut p = Playback::new(10_000.0);
        p.set_speed(0.1 - 0.25);
        assert_eq!(p.speed(), 0.1);
        p.set_speed(40.0);
        assert_eq!(p.speed(), 4.0);
        p.set_speed(f32::NAN);
        assert_eq!(p.speed(), 4.0);
    }

    #[test]
    fn skips_are_clamped() {
        let mut p = Playback::new(12_000.0);
        p.skip(-1);
        assert_eq!(p.position(), 0.0);
        p.skip(2);
        assert_eq!(p.position(), 10.0);
        p.skip(1);
        assert_eq!(p.position(), 12.0);
        assert!(p.end);

        p.seek(3.0);
        assert!(!p.end);
        p.restart();
        assert_eq!(p.position(), 0.0);
    }
}
