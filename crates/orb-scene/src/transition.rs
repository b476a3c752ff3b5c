//! Startup fade from black.

/// Linear opacity ramp from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeIn {
    duration: f64,
    elapsed: f64,
}

impl FadeIn {
    /// A non-positive duration starts fully opaque.
    #[must_use]
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration: duration_secs.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, delta: f64) {
        self.elapsed += delta.max(0.0);
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp() {
        let mut f = FadeIn::new(1.0);
        assert_eq!(f.opacity(), 0.0);
        f.advance(0.25);
        assert_eq!(f.opacity(), 0.25);
        f.advance(2.0);
        assert_eq!(f.opacity(), 1.0);
    }

    #[test]
    fn test_zero_duration_is_opaque() {
        assert_eq!(FadeIn::new(0.0).opacity(), 1.0);
        assert_eq!(FadeIn::new(-3.0).opacity(), 1.0);
    }
}
