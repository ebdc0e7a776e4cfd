//! Built-in simulator.
//!
//! Produces plausible readings when no device is connected.

use std::time::{Duration, Instant};

use pulsewatch_types::Sample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Inbound, SampleSource};
use crate::config::SimulatorSettings;
use crate::data::processor::capture_label;

/// Random sample generator.
///
/// Temperature is uniform over the configured range and rounded to one
/// decimal, vibration is a uniform integer, and the device alert flag is set
/// with the configured probability.
#[derive(Debug, Clone)]
pub struct Generator {
    settings: SimulatorSettings,
    rng: StdRng,
}

impl Generator {
    pub fn new(settings: SimulatorSettings) -> Self {
        Self {
            settings,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests and replays.
    pub fn with_seed(settings: SimulatorSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate one sample stamped with the current time.
    pub fn tick(&mut self) -> Sample {
        self.tick_at(&capture_label())
    }

    /// Generate one sample with an explicit capture label.
    pub fn tick_at(&mut self, captured_at: &str) -> Sample {
        let s = &self.settings;

        // A span that is empty or not finite collapses to a fixed reading
        let temperature = if s.temperature_min < s.temperature_max
            && (s.temperature_max - s.temperature_min).is_finite()
        {
            self.rng.gen_range(s.temperature_min..=s.temperature_max)
        } else if s.temperature_min.is_finite() {
            s.temperature_min
        } else if s.temperature_max.is_finite() {
            s.temperature_max
        } else {
            0.0
        };
        let rounded = (temperature * 10.0).round() / 10.0;
        let temperature = if rounded.is_finite() { rounded } else { temperature };

        let vibration = if s.vibration_min < s.vibration_max {
            self.rng.gen_range(s.vibration_min..=s.vibration_max)
        } else {
            s.vibration_min
        };

        let probability = if s.alert_probability.is_nan() {
            0.0
        } else {
            s.alert_probability.clamp(0.0, 1.0)
        };
        let alert = self.rng.gen_bool(probability);

        Sample::new(temperature, vibration as f64, alert, captured_at)
    }

    pub fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }
}

/// A source that emits one generated sample per interval.
///
/// The first poll reports the source connected; the first sample follows
/// immediately after.
#[derive(Debug)]
pub struct SimulatedSource {
    generator: Generator,
    interval: Duration,
    description: String,
    announced: bool,
    last_tick: Option<Instant>,
}

impl SimulatedSource {
    pub fn new(settings: SimulatorSettings) -> Self {
        Self::from_generator(Generator::new(settings))
    }

    pub fn from_generator(generator: Generator) -> Self {
        let interval = generator.settings().interval;
        Self {
            description: format!(
                "simulator: every {}",
                crate::data::duration::format_duration(interval)
            ),
            generator,
            interval,
            announced: false,
            last_tick: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl SampleSource for SimulatedSource {
    fn poll(&mut self) -> Option<Inbound> {
        if !self.announced {
            self.announced = true;
            return Some(Inbound::Connected);
        }

        let due = self
            .last_tick
            .map_or(true, |last| last.elapsed() >= self.interval);
        if !due {
            return None;
        }

        self.last_tick = Some(Instant::now());
        Some(Inbound::Sample(self.generator.tick()))
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SimulatorSettings {
        SimulatorSettings::default()
    }

    #[test]
    fn test_generated_values_within_ranges() {
        let mut generator = Generator::with_seed(settings(), 7);
        for _ in 0..500 {
            let s = generator.tick_at("12:00:00");
            assert!((20.0..=60.0).contains(&s.temperature), "{}", s.temperature);
            assert!((0.0..=100.0).contains(&s.vibration), "{}", s.vibration);
            assert_eq!(s.vibration.fract(), 0.0);
            assert_eq!((s.temperature * 10.0).round() / 10.0, s.temperature);
            assert_eq!(s.captured_at, "12:00:00");
        }
    }

    #[test]
    fn test_non_finite_settings_do_not_panic() {
        let mut open_low = settings();
        open_low.temperature_min = f64::NEG_INFINITY;
        let mut generator = Generator::with_seed(open_low, 3);
        assert_eq!(generator.tick_at("").temperature, 60.0);

        let mut huge = settings();
        huge.temperature_min = -f64::MAX;
        huge.temperature_max = f64::MAX;
        let mut generator = Generator::with_seed(huge, 3);
        assert!(generator.tick_at("").temperature.is_finite());

        let mut nan = settings();
        nan.temperature_min = f64::NAN;
        nan.temperature_max = f64::NAN;
        nan.alert_probability = f64::NAN;
        let mut generator = Generator::with_seed(nan, 3);
        let sample = generator.tick_at("");
        assert_eq!(sample.temperature, 0.0);
        assert!(!sample.alert_flag);
    }

    #[test]
    fn test_probability_extremes() {
        let mut never = settings();
        never.alert_probability = 0.0;
        let mut generator = Generator::with_seed(never, 1);
        assert!((0..200).all(|_| !generator.tick_at("").alert_flag));

        let mut always = settings();
        always.alert_probability = 1.0;
        let mut generator = Generator::with_seed(always, 1);
        assert!((0..200).all(|_| generator.tick_at("").alert_flag));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Generator::with_seed(settings(), 42);
        let mut b = Generator::with_seed(settings(), 42);
        for _ in 0..20 {
            assert_eq!(a.tick_at("x"), b.tick_at("x"));
        }
    }

    #[test]
    fn test_degenerate_range_is_constant() {
        let mut s = settings();
        s.temperature_min = 45.0;
        s.temperature_max = 45.0;
        s.vibration_min = 70;
        s.vibration_max = 70;
        let mut generator = Generator::with_seed(s, 3);

        let sample = generator.tick_at("");
        assert_eq!(sample.temperature, 45.0);
        assert_eq!(sample.vibration, 70.0);
    }

    #[test]
    fn test_simulated_source_respects_interval() {
        let mut s = settings();
        s.interval = Duration::from_secs(3600);
        let mut source = SimulatedSource::from_generator(Generator::with_seed(s, 9));

        assert_eq!(source.poll(), Some(Inbound::Connected));
        assert!(matches!(source.poll(), Some(Inbound::Sample(_))));
        assert!(source.poll().is_none());
        assert_eq!(source.description(), "simulator: every 60.0m");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_simulated_source_ticks_after_interval() {
        let mut s = settings();
        s.interval = Duration::from_millis(5);
        let mut source = SimulatedSource::from_generator(Generator::with_seed(s, 9));

        source.poll();
        assert!(matches!(source.poll(), Some(Inbound::Sample(_))));
        std::thread::sleep(Duration::from_millis(10));
        assert!(matches!(source.poll(), Some(Inbound::Sample(_))));
    }
}
