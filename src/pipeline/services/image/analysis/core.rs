use image::RgbImage;

type Predicate<I> = Box<dyn Fn(&I) -> bool + Send + Sync>;

/// Ordered `(predicate, outcome)` rules. The first predicate that holds wins;
/// later rules are only reached when every earlier one fails.
pub struct DecisionTable<I, O> {
    rules: Vec<(Predicate<I>, O)>,
    fallback: O,
}

impl<I, O: Clone> DecisionTable<I, O> {
    pub fn new(fallback: O) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    pub fn rule(
        mut self,
        predicate: impl Fn(&I) -> bool + Send + Sync + 'static,
        outcome: O,
    ) -> Self {
        self.rules.push((Box::new(predicate), outcome));
        self
    }

    pub fn evaluate(&self, input: &I) -> O {
        self.rules
            .iter()
            .find(|(predicate, _)| predicate(input))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Strategy for a single whole-image analysis step
pub trait SkyAnalyzer: Send + Sync {
    type Output;

    fn analyze(&self, image: &RgbImage) -> Self::Output;
    fn name(&self) -> &'static str;
}

/// Sum of pairwise channel differences; zero for a perfectly neutral color.
pub fn channel_variance(r: f64, g: f64, b: f64) -> f64 {
    (r - g).abs() + (g - b).abs() + (b - r).abs()
}

/// Maps a 0-255 level to `floor(level / 255 * scale)`, clamped to 0-100.
pub fn scaled_score(level: f64, scale: f64) -> u8 {
    clamp_score((level / 255.0 * scale).floor())
}

pub fn clamp_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0) as u8
}

/// Rounds to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
