use displaydoc::Display;
use thiserror::Error;

/// Potential errors of the analysis configuration.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum ConfigError {
    /// Unknown metric {0:?}, expected one of LEV, DAM-LEV, HAM, JAR, JAR-WIN, PYTHON, KENDALL, SPEARMAN, G, M, T
    UnknownMetric(String),
    /// Invalid weights, expected non-empty vectors a, b and c of equal length
    WeightShape,
    /// Invalid weights, expected finite values from the unit interval
    WeightRange,
    /// Invalid bonus, expected finite, non-negative and non-increasing values with a sum of at most one
    Bonus,
    /// Invalid bonus threshold, expected a finite value
    Threshold,
    /// Expected the texts of exactly one cell, got {0}
    CellTexts(usize),
}

/// The configuration of the composite T metric.
///
/// Each index `i` of the weight vectors `a`, `b` and `c` forms one weight configuration, the
/// metric yields one similarity per configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TConfig {
    a: Vec<f32>,
    b: Vec<f32>,
    c: Vec<f32>,
    bonus: Option<Vec<f32>>,
    threshold: f32,
}

impl TConfig {
    /// The weights of the snippet distance.
    pub fn a(&self) -> &[f32] {
        &self.a
    }

    /// The weights of the title distance.
    pub fn b(&self) -> &[f32] {
        &self.b
    }

    /// The weights of the transposition penalty.
    pub fn c(&self) -> &[f32] {
        &self.c
    }

    /// The number of weight configurations.
    pub fn configurations(&self) -> usize {
        self.a.len()
    }

    /// Sets the weight vectors.
    ///
    /// # Errors
    /// Fails if the vectors are empty, differ in length or hold values outside of the unit
    /// interval.
    pub fn with_weights(self, a: &[f32], b: &[f32], c: &[f32]) -> Result<Self, ConfigError> {
        if a.is_empty() || a.len() != b.len() || a.len() != c.len() {
            return Err(ConfigError::WeightShape);
        }
        if !a
            .iter()
            .chain(b)
            .chain(c)
            .all(|weight| (0. ..=1.).contains(weight))
        {
            return Err(ConfigError::WeightRange);
        }

        Ok(Self {
            a: a.to_vec(),
            b: b.to_vec(),
            c: c.to_vec(),
            ..self
        })
    }

    /// The positional bonus, highest weight for the top rank first.
    pub fn bonus(&self) -> Option<&[f32]> {
        self.bonus.as_deref()
    }

    /// Sets the positional bonus, `None` disables it.
    ///
    /// # Errors
    /// Fails if the bonus has non-finite or negative values, is not sorted in non-increasing
    /// order or sums up to more than one.
    pub fn with_bonus(self, bonus: Option<&[f32]>) -> Result<Self, ConfigError> {
        if let Some(bonus) = bonus {
            let valid = bonus
                .iter()
                .all(|weight| weight.is_finite() && *weight >= 0.)
                && bonus.windows(2).all(|pair| pair[0] >= pair[1])
                && bonus.iter().sum::<f32>() <= 1.;
            if !valid {
                return Err(ConfigError::Bonus);
            }
        }

        Ok(Self {
            bonus: bonus.map(<[f32]>::to_vec),
            ..self
        })
    }

    /// The minimum raw similarity for the positional bonus to apply.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Sets the threshold.
    ///
    /// # Errors
    /// Fails if the threshold is not finite.
    pub fn with_threshold(self, threshold: f32) -> Result<Self, ConfigError> {
        if threshold.is_finite() {
            Ok(Self { threshold, ..self })
        } else {
            Err(ConfigError::Threshold)
        }
    }
}

impl Default for TConfig {
    fn default() -> Self {
        Self {
            a: vec![0.8],
            b: vec![1.],
            c: vec![0.33],
            bonus: Some(vec![0.15, 0.1, 0.07, 0.04, 0.01]),
            threshold: 0.1,
        }
    }
}
