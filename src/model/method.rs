//! Normalised correlation methods and their polarity.

use crate::util::IdiffError;
use std::fmt;
use std::str::FromStr;

/// Which extremum of a correlation surface marks the best placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// Distance-like metric: the minimum is best.
    Minimum,
    /// Similarity-like metric: the maximum is best.
    Maximum,
}

/// Correlation metric used to build the template surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TemplateMatchMethod {
    /// Normalised squared difference; 0 is a perfect match.
    SqdiffNormed,
    /// Normalised cross correlation; 1 is a perfect match.
    CcorrNormed,
    /// Normalised correlation coefficient (ZNCC); 1 is a perfect match.
    #[default]
    CcoeffNormed,
}

impl TemplateMatchMethod {
    pub const ALL: [TemplateMatchMethod; 3] = [
        TemplateMatchMethod::SqdiffNormed,
        TemplateMatchMethod::CcorrNormed,
        TemplateMatchMethod::CcoeffNormed,
    ];

    pub fn polarity(self) -> Polarity {
        match self {
            TemplateMatchMethod::SqdiffNormed => Polarity::Minimum,
            TemplateMatchMethod::CcorrNormed | TemplateMatchMethod::CcoeffNormed => {
                Polarity::Maximum
            }
        }
    }

    /// Converts a raw surface value into a score where higher is better.
    pub fn score(self, raw: f32) -> f64 {
        match self.polarity() {
            Polarity::Minimum => 1.0 - f64::from(raw),
            Polarity::Maximum => f64::from(raw),
        }
    }

    /// Raw surface value whose score is zero.
    ///
    /// Unsearched and suppressed surface cells hold this value.
    pub fn neutral(self) -> f32 {
        match self.polarity() {
            Polarity::Minimum => 1.0,
            Polarity::Maximum => 0.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TemplateMatchMethod::SqdiffNormed => "sqdiff-normed",
            TemplateMatchMethod::CcorrNormed => "ccorr-normed",
            TemplateMatchMethod::CcoeffNormed => "ccoeff-normed",
        }
    }
}

impl fmt::Display for TemplateMatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateMatchMethod {
    type Err = IdiffError;

    /// Accepts `sqdiff-normed`, `SQDIFF_NORMED` and `CV_TM_SQDIFF_NORMED` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let normalized = normalized.strip_prefix("cv-tm-").unwrap_or(&normalized);
        match normalized {
            "sqdiff-normed" => Ok(TemplateMatchMethod::SqdiffNormed),
            "ccorr-normed" => Ok(TemplateMatchMethod::CcorrNormed),
            "ccoeff-normed" => Ok(TemplateMatchMethod::CcoeffNormed),
            _ => Err(IdiffError::UnknownMethod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Polarity, TemplateMatchMethod};

    #[test]
    fn sqdiff_is_a_distance() {
        let method = TemplateMatchMethod::SqdiffNormed;
        assert_eq!(method.polarity(), Polarity::Minimum);
        assert!((method.score(0.0) - 1.0).abs() < 1e-12);
        assert!((method.score(0.25) - 0.75).abs() < 1e-12);
        assert_eq!(method.score(method.neutral()), 0.0);
    }

    #[test]
    fn correlation_methods_are_similarities() {
        for method in [
            TemplateMatchMethod::CcorrNormed,
            TemplateMatchMethod::CcoeffNormed,
        ] {
            assert_eq!(method.polarity(), Polarity::Maximum);
            assert!((method.score(0.5) - 0.5).abs() < 1e-12);
            assert_eq!(method.score(method.neutral()), 0.0);
        }
    }

    #[test]
    fn parses_method_names() {
        for method in TemplateMatchMethod::ALL {
            assert_eq!(method.name().parse::<TemplateMatchMethod>().unwrap(), method);
        }
        assert_eq!(
            "CV_TM_CCORR_NORMED".parse::<TemplateMatchMethod>().unwrap(),
            TemplateMatchMethod::CcorrNormed
        );
        assert_eq!(
            "SQDIFF_NORMED".parse::<TemplateMatchMethod>().unwrap(),
            TemplateMatchMethod::SqdiffNormed
        );
        assert!("ccoeff".parse::<TemplateMatchMethod>().is_err());
    }
}
