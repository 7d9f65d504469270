//! Generator price progression.
//!
//! `level` is always the number of levels already owned, so `cost(0)` is the
//! price of the first level.

use crate::defs::CostCurveDef;
use crate::error::ConfigError;
use crate::ids::GeneratorId;

/// Compiled cost curve of a generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CostCurve {
    /// `base + step * level`
    Linear { step: f64 },
    /// `base * growth^level`
    Geometric { growth: f64 },
    /// `base * (1 + a*level + b*level²)`
    Polynomial { a: f64, b: f64 },
}

impl CostCurve {
    /// Compile a raw curve definition. Type names match case-insensitively.
    pub fn from_def(generator: &GeneratorId, def: &CostCurveDef) -> Result<Self, ConfigError> {
        let curve = match def.kind.trim().to_ascii_lowercase().as_str() {
            "linear" => CostCurve::Linear { step: def.step },
            "geometric" => CostCurve::Geometric { growth: def.growth },
            "polynomial" => CostCurve::Polynomial { a: def.a, b: def.b },
            _ => {
                return Err(ConfigError::UnknownCostCurve {
                    generator: generator.to_string(),
                    kind: def.kind.clone(),
                })
            }
        };
        if !curve.params_finite() {
            return Err(ConfigError::NonFinite {
                owner: format!("generator {generator}"),
                field: "costCurve",
            });
        }
        Ok(curve)
    }

    /// Price of level `level + 1` for a generator with the given base cost.
    pub fn cost(&self, base_cost: f64, level: u32) -> f64 {
        match *self {
            CostCurve::Linear { step } => linear(base_cost, step, level),
            CostCurve::Geometric { growth } => geometric(base_cost, growth, level),
            CostCurve::Polynomial { a, b } => polynomial(base_cost, a, b, level),
        }
    }

    fn params_finite(&self) -> bool {
        match *self {
            CostCurve::Linear { step } => step.is_finite(),
            CostCurve::Geometric { growth } => growth.is_finite(),
            CostCurve::Polynomial { a, b } => a.is_finite() && b.is_finite(),
        }
    }
}

/// `base + step * n`
pub fn linear(base_cost: f64, step: f64, n: u32) -> f64 {
    base_cost + step * f64::from(n)
}

/// `base * growth^n`
pub fn geometric(base_cost: f64, growth: f64, n: u32) -> f64 {
    base_cost * growth.powf(f64::from(n))
}

/// `base * (1 + a*n + b*n*n)`
pub fn polynomial(base_cost: f64, a: f64, b: f64, n: u32) -> f64 {
    let n = f64::from(n);
    base_cost * (1.0 + a * n + b * n * n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn def(kind: &str) -> CostCurveDef {
        CostCurveDef {
            kind: kind.to_string(),
            ..CostCurveDef::default()
        }
    }

    #[test]
    fn formulas_match_reference_values() {
        assert_eq!(linear(10.0, 5.0, 3), 25.0);
        assert_eq!(geometric(10.0, 2.0, 3), 80.0);
        assert!((polynomial(10.0, 0.1, 0.01, 4) - 15.6).abs() < 1e-9);
    }

    #[test]
    fn level_zero_is_base_cost() {
        assert_eq!(CostCurve::Linear { step: 3.0 }.cost(12.0, 0), 12.0);
        assert_eq!(CostCurve::Geometric { growth: 1.15 }.cost(12.0, 0), 12.0);
        assert_eq!(CostCurve::Polynomial { a: 0.5, b: 0.2 }.cost(12.0, 0), 12.0);
    }

    #[test]
    fn curve_type_is_case_insensitive() {
        let id = GeneratorId::from("g");
        assert!(matches!(
            CostCurve::from_def(&id, &def("Geometric")),
            Ok(CostCurve::Geometric { .. })
        ));
        assert!(matches!(
            CostCurve::from_def(&id, &def("POLYNOMIAL")),
            Ok(CostCurve::Polynomial { .. })
        ));
    }

    #[test]
    fn unknown_curve_type_is_rejected() {
        let err = CostCurve::from_def(&GeneratorId::from("g"), &def("exponential")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownCostCurve {
                generator: "g".into(),
                kind: "exponential".into()
            }
        );
    }

    proptest! {
        #[test]
        fn geometric_is_monotonic_for_growth_above_one(level in 0u32..200, growth in 1.0f64..2.0) {
            let curve = CostCurve::Geometric { growth };
            prop_assert!(curve.cost(10.0, level + 1) >= curve.cost(10.0, level));
        }
    }
}
