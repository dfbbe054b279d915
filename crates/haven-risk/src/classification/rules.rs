//! Priority-ordered classification rules.
//!
//! Each list is scanned top to bottom and the first predicate that holds
//! decides the verdict. Anything unmatched falls through to the `None` class.

use super::{Bm10Levels, ClassifierConfig, HedgeClass, SafeHavenClass};

/// A predicate over the four BM10 levels.
pub type Rule = fn(&Bm10Levels, &ClassifierConfig) -> bool;

/// Hedge rules, highest priority first.
pub const HEDGE_RULES: &[(Rule, HedgeClass)] = &[
    (strong_hedge, HedgeClass::Strong),
    (weak_hedge, HedgeClass::Weak),
];

/// Safe-haven rules, highest priority first.
pub const SAFE_HAVEN_RULES: &[(Rule, SafeHavenClass)] = &[
    (weak_safe_haven, SafeHavenClass::Weak),
    (strong_safe_haven, SafeHavenClass::Strong),
    (safe_haven_10, SafeHavenClass::Quantile10),
    (safe_haven_05, SafeHavenClass::Quantile05),
    (safe_haven_01, SafeHavenClass::Quantile01),
];

pub(super) fn first_match<C: Copy>(
    rules: &[(Rule, C)],
    levels: &Bm10Levels,
    config: &ClassifierConfig,
) -> Option<C> {
    rules
        .iter()
        .find(|(rule, _)| rule(levels, config))
        .map(|&(_, class)| class)
}

// The cumulative 1% effect must not push the asset above the base effect
// (floored at zero).
fn tail_not_worse(levels: &Bm10Levels, config: &ClassifierConfig) -> bool {
    levels.q01.0 <= levels.c0.0.max(0.0) + config.tolerance
}

fn strong_hedge(levels: &Bm10Levels, config: &ClassifierConfig) -> bool {
    let (c0, p0) = levels.c0;
    config.is_negative(c0) && config.is_significant(p0) && tail_not_worse(levels, config)
}

fn weak_hedge(levels: &Bm10Levels, config: &ClassifierConfig) -> bool {
    let (c0, p0) = levels.c0;
    (config.is_zero(c0) || !config.is_significant(p0)) && tail_not_worse(levels, config)
}

// Significance is judged on the base p-value at every level.
fn weak_safe_haven(levels: &Bm10Levels, config: &ClassifierConfig) -> bool {
    let p0 = levels.c0.1;
    levels
        .coefficients()
        .iter()
        .all(|&c| config.is_zero(c) || !config.is_significant(p0))
}

fn strong_safe_haven(levels: &Bm10Levels, config: &ClassifierConfig) -> bool {
    [levels.c0, levels.q10, levels.q05, levels.q01]
        .iter()
        .all(|&pair| significantly_negative(pair, config))
}

fn safe_haven_10(levels: &Bm10Levels, config: &ClassifierConfig) -> bool {
    significantly_negative(levels.q10, config)
}

fn safe_haven_05(levels: &Bm10Levels, config: &ClassifierConfig) -> bool {
    significantly_negative(levels.q05, config)
}

fn safe_haven_01(levels: &Bm10Levels, config: &ClassifierConfig) -> bool {
    significantly_negative(levels.q01, config)
}

fn significantly_negative((coefficient, p_value): (f64, f64), config: &ClassifierConfig) -> bool {
    config.is_negative(coefficient) && config.is_significant(p_value)
}
