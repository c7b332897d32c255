//! Default calculation engine for group-level field checks.

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use super::CalculationEngine;
use crate::models::{CalculationFieldDefinition, CalculationFieldResult, FieldKind, FieldResult};
use crate::rules::{parse_amount, parse_date};

/// Default tolerance for currency checks (one cent).
fn default_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Plus,
    Minus,
}

/// Split an expression such as `"Net Amount + VAT - 5,00"` into signed operands.
///
/// Operators must be surrounded by whitespace so that dates and negative numbers stay
/// intact; words between operators form one operand.
fn tokenize(expression: &str) -> Vec<(Sign, String)> {
    let mut operands = Vec::new();
    let mut sign = Sign::Plus;
    let mut current: Vec<&str> = Vec::new();

    for token in expression.split_whitespace() {
        match token {
            "+" | "-" => {
                if !current.is_empty() {
                    operands.push((sign, current.join(" ")));
                    current.clear();
                }
                sign = if token == "+" { Sign::Plus } else { Sign::Minus };
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        operands.push((sign, current.join(" ")));
    }

    operands
}

/// Evaluates `+`/`-` expressions over extracted field values.
///
/// Operands name a field (first field with that name) or are literals. A named field that
/// came back empty makes the whole check invalid.
#[derive(Debug, Clone, Default)]
pub struct FieldCalculator;

impl FieldCalculator {
    pub fn new() -> Self {
        Self
    }

    fn resolve<'f>(operand: &'f str, fields: &'f [FieldResult]) -> Option<&'f str> {
        match fields.iter().find(|f| f.name == operand) {
            Some(field) if field.value.trim().is_empty() => None,
            Some(field) => Some(field.value.trim()),
            None => Some(operand),
        }
    }

    fn sum_amounts(expression: &str, fields: &[FieldResult]) -> Option<Decimal> {
        let operands = tokenize(expression);
        if operands.is_empty() {
            return None;
        }

        operands.iter().try_fold(Decimal::ZERO, |acc, (sign, operand)| {
            let value = parse_amount(Self::resolve(operand, fields)?)?;
            match sign {
                Sign::Plus => acc.checked_add(value),
                Sign::Minus => acc.checked_sub(value),
            }
        })
    }

    fn offset_date(expression: &str, fields: &[FieldResult]) -> Option<NaiveDate> {
        let operands = tokenize(expression);
        let ((first_sign, first), rest) = operands.split_first()?;
        if *first_sign == Sign::Minus {
            return None;
        }

        let start = parse_date(Self::resolve(first, fields)?)?;
        rest.iter().try_fold(start, |date, (sign, operand)| {
            let days = parse_amount(Self::resolve(operand, fields)?)?.trunc().to_i64()?;
            let delta = Duration::try_days(days)?;
            match sign {
                Sign::Plus => date.checked_add_signed(delta),
                Sign::Minus => date.checked_sub_signed(delta),
            }
        })
    }

    fn join_text(expression: &str, fields: &[FieldResult]) -> Option<String> {
        let operands = tokenize(expression);
        if operands.is_empty() {
            return None;
        }

        operands
            .iter()
            .map(|(_, operand)| Self::resolve(operand, fields))
            .collect::<Option<Vec<&str>>>()
            .map(|parts| parts.join(" "))
    }
}

impl CalculationEngine for FieldCalculator {
    fn evaluate(&self, definition: &CalculationFieldDefinition, fields: &[FieldResult]) -> CalculationFieldResult {
        let mut result = CalculationFieldResult {
            name: definition.name.clone(),
            kind: definition.kind,
            ..Default::default()
        };

        match definition.kind {
            FieldKind::Currency => {
                let computed = Self::sum_amounts(&definition.expression, fields);
                let expected = Self::sum_amounts(&definition.validation_expression, fields);
                if let (Some(computed), Some(expected)) = (computed, expected) {
                    // Difference of two extreme amounts may not be representable
                    if let Some(difference) = computed.checked_sub(expected) {
                        let tolerance = definition.tolerance.unwrap_or_else(default_tolerance);
                        result.expression_value = format!("{:.2}", computed);
                        result.validation_value = format!("{:.2}", expected);
                        result.is_valid = difference.abs() <= tolerance;
                    }
                }
            }
            FieldKind::Date => {
                let computed = Self::offset_date(&definition.expression, fields);
                let expected = Self::offset_date(&definition.validation_expression, fields);
                if let (Some(computed), Some(expected)) = (computed, expected) {
                    result.expression_value = computed.to_string();
                    result.validation_value = expected.to_string();
                    result.is_valid = computed == expected;
                }
            }
            _ => {
                let computed = Self::join_text(&definition.expression, fields);
                let expected = Self::join_text(&definition.validation_expression, fields);
                if let (Some(computed), Some(expected)) = (computed, expected) {
                    result.is_valid = computed == expected;
                    result.expression_value = computed;
                    result.validation_value = expected;
                }
            }
        }

        debug!(
            "Calculation {}: {:?} vs {:?} -> {}",
            result.name, result.expression_value, result.validation_value, result.is_valid
        );

        result
    }
}
