//! Closed-form expressions built from singularity functions.
//!
//! An [`Expression`] is a finite sum of three kinds of terms:
//!
//! * singularity terms `c <x - a>^n` (see [`Term`]),
//! * plain polynomial terms `c x^p`, produced when solved constants are folded back in,
//! * constant terms `c C_k x^p` carrying the integration constants that are still unknown.
//!
//! That is enough to represent every quantity in the load, shear, moment, slope and
//! deflection chain, because every integration step maps each kind of term onto itself.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// Values of the integration constants that have been solved so far.
pub type ConstantValues = BTreeMap<Constant, f64>;

/// Integration constant introduced by one antiderivative step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Constant {
    /// Introduced by the shear integration.
    C1,
    /// Introduced by the moment integration.
    C2,
    /// Introduced by the slope integration.
    C3,
    /// Introduced by the deflection integration.
    C4,
}

impl Constant {
    /// Every constant in introduction order.
    pub const ALL: [Constant; 4] = [Self::C1, Self::C2, Self::C3, Self::C4];

    /// Zero-based position in introduction order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::C1 => 0,
            Self::C2 => 1,
            Self::C3 => 2,
            Self::C4 => 3,
        }
    }

    /// LaTeX symbol.
    #[must_use]
    pub fn to_latex(self) -> String {
        format!("C_{{{}}}", self.index() + 1)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.index() + 1)
    }
}

/// Side from which a discontinuous expression is approached.
///
/// Singularity functions jump at their knot. `Left` treats `<x - a>^n` as zero for
/// `x <= a`; `Right` already counts the term at `x == a`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Limit {
    /// Value just before `x`.
    #[default]
    Left,
    /// Value just after `x`.
    Right,
}

/// A single singularity term `coefficient * <x - knot>^exponent`.
///
/// Exponent `-1` is the Dirac term of a point load. It contributes nothing when
/// evaluated and only exists to be integrated into a step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Multiplier of the singularity function.
    pub coefficient: f64,
    /// Position where the function switches on.
    pub knot: f64,
    /// Power of the bracket, `-1` or greater.
    pub exponent: i32,
}

impl Term {
    /// Create a [`Term`].
    #[must_use]
    pub const fn new(coefficient: f64, knot: f64, exponent: i32) -> Self {
        Self {
            coefficient,
            knot,
            exponent,
        }
    }

    /// Value of the term at `x` approached from `limit`.
    #[must_use]
    pub fn value(&self, x: f64, limit: Limit) -> f64 {
        let active = match limit {
            Limit::Left => x > self.knot,
            Limit::Right => x >= self.knot,
        };
        if !active || self.exponent < 0 {
            return 0.0;
        }
        self.coefficient * (x - self.knot).powi(self.exponent)
    }

    /// Antiderivative of the term.
    ///
    /// `<x - a>^-1` integrates to the step `<x - a>^0`; otherwise the usual power rule
    /// applies.
    #[must_use]
    pub fn antiderivative(&self) -> Self {
        if self.exponent < 0 {
            Self::new(self.coefficient, self.knot, 0)
        } else {
            let raised = self.exponent + 1;
            Self::new(self.coefficient / f64::from(raised), self.knot, raised)
        }
    }

    /// Derivative of the term, or `None` for a Dirac term.
    #[must_use]
    pub fn derivative(&self) -> Option<Self> {
        match self.exponent {
            exponent if exponent < 0 => None,
            0 => Some(Self::new(self.coefficient, self.knot, -1)),
            exponent => Some(Self::new(
                self.coefficient * f64::from(exponent),
                self.knot,
                exponent - 1,
            )),
        }
    }
}

/// Unknown constant multiplied by a power of `x`: `coefficient * constant * x^power`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstantTerm {
    /// Constant carried by the term.
    pub constant: Constant,
    /// Numeric multiplier.
    pub coefficient: f64,
    /// Power of `x`.
    pub power: u32,
}

/// Expression linear in the integration constants, obtained by fixing `x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearForm {
    /// Part that does not depend on any constant.
    pub offset: f64,
    /// Multiplier of each constant, indexed by [`Constant::index`].
    pub coefficients: [f64; 4],
}

impl LinearForm {
    /// Multiplier of `constant`.
    #[must_use]
    pub fn coefficient(&self, constant: Constant) -> f64 {
        self.coefficients[constant.index()]
    }

    /// Substitute constant values.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnresolvedConstant`] when a constant with a non-zero
    /// multiplier has no value.
    pub fn resolve(&self, constants: &ConstantValues) -> Result<f64, AnalysisError> {
        let mut value = self.offset;
        for constant in Constant::ALL {
            let coefficient = self.coefficient(constant);
            if coefficient == 0.0 {
                continue;
            }
            let known = constants
                .get(&constant)
                .ok_or(AnalysisError::UnresolvedConstant(constant))?;
            value += coefficient * known;
        }
        Ok(value)
    }
}

/// Closed-form expression in `x`.
///
/// # Examples
/// ```
/// use beamx::{Constant, ConstantValues, Expression, Limit, Term};
///
/// // q(x) = -100 <x>^0, a uniform load starting at the left end.
/// let load = Expression::from_terms(vec![Term::new(-100.0, 0.0, 0)]);
/// let shear = load.antiderivative(Constant::C1);
///
/// let mut constants = ConstantValues::new();
/// constants.insert(Constant::C1, 200.0);
/// let value = shear.evaluate(1.0, Limit::Left, &constants).expect("C1 known");
/// assert_eq!(value, 100.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    /// Singularity terms in insertion order.
    terms: Vec<Term>,
    /// Plain polynomial coefficients indexed by power of `x`.
    polynomial: Vec<f64>,
    /// Terms carrying unresolved constants.
    constants: Vec<ConstantTerm>,
}

impl Expression {
    /// The zero expression.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Sum of the given singularity terms.
    #[must_use]
    pub fn from_terms(terms: Vec<Term>) -> Self {
        let mut expression = Self::zero();
        for term in terms {
            expression.push_term(term);
        }
        expression
    }

    /// Add a singularity term, merging it with a term on the same knot and exponent.
    pub fn push_term(&mut self, term: Term) {
        if term.coefficient == 0.0 {
            return;
        }
        match self
            .terms
            .iter_mut()
            .find(|existing| existing.knot == term.knot && existing.exponent == term.exponent)
        {
            Some(existing) => existing.coefficient += term.coefficient,
            None => self.terms.push(term),
        }
        self.terms.retain(|existing| existing.coefficient != 0.0);
    }

    /// Add `coefficient * x^power`.
    pub fn push_polynomial(&mut self, coefficient: f64, power: u32) {
        if coefficient == 0.0 {
            return;
        }
        let power = power as usize;
        if self.polynomial.len() <= power {
            self.polynomial.resize(power + 1, 0.0);
        }
        self.polynomial[power] += coefficient;
        while self.polynomial.last() == Some(&0.0) {
            self.polynomial.pop();
        }
    }

    /// Add `coefficient * constant * x^power`.
    pub fn push_constant(&mut self, constant: Constant, coefficient: f64, power: u32) {
        if coefficient == 0.0 {
            return;
        }
        match self
            .constants
            .iter_mut()
            .find(|existing| existing.constant == constant && existing.power == power)
        {
            Some(existing) => existing.coefficient += coefficient,
            None => self.constants.push(ConstantTerm {
                constant,
                coefficient,
                power,
            }),
        }
        self.constants.retain(|existing| existing.coefficient != 0.0);
        self.constants
            .sort_by_key(|existing| (existing.constant, std::cmp::Reverse(existing.power)));
    }

    /// Singularity terms.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Polynomial coefficients indexed by power of `x`.
    #[must_use]
    pub fn polynomial(&self) -> &[f64] {
        &self.polynomial
    }

    /// Terms carrying unresolved constants.
    #[must_use]
    pub fn constant_terms(&self) -> &[ConstantTerm] {
        &self.constants
    }

    /// Constants that still appear in the expression, in introduction order.
    #[must_use]
    pub fn unresolved(&self) -> Vec<Constant> {
        let mut constants: Vec<Constant> =
            self.constants.iter().map(|term| term.constant).collect();
        constants.dedup();
        constants
    }

    /// Whether the expression is identically zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty() && self.polynomial.is_empty() && self.constants.is_empty()
    }

    /// Multiply every term by `factor`.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        let mut scaled = Self::zero();
        for term in &self.terms {
            scaled.push_term(Term::new(term.coefficient * factor, term.knot, term.exponent));
        }
        for (power, coefficient) in self.polynomial.iter().enumerate() {
            scaled.push_polynomial(coefficient * factor, power as u32);
        }
        for term in &self.constants {
            scaled.push_constant(term.constant, term.coefficient * factor, term.power);
        }
        scaled
    }

    /// Antiderivative, introducing `constant` as the integration constant.
    #[must_use]
    pub fn antiderivative(&self, constant: Constant) -> Self {
        let mut integral = Self::zero();
        for term in &self.terms {
            integral.push_term(term.antiderivative());
        }
        for (power, coefficient) in self.polynomial.iter().enumerate() {
            let raised = power as u32 + 1;
            integral.push_polynomial(coefficient / f64::from(raised), raised);
        }
        for term in &self.constants {
            let raised = term.power + 1;
            integral.push_constant(term.constant, term.coefficient / f64::from(raised), raised);
        }
        integral.push_constant(constant, 1.0, 0);
        integral
    }

    /// Derivative, or `None` when the expression holds a Dirac term.
    #[must_use]
    pub fn derivative(&self) -> Option<Self> {
        let mut derivative = Self::zero();
        for term in &self.terms {
            derivative.push_term(term.derivative()?);
        }
        for (power, coefficient) in self.polynomial.iter().enumerate().skip(1) {
            derivative.push_polynomial(coefficient * power as f64, power as u32 - 1);
        }
        for term in self.constants.iter().filter(|term| term.power > 0) {
            derivative.push_constant(
                term.constant,
                term.coefficient * f64::from(term.power),
                term.power - 1,
            );
        }
        Some(derivative)
    }

    /// Fix `x`, leaving an expression linear in the constants.
    #[must_use]
    pub fn at(&self, x: f64, limit: Limit) -> LinearForm {
        let mut form = LinearForm {
            offset: self.terms.iter().map(|term| term.value(x, limit)).sum::<f64>()
                + polynomial_value(&self.polynomial, x),
            ..LinearForm::default()
        };
        for term in &self.constants {
            form.coefficients[term.constant.index()] +=
                term.coefficient * x.powi(term.power as i32);
        }
        form
    }

    /// Numeric value at `x` approached from `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnresolvedConstant`] when the expression still holds a
    /// constant that `constants` does not provide.
    pub fn evaluate(
        &self,
        x: f64,
        limit: Limit,
        constants: &ConstantValues,
    ) -> Result<f64, AnalysisError> {
        self.at(x, limit).resolve(constants)
    }

    /// Fold known constants into the polynomial part.
    #[must_use]
    pub fn substitute(&self, constants: &ConstantValues) -> Self {
        let mut substituted = Self {
            terms: self.terms.clone(),
            polynomial: self.polynomial.clone(),
            constants: Vec::new(),
        };
        for term in &self.constants {
            match constants.get(&term.constant) {
                Some(value) => substituted.push_polynomial(term.coefficient * value, term.power),
                None => substituted.push_constant(term.constant, term.coefficient, term.power),
            }
        }
        substituted
    }

    /// LaTeX rendering.
    #[must_use]
    pub fn to_latex(&self) -> String {
        self.render(Notation::Latex)
    }

    /// Render the expression in the requested notation.
    fn render(&self, notation: Notation) -> String {
        let mut out = String::new();
        for term in &self.terms {
            let body = match notation {
                Notation::Text => format!("<{}>^{}", bracket(term.knot), term.exponent),
                Notation::Latex => format!(
                    "\\left\\langle {} \\right\\rangle^{{{}}}",
                    bracket(term.knot),
                    term.exponent
                ),
            };
            push_monomial(&mut out, term.coefficient, &body, notation);
        }
        for (power, coefficient) in self
            .polynomial
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, coefficient)| **coefficient != 0.0)
        {
            push_monomial(&mut out, *coefficient, &power_of_x(power as u32, notation), notation);
        }
        for term in &self.constants {
            let symbol = match notation {
                Notation::Text => term.constant.to_string(),
                Notation::Latex => term.constant.to_latex(),
            };
            let x = power_of_x(term.power, notation);
            let body = match (x.is_empty(), notation) {
                (true, _) => symbol,
                (false, Notation::Text) => format!("{symbol}{x}"),
                (false, Notation::Latex) => format!("{symbol} {x}"),
            };
            push_monomial(&mut out, term.coefficient, &body, notation);
        }
        if out.is_empty() {
            out.push('0');
        }
        out
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Notation::Text))
    }
}

impl Add for &Expression {
    type Output = Expression;

    fn add(self, other: &Expression) -> Expression {
        let mut sum = self.clone();
        for term in &other.terms {
            sum.push_term(*term);
        }
        for (power, coefficient) in other.polynomial.iter().enumerate() {
            sum.push_polynomial(*coefficient, power as u32);
        }
        for term in &other.constants {
            sum.push_constant(term.constant, term.coefficient, term.power);
        }
        sum
    }
}

impl Add for Expression {
    type Output = Expression;

    fn add(self, other: Expression) -> Expression {
        &self + &other
    }
}

impl Mul<f64> for &Expression {
    type Output = Expression;

    fn mul(self, factor: f64) -> Expression {
        self.scale(factor)
    }
}

/// Output flavour for [`Expression`] rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Notation {
    /// Plain text with angle brackets.
    Text,
    /// LaTeX for the report collaborator.
    Latex,
}

/// Horner evaluation of a coefficient list indexed by power.
fn polynomial_value(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |accumulator, coefficient| accumulator * x + coefficient)
}

/// Contents of the Macaulay bracket for a knot.
fn bracket(knot: f64) -> String {
    if knot == 0.0 {
        "x".to_string()
    } else {
        format!("x - {}", format_number(knot))
    }
}

/// `x^power` in the requested notation; empty for `power == 0`.
fn power_of_x(power: u32, notation: Notation) -> String {
    match (power, notation) {
        (0, _) => String::new(),
        (1, _) => "x".to_string(),
        (power, Notation::Text) => format!("x^{power}"),
        (power, Notation::Latex) => format!("x^{{{power}}}"),
    }
}

/// Append a signed monomial, dropping a unit multiplier in front of a symbol.
fn push_monomial(out: &mut String, coefficient: f64, body: &str, notation: Notation) {
    let negative = coefficient < 0.0;
    if out.is_empty() {
        if negative {
            out.push('-');
        }
    } else {
        out.push_str(if negative { " - " } else { " + " });
    }
    let magnitude = coefficient.abs();
    if body.is_empty() {
        out.push_str(&format_number(magnitude));
        return;
    }
    if (magnitude - 1.0).abs() > 1.0e-12 {
        out.push_str(&format_number(magnitude));
        if notation == Notation::Latex {
            out.push_str(" \\cdot ");
        }
    }
    out.push_str(body);
}

/// Short decimal rendering: integers without a fraction, others to six places.
fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < 1.0e-9 {
        format!("{:.0}", value.round())
    } else {
        let fixed = format!("{value:.6}");
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
