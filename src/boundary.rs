//! Boundary condition catalog and the stations where it applies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::beam::Beam;
use crate::integrator::{AnalysisMode, Quantity};
use crate::singularity::Limit;
use crate::support::SupportCategory;

/// What sits at a boundary station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// A support of the given category.
    Support(SupportCategory),
    /// A beam end without any support.
    Free,
}

impl BoundaryKind {
    /// Every kind in catalog order.
    pub const ALL: [BoundaryKind; 4] = [
        Self::Support(SupportCategory::Fixed),
        Self::Support(SupportCategory::Pinned),
        Self::Support(SupportCategory::Roller),
        Self::Free,
    ];

    /// Row of this kind in the catalog table.
    fn slot(self) -> usize {
        match self {
            Self::Support(SupportCategory::Fixed) => 0,
            Self::Support(SupportCategory::Pinned) => 1,
            Self::Support(SupportCategory::Roller) => 2,
            Self::Free => 3,
        }
    }
}

/// Modes in catalog column order.
const MODES: [AnalysisMode; 2] = [AnalysisMode::ForceOnly, AnalysisMode::FullKinematic];

/// Column of `mode` in the catalog table.
fn mode_slot(mode: AnalysisMode) -> usize {
    match mode {
        AnalysisMode::ForceOnly => 0,
        AnalysisMode::FullKinematic => 1,
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Support(category) => category.fmt(f),
            Self::Free => f.write_str("free"),
        }
    }
}

/// Value of a quantity at a station.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryValue {
    /// Prescribed by the restraint.
    Known(f64),
    /// Left free by the restraint (a reaction, for instance).
    Unknown,
}

impl BoundaryValue {
    /// Prescribed value, if any.
    #[must_use]
    pub fn known(self) -> Option<f64> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for BoundaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => write!(f, "{value}"),
            Self::Unknown => f.write_str("?"),
        }
    }
}

/// Conditions for every quantity of one mode at one kind of station.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryEntry {
    /// Quantity and value pairs in integration order.
    conditions: Vec<(Quantity, BoundaryValue)>,
}

impl BoundaryEntry {
    /// Entry built from `(quantity, value)` pairs.
    #[must_use]
    pub fn new(mut conditions: Vec<(Quantity, BoundaryValue)>) -> Self {
        conditions.sort_by_key(|(quantity, _)| *quantity);
        Self { conditions }
    }

    /// Value of `quantity`, if the entry lists it.
    #[must_use]
    pub fn get(&self, quantity: Quantity) -> Option<BoundaryValue> {
        self.conditions
            .iter()
            .find(|(listed, _)| *listed == quantity)
            .map(|(_, value)| *value)
    }

    /// All pairs in integration order.
    #[must_use]
    pub fn conditions(&self) -> &[(Quantity, BoundaryValue)] {
        &self.conditions
    }

    /// Pairs with a prescribed value.
    pub fn known(&self) -> impl Iterator<Item = (Quantity, f64)> + '_ {
        self.conditions
            .iter()
            .filter_map(|(quantity, value)| value.known().map(|value| (*quantity, value)))
    }
}

/// Immutable table from `(kind, mode)` to the conditions at such a station.
///
/// # Examples
/// ```
/// use beamx::{
///     AnalysisMode, BoundaryCatalog, BoundaryKind, BoundaryValue, Quantity, SupportCategory,
/// };
///
/// let catalog = BoundaryCatalog::standard();
/// let pinned = catalog.entry(
///     BoundaryKind::Support(SupportCategory::Pinned),
///     AnalysisMode::ForceOnly,
/// );
/// assert_eq!(pinned.get(Quantity::Moment), Some(BoundaryValue::Known(0.0)));
/// assert_eq!(pinned.get(Quantity::Shear), Some(BoundaryValue::Unknown));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoundaryCatalog {
    /// One entry per `(kind, mode)` pair, rows in [`BoundaryKind::ALL`] order.
    entries: [[BoundaryEntry; 2]; 4],
}

impl Default for BoundaryCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl BoundaryCatalog {
    /// The textbook conditions for fixed, pinned, roller and free stations.
    #[must_use]
    pub fn standard() -> Self {
        use BoundaryValue::{Known, Unknown};
        use Quantity::{Deflection, Moment, Shear, Slope};

        let zero = Known(0.0);
        let entries = BoundaryKind::ALL.map(|kind| {
            // [V, M, Θ, v]
            let values = match kind {
                BoundaryKind::Support(SupportCategory::Fixed) => [Unknown, Unknown, zero, zero],
                BoundaryKind::Support(SupportCategory::Pinned | SupportCategory::Roller) => {
                    [Unknown, zero, Unknown, zero]
                }
                BoundaryKind::Free => [zero, zero, Unknown, Unknown],
            };
            let all = [Shear, Moment, Slope, Deflection];
            MODES.map(|mode| {
                let conditions = all
                    .iter()
                    .zip(values)
                    .filter(|(quantity, _)| mode.quantities().contains(*quantity))
                    .map(|(quantity, value)| (*quantity, value))
                    .collect();
                BoundaryEntry::new(conditions)
            })
        });
        Self { entries }
    }

    /// Copy of the catalog with one quantity of one entry replaced.
    ///
    /// Quantities not derived in `mode` are ignored.
    #[must_use]
    pub fn with_value(
        &self,
        kind: BoundaryKind,
        mode: AnalysisMode,
        quantity: Quantity,
        value: BoundaryValue,
    ) -> Self {
        let mut catalog = self.clone();
        if !mode.quantities().contains(&quantity) {
            log::warn!("{quantity} is not derived in {mode} mode; override ignored");
            return catalog;
        }
        let entry = &mut catalog.entries[kind.slot()][mode_slot(mode)];
        for (listed, listed_value) in &mut entry.conditions {
            if *listed == quantity {
                *listed_value = value;
            }
        }
        catalog
    }

    /// Conditions for a station of `kind` in `mode`.
    #[must_use]
    pub fn entry(&self, kind: BoundaryKind, mode: AnalysisMode) -> &BoundaryEntry {
        &self.entries[kind.slot()][mode_slot(mode)]
    }
}

/// A position where boundary conditions apply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryStation {
    /// Distance from the left end.
    pub position: f64,
    /// What sits at the station.
    pub kind: BoundaryKind,
    /// Conditions taken from the catalog.
    pub conditions: BoundaryEntry,
    /// Side from which quantities are evaluated at the station.
    pub limit: Limit,
}

/// Stations of `beam`: every support plus both ends, ordered by position.
///
/// An end without a support is [`BoundaryKind::Free`]. Quantities are read just
/// outside the beam at the ends so that loads applied exactly at an end are
/// counted the way equilibrium requires: excluded at `0`, included at `length`.
#[must_use]
pub fn boundary_stations(
    beam: &Beam,
    mode: AnalysisMode,
    catalog: &BoundaryCatalog,
) -> Vec<BoundaryStation> {
    let length = beam.length();
    let mut stations: Vec<BoundaryStation> = beam
        .supports()
        .iter()
        .map(|support| BoundaryStation {
            position: support.position,
            kind: BoundaryKind::Support(support.category),
            conditions: catalog
                .entry(BoundaryKind::Support(support.category), mode)
                .clone(),
            limit: Limit::Left,
        })
        .collect();
    for end in [0.0, length] {
        if beam.support_at(end).is_none() {
            stations.push(BoundaryStation {
                position: end,
                kind: BoundaryKind::Free,
                conditions: catalog.entry(BoundaryKind::Free, mode).clone(),
                limit: Limit::Left,
            });
        }
    }
    for station in &mut stations {
        if station.position == length {
            station.limit = Limit::Right;
        }
    }
    stations.sort_by(|a, b| a.position.total_cmp(&b.position));
    stations
}
