use std::fmt;

use crate::error::GeometryInvalid;
use crate::geometry::{DomainRectangle, Tile};
use crate::math::{points_close, Point2, DEFAULT_DECIMALS};

/// Number of boundary edges a valid fluid face has.
pub const EXPECTED_EDGES: usize = 5;

/// Physical role of a fluid-domain boundary edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryRole {
    Inlet,
    Outlet,
    SymmetryUp,
    SymmetryDown,
    Wall,
}

impl BoundaryRole {
    /// All roles, in the order their selections are created.
    pub const ALL: [BoundaryRole; 5] = [
        Self::Inlet,
        Self::Outlet,
        Self::SymmetryUp,
        Self::SymmetryDown,
        Self::Wall,
    ];

    /// Name of the selection carrying this role.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Inlet => "inlet",
            Self::Outlet => "outlet",
            Self::SymmetryUp => "symmetry_up",
            Self::SymmetryDown => "symmetry_down",
            Self::Wall => "wall",
        }
    }
}

impl fmt::Display for BoundaryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A backend edge handle together with its evaluated midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryEdge<E> {
    pub handle: E,
    pub midpoint: Point2,
}

impl<E> BoundaryEdge<E> {
    #[must_use]
    pub fn new(handle: E, midpoint: Point2) -> Self {
        Self { handle, midpoint }
    }
}

/// One edge per boundary role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssignment<E> {
    pub inlet: E,
    pub outlet: E,
    pub symmetry_up: E,
    pub symmetry_down: E,
    pub wall: E,
}

impl<E: Copy> RoleAssignment<E> {
    /// Returns the edge assigned to `role`.
    #[must_use]
    pub fn get(&self, role: BoundaryRole) -> E {
        match role {
            BoundaryRole::Inlet => self.inlet,
            BoundaryRole::Outlet => self.outlet,
            BoundaryRole::SymmetryUp => self.symmetry_up,
            BoundaryRole::SymmetryDown => self.symmetry_down,
            BoundaryRole::Wall => self.wall,
        }
    }

    /// `(role, edge)` pairs in [`BoundaryRole::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (BoundaryRole, E)> + '_ {
        BoundaryRole::ALL.into_iter().map(|role| (role, self.get(role)))
    }
}

/// Assigns boundary roles to the edges of a fluid face.
///
/// Side roles match an edge whose midpoint equals the midpoint of the
/// corresponding domain side after rounding; the wall matches an edge whose
/// midpoint lies inside the obstacle region. The assignment must be a
/// perfect matching: ambiguity is an error, never resolved by tie-breaking.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryClassifier {
    domain: DomainRectangle,
    obstacle: Tile,
    decimals: u32,
}

impl BoundaryClassifier {
    /// Creates a classifier comparing at 6 decimal places.
    #[must_use]
    pub fn new(domain: DomainRectangle, obstacle: Tile) -> Self {
        Self {
            domain,
            obstacle,
            decimals: DEFAULT_DECIMALS,
        }
    }

    /// Sets the number of decimal places midpoints are compared at.
    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Returns `true` if `midpoint` satisfies the predicate of `role`.
    #[must_use]
    pub fn matches(&self, role: BoundaryRole, midpoint: &Point2) -> bool {
        let d = &self.domain;
        let target = match role {
            BoundaryRole::Inlet => Point2::new(d.left(), d.vertical_center()),
            BoundaryRole::Outlet => Point2::new(d.right(), d.vertical_center()),
            BoundaryRole::SymmetryUp => Point2::new(d.horizontal_center(), d.top()),
            BoundaryRole::SymmetryDown => Point2::new(d.horizontal_center(), d.bottom()),
            BoundaryRole::Wall => return self.obstacle.contains(midpoint),
        };
        points_close(midpoint, &target, self.decimals)
    }

    /// Classifies exactly five edges.
    ///
    /// # Errors
    ///
    /// Returns `GeometryInvalid::EdgeCount` for any other number of edges,
    /// `MissingRole`/`AmbiguousRole` when a role matches zero or several
    /// edges, and `UnclaimedEdge` when an edge does not match exactly one role.
    pub fn classify<E: Copy>(
        &self,
        edges: &[BoundaryEdge<E>],
    ) -> Result<RoleAssignment<E>, GeometryInvalid> {
        if edges.len() != EXPECTED_EDGES {
            return Err(GeometryInvalid::EdgeCount {
                actual: edges.len(),
            });
        }

        let select = |role: BoundaryRole| -> Result<E, GeometryInvalid> {
            let mut selected = edges.iter().filter(|e| self.matches(role, &e.midpoint));
            match (selected.next(), selected.count()) {
                (None, _) => Err(GeometryInvalid::MissingRole { role }),
                (Some(edge), 0) => Ok(edge.handle),
                (Some(_), rest) => Err(GeometryInvalid::AmbiguousRole {
                    role,
                    count: rest + 1,
                }),
            }
        };

        let assignment = RoleAssignment {
            inlet: select(BoundaryRole::Inlet)?,
            outlet: select(BoundaryRole::Outlet)?,
            symmetry_up: select(BoundaryRole::SymmetryUp)?,
            symmetry_down: select(BoundaryRole::SymmetryDown)?,
            wall: select(BoundaryRole::Wall)?,
        };

        for (index, edge) in edges.iter().enumerate() {
            let matches = BoundaryRole::ALL
                .into_iter()
                .filter(|role| self.matches(*role, &edge.midpoint))
                .count();
            if matches != 1 {
                return Err(GeometryInvalid::UnclaimedEdge { index, matches });
            }
        }

        Ok(assignment)
    }
}
