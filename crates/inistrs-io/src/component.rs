//! Stress-tensor components and the per-component source tables.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InistrsError;

/// One of the six independent components of the symmetric stress tensor.
///
/// The declaration order is the canonical order used everywhere in the
/// pipeline: source tables, joined values and VALUE line columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Component {
    Xx,
    Yy,
    Zz,
    Xy,
    Yz,
    Zx,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Xx,
        Component::Yy,
        Component::Zz,
        Component::Xy,
        Component::Yz,
        Component::Zx,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Component::Xx => "XX",
            Component::Yy => "YY",
            Component::Zz => "ZZ",
            Component::Xy => "XY",
            Component::Yz => "YZ",
            Component::Zx => "ZX",
        }
    }

    /// Position of the component in the canonical order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// File name the casting tool uses when exporting this component.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Component::Xx => "StressE_TensorX_Ambient_MPa.fem",
            Component::Yy => "StressE_TensorY_Ambient_MPa.fem",
            Component::Zz => "StressE_TensorZ_Ambient_MPa.fem",
            Component::Xy => "StressE_TensorXY_c8_Ambient_MPa.fem",
            Component::Yz => "StressE_TensorYZ_c8_Ambient_MPa.fem",
            Component::Zx => "StressE_TensorXZ_c8_Ambient_MPa.fem",
        }
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Component {
    type Err = InistrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Component::ALL
            .into_iter()
            .find(|c| c.label() == upper)
            // XZ is the casting tool's name for the ZX shear component.
            .or_else(|| (upper == "XZ").then_some(Component::Zx))
            .ok_or_else(|| InistrsError::Config(format!("unknown stress component '{s}'")))
    }
}

/// A single `(element id, value)` row from one source table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentRow {
    pub element_id: u64,
    pub value: f64,
    /// 1-based line in the source the row was read from.
    pub line: usize,
}

/// All rows read from the source of one stress component, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentTable {
    pub component: Component,
    pub rows: Vec<ComponentRow>,
}

impl ComponentTable {
    pub fn new(component: Component) -> Self {
        Self {
            component,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
