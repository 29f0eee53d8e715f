//! Monomials: products of basis functions, each possibly differentiated and restricted to a
//! component, multiplied by a scalar coefficient.
use crate::element::FiniteElement;
use crate::index::Index;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A partial derivative in the reference direction given by `index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Derivative {
    pub element: FiniteElement,
    pub index: Index,
}

/// A (possibly differentiated) basis function of a finite element.
///
/// `index` labels the basis function axis, `component` holds at most one index selecting
/// the component of a vector-valued element, and `derivatives` lists the reference
/// directions of all derivatives applied to the basis function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasisFunction {
    pub element: FiniteElement,
    pub index: Index,
    pub component: Vec<Index>,
    pub derivatives: Vec<Derivative>,
}

impl BasisFunction {
    pub fn new(element: FiniteElement, index: Index) -> Self {
        Self {
            element,
            index,
            component: Vec::new(),
            derivatives: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: Index) -> Self {
        self.component.push(component);
        self
    }

    /// Applies a derivative in the direction given by `index`.
    pub fn differentiate(mut self, index: Index) -> Self {
        self.derivatives.push(Derivative {
            element: self.element.clone(),
            index,
        });
        self
    }

    /// The total number of derivatives applied to the basis function.
    pub fn derivative_order(&self) -> usize {
        self.derivatives.len()
    }
}

impl Display for BasisFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for derivative in self.derivatives.iter().rev() {
            write!(f, "d/dX{} ", derivative.index)?;
        }
        write!(f, "v_{}", self.index)?;
        for component in &self.component {
            write!(f, "[{}]", component)?;
        }
        Ok(())
    }
}

/// A product of basis functions with a scalar coefficient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monomial {
    pub coefficient: f64,
    pub basis_functions: Vec<BasisFunction>,
}

impl Monomial {
    pub fn new(basis_functions: Vec<BasisFunction>) -> Self {
        Self {
            coefficient: 1.0,
            basis_functions,
        }
    }

    pub fn with_coefficient(self, coefficient: f64) -> Self {
        Self { coefficient, ..self }
    }
}

impl Display for Monomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coefficient)?;
        for basis_function in &self.basis_functions {
            write!(f, " * {}", basis_function)?;
        }
        Ok(())
    }
}
