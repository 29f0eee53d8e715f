//! Compilation of all terms of a form into reference tensors.
use crate::element::ElementTabulator;
use crate::index::IndexAllocator;
use crate::monomial::Monomial;
use crate::quadrature::{Integral, IntegrationSettings};
use crate::reference_tensor::ReferenceTensor;
use eyre::WrapErr;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    /// Whether the terms of a form are computed in parallel.
    pub parallel: bool,
    pub integration: IntegrationSettings,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            integration: IntegrationSettings::default(),
        }
    }
}

/// A monomial together with its domain of integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub monomial: Monomial,
    pub integral: Integral,
}

impl Term {
    pub fn cell(monomial: Monomial) -> Self {
        Self {
            monomial,
            integral: Integral::Cell,
        }
    }

    pub fn exterior_facet(monomial: Monomial, facet: usize) -> Self {
        Self {
            monomial,
            integral: Integral::ExteriorFacet(facet),
        }
    }
}

/// Computes the reference tensors of all terms of a form.
///
/// The compiler owns the [`IndexAllocator`] from which the indices of the terms are
/// drawn. The allocator is reset after each compiled form, so that every form starts
/// from slot zero.
#[derive(Debug, Clone)]
pub struct FormCompiler<T> {
    tabulator: T,
    settings: FormSettings,
    allocator: IndexAllocator,
}

impl<T> FormCompiler<T>
where
    T: ElementTabulator + Sync,
{
    pub fn new(tabulator: T) -> Self {
        Self::with_settings(tabulator, FormSettings::default())
    }

    pub fn with_settings(tabulator: T, settings: FormSettings) -> Self {
        Self {
            tabulator,
            settings,
            allocator: IndexAllocator::new(),
        }
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn tabulator(&self) -> &T {
        &self.tabulator
    }

    /// The allocator to draw the indices of the next form from.
    pub fn allocator(&mut self) -> &mut IndexAllocator {
        &mut self.allocator
    }

    /// Computes the reference tensor of every term, in the order of the terms.
    ///
    /// Fails on the first term whose reference tensor cannot be computed.
    pub fn compile(&mut self, terms: &[Term]) -> eyre::Result<Vec<ReferenceTensor>> {
        info!(
            "Compiling {} term(s) ({})",
            terms.len(),
            if self.settings.parallel { "parallel" } else { "sequential" }
        );

        let tabulator = &self.tabulator;
        let integration = &self.settings.integration;
        let compile_term = |(term_index, term): (usize, &Term)| {
            ReferenceTensor::new(&term.monomial, term.integral, tabulator, integration)
                .wrap_err_with(|| format!("Failed to compute reference tensor of term {}", term_index))
        };

        let tensors = if self.settings.parallel {
            terms
                .par_iter()
                .enumerate()
                .map(compile_term)
                .collect::<eyre::Result<Vec<_>>>()
        } else {
            terms
                .iter()
                .enumerate()
                .map(compile_term)
                .collect::<eyre::Result<Vec<_>>>()
        };

        self.allocator.reset();
        tensors
    }
}
