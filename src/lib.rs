//! Reference tensors for monomial terms of multilinear finite element forms.
//!
//! A term of a form is a [`Monomial`](monomial::Monomial): a product of (possibly
//! differentiated) basis functions of finite elements, each labeled by symbolic
//! [`Index`](index::Index) values, times a scalar coefficient. Its reference tensor `A0`
//! is the integral of the product over the reference cell (or one of its facets), computed
//! by quadrature from tables supplied by an [`ElementTabulator`](element::ElementTabulator).
//! See [`ReferenceTensor`](reference_tensor::ReferenceTensor) for the entry point of a
//! single term and [`FormCompiler`](form::FormCompiler) for whole forms.
pub mod element;
pub mod error;
pub mod form;
pub mod index;
pub mod integrate;
pub mod monomial;
pub mod multi_index;
pub mod psi;
pub mod quadrature;
pub mod reference_tensor;
pub mod reorder;

#[cfg(feature = "proptest")]
pub mod proptest;

pub use error::Error;

pub extern crate ndarray;
