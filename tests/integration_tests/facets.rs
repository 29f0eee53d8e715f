use matrixcompare::assert_scalar_eq;
use reftensor::element::{CellShape, FiniteElement, LagrangeTabulator};
use reftensor::index::IndexAllocator;
use reftensor::monomial::{BasisFunction, Monomial};
use reftensor::quadrature::{Integral, IntegrationSettings};
use reftensor::reference_tensor::ReferenceTensor;
use reftensor::Error;

use super::{mass, reference_tensor, ALL_CELL_SHAPES};

/// Measure of the reference facet in which facet tensors are expressed.
fn scaled_facet_volume(shape: CellShape) -> f64 {
    match shape {
        CellShape::Interval | CellShape::Triangle => 1.0,
        CellShape::Quadrilateral => 2.0,
        CellShape::Tetrahedron => 0.5,
        CellShape::Hexahedron => 4.0,
        CellShape::Vertex => unreachable!("Vertices have no facets"),
    }
}

#[test]
fn facet_mass_entries_sum_to_facet_volume() {
    for shape in ALL_CELL_SHAPES {
        let element = FiniteElement::lagrange(shape, 1);
        let monomial = mass(&element);
        for facet in 0..shape.num_facets() {
            let tensor = reference_tensor(&monomial, Integral::ExteriorFacet(facet));
            assert_scalar_eq!(
                tensor.values().sum(),
                scaled_facet_volume(shape),
                comp = abs,
                tol = 1e-12
            );
        }
    }
}

#[test]
fn facet_mass_vanishes_away_from_the_facet() {
    for shape in ALL_CELL_SHAPES {
        let element = FiniteElement::lagrange(shape, 1);
        let monomial = mass(&element);
        for facet in 0..shape.num_facets() {
            let on_facet = shape.facet_vertices(facet).unwrap();
            let tensor = reference_tensor(&monomial, Integral::ExteriorFacet(facet));
            for i in tensor.primary() {
                if !on_facet.contains(&i[0]) || !on_facet.contains(&i[1]) {
                    let value = tensor.value_at(&i, &[]).unwrap();
                    assert_scalar_eq!(value, 0.0, comp = abs, tol = 1e-14);
                }
            }
        }
    }
}

#[test]
fn facet_out_of_range() {
    let element = FiniteElement::lagrange(CellShape::Quadrilateral, 1);
    let result = ReferenceTensor::new(
        &mass(&element),
        Integral::ExteriorFacet(4),
        &LagrangeTabulator,
        &IntegrationSettings::default(),
    );
    assert!(matches!(result, Err(Error::InvalidFacet { .. })), "{:?}", result.err());
}

#[test]
fn facet_measures_use_unit_simplex_conventions() {
    for (shape, cell_measure, facet_measure) in [
        (CellShape::Triangle, 0.5, 1.0),
        (CellShape::Tetrahedron, 1.0 / 6.0, 0.5),
    ] {
        let element = FiniteElement::discontinuous_lagrange(shape, 0);
        let mut allocator = IndexAllocator::new();
        let monomial = Monomial::new(vec![BasisFunction::new(element, allocator.primary())]);

        let cell = reference_tensor(&monomial, Integral::Cell);
        assert_scalar_eq!(cell.values().sum(), cell_measure, comp = abs, tol = 1e-14);
        for facet in 0..shape.num_facets() {
            let tensor = reference_tensor(&monomial, Integral::ExteriorFacet(facet));
            assert_scalar_eq!(tensor.values().sum(), facet_measure, comp = abs, tol = 1e-14);
        }
    }
}
