use reftensor::element::{CellShape, FiniteElement, LagrangeTabulator};
use reftensor::index::IndexAllocator;
use reftensor::monomial::{BasisFunction, Monomial};
use reftensor::quadrature::{Integral, IntegrationSettings};
use reftensor::reference_tensor::ReferenceTensor;

mod facets;

const ALL_CELL_SHAPES: [CellShape; 5] = [
    CellShape::Interval,
    CellShape::Triangle,
    CellShape::Quadrilateral,
    CellShape::Tetrahedron,
    CellShape::Hexahedron,
];

fn reference_tensor(monomial: &Monomial, integral: Integral) -> ReferenceTensor {
    ReferenceTensor::new(monomial, integral, &LagrangeTabulator, &IntegrationSettings::default())
        .expect("Reference tensor must be computable")
}

fn mass(element: &FiniteElement) -> Monomial {
    let mut allocator = IndexAllocator::new();
    let v0 = BasisFunction::new(element.clone(), allocator.primary());
    let v1 = BasisFunction::new(element.clone(), allocator.primary());
    Monomial::new(vec![v0, v1])
}

fn stiffness(element: &FiniteElement) -> Monomial {
    let mut allocator = IndexAllocator::new();
    let (i0, i1, a0) = (allocator.primary(), allocator.primary(), allocator.secondary());
    let v0 = BasisFunction::new(element.clone(), i0).differentiate(a0.clone());
    let v1 = BasisFunction::new(element.clone(), i1).differentiate(a0);
    Monomial::new(vec![v0, v1])
}
