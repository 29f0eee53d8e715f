use reftensor::element::{CellShape, FiniteElement, LagrangeTabulator};
use reftensor::form::{FormCompiler, FormSettings, Term};
use reftensor::monomial::Monomial;
use reftensor::quadrature::IntegrationSettings;
use reftensor::Error;

use crate::unit_tests::{mass_monomial, stiffness_monomial};

fn poisson_terms<T>(compiler: &mut FormCompiler<T>) -> Vec<Term>
where
    T: reftensor::element::ElementTabulator + Sync,
{
    let element = FiniteElement::lagrange(CellShape::Quadrilateral, 2);
    let stiffness = stiffness_monomial(compiler.allocator(), &element);
    let mass = mass_monomial(compiler.allocator(), &element);
    let boundary = mass_monomial(compiler.allocator(), &element);
    vec![
        Term::cell(stiffness),
        Term::cell(mass),
        Term::exterior_facet(boundary, 2),
    ]
}

#[test]
fn parallel_and_sequential_compilation_agree() {
    let mut sequential = FormCompiler::with_settings(
        LagrangeTabulator,
        FormSettings {
            parallel: false,
            ..FormSettings::default()
        },
    );
    let mut parallel = FormCompiler::new(LagrangeTabulator);
    assert!(parallel.settings().parallel);

    let terms = poisson_terms(&mut sequential);
    let expected = sequential.compile(&terms).unwrap();
    let tensors = parallel.compile(&terms).unwrap();

    assert_eq!(tensors.len(), 3);
    for (tensor, expected) in tensors.iter().zip(&expected) {
        assert_eq!(tensor.values(), expected.values());
        assert_eq!(tensor.primary(), expected.primary());
        assert_eq!(tensor.secondary(), expected.secondary());
    }
}

#[test]
fn allocator_is_reset_after_compilation() {
    let mut compiler = FormCompiler::new(LagrangeTabulator);
    let terms = poisson_terms(&mut compiler);

    // The mass term was allocated after the stiffness term
    assert_eq!(terms[1].monomial.basis_functions[0].index.slot(), 2);
    assert_eq!(compiler.allocator().primary().slot(), 6);

    compiler.compile(&terms).unwrap();
    assert_eq!(compiler.allocator().primary().slot(), 0);
}

#[test]
fn failing_term_is_reported_with_its_position() {
    let mut compiler = FormCompiler::with_settings(
        LagrangeTabulator,
        FormSettings {
            parallel: false,
            integration: IntegrationSettings::default(),
        },
    );
    let element = FiniteElement::lagrange(CellShape::Triangle, 1);
    let terms = vec![
        Term::cell(mass_monomial(compiler.allocator(), &element)),
        Term::cell(Monomial::new(vec![])),
    ];

    let report = compiler.compile(&terms).unwrap_err();
    assert_eq!(report.to_string(), "Failed to compute reference tensor of term 1");
    assert_eq!(report.root_cause().to_string(), Error::EmptyMonomial.to_string());
}

#[test]
fn form_settings_deserialize() {
    let settings: FormSettings =
        serde_json::from_str(r#"{ "parallel": false, "integration": { "num_points_per_dim": 3 } }"#).unwrap();
    assert_eq!(
        settings,
        FormSettings {
            parallel: false,
            integration: IntegrationSettings::default().with_num_points_per_dim(3),
        }
    );
}
