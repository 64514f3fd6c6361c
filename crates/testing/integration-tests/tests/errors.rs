//! Failure modes; every error aborts the pass and names the culprit

use expect_test::expect;
use idl_ast::{ConstExpr, TypeSpec};
use idl_driver::ResolutionError;
use integration_tests::*;

#[test]
fn test_unresolved_in_constant_position() {
    let tree = vec![constant("A", "long", ConstExpr::reference("MISSING"))];
    let error = resolve(&tree).unwrap_err();
    assert!(matches!(error, ResolutionError::Unresolved { ref context, .. } if context == "A"));
    assert_eq!(error.name(), "MISSING");
}

#[test]
fn test_unresolved_in_array_length_position() {
    let tree = vec![structure(
        "S",
        vec![array_member("m", "long", vec![ConstExpr::reference("SIZE")])],
    )];
    let error = resolve(&tree).unwrap_err();
    expect!["unresolved reference `SIZE` in `S::m`"].assert_eq(&error.to_string());
    assert_eq!(error.name(), "SIZE");
}

#[test]
fn test_unresolved_in_predicate_position() {
    let tree = vec![union(
        "U",
        "long",
        vec![case(vec![ConstExpr::reference("LABEL")], member("a", "long"))],
    )];
    let error = resolve(&tree).unwrap_err();
    assert!(matches!(error, ResolutionError::Unresolved { .. }));
    assert_eq!(error.name(), "LABEL");
}

#[test]
fn test_unresolved_type_suggests_close_names() {
    let tree = vec![
        module("outer", vec![structure("Inner", vec![member("value", "long")])]),
        structure("Holder", vec![member("inner", "outer::Iner")]),
    ];
    let error = resolve(&tree).unwrap_err();
    assert_eq!(
        error,
        ResolutionError::Unresolved {
            name: "outer::Iner".to_string(),
            context: "Holder::inner".to_string(),
            suggestions: vec!["outer::Inner".to_string()],
        }
    );
}

#[test]
fn test_invalid_array_lengths() {
    let cases = [
        (constant("LEN", "string", ConstExpr::string("two")), ConstExpr::reference("LEN")),
        (constant("LEN", "long", ConstExpr::int(0)), ConstExpr::reference("LEN")),
        (constant("LEN", "double", ConstExpr::Literal(idl_ast::Literal::Float(2.0))), ConstExpr::reference("LEN")),
        (structure("LEN", Vec::new()), ConstExpr::reference("LEN")),
    ];
    for (definition, length) in cases {
        let tree = vec![definition, structure("S", vec![array_member("m", "long", vec![length])])];
        let error = resolve(&tree).unwrap_err();
        assert!(matches!(error, ResolutionError::InvalidConstant { .. }), "{error:?}");
    }
}

#[test]
fn test_constant_value_must_fit_declared_type() {
    let tree = vec![constant("FLAG", "boolean", ConstExpr::int(1))];
    let error = resolve(&tree).unwrap_err();
    expect!["invalid constant `FLAG` in `FLAG`: integer value 1 does not fit declared type bool"]
        .assert_eq(&error.to_string());

    let tree = vec![constant("SMALL", "octet", ConstExpr::int(256))];
    expect!["invalid constant `SMALL` in `SMALL`: integer value 256 does not fit declared type uint8"]
        .assert_eq(&resolve(&tree).unwrap_err().to_string());

    let tree = vec![constant("MIXED", "long", ConstExpr::Sum(vec![ConstExpr::int(1), ConstExpr::string("x")]))];
    assert!(matches!(resolve(&tree).unwrap_err(), ResolutionError::InvalidConstant { .. }));
}

#[test]
fn test_non_type_used_as_type() {
    let tree = vec![
        module("outer", vec![constant("A", "long", ConstExpr::int(1))]),
        structure("S", vec![member("m", "outer")]),
    ];
    let error = resolve(&tree).unwrap_err();
    expect!["type mismatch in `S::m`: expected a type for `outer`, found module `outer`"]
        .assert_eq(&error.to_string());

    let tree = vec![
        module("outer", vec![constant("A", "long", ConstExpr::int(1))]),
        structure("S", vec![member("m", "outer::A")]),
    ];
    assert!(matches!(resolve(&tree).unwrap_err(), ResolutionError::TypeMismatch { .. }));
}

#[test]
fn test_duplicate_definitions() {
    let tree = vec![structure("A", Vec::new()), constant("A", "long", ConstExpr::int(1))];
    let error = resolve(&tree).unwrap_err();
    expect!["`A` is defined more than once (first as struct, then as const)"].assert_eq(&error.to_string());

    let tree = vec![enumeration("Color", &["RED"]), constant("RED", "long", ConstExpr::int(1))];
    assert!(matches!(
        resolve(&tree).unwrap_err(),
        ResolutionError::DuplicateDefinition { ref name, .. } if name == "RED"
    ));

    let tree = vec![structure("S", vec![member("x", "long"), member("x", "double")])];
    assert!(matches!(
        resolve(&tree).unwrap_err(),
        ResolutionError::DuplicateDefinition { ref name, .. } if name == "S::x"
    ));
}

#[test]
fn test_module_cannot_reopen_another_kind() {
    let tree = vec![structure("pkg", Vec::new()), module("pkg", Vec::new())];
    assert_eq!(
        resolve(&tree).unwrap_err(),
        ResolutionError::DuplicateDefinition {
            name: "pkg".to_string(),
            first: "struct",
            second: "module",
        }
    );

    let tree = vec![
        module("pkg", vec![constant("A", "long", ConstExpr::int(1))]),
        module("pkg", vec![constant("A", "long", ConstExpr::int(2))]),
    ];
    assert!(matches!(
        resolve(&tree).unwrap_err(),
        ResolutionError::DuplicateDefinition { ref name, .. } if name == "pkg::A"
    ));
}

#[test]
fn test_array_of_sequences_through_typedef_chain() {
    let tree = vec![
        typedef("int32arr", TypeSpec::sequence(TypeSpec::named("int32"), Some(ConstExpr::int(10))), Vec::new()),
        typedef("int32arr2", TypeSpec::named("int32arr"), vec![ConstExpr::int(2)]),
        structure("ArrStruct", vec![member("intArray", "int32arr2")]),
    ];
    let error = resolve(&tree).unwrap_err();
    assert!(matches!(
        error,
        ResolutionError::UnsupportedComposition { reason: "array of sequences", .. }
    ));
}

#[test]
fn test_array_of_sequences_at_field() {
    let tree = vec![
        typedef("int32arr", TypeSpec::sequence(TypeSpec::named("int32"), Some(ConstExpr::int(10))), Vec::new()),
        structure("ArrStruct", vec![array_member("intArray", "int32arr", vec![ConstExpr::int(2)])]),
    ];
    let error = resolve(&tree).unwrap_err();
    expect!["unsupported type composition in `ArrStruct::intArray`: array of sequences"]
        .assert_eq(&error.to_string());
}

#[test]
fn test_sequence_of_arrays_and_sequences() {
    let tree = vec![
        typedef("int32arr", TypeSpec::named("int32"), vec![ConstExpr::int(2)]),
        structure(
            "ArrStruct",
            vec![member_of("intArray", TypeSpec::sequence(TypeSpec::named("int32arr"), None))],
        ),
    ];
    assert!(matches!(
        resolve(&tree).unwrap_err(),
        ResolutionError::UnsupportedComposition { reason: "sequence of arrays", .. }
    ));

    let nested = TypeSpec::sequence(TypeSpec::sequence(TypeSpec::named("long"), None), None);
    let tree = vec![structure("Nested", vec![member_of("rows", nested)])];
    assert!(matches!(
        resolve(&tree).unwrap_err(),
        ResolutionError::UnsupportedComposition { reason: "sequence of sequences", .. }
    ));
}

#[test]
fn test_cyclic_constants_and_typedefs() {
    let tree = vec![
        constant("A", "long", ConstExpr::reference("B")),
        constant("B", "long", ConstExpr::Sum(vec![ConstExpr::reference("A"), ConstExpr::int(1)])),
    ];
    assert_eq!(
        resolve(&tree).unwrap_err(),
        ResolutionError::CyclicReference { name: "A".to_string() }
    );

    let tree = vec![
        typedef("Left", TypeSpec::named("Right"), Vec::new()),
        typedef("Right", TypeSpec::named("Left"), Vec::new()),
        structure("S", vec![member("m", "Left")]),
    ];
    assert_eq!(
        resolve(&tree).unwrap_err(),
        ResolutionError::CyclicReference { name: "Left".to_string() }
    );
}

#[test]
fn test_failure_discards_partial_output() {
    let tree = vec![
        structure("Good", vec![member("x", "long")]),
        structure("Bad", vec![member("y", "Nowhere")]),
    ];
    assert!(resolve(&tree).is_err());

    let batch = idl_driver::resolve_batched(&tree, &idl_driver::ResolverConfig::default()).unwrap();
    assert_eq!(batch.definitions.len(), 1);
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].name(), "Nowhere");
}
