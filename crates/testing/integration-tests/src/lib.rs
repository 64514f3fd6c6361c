//! Integration test utilities for the IDL resolver
//!
//! Trees are built by hand with the helpers below, standing in for the
//! parser that normally produces them.

use idl_ast::{
    Annotation, AnnotationParams, CaseLabel, ConstExpr, Constant, Definition, Enum, Enumerator, Member, Module,
    Struct, TypeSpec, Typedef, Union, UnionCase,
};
use idl_driver::{ResolutionError, ResolverConfig};
use idl_ir::{Field, IdlMessageDefinition};

/// `module name { definitions }`
#[must_use]
pub fn module(name: &str, definitions: Vec<Definition>) -> Definition {
    Definition::Module(Module {
        name: name.to_string(),
        definitions,
        annotations: None,
    })
}

/// `struct name { members }`
#[must_use]
pub fn structure(name: &str, members: Vec<Member>) -> Definition {
    Definition::Struct(Struct {
        name: name.to_string(),
        members,
        annotations: None,
    })
}

/// `enum name { enumerators }`
#[must_use]
pub fn enumeration(name: &str, enumerators: &[&str]) -> Definition {
    Definition::Enum(Enum {
        name: name.to_string(),
        enumerators: enumerators
            .iter()
            .map(|name| Enumerator {
                name: (*name).to_string(),
                annotations: None,
            })
            .collect(),
        annotations: None,
    })
}

/// `const type_name name = value;`
#[must_use]
pub fn constant(name: &str, type_name: &str, value: ConstExpr) -> Definition {
    Definition::Constant(Constant {
        name: name.to_string(),
        type_spec: TypeSpec::named(type_name),
        value,
        annotations: None,
    })
}

/// `typedef type_spec name[lengths];`
#[must_use]
pub fn typedef(name: &str, type_spec: TypeSpec, array_lengths: Vec<ConstExpr>) -> Definition {
    Definition::Typedef(Typedef {
        name: name.to_string(),
        type_spec,
        array_lengths,
        annotations: None,
    })
}

/// `union name switch (switch_type) { cases }`
#[must_use]
pub fn union(name: &str, switch_type: &str, cases: Vec<UnionCase>) -> Definition {
    Definition::Union(Union {
        name: name.to_string(),
        switch_type: TypeSpec::named(switch_type),
        cases,
        annotations: None,
    })
}

/// `type_name name;`
#[must_use]
pub fn member(name: &str, type_name: &str) -> Member {
    member_of(name, TypeSpec::named(type_name))
}

/// Member with an arbitrary type
#[must_use]
pub fn member_of(name: &str, type_spec: TypeSpec) -> Member {
    Member {
        name: name.to_string(),
        type_spec,
        array_lengths: Vec::new(),
        annotations: None,
    }
}

/// `type_name name[lengths];`
#[must_use]
pub fn array_member(name: &str, type_name: &str, array_lengths: Vec<ConstExpr>) -> Member {
    Member {
        array_lengths,
        ..member(name, type_name)
    }
}

/// `case label...: body`
#[must_use]
pub fn case(labels: Vec<ConstExpr>, body: Member) -> UnionCase {
    UnionCase {
        labels: labels.into_iter().map(CaseLabel::Value).collect(),
        member: body,
    }
}

/// `default: body`
#[must_use]
pub fn default_case(body: Member) -> UnionCase {
    UnionCase {
        labels: vec![CaseLabel::Default],
        member: body,
    }
}

/// `@name`, `@name(value)` or `@name(key = value, ...)`
#[must_use]
pub fn annotation(name: &str, params: AnnotationParams) -> Annotation {
    Annotation {
        name: name.to_string(),
        params,
    }
}

/// Resolve with the default configuration
///
/// # Errors
///
/// Returns the first resolution error.
pub fn resolve(definitions: &[Definition]) -> Result<Vec<IdlMessageDefinition>, ResolutionError> {
    idl_driver::resolve(definitions, &ResolverConfig::default())
}

/// Definition by fully-qualified name; panics when it was not emitted
#[must_use]
pub fn definition<'ast>(output: &'ast [IdlMessageDefinition], name: &str) -> &'ast IdlMessageDefinition {
    idl_ir::find_definition(output, name).unwrap_or_else(|| panic!("`{name}` was not emitted"))
}

/// Field of a definition by name; panics when missing
#[must_use]
pub fn field<'ast>(definition: &'ast IdlMessageDefinition, name: &str) -> &'ast Field {
    definition
        .fields()
        .find(|field| field.name == name)
        .unwrap_or_else(|| panic!("`{}` has no field `{name}`", definition.name()))
}
