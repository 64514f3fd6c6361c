//! Discriminated union resolution

use crate::error::ResolutionError;
use crate::node::UnionNode;
use crate::resolver::Resolver;
use idl_ast::CaseLabel;
use idl_ir::{Aggregated, Case, ConstValue, Field, Primitive, PrimitiveFamily, UnionDefinition};
use rustc_hash::FxHashSet;

impl<'ast> UnionNode<'ast> {
    /// Resolve the discriminator, every case and the default case
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if the discriminator is not an integer, float or
    ///   boolean primitive, or a predicate does not fit it
    /// - `DuplicateDefaultCase` for a second `default:` label
    /// - `DuplicateDefinition` for a repeated member name or label value
    /// - `InvalidConstant` for a case without labels
    pub fn to_definition(&self, cx: &Resolver<'_, 'ast>) -> Result<UnionDefinition, ResolutionError> {
        let switch_type = self.switch_type(cx)?;
        let family = switch_type.family();

        let mut cases = Vec::new();
        let mut default_case: Option<Field> = None;
        let mut members = FxHashSet::default();
        let mut seen_labels: Vec<ConstValue> = Vec::new();

        for case in &self.ast.cases {
            if case.labels.is_empty() {
                return Err(ResolutionError::InvalidConstant {
                    name: case.member.name.clone(),
                    context: self.name.clone(),
                    reason: "union case has no labels".to_string(),
                });
            }

            let context = format!("{}::{}", self.name, case.member.name);
            if !members.insert(case.member.name.as_str()) {
                return Err(ResolutionError::DuplicateDefinition {
                    name: context,
                    first: "member",
                    second: "member",
                });
            }
            let field = cx.resolve_member(&case.member, self.scope, &self.name)?;
            let mut predicates = Vec::new();
            let mut is_default = false;

            for label in &case.labels {
                match label {
                    CaseLabel::Default if is_default || default_case.is_some() => {
                        return Err(ResolutionError::DuplicateDefaultCase {
                            name: self.name.clone(),
                        });
                    }
                    CaseLabel::Default => is_default = true,
                    CaseLabel::Value(expr) => {
                        let predicate = cx.eval_const(expr, self.scope, &context)?;
                        check_predicate(&predicate, switch_type, &context)?;
                        let key = label_key(&predicate, family);
                        if seen_labels.contains(&key) {
                            return Err(ResolutionError::DuplicateDefinition {
                                name: format!("{}::case {predicate}", self.name),
                                first: "case label",
                                second: "case label",
                            });
                        }
                        seen_labels.push(key);
                        predicates.push(predicate);
                    }
                }
            }

            if is_default {
                default_case = Some(field.clone());
            }
            if !predicates.is_empty() {
                cases.push(Case { predicates, field });
            }
        }

        Ok(UnionDefinition {
            aggregated: Aggregated {
                name: self.name.clone(),
                annotations: cx.resolve_annotations(self.ast.annotations.as_deref(), self.scope, &self.name)?,
            },
            switch_type: switch_type.as_str().to_string(),
            cases,
            default_case,
        })
    }

    fn switch_type(&self, cx: &Resolver<'_, 'ast>) -> Result<Primitive, ResolutionError> {
        let resolved = cx.resolve_type(&self.ast.switch_type, self.scope, &self.name)?;
        match resolved.scalar_primitive() {
            Some(primitive) if primitive.family() != PrimitiveFamily::Text => Ok(primitive),
            _ => Err(ResolutionError::TypeMismatch {
                name: self.name.clone(),
                expected: "an integer, float or boolean discriminator".to_string(),
                found: resolved.describe(),
            }),
        }
    }
}

fn check_predicate(predicate: &ConstValue, switch_type: Primitive, context: &str) -> Result<(), ResolutionError> {
    if predicate.fits_primitive(switch_type) {
        Ok(())
    } else {
        Err(ResolutionError::TypeMismatch {
            name: context.to_string(),
            expected: format!("a {switch_type} case label"),
            found: format!("{} {predicate}", predicate.kind_name()),
        })
    }
}

/// Labels compare by value, so `1` and `1.0` collide on a float switch
fn label_key(predicate: &ConstValue, family: PrimitiveFamily) -> ConstValue {
    match (predicate, family) {
        (ConstValue::Integer(value), PrimitiveFamily::Float) => ConstValue::Float(*value as f64),
        _ => predicate.clone(),
    }
}
