//! Constant, array-length and annotation evaluation

use crate::error::ResolutionError;
use crate::node::Node;
use crate::resolver::Resolver;
use crate::scope::{NodeId, ScopeId};
use idl_ast::{Annotation, AnnotationParams, ConstExpr, Literal};
use idl_ir::{AnnotationValue, Annotations, ConstValue};
use indexmap::IndexMap;

impl Resolver<'_, '_> {
    /// Evaluate a constant expression in `scope`
    ///
    /// Identifiers must name a constant or an enumerator; the referenced
    /// constant is evaluated in its own declaring scope.
    ///
    /// # Errors
    ///
    /// Returns `Unresolved` for unknown identifiers and `InvalidConstant` for
    /// identifiers naming anything else, or for sums mixing kinds.
    pub fn eval_const(&self, expr: &ConstExpr, scope: ScopeId, context: &str) -> Result<ConstValue, ResolutionError> {
        match expr {
            ConstExpr::Literal(literal) => Ok(literal_value(literal)),

            ConstExpr::Reference(name) => {
                let node = self.registry().resolve(scope, name, context)?;
                let target = self.registry().node(node);
                if !matches!(target, Node::Constant(_)) {
                    return Err(ResolutionError::InvalidConstant {
                        name: name.clone(),
                        context: context.to_string(),
                        reason: format!("refers to {} `{}`, not a constant", target.keyword(), target.name()),
                    });
                }
                self.constant_value(node)
            }

            ConstExpr::Sum(terms) => {
                let values = terms
                    .iter()
                    .map(|term| self.eval_const(term, scope, context))
                    .collect::<Result<Vec<_>, _>>()?;
                sum(values, context)
            }
        }
    }

    /// Value of a registered constant or enumerator
    ///
    /// # Errors
    ///
    /// Returns `CyclicReference` if the constant depends on itself and
    /// `InvalidConstant` if `node` is not a constant.
    pub fn constant_value(&self, node: NodeId) -> Result<ConstValue, ResolutionError> {
        match self.registry().node(node) {
            Node::Constant(constant) => self.cached_value(node, || constant.evaluate(self)),
            other => Err(ResolutionError::InvalidConstant {
                name: other.name().to_string(),
                context: other.name().to_string(),
                reason: format!("{} is not a constant", other.keyword()),
            }),
        }
    }

    /// Evaluate an array length or bound; must be a positive integer
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstant` for anything but a positive integer.
    pub fn eval_length(&self, expr: &ConstExpr, scope: ScopeId, context: &str) -> Result<u64, ResolutionError> {
        let value = self.eval_const(expr, scope, context)?;
        value
            .as_integer()
            .filter(|length| *length > 0)
            .and_then(|length| u64::try_from(length).ok())
            .ok_or_else(|| ResolutionError::InvalidConstant {
                name: expr_label(expr, context),
                context: context.to_string(),
                reason: format!("expected a positive integer length, found {} {value}", value.kind_name()),
            })
    }

    /// Evaluate every dimension of an array declaration, outermost first
    ///
    /// # Errors
    ///
    /// Propagates the first failing length.
    pub fn eval_lengths(&self, exprs: &[ConstExpr], scope: ScopeId, context: &str) -> Result<Vec<u64>, ResolutionError> {
        exprs
            .iter()
            .map(|expr| self.eval_length(expr, scope, context))
            .collect()
    }

    /// Resolve an annotation block, keeping absent distinct from empty
    ///
    /// # Errors
    ///
    /// Propagates parameter evaluation errors.
    pub fn resolve_annotations(
        &self,
        annotations: Option<&[Annotation]>,
        scope: ScopeId,
        context: &str,
    ) -> Result<Option<Annotations>, ResolutionError> {
        let Some(annotations) = annotations else {
            return Ok(None);
        };

        let mut resolved = Annotations::with_capacity(annotations.len());
        for annotation in annotations {
            let value = match &annotation.params {
                AnnotationParams::None => AnnotationValue::NoParams,
                AnnotationParams::Single(expr) => AnnotationValue::ConstParam {
                    value: self.eval_annotation_param(expr, scope, context)?,
                },
                AnnotationParams::Named(params) => AnnotationValue::NamedParams {
                    named_params: params
                        .iter()
                        .map(|(key, expr)| -> Result<(String, ConstValue), ResolutionError> {
                            Ok((key.clone(), self.eval_annotation_param(expr, scope, context)?))
                        })
                        .collect::<Result<IndexMap<_, _>, _>>()?,
                },
            };
            resolved.insert(annotation.name.clone(), value);
        }
        Ok(Some(resolved))
    }

    /// Annotation vocabularies use free identifiers (`@extensibility(FINAL)`);
    /// those stay as strings when nothing by that name is registered.
    fn eval_annotation_param(&self, expr: &ConstExpr, scope: ScopeId, context: &str) -> Result<ConstValue, ResolutionError> {
        if let ConstExpr::Reference(name) = expr {
            if self.registry().lookup(scope, name).is_none() {
                return Ok(ConstValue::String(name.clone()));
            }
        }
        self.eval_const(expr, scope, context)
    }
}

fn literal_value(literal: &Literal) -> ConstValue {
    match literal {
        Literal::Integer(value) => ConstValue::Integer(*value),
        Literal::Float(value) => ConstValue::Float(*value),
        Literal::Boolean(value) => ConstValue::Boolean(*value),
        Literal::String(value) => ConstValue::String(value.clone()),
    }
}

/// Fold `a + b + ...`; integers stay integers until a float shows up
fn sum(values: Vec<ConstValue>, context: &str) -> Result<ConstValue, ResolutionError> {
    let invalid = |reason: String| ResolutionError::InvalidConstant {
        name: context.to_string(),
        context: context.to_string(),
        reason,
    };

    let mut values = values.into_iter();
    let Some(first) = values.next() else {
        return Err(invalid("empty sum".to_string()));
    };

    values.try_fold(first, |total, value| match (total, value) {
        (ConstValue::Integer(left), ConstValue::Integer(right)) => left
            .checked_add(right)
            .map(ConstValue::Integer)
            .ok_or_else(|| invalid("integer overflow".to_string())),
        (ConstValue::Integer(left), ConstValue::Float(right)) => Ok(ConstValue::Float(left as f64 + right)),
        (ConstValue::Float(left), ConstValue::Integer(right)) => Ok(ConstValue::Float(left + right as f64)),
        (ConstValue::Float(left), ConstValue::Float(right)) => Ok(ConstValue::Float(left + right)),
        (ConstValue::String(left), ConstValue::String(right)) => Ok(ConstValue::String(left + &right)),
        (left, right) => Err(invalid(format!("cannot add {} and {}", left.kind_name(), right.kind_name()))),
    })
}

fn expr_label(expr: &ConstExpr, context: &str) -> String {
    match expr {
        ConstExpr::Reference(name) => name.clone(),
        ConstExpr::Literal(literal) => literal_value(literal).to_string(),
        ConstExpr::Sum(_) => context.to_string(),
    }
}
