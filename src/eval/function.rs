//! Function call dispatch.
//!
//! Handlers receive their argument expressions unevaluated, together with the
//! evaluator and the context, and decide themselves what to evaluate and in
//! which order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::builtins;
use super::context::EvalContext;
use super::error::{EvalError, EvalResult};
use super::expression::ExpressionEvaluator;
use super::value::Value;
use crate::ast::Expression;

pub trait Function: Send + Sync {
    fn call(
        &self,
        evaluator: &ExpressionEvaluator,
        args: &[Expression],
        context: &EvalContext,
    ) -> EvalResult<Value>;
}

impl<F> Function for F
where
    F: Fn(&ExpressionEvaluator, &[Expression], &EvalContext) -> EvalResult<Value> + Send + Sync,
{
    fn call(
        &self,
        evaluator: &ExpressionEvaluator,
        args: &[Expression],
        context: &EvalContext,
    ) -> EvalResult<Value> {
        self(evaluator, args, context)
    }
}

/// Name to handler mapping, read-only once built.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn Function>>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

impl FunctionRegistry {
    pub fn builder() -> FunctionRegistryBuilder {
        FunctionRegistryBuilder::default()
    }

    pub fn with_builtins() -> Self {
        Self::builder().register_builtins().build()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Looks up `name` and hands the raw arguments to its handler.
    ///
    /// The handler's result is returned as is.
    #[instrument(level = "debug", skip(self, args, evaluator, context), fields(arity = args.len()))]
    pub fn call(
        &self,
        name: &str,
        args: &[Expression],
        evaluator: &ExpressionEvaluator,
        context: &EvalContext,
    ) -> EvalResult<Value> {
        let handler = self.functions.get(name).ok_or_else(|| {
            debug!("function not registered");
            EvalError::UnknownFunction(name.to_string())
        })?;
        handler.call(evaluator, args, context)
    }
}

#[derive(Default)]
pub struct FunctionRegistryBuilder {
    functions: HashMap<String, Arc<dyn Function>>,
}

impl FunctionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a closure. A later registration under the same name replaces
    /// the earlier one.
    pub fn register<S, F>(self, name: S, handler: F) -> Self
    where
        S: Into<String>,
        F: Fn(&ExpressionEvaluator, &[Expression], &EvalContext) -> EvalResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.register_function(name, Arc::new(handler))
    }

    pub fn register_function<S: Into<String>>(mut self, name: S, handler: Arc<dyn Function>) -> Self {
        let name = name.into();
        debug!(%name, "register function");
        self.functions.insert(name, handler);
        self
    }

    pub fn register_builtins(self) -> Self {
        builtins::register(self)
    }

    pub fn build(self) -> FunctionRegistry {
        FunctionRegistry {
            functions: self.functions,
        }
    }
}
