use crate::{
    exec::{
        CoercionError, ExecuteOutcome, ExecutorError, Statement, StatementExecutor, TypeCoercion,
    },
    expr::Path,
    query::QueryModifiers,
    value::{Value, ValueType},
};
use std::{cell::RefCell, rc::Rc};

///
/// ExecLog
///
/// Everything the mock backend observed, shared between the executor and
/// its statements.
///

#[derive(Debug, Default)]
pub struct ExecLog {
    pub prepared: Vec<String>,
    pub bound: Vec<(usize, Option<String>, Value)>,
    pub ranges: Vec<QueryModifiers>,
    pub executed: usize,
    pub closed: usize,
}

///
/// MockExecutor
///

#[derive(Clone, Debug, Default)]
pub struct MockExecutor {
    log: Rc<RefCell<ExecLog>>,
    outcome: Option<ExecuteOutcome>,
    wide_type: Option<ValueType>,
    reject_slot: Option<usize>,
}

impl MockExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome every statement returns from `execute`.
    #[must_use]
    pub fn returning(mut self, outcome: ExecuteOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Values of this type consume two slots.
    #[must_use]
    pub fn wide(mut self, ty: ValueType) -> Self {
        self.wide_type = Some(ty);
        self
    }

    /// Fail coercion when binding at `slot`.
    #[must_use]
    pub const fn rejecting(mut self, slot: usize) -> Self {
        self.reject_slot = Some(slot);
        self
    }

    #[must_use]
    pub fn log(&self) -> std::cell::Ref<'_, ExecLog> {
        self.log.borrow()
    }
}

impl StatementExecutor for MockExecutor {
    type Statement = MockStatement;

    fn prepare(&self, text: &str) -> Result<MockStatement, ExecutorError> {
        self.log.borrow_mut().prepared.push(text.to_string());

        Ok(MockStatement {
            log: Rc::clone(&self.log),
            outcome: self.outcome.clone().unwrap_or(ExecuteOutcome::Affected(0)),
            wide_type: self.wide_type.clone(),
            reject_slot: self.reject_slot,
        })
    }
}

///
/// MockStatement
///

#[derive(Debug)]
pub struct MockStatement {
    log: Rc<RefCell<ExecLog>>,
    outcome: ExecuteOutcome,
    wide_type: Option<ValueType>,
    reject_slot: Option<usize>,
}

impl TypeCoercion for MockStatement {
    fn bind(
        &mut self,
        slot: usize,
        path: Option<&Path>,
        value: &Value,
    ) -> Result<usize, CoercionError> {
        if self.reject_slot == Some(slot) {
            return Err(CoercionError::TypeMismatch {
                slot,
                target: path.map_or_else(|| "?".to_string(), Path::dotted),
                value: value.clone(),
            });
        }

        self.log
            .borrow_mut()
            .bound
            .push((slot, path.map(Path::dotted), value.clone()));

        let wide = self
            .wide_type
            .as_ref()
            .is_some_and(|ty| *ty == value.value_type());

        Ok(if wide { 2 } else { 1 })
    }
}

impl Statement for MockStatement {
    fn execute(&mut self) -> Result<ExecuteOutcome, ExecutorError> {
        self.log.borrow_mut().executed += 1;
        Ok(self.outcome.clone())
    }

    fn close(&mut self) -> Result<(), ExecutorError> {
        self.log.borrow_mut().closed += 1;
        Ok(())
    }

    fn set_range(&mut self, modifiers: &QueryModifiers) -> Result<(), ExecutorError> {
        self.log.borrow_mut().ranges.push(*modifiers);
        Ok(())
    }
}
