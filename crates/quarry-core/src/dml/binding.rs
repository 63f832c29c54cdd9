use crate::{
    error::QueryError,
    exec::TypeCoercion,
    expr::{ParamMap, Path},
    obs::sink::{self, QueryEvent},
    serialize::Binding,
    value::Value,
};

/// Bind `bindings` positionally, starting at slot 1 and advancing by the
/// slot count each coercion reports. Returns the total slots consumed.
///
/// Arity and param resolution are checked before anything is bound, so a
/// failure leaves the statement untouched.
pub fn bind_parameters<C>(
    coercion: &mut C,
    bindings: &[Binding],
    paths: &[Option<Path>],
    params: &ParamMap,
) -> Result<usize, QueryError>
where
    C: TypeCoercion + ?Sized,
{
    if bindings.len() != paths.len() {
        return Err(QueryError::ArityMismatch {
            paths: paths.len(),
            values: bindings.len(),
        });
    }

    let values = bindings
        .iter()
        .map(|binding| match binding {
            Binding::Value(value) => Ok(value),
            Binding::Param(param) => params
                .get(param)
                .ok_or_else(|| QueryError::ParameterNotSet {
                    param: param.clone(),
                }),
        })
        .collect::<Result<Vec<&Value>, _>>()?;

    let mut slot = 1;
    for (value, path) in values.into_iter().zip(paths) {
        slot += coercion.bind(slot, path.as_ref(), value)?;
    }

    let slots = slot - 1;
    sink::record(QueryEvent::Bound {
        slots: u64::try_from(slots).unwrap_or(u64::MAX),
    });

    Ok(slots)
}
