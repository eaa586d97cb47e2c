//! # Keyword Checkers
//!
//! One checker per [`Keyword`] variant. [`check`] is the dispatch table;
//! it matches exhaustively, so a new keyword variant does not compile until
//! it has a checker.
//!
//! Checkers for type-specific families (number, string, array, object) are
//! only called with instances of that type.

mod array;
mod combinator;
mod number;
mod object;
mod string;
mod types;
mod value;

use jsv_schema::{Keyword, Schema};

use crate::engine::Validator;
use crate::instance::PathAwareValue;
use crate::report::{ValidationError, ValidationReport, FALSE_SCHEMA_CODE, REFERENCE_CYCLE_CODE};

/// Run the checker for `keyword`.
pub(crate) fn check(
    validator: &Validator<'_>,
    schema: &Schema,
    keyword: &Keyword,
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    match keyword {
        Keyword::False => report.add_error(ValidationError::structural(
            instance,
            schema,
            FALSE_SCHEMA_CODE,
            "no value is valid against the false schema",
        )),
        Keyword::Type(t) => types::check_type(validator, schema, t, instance, report),
        Keyword::Disallow(t) => types::check_disallow(validator, schema, t, instance, report),
        Keyword::Enum(values) => value::check_enum(schema, values, instance, report),
        Keyword::Const(expected) => value::check_const(schema, expected, instance, report),
        Keyword::Number(n) => number::check(schema, n, instance, report),
        Keyword::String(s) => string::check(validator, schema, s, instance, report),
        Keyword::Array(a) => array::check(validator, schema, a, instance, report),
        Keyword::Object(o) => object::check(validator, schema, o, instance, report),
        Keyword::AllOf(ids) => combinator::all_of(validator, schema, ids, instance, report),
        Keyword::AnyOf(ids) => combinator::any_of(validator, schema, ids, instance, report),
        Keyword::OneOf(ids) => combinator::one_of(validator, schema, ids, instance, report),
        Keyword::Not(id) => combinator::not(validator, schema, *id, instance, report),
        Keyword::Ref(r) => match instance.through_reference(r.target) {
            Some(inner) => {
                validator.validate_schema(r.target, &inner, report);
            }
            None => report.add_error(ValidationError::structural(
                instance,
                schema,
                REFERENCE_CYCLE_CODE,
                format!(
                    "reference to {} loops without descending into the instance",
                    validator.graph().schema(r.target).unique_uri()
                ),
            )),
        },
    }
}

/// Render a list of names as `a, b, c`.
fn join_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().collect::<Vec<_>>().join(", ")
}
