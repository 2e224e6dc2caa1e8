use super::BindValue;
use crate::criterion::Value;

pub(super) fn push_int(bind_params: &mut Vec<BindValue>, value: i64) -> usize {
    bind_params.push(BindValue::Int(value));
    bind_params.len()
}

pub(super) fn push_text(bind_params: &mut Vec<BindValue>, value: String) -> usize {
    bind_params.push(BindValue::Text(value));
    bind_params.len()
}

pub(super) fn push_value(bind_params: &mut Vec<BindValue>, value: &Value) -> usize {
    match value {
        Value::Int(v) => push_int(bind_params, *v),
        Value::Text(v) => push_text(bind_params, v.clone()),
    }
}
