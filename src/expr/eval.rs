use std::collections::HashMap;

use super::ExprError;
use super::parser::{BinaryOp, Expr, UnaryOp, parse};
use super::value::{ObjectKind, ObjectRef, Value};

// ── GameState ─────────────────────────────────────────────────────────────────

/// Read-only view of the host's game data.
///
/// Table roots (`actors`, `items`, ...) are indexed by the interpreter
/// itself; everything else is asked of the host.
pub trait GameState {
    fn switch(&self, id: i64) -> bool;

    fn variable(&self, id: i64) -> Value;

    /// Attribute read or method call on a host object.
    fn member(&self, target: &ObjectRef, name: &str, args: &[Value]) -> Result<Value, ExprError>;

    /// `target[key]` for non-table objects (e.g. `map.events[3]`).
    fn index(&self, target: &ObjectRef, key: &Value) -> Result<Value, ExprError> {
        let _ = key;
        Err(ExprError::NotIndexable(target.to_string()))
    }
}

// ── Interpreter ───────────────────────────────────────────────────────────────

pub fn eval(expr: &Expr, state: &dyn GameState) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Name(name) => ObjectKind::root(name)
            .map(|kind| Value::Object(ObjectRef::root(kind)))
            .ok_or_else(|| ExprError::UnknownName(name.clone())),
        Expr::Unary(op, inner) => {
            let v = eval(inner, state)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!v.truthy())),
                UnaryOp::Neg => match v {
                    Value::Int(n) => n.checked_neg().map(Value::Int).ok_or(ExprError::Overflow),
                    other => Err(mismatch("-", &Value::Int(0), &other)),
                },
            }
        }
        Expr::Binary(BinaryOp::And, lhs, rhs) => {
            let l = eval(lhs, state)?;
            if l.truthy() { eval(rhs, state) } else { Ok(l) }
        }
        Expr::Binary(BinaryOp::Or, lhs, rhs) => {
            let l = eval(lhs, state)?;
            if l.truthy() { Ok(l) } else { eval(rhs, state) }
        }
        Expr::Binary(op, lhs, rhs) => {
            let l = eval(lhs, state)?;
            let r = eval(rhs, state)?;
            binary(*op, &l, &r)
        }
        Expr::Index { target, key } => {
            let target = eval(target, state)?;
            let key = eval(key, state)?;
            index(&target, &key, state)
        }
        Expr::Member { target, name, args } => {
            let target = eval(target, state)?;
            let args = args.iter().map(|a| eval(a, state)).collect::<Result<Vec<_>, _>>()?;
            member(&target, name, &args, state)
        }
    }
}

fn mismatch(op: &'static str, l: &Value, r: &Value) -> ExprError {
    ExprError::TypeMismatch { op, left: l.type_name(), right: r.type_name() }
}

fn binary(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, ExprError> {
    use BinaryOp::*;
    match op {
        Eq => return Ok(Value::Bool(l == r)),
        Ne => return Ok(Value::Bool(l != r)),
        _ => {}
    }
    let symbol = match op {
        Lt => "<",
        Le => "<=",
        Gt => ">",
        Ge => ">=",
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        _ => "%",
    };

    match (l, r) {
        (Value::Int(a), Value::Int(b)) => {
            let (a, b) = (*a, *b);
            let v = match op {
                Lt => Value::Bool(a < b),
                Le => Value::Bool(a <= b),
                Gt => Value::Bool(a > b),
                Ge => Value::Bool(a >= b),
                Add => Value::Int(a.checked_add(b).ok_or(ExprError::Overflow)?),
                Sub => Value::Int(a.checked_sub(b).ok_or(ExprError::Overflow)?),
                Mul => Value::Int(a.checked_mul(b).ok_or(ExprError::Overflow)?),
                Div => Value::Int(floor_div(a, b)?),
                _ => Value::Int(floor_rem(a, b)?),
            };
            Ok(v)
        }
        (Value::Str(a), Value::Str(b)) => match op {
            Lt => Ok(Value::Bool(a < b)),
            Le => Ok(Value::Bool(a <= b)),
            Gt => Ok(Value::Bool(a > b)),
            Ge => Ok(Value::Bool(a >= b)),
            Add => Ok(Value::Str(format!("{a}{b}"))),
            _ => Err(mismatch(symbol, l, r)),
        },
        _ => Err(mismatch(symbol, l, r)),
    }
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> Result<i64, ExprError> {
    if b == 0 {
        return Err(ExprError::DivisionByZero);
    }
    let q = a.checked_div(b).ok_or(ExprError::Overflow)?;
    if a % b != 0 && ((a < 0) != (b < 0)) { Ok(q - 1) } else { Ok(q) }
}

/// Remainder taking the sign of the divisor.
fn floor_rem(a: i64, b: i64) -> Result<i64, ExprError> {
    if b == 0 {
        return Err(ExprError::DivisionByZero);
    }
    let r = a.checked_rem(b).ok_or(ExprError::Overflow)?;
    if r != 0 && ((r < 0) != (b < 0)) { Ok(r + b) } else { Ok(r) }
}

fn index(target: &Value, key: &Value, state: &dyn GameState) -> Result<Value, ExprError> {
    match target {
        Value::Object(obj) => match (obj.kind, obj.kind.element(), key) {
            (ObjectKind::Switches, _, Value::Int(id)) => Ok(Value::Bool(state.switch(*id))),
            (ObjectKind::Variables, _, Value::Int(id)) => Ok(state.variable(*id)),
            (_, Some(element), Value::Int(id)) if obj.id == 0 => Ok(Value::Object(ObjectRef::new(element, *id))),
            _ => state.index(obj, key),
        },
        Value::List(items) => {
            let Value::Int(i) = key else {
                return Err(ExprError::BadIndex(key.to_string()));
            };
            let len = items.len() as i64;
            let i = if *i < 0 { len + i } else { *i };
            Ok(usize::try_from(i).ok().and_then(|i| items.get(i)).cloned().unwrap_or(Value::Nil))
        }
        other => Err(ExprError::NotIndexable(other.type_name().to_string())),
    }
}

fn member(target: &Value, name: &str, args: &[Value], state: &dyn GameState) -> Result<Value, ExprError> {
    if name == "nil?" {
        return Ok(Value::Bool(*target == Value::Nil));
    }
    let unknown = || ExprError::UnknownMember { target: target.type_name().to_string(), member: name.to_string() };
    match target {
        Value::Object(obj) => state.member(obj, name, args),
        Value::List(items) => match (name, args) {
            ("size" | "length" | "count", []) => Ok(Value::Int(items.len() as i64)),
            ("empty?", []) => Ok(Value::Bool(items.is_empty())),
            ("include?", [x]) => Ok(Value::Bool(items.contains(x))),
            ("first", []) => Ok(items.first().cloned().unwrap_or(Value::Nil)),
            ("last", []) => Ok(items.last().cloned().unwrap_or(Value::Nil)),
            _ => Err(unknown()),
        },
        Value::Str(s) => match (name, args) {
            ("size" | "length", []) => Ok(Value::Int(s.chars().count() as i64)),
            ("empty?", []) => Ok(Value::Bool(s.is_empty())),
            ("include?", [Value::Str(sub)]) => Ok(Value::Bool(s.contains(sub.as_str()))),
            ("upcase", []) => Ok(Value::Str(s.to_uppercase())),
            ("downcase", []) => Ok(Value::Str(s.to_lowercase())),
            _ => Err(unknown()),
        },
        Value::Int(n) => match (name, args) {
            ("abs", []) => n.checked_abs().map(Value::Int).ok_or(ExprError::Overflow),
            ("zero?", []) => Ok(Value::Bool(*n == 0)),
            ("even?", []) => Ok(Value::Bool(n % 2 == 0)),
            ("odd?", []) => Ok(Value::Bool(n % 2 != 0)),
            ("to_s", []) => Ok(Value::Str(n.to_string())),
            _ => Err(unknown()),
        },
        _ => Err(unknown()),
    }
}

// ── ConditionEvaluator ────────────────────────────────────────────────────────

/// Anything that can decide a condition string.
pub trait ConditionEvaluator {
    fn evaluate(&self, source: &str) -> Result<bool, ExprError>;
}

impl<F> ConditionEvaluator for F
where
    F: Fn(&str) -> Result<bool, ExprError>,
{
    fn evaluate(&self, source: &str) -> Result<bool, ExprError> {
        self(source)
    }
}

/// Parses and interprets conditions against a [`GameState`]; host code is
/// never executed.
pub struct SandboxEvaluator<'s> {
    state: &'s dyn GameState,
}

impl<'s> SandboxEvaluator<'s> {
    pub fn new(state: &'s dyn GameState) -> Self {
        Self { state }
    }
}

impl ConditionEvaluator for SandboxEvaluator<'_> {
    fn evaluate(&self, source: &str) -> Result<bool, ExprError> {
        let expr = parse(source)?;
        Ok(eval(&expr, self.state)?.truthy())
    }
}

// ── MemoryState ───────────────────────────────────────────────────────────────

type CallTable = HashMap<(ObjectRef, String), Vec<(Vec<Value>, Value)>>;

/// In-memory [`GameState`]: switches, variables and a table of member
/// results keyed by object, member name and arguments.
#[derive(Clone, Debug, Default)]
pub struct MemoryState {
    switches: HashMap<i64, bool>,
    variables: HashMap<i64, Value>,
    members: CallTable,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_switch(&mut self, id: i64, on: bool) -> &mut Self {
        self.switches.insert(id, on);
        self
    }

    pub fn set_variable(&mut self, id: i64, value: impl Into<Value>) -> &mut Self {
        self.variables.insert(id, value.into());
        self
    }

    /// Define an attribute (no arguments).
    pub fn set_member(&mut self, target: ObjectRef, name: &str, value: impl Into<Value>) -> &mut Self {
        self.set_call(target, name, Vec::new(), value)
    }

    /// Define the result of calling `name` with exactly `args`.
    pub fn set_call(&mut self, target: ObjectRef, name: &str, args: Vec<Value>, value: impl Into<Value>) -> &mut Self {
        let entries = self.members.entry((target, name.to_string())).or_default();
        let value = value.into();
        match entries.iter_mut().find(|(a, _)| *a == args) {
            Some(entry) => entry.1 = value,
            None => entries.push((args, value)),
        }
        self
    }
}

impl GameState for MemoryState {
    fn switch(&self, id: i64) -> bool {
        self.switches.get(&id).copied().unwrap_or(false)
    }

    fn variable(&self, id: i64) -> Value {
        self.variables.get(&id).cloned().unwrap_or(Value::Int(0))
    }

    fn member(&self, target: &ObjectRef, name: &str, args: &[Value]) -> Result<Value, ExprError> {
        self.members
            .get(&(*target, name.to_string()))
            .and_then(|entries| entries.iter().find(|(a, _)| a.as_slice() == args))
            .map(|(_, v)| v.clone())
            .ok_or_else(|| ExprError::UnknownMember { target: target.to_string(), member: name.to_string() })
    }
}
