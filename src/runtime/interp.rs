use std::io::Write;
use std::rc::Rc;

use crate::ast::{Body, Expression, Operation, Program, Statement, DISPLAY_BUILTIN};
use crate::diagnostic::Diagnostic;
use crate::span::Span;

use super::check::check_program;
use super::value::{Builtin, Closure, Env, Value};
use super::{Backend, BackendFailure, InterpreterOptions};

/// Reference backend: checks a program, then walks it, writing every
/// displayed value to `out` followed by a newline.
pub struct Interpreter<W: Write> {
    out: W,
    options: InterpreterOptions,
}

impl Interpreter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self::with_options(out, InterpreterOptions::default())
    }

    pub fn with_options(out: W, options: InterpreterOptions) -> Self {
        Self { out, options }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

impl<W: Write> Backend for Interpreter<W> {
    #[tracing::instrument(skip_all, fields(statements = program.statements().len()))]
    fn execute(&mut self, program: Program) -> Result<(), BackendFailure> {
        let diagnostics = check_program(&program);
        if !diagnostics.is_empty() {
            tracing::debug!(count = diagnostics.len(), "program rejected by checks");
            return Err(BackendFailure {
                diagnostics,
                program,
            });
        }

        let mut machine = Machine {
            out: &mut self.out,
            options: &self.options,
            depth: 0,
            steps: 0,
        };
        let result = machine.run(&program);
        tracing::debug!(steps = machine.steps, "program finished");
        result.map_err(|diagnostic| BackendFailure {
            diagnostics: vec![diagnostic],
            program,
        })
    }
}

/// Outcome of executing a statement.
enum Flow {
    Normal,
    Return(Value),
}

type Eval<T> = Result<T, Diagnostic>;

struct Machine<'a, W: Write> {
    out: &'a mut W,
    options: &'a InterpreterOptions,
    depth: usize,
    steps: u64,
}

fn runtime_error(message: String) -> Diagnostic {
    Diagnostic::error(message, Span::dummy())
}

impl<W: Write> Machine<'_, W> {
    fn run(&mut self, program: &Program) -> Eval<()> {
        let globals = Env::new();
        globals.define(DISPLAY_BUILTIN, Value::Builtin(Builtin::Display));
        // A top-level `return` simply ends the program.
        self.exec_sequence(program.statements(), &globals.child())?;
        self.out
            .flush()
            .map_err(|e| runtime_error(format!("failed to flush output: {}", e)))
    }

    fn tick(&mut self) -> Eval<()> {
        self.steps += 1;
        match self.options.max_steps {
            Some(limit) if self.steps > limit => Err(runtime_error(format!(
                "step limit of {} exceeded",
                limit
            ))
            .with_help("the program may loop forever; raise `max_steps` if it does not".to_string())),
            _ => Ok(()),
        }
    }

    /// Run statements in `env`, with the block's function definitions
    /// visible from its first statement.
    fn exec_sequence(&mut self, stmts: &[Statement], env: &Env) -> Eval<Flow> {
        for stmt in stmts {
            if let Statement::FuncDef { name, params, body } = stmt {
                let closure = Closure {
                    name: Some(name.clone()),
                    params: params.clone(),
                    body: body.clone(),
                    env: env.clone(),
                };
                env.define(name, Value::Function(Rc::new(closure)));
            }
        }
        for stmt in stmts {
            if let Flow::Return(value) = self.exec(stmt, env)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// An unbraced branch or loop body is a one-statement sequence in the
    /// enclosing scope, so a function defined there is bound like a `let`.
    fn exec_branch(&mut self, stmt: &Statement, env: &Env) -> Eval<Flow> {
        self.exec_sequence(std::slice::from_ref(stmt), env)
    }

    fn exec(&mut self, stmt: &Statement, env: &Env) -> Eval<Flow> {
        self.tick()?;
        match stmt {
            Statement::VarDecl { name, init } => {
                let value = match init {
                    Some(init) => self.eval(init, env)?,
                    None => Value::Unit,
                };
                env.define(name, value);
            }
            Statement::Assign { name, value } => {
                let value = self.eval(value, env)?;
                if !env.assign(name, value) {
                    return Err(runtime_error(format!(
                        "assignment to undeclared variable '{}'",
                        name
                    ))
                    .with_help(format!("declare it first with `let {} = ...;`", name)));
                }
            }
            Statement::ExprStmt { value } => {
                self.eval(value, env)?;
            }
            Statement::Return { value } => {
                let value = match value {
                    Some(value) => self.eval(value, env)?,
                    None => Value::Unit,
                };
                return Ok(Flow::Return(value));
            }
            Statement::If { cond, then, else_ } => {
                if self.condition(cond, env, "if")? {
                    return self.exec_branch(then, env);
                } else if let Some(else_) = else_ {
                    return self.exec_branch(else_, env);
                }
            }
            Statement::While { cond, body } => {
                while self.condition(cond, env, "while")? {
                    if let Flow::Return(value) = self.exec_branch(body, env)? {
                        return Ok(Flow::Return(value));
                    }
                    self.tick()?;
                }
            }
            Statement::Block { body } => return self.exec_sequence(body, &env.child()),
            // Bound when the enclosing sequence or branch was entered.
            Statement::FuncDef { .. } => {}
        }
        Ok(Flow::Normal)
    }

    fn condition(&mut self, cond: &Expression, env: &Env, construct: &str) -> Eval<bool> {
        match self.eval(cond, env)? {
            Value::Bool(b) => Ok(b),
            other => Err(runtime_error(format!(
                "{} condition must be a bool, found {} `{}`",
                construct,
                other.type_name(),
                other
            ))),
        }
    }

    fn eval(&mut self, expr: &Expression, env: &Env) -> Eval<Value> {
        match expr {
            Expression::IntLit(n) => Ok(Value::Int(*n)),
            Expression::FloatLit(x) => Ok(Value::Float(*x)),
            Expression::StringLit(s) => Ok(Value::Str(s.clone())),
            Expression::BoolLit(b) => Ok(Value::Bool(*b)),
            Expression::Ident(name) => env
                .get(name)
                .ok_or_else(|| runtime_error(format!("undefined variable '{}'", name))),
            Expression::Binary {
                op: op @ (Operation::And | Operation::Or),
                left,
                right,
            } => {
                let left = self.eval_bool(left, env, *op)?;
                match (op, left) {
                    (Operation::And, false) => Ok(Value::Bool(false)),
                    (Operation::Or, true) => Ok(Value::Bool(true)),
                    _ => Ok(Value::Bool(self.eval_bool(right, env, *op)?)),
                }
            }
            Expression::Binary { op, left, right } => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                binary(*op, left, right)
            }
            Expression::Unary { op, operand } => match self.eval(operand, env)? {
                Value::Bool(b) if *op == Operation::Not => Ok(Value::Bool(!b)),
                other => Err(runtime_error(format!(
                    "operator '{}' expects a bool, found {}",
                    op,
                    other.type_name()
                ))),
            },
            Expression::Call { callee, args } => {
                let callee = self.eval(callee, env)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, env))
                    .collect::<Eval<Vec<_>>>()?;
                self.call(callee, args)
            }
            Expression::ArrayLit { elements } => elements
                .iter()
                .map(|e| self.eval(e, env))
                .collect::<Eval<Vec<_>>>()
                .map(Value::Array),
            Expression::Lambda { params, body } => Ok(Value::Function(Rc::new(Closure {
                name: None,
                params: params.clone(),
                body: body.clone(),
                env: env.clone(),
            }))),
        }
    }

    fn eval_bool(&mut self, expr: &Expression, env: &Env, op: Operation) -> Eval<bool> {
        match self.eval(expr, env)? {
            Value::Bool(b) => Ok(b),
            other => Err(runtime_error(format!(
                "operator '{}' expects bool operands, found {}",
                op,
                other.type_name()
            ))),
        }
    }

    fn call(&mut self, callee: Value, args: Vec<Value>) -> Eval<Value> {
        self.tick()?;
        match callee {
            Value::Builtin(Builtin::Display) => {
                let [value] = <[Value; 1]>::try_from(args).map_err(|args| {
                    runtime_error(format!(
                        "'{}' expects 1 argument, got {}",
                        DISPLAY_BUILTIN,
                        args.len()
                    ))
                })?;
                writeln!(self.out, "{}", value)
                    .map_err(|e| runtime_error(format!("failed to write output: {}", e)))?;
                Ok(Value::Unit)
            }
            Value::Function(closure) => self.call_closure(&closure, args),
            other => Err(runtime_error(format!(
                "cannot call a value of type {}",
                other.type_name()
            ))),
        }
    }

    fn call_closure(&mut self, closure: &Closure, args: Vec<Value>) -> Eval<Value> {
        let label = closure.name.as_deref().unwrap_or("lambda");
        if args.len() != closure.params.len() {
            return Err(runtime_error(format!(
                "'{}' expects {} argument(s), got {}",
                label,
                closure.params.len(),
                args.len()
            )));
        }
        if self.depth >= self.options.max_call_depth {
            return Err(runtime_error(format!(
                "call depth limit of {} exceeded in '{}'",
                self.options.max_call_depth, label
            ))
            .with_help("check for unbounded recursion".to_string()));
        }

        let frame = closure.env.child();
        for (param, arg) in closure.params.iter().zip(args) {
            frame.define(param, arg);
        }

        self.depth += 1;
        let result = match &closure.body {
            Body::Expr(expr) => self.eval(expr, &frame),
            Body::Block(stmts) => self.exec_sequence(stmts, &frame).map(|flow| match flow {
                Flow::Return(value) => value,
                Flow::Normal => Value::Unit,
            }),
        };
        self.depth -= 1;
        result
    }
}

fn binary(op: Operation, left: Value, right: Value) -> Eval<Value> {
    use Value::{Bool, Float, Int, Str};

    let mismatch = |left: &Value, right: &Value| {
        runtime_error(format!(
            "operator '{}' cannot be applied to {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ))
    };

    match op {
        Operation::Eq => return Ok(Bool(left.equals(&right))),
        Operation::Ne => return Ok(Bool(!left.equals(&right))),
        Operation::Add if matches!(left, Str(_)) || matches!(right, Str(_)) => {
            return Ok(Str(format!("{}{}", left, right)));
        }
        _ => {}
    }

    match (&left, &right) {
        (Int(a), Int(b)) => int_op(op, *a, *b),
        (Int(_) | Float(_), Int(_) | Float(_)) => {
            let (a, b) = (as_float(&left), as_float(&right));
            float_op(op, a, b).ok_or_else(|| mismatch(&left, &right))
        }
        (Str(a), Str(b)) => compare(op, a.cmp(b)).ok_or_else(|| mismatch(&left, &right)),
        _ => Err(mismatch(&left, &right)),
    }
}

fn as_float(value: &Value) -> f64 {
    match value {
        Value::Int(n) => *n as f64,
        Value::Float(x) => *x,
        _ => f64::NAN,
    }
}

fn int_op(op: Operation, a: i64, b: i64) -> Eval<Value> {
    let result = match op {
        Operation::Add => a.checked_add(b),
        Operation::Sub => a.checked_sub(b),
        Operation::Mul => a.checked_mul(b),
        Operation::Div | Operation::Mod if b == 0 => {
            let what = if op == Operation::Div { "division" } else { "modulo" };
            return Err(runtime_error(format!("{} by zero: `{} {} {}`", what, a, op, b)));
        }
        Operation::Div => a.checked_div(b),
        Operation::Mod => a.checked_rem(b),
        _ => return compare(op, a.cmp(&b)).ok_or_else(|| unsupported_on("int", op)),
    };
    result
        .map(Value::Int)
        .ok_or_else(|| runtime_error(format!("integer overflow: `{} {} {}`", a, op, b)))
}

fn float_op(op: Operation, a: f64, b: f64) -> Option<Value> {
    let value = match op {
        Operation::Add => Value::Float(a + b),
        Operation::Sub => Value::Float(a - b),
        Operation::Mul => Value::Float(a * b),
        Operation::Div => Value::Float(a / b),
        Operation::Mod => Value::Float(a % b),
        Operation::Lt => Value::Bool(a < b),
        Operation::Gt => Value::Bool(a > b),
        Operation::Le => Value::Bool(a <= b),
        Operation::Ge => Value::Bool(a >= b),
        _ => return None,
    };
    Some(value)
}

fn compare(op: Operation, ordering: std::cmp::Ordering) -> Option<Value> {
    let result = match op {
        Operation::Lt => ordering.is_lt(),
        Operation::Gt => ordering.is_gt(),
        Operation::Le => ordering.is_le(),
        Operation::Ge => ordering.is_ge(),
        _ => return None,
    };
    Some(Value::Bool(result))
}

fn unsupported_on(type_name: &str, op: Operation) -> Diagnostic {
    runtime_error(format!("operator '{}' cannot be applied to {}", op, type_name))
}
