//! Target AST handed to execution backends.
//!
//! Every node is exclusively owned by its parent; there is no sharing and
//! no back-pointer, so a `Program` is a finite tree that can be moved to
//! another thread or backend as a single value.

pub mod display;


/// Name of the entry point every program body is bound under.
pub const ENTRY_POINT: &str = "main";

/// Backend function the auto-display rewrite calls.
pub const DISPLAY_BUILTIN: &str = "display";

/// A complete lowered program.
///
/// Only the assembler can build one, so the auto-display rewrite has run
/// exactly once on every `Program` in existence.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    pub(crate) fn from_statements(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn entry_point(&self) -> &'static str {
        ENTRY_POINT
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// `let name = init;` The type is left to the backend.
    VarDecl {
        name: String,
        init: Option<Expression>,
    },
    Assign {
        name: String,
        value: Expression,
    },
    ExprStmt {
        value: Expression,
    },
    Return {
        value: Option<Expression>,
    },
    If {
        cond: Expression,
        then: Box<Statement>,
        else_: Option<Box<Statement>>,
    },
    While {
        cond: Expression,
        body: Box<Statement>,
    },
    Block {
        body: Vec<Statement>,
    },
    FuncDef {
        name: String,
        params: Vec<String>,
        body: Body,
    },
}

impl Statement {
    /// The statement the auto-display rewrite emits: `display(value);`.
    pub fn display(value: Expression) -> Self {
        Statement::ExprStmt {
            value: Expression::Call {
                callee: Box::new(Expression::Ident(DISPLAY_BUILTIN.to_string())),
                args: vec![value],
            },
        }
    }

    /// The displayed value, if this is a display statement.
    pub fn as_display(&self) -> Option<&Expression> {
        let Statement::ExprStmt {
            value: Expression::Call { callee, args },
        } = self
        else {
            return None;
        };
        match (callee.as_ref(), args.as_slice()) {
            (Expression::Ident(name), [value]) if name == DISPLAY_BUILTIN => Some(value),
            _ => None,
        }
    }
}

/// Function and lambda bodies.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Block(Vec<Statement>),
    Expr(Box<Expression>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    IntLit(i64),
    FloatLit(f64),
    /// Contents without the delimiting quotes.
    StringLit(String),
    BoolLit(bool),
    Ident(String),
    Binary {
        op: Operation,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        op: Operation,
        operand: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
    ArrayLit {
        elements: Vec<Expression>,
    },
    Lambda {
        params: Vec<String>,
        body: Body,
    },
}

impl Expression {
    pub fn binary(op: Operation, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn ident(name: &str) -> Self {
        Expression::Ident(name.to_string())
    }
}

/// The fixed operator vocabulary shared with every backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Not,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::Add,
        Operation::Sub,
        Operation::Mul,
        Operation::Div,
        Operation::Mod,
        Operation::Lt,
        Operation::Gt,
        Operation::Le,
        Operation::Ge,
        Operation::Eq,
        Operation::Ne,
        Operation::And,
        Operation::Or,
        Operation::Not,
    ];

    pub fn from_spelling(spelling: &str) -> Option<Self> {
        let op = match spelling {
            "+" => Operation::Add,
            "-" => Operation::Sub,
            "*" => Operation::Mul,
            "/" => Operation::Div,
            "%" => Operation::Mod,
            "<" => Operation::Lt,
            ">" => Operation::Gt,
            "<=" => Operation::Le,
            ">=" => Operation::Ge,
            "==" => Operation::Eq,
            "!=" => Operation::Ne,
            "&&" => Operation::And,
            "||" => Operation::Or,
            "!" => Operation::Not,
            _ => return None,
        };
        Some(op)
    }

    pub fn spelling(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mul => "*",
            Operation::Div => "/",
            Operation::Mod => "%",
            Operation::Lt => "<",
            Operation::Gt => ">",
            Operation::Le => "<=",
            Operation::Ge => ">=",
            Operation::Eq => "==",
            Operation::Ne => "!=",
            Operation::And => "&&",
            Operation::Or => "||",
            Operation::Not => "!",
        }
    }

    /// Higher binds tighter. Matches the parser's binding powers.
    pub fn precedence(self) -> u8 {
        match self {
            Operation::Or => 1,
            Operation::And => 2,
            Operation::Eq | Operation::Ne => 3,
            Operation::Lt | Operation::Gt | Operation::Le | Operation::Ge => 4,
            Operation::Add | Operation::Sub => 5,
            Operation::Mul | Operation::Div | Operation::Mod => 6,
            Operation::Not => 7,
        }
    }

    pub fn is_unary(self) -> bool {
        self == Operation::Not
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spelling())
    }
}
