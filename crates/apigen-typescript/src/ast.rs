//! Declaration model handed to the printer.
//!
//! - [`TsType`]: type expressions (keywords, literals, references, unions, ...)
//! - [`TsExpr`]: the small expression subset used in callable bodies
//! - [`Declaration`]: top-level type aliases, enums and functions

use serde_json::Number;

/// Keyword types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Any,
    String,
    Number,
    Boolean,
    Object,
    Null,
    Undefined,
}

/// Literal values usable both as types and as expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

/// Object type member.
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

impl TsProp {
    pub fn required(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: true,
        }
    }
}

/// TypeScript type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    Keyword(Keyword),
    Literal(TsLiteral),
    /// Reference to a named alias or enum.
    Ref(String),
    Array(Box<TsType>),
    Tuple(Vec<TsType>),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
    /// `{ a: T; b?: U; [key: string]: V; }`
    Object {
        props: Vec<TsProp>,
        index: Option<Box<TsType>>,
    },
}

impl TsType {
    pub const ANY: TsType = TsType::Keyword(Keyword::Any);

    pub fn string_literal(value: impl Into<String>) -> Self {
        TsType::Literal(TsLiteral::String(value.into()))
    }

    pub fn object(props: Vec<TsProp>) -> Self {
        TsType::Object { props, index: None }
    }

    /// Build a union, collapsing the single-member case.
    pub fn union(mut members: Vec<TsType>) -> Self {
        if members.len() == 1 {
            members.remove(0)
        } else {
            TsType::Union(members)
        }
    }

    /// Name of the alias or enum this type refers to, if any.
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            TsType::Ref(name) => Some(name),
            _ => None,
        }
    }
}

/// Element of a destructuring pattern: `key: name = default`.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingElement {
    pub key: String,
    pub name: String,
    pub default: Option<TsExpr>,
}

impl BindingElement {
    pub fn shorthand(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            default: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamPattern {
    Ident(String),
    Destructure(Vec<BindingElement>),
}

/// Function or arrow parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    pub pattern: ParamPattern,
    pub ty: Option<TsType>,
    pub optional: bool,
    pub default: Option<TsExpr>,
}

impl TsParam {
    pub fn new(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            pattern: ParamPattern::Ident(name.into()),
            ty: Some(ty),
            optional: false,
            default: None,
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

/// Object literal entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    /// `key: value`, printed as shorthand when the value is the same identifier.
    Prop(String, TsExpr),
    Spread(TsExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Static(String),
    Dynamic(TsExpr),
}

/// Expression subset emitted into callable bodies and module headers.
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    Ident(String),
    Literal(TsLiteral),
    /// `object.prop`
    Member(Box<TsExpr>, String),
    Call {
        callee: Box<TsExpr>,
        type_args: Vec<TsType>,
        args: Vec<TsExpr>,
    },
    Object(Vec<ObjectEntry>),
    Template(Vec<TemplatePart>),
    /// `left && right`
    And(Box<TsExpr>, Box<TsExpr>),
    Arrow {
        params: Vec<TsParam>,
        body: Box<TsExpr>,
    },
}

impl TsExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TsExpr::Ident(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        TsExpr::Literal(TsLiteral::String(value.into()))
    }

    /// `namespace.name`
    pub fn path(namespace: &str, name: &str) -> Self {
        TsExpr::Member(Box::new(TsExpr::ident(namespace)), name.to_string())
    }

    pub fn call(callee: TsExpr, args: Vec<TsExpr>) -> Self {
        TsExpr::Call {
            callee: Box::new(callee),
            type_args: Vec::new(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: TsLiteral,
}

/// `export function name(params) { return body; }`
#[derive(Debug, Clone, PartialEq)]
pub struct TsFunction {
    pub name: String,
    pub doc: Option<String>,
    pub params: Vec<TsParam>,
    pub body: TsExpr,
}

/// Top-level exported declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    TypeAlias { name: String, ty: TsType },
    Enum { name: String, members: Vec<EnumMember> },
    Function(TsFunction),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::TypeAlias { name, .. } | Declaration::Enum { name, .. } => name,
            Declaration::Function(f) => &f.name,
        }
    }
}
