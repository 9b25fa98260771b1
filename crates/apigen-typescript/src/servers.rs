//! `defaults.baseUrl` and the `servers` object of the module header.

use serde::Serialize;
use serde_json::Value;

use apigen_core::parse::document::{Server, ServerVariable};
use apigen_core::transform::name_normalizer::camel_case;

use crate::ast::{
    BindingElement, Keyword, ParamPattern, TemplatePart, TsExpr, TsLiteral, TsParam, TsProp, TsType,
};
use crate::compiler::{OnlyMode, literal_type};
use crate::identifier::{property_key, to_identifier};
use crate::printer::expr_to_ts;

/// One rendered entry of the `servers` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerEntry {
    pub key: String,
    pub value: String,
}

/// URL of the first server with its variables set to their defaults, or `/`.
pub fn default_base_url(servers: &[Server]) -> String {
    servers
        .first()
        .map(Server::default_url)
        .unwrap_or_else(|| "/".to_string())
}

/// Entries keyed by camel-cased description, else `server1`, `server2`, ...
pub fn server_entries(servers: &[Server]) -> Vec<ServerEntry> {
    servers
        .iter()
        .enumerate()
        .map(|(index, server)| {
            let key = match &server.description {
                Some(description) => camel_case(description),
                None => format!("server{}", index + 1),
            };
            ServerEntry {
                key: property_key(&key),
                value: expr_to_ts(&server_expression(server)),
            }
        })
        .collect()
}

/// A string literal, or an arrow function over the server's variables.
fn server_expression(server: &Server) -> TsExpr {
    if server.variables.is_empty() {
        return TsExpr::string(server.url.as_str());
    }
    let mut bindings = Vec::with_capacity(server.variables.len());
    let mut props = Vec::with_capacity(server.variables.len());
    for (name, variable) in &server.variables {
        bindings.push(BindingElement {
            key: name.clone(),
            name: to_identifier(name, false, OnlyMode::None),
            default: default_expression(&variable.default),
        });
        props.push(TsProp::required(name.as_str(), variable_type(variable)));
    }
    TsExpr::Arrow {
        params: vec![TsParam {
            pattern: ParamPattern::Destructure(bindings),
            ty: Some(TsType::object(props)),
            optional: false,
            default: None,
        }],
        body: Box::new(url_template(server)),
    }
}

/// `` `${scheme}://${host}/v1` `` with each `{name}` bound to its variable.
fn url_template(server: &Server) -> TsExpr {
    let mut parts = Vec::new();
    let mut rest = server.url.as_str();
    while let Some(open) = rest.find('{') {
        let Some(len) = rest[open + 1..].find('}') else {
            break;
        };
        let name = &rest[open + 1..open + 1 + len];
        if open > 0 {
            parts.push(TemplatePart::Static(rest[..open].to_string()));
        }
        if server.variables.contains_key(name) {
            parts.push(TemplatePart::Dynamic(TsExpr::ident(to_identifier(
                name,
                false,
                OnlyMode::None,
            ))));
        } else {
            parts.push(TemplatePart::Static(rest[open..open + len + 2].to_string()));
        }
        rest = &rest[open + len + 2..];
    }
    if !rest.is_empty() {
        parts.push(TemplatePart::Static(rest.to_string()));
    }
    TsExpr::Template(parts)
}

/// Union of the allowed values, else any primitive.
fn variable_type(variable: &ServerVariable) -> TsType {
    let literals: Vec<TsType> = variable
        .enum_values
        .iter()
        .filter_map(|value| literal_type(value).ok())
        .collect();
    if literals.is_empty() {
        TsType::Union(vec![
            TsType::Keyword(Keyword::String),
            TsType::Keyword(Keyword::Number),
            TsType::Keyword(Keyword::Boolean),
        ])
    } else {
        TsType::union(literals)
    }
}

fn default_expression(value: &Value) -> Option<TsExpr> {
    match value {
        Value::String(s) => Some(TsExpr::string(s.as_str())),
        Value::Number(n) => Some(TsExpr::Literal(TsLiteral::Number(n.clone()))),
        Value::Bool(b) => Some(TsExpr::Literal(TsLiteral::Bool(*b))),
        _ => None,
    }
}
