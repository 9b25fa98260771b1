use crate::ast::{
    BindingElement, Declaration, EnumMember, Keyword, ObjectEntry, ParamPattern, TemplatePart,
    TsExpr, TsFunction, TsLiteral, TsParam, TsProp, TsType,
};
use crate::identifier::{is_valid_identifier, property_key};

const INDENT: &str = "    ";

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
pub(crate) fn escape_jsdoc(value: &str) -> String {
    value.replace("*/", "*\\/")
}

pub fn literal_to_ts(literal: &TsLiteral) -> String {
    match literal {
        TsLiteral::String(s) => serde_json::Value::String(s.clone()).to_string(),
        TsLiteral::Number(n) => n.to_string(),
        TsLiteral::Bool(b) => b.to_string(),
        TsLiteral::Null => "null".to_string(),
    }
}

fn keyword_to_ts(keyword: Keyword) -> &'static str {
    match keyword {
        Keyword::Any => "any",
        Keyword::String => "string",
        Keyword::Number => "number",
        Keyword::Boolean => "boolean",
        Keyword::Object => "object",
        Keyword::Null => "null",
        Keyword::Undefined => "undefined",
    }
}

/// Render a type expression on a single line.
pub fn type_to_ts(ty: &TsType) -> String {
    match ty {
        TsType::Keyword(k) => keyword_to_ts(*k).to_string(),
        TsType::Literal(lit) => literal_to_ts(lit),
        TsType::Ref(name) => name.clone(),
        TsType::Array(inner) => {
            let inner_ts = type_to_ts(inner);
            if matches!(**inner, TsType::Union(_) | TsType::Intersection(_)) {
                format!("({inner_ts})[]")
            } else {
                format!("{inner_ts}[]")
            }
        }
        TsType::Tuple(items) => {
            let items: Vec<String> = items.iter().map(type_to_ts).collect();
            format!("[{}]", items.join(", "))
        }
        TsType::Union(members) if members.is_empty() => "never".to_string(),
        TsType::Union(members) => members
            .iter()
            .map(type_to_ts)
            .collect::<Vec<_>>()
            .join(" | "),
        TsType::Intersection(members) if members.is_empty() => "unknown".to_string(),
        TsType::Intersection(members) => members
            .iter()
            .map(|m| {
                let s = type_to_ts(m);
                if matches!(m, TsType::Union(v) if v.len() > 1) {
                    format!("({s})")
                } else {
                    s
                }
            })
            .collect::<Vec<_>>()
            .join(" & "),
        TsType::Object { props, index } => {
            let mut members: Vec<String> = props.iter().map(prop_to_ts).collect();
            if let Some(index) = index {
                members.push(format!("[key: string]: {};", type_to_ts(index)));
            }
            if members.is_empty() {
                "{}".to_string()
            } else {
                format!("{{ {} }}", members.join(" "))
            }
        }
    }
}

fn prop_to_ts(prop: &TsProp) -> String {
    let opt = if prop.optional { "?" } else { "" };
    format!("{}{opt}: {};", property_key(&prop.name), type_to_ts(&prop.ty))
}

/// Render an expression on a single line.
pub fn expr_to_ts(expr: &TsExpr) -> String {
    match expr {
        TsExpr::Ident(name) => name.clone(),
        TsExpr::Literal(lit) => literal_to_ts(lit),
        TsExpr::Member(object, prop) => format!("{}.{prop}", expr_to_ts(object)),
        TsExpr::Call {
            callee,
            type_args,
            args,
        } => {
            let type_args = if type_args.is_empty() {
                String::new()
            } else {
                let tys: Vec<String> = type_args.iter().map(type_to_ts).collect();
                format!("<{}>", tys.join(", "))
            };
            let args: Vec<String> = args.iter().map(expr_to_ts).collect();
            format!("{}{type_args}({})", expr_to_ts(callee), args.join(", "))
        }
        TsExpr::Object(entries) if entries.is_empty() => "{}".to_string(),
        TsExpr::Object(entries) => {
            let parts: Vec<String> = entries.iter().map(entry_to_ts).collect();
            format!("{{ {} }}", parts.join(", "))
        }
        TsExpr::Template(parts) => template_to_ts(parts),
        TsExpr::And(left, right) => format!("{} && {}", expr_to_ts(left), expr_to_ts(right)),
        TsExpr::Arrow { params, body } => {
            format!("({}) => {}", params_to_ts(params), expr_to_ts(body))
        }
    }
}

fn entry_to_ts(entry: &ObjectEntry) -> String {
    match entry {
        ObjectEntry::Prop(key, TsExpr::Ident(value)) if key == value && is_valid_identifier(key) => {
            key.clone()
        }
        ObjectEntry::Prop(key, value) => format!("{}: {}", property_key(key), expr_to_ts(value)),
        ObjectEntry::Spread(value) => format!("...{}", expr_to_ts(value)),
    }
}

fn template_to_ts(parts: &[TemplatePart]) -> String {
    if parts.iter().all(|p| matches!(p, TemplatePart::Static(_))) {
        let text: String = parts
            .iter()
            .map(|p| match p {
                TemplatePart::Static(s) => s.as_str(),
                TemplatePart::Dynamic(_) => "",
            })
            .collect();
        return literal_to_ts(&TsLiteral::String(text));
    }
    let mut out = String::from("`");
    for part in parts {
        match part {
            TemplatePart::Static(s) => {
                out.push_str(&s.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${"))
            }
            TemplatePart::Dynamic(e) => {
                out.push_str("${");
                out.push_str(&expr_to_ts(e));
                out.push('}');
            }
        }
    }
    out.push('`');
    out
}

fn binding_to_ts(element: &BindingElement) -> String {
    let mut out = if element.key == element.name {
        element.name.clone()
    } else {
        format!("{}: {}", property_key(&element.key), element.name)
    };
    if let Some(default) = &element.default {
        out.push_str(" = ");
        out.push_str(&expr_to_ts(default));
    }
    out
}

fn param_to_ts(param: &TsParam) -> String {
    let mut out = match &param.pattern {
        ParamPattern::Ident(name) => name.clone(),
        ParamPattern::Destructure(elements) => {
            let parts: Vec<String> = elements.iter().map(binding_to_ts).collect();
            format!("{{ {} }}", parts.join(", "))
        }
    };
    if param.optional {
        out.push('?');
    }
    if let Some(ty) = &param.ty {
        out.push_str(": ");
        out.push_str(&type_to_ts(ty));
    }
    if let Some(default) = &param.default {
        out.push_str(" = ");
        out.push_str(&expr_to_ts(default));
    }
    out
}

fn params_to_ts(params: &[TsParam]) -> String {
    params.iter().map(param_to_ts).collect::<Vec<_>>().join(", ")
}

fn doc_to_ts(doc: &str) -> String {
    let mut out = String::from("/**\n");
    for line in doc.trim().lines() {
        let line = escape_jsdoc(line.trim_end());
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(&format!(" * {line}\n"));
        }
    }
    out.push_str(" */\n");
    out
}

fn enum_member_to_ts(member: &EnumMember) -> String {
    format!("{INDENT}{} = {}", member.name, literal_to_ts(&member.value))
}

fn function_to_ts(func: &TsFunction) -> String {
    let doc = func.doc.as_deref().map(doc_to_ts).unwrap_or_default();
    format!(
        "{doc}export function {}({}) {{\n{INDENT}return {};\n}}",
        func.name,
        params_to_ts(&func.params),
        expr_to_ts(&func.body)
    )
}

/// Render a top-level declaration.
pub fn declaration_to_ts(decl: &Declaration) -> String {
    match decl {
        Declaration::TypeAlias { name, ty } => format!("export type {name} = {};", type_to_ts(ty)),
        Declaration::Enum { name, members } => {
            let members: Vec<String> = members.iter().map(enum_member_to_ts).collect();
            format!("export enum {name} {{\n{}\n}}", members.join(",\n"))
        }
        Declaration::Function(func) => function_to_ts(func),
    }
}
