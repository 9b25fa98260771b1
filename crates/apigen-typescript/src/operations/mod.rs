//! Operation synthesizer: one exported function per path operation.

pub mod content;
pub mod params;
pub mod query;

use std::borrow::Cow;

use indexmap::IndexMap;

use apigen_core::error::GenerateError;
use apigen_core::parse::operation::{HttpMethod, Operation, PathItem};
use apigen_core::parse::parameter::{Parameter, ParameterLocation};
use apigen_core::parse::body::Response;
use apigen_core::parse::schema::SchemaOrRef;
use apigen_core::transform::name_normalizer::{camel_case, ref_basename, route_name};

use crate::ast::{
    BindingElement, Keyword, ObjectEntry, ParamPattern, TemplatePart, TsExpr, TsFunction, TsLiteral,
    TsParam, TsProp, TsType,
};
use crate::compiler::{OnlyMode, SchemaCompiler};
use crate::identifier::{is_valid_identifier, to_identifier};

use content::{body_format, classify_responses, schema_from_content};
use params::{argument_names, at_location, merge_parameters, support_deep_objects};
use query::QueryFormatter;

/// Runtime instance created in the module header.
pub const RUNTIME: &str = "runtime";
/// Namespace the runtime library is imported under.
pub const RUNTIME_NAMESPACE: &str = "Runtime";
/// Namespace the query-string helpers are imported under.
pub const QS_NAMESPACE: &str = "QS";

const OPTS: &str = "opts";

/// Turns path operations into exported functions, compiling every schema it
/// meets through the shared [`SchemaCompiler`].
pub struct OperationSynthesizer<'a> {
    compiler: SchemaCompiler<'a>,
    upgraded: bool,
}

impl<'a> OperationSynthesizer<'a> {
    /// `upgraded` marks documents converted from Swagger 2.0, which enables
    /// bracketed deep-object parameter folding.
    pub fn new(compiler: SchemaCompiler<'a>, upgraded: bool) -> Self {
        Self { compiler, upgraded }
    }

    /// Build the function for one operation, or `None` when tag filtering
    /// drops it. Skipped operations do not reserve a name.
    pub fn synthesize(
        &mut self,
        path: &str,
        item: &PathItem,
        method: HttpMethod,
        operation: &Operation,
    ) -> Result<Option<TsFunction>, GenerateError> {
        if self.compiler.options().skips(&operation.tags) {
            log::debug!("skipping {} {path} (tags {:?})", method.as_str(), operation.tags);
            return Ok(None);
        }

        let base_name = operation
            .operation_id
            .as_deref()
            .and_then(operation_identifier)
            .unwrap_or_else(|| to_identifier(&route_name(method.key(), path), false, OnlyMode::None));
        let name = self.compiler.context().operation_name(base_name);

        let resolver = self.compiler.resolver();
        let path_params = resolver.resolve_array(Some(item.parameters.as_slice()))?;
        let operation_params = resolver.resolve_array(Some(operation.parameters.as_slice()))?;
        let mut params = merge_parameters(
            path_params.into_iter().map(Cow::into_owned).collect(),
            operation_params.into_iter().map(Cow::into_owned).collect(),
        );
        if self.upgraded {
            params = support_deep_objects(params);
        }
        let names = argument_names(&params);

        let mut fn_params = Vec::new();
        for (param, arg) in params.iter().zip(&names).filter(|(p, _)| p.required) {
            fn_params.push(TsParam::new(arg.as_str(), self.parameter_type(param)?));
        }

        let body = match &operation.request_body {
            Some(body) => Some(resolver.resolve(body)?),
            None => None,
        };
        let mut body_arg = None;
        if let Some(body) = &body {
            let schema = schema_from_content(&body.content);
            let ty = self
                .compiler
                .type_from_schema(Some(&schema), None, OnlyMode::WriteOnly)?;
            let arg = body_argument_name(&schema);
            fn_params.push(TsParam::new(arg.as_str(), ty).optional(!body.required));
            body_arg = Some(arg);
        }

        let mut bindings = Vec::new();
        let mut optional_props = Vec::new();
        for (param, arg) in params.iter().zip(&names).filter(|(p, _)| !p.required) {
            bindings.push(BindingElement::shorthand(arg.as_str()));
            optional_props.push(TsProp::optional(arg.as_str(), self.parameter_type(param)?));
        }
        if !bindings.is_empty() {
            fn_params.push(TsParam {
                pattern: ParamPattern::Destructure(bindings),
                ty: Some(TsType::object(optional_props)),
                optional: false,
                default: Some(TsExpr::Object(Vec::new())),
            });
        }
        fn_params.push(
            TsParam::new(OPTS, TsType::Ref(format!("{RUNTIME_NAMESPACE}.RequestOpts")))
                .optional(true),
        );

        let url = url_expression(path, &params, &names, query_expression(&params, &names));

        let mut init = vec![ObjectEntry::Spread(TsExpr::ident(OPTS))];
        if method != HttpMethod::Get {
            init.push(ObjectEntry::Prop(
                "method".to_string(),
                TsExpr::string(method.as_str()),
            ));
        }
        if let Some(arg) = &body_arg {
            init.push(ObjectEntry::Prop("body".to_string(), TsExpr::ident(arg.as_str())));
        }
        let headers: Vec<ObjectEntry> = at_location(&params, &names, ParameterLocation::Header)
            .map(|(param, arg)| ObjectEntry::Prop(param.name.clone(), TsExpr::ident(arg)))
            .collect();
        if !headers.is_empty() {
            let inherited = TsExpr::And(
                Box::new(TsExpr::ident(OPTS)),
                Box::new(TsExpr::path(OPTS, "headers")),
            );
            let mut entries = vec![ObjectEntry::Spread(inherited)];
            entries.extend(headers);
            init.push(ObjectEntry::Prop("headers".to_string(), TsExpr::Object(entries)));
        }
        let mut init = TsExpr::Object(init);
        if let Some(format) = body.as_ref().and_then(|b| body_format(&b.content)) {
            init = TsExpr::call(TsExpr::path(RUNTIME, format.as_str()), vec![init]);
        }

        let responses: Vec<(&str, Cow<'_, Response>)> = match &operation.responses {
            Some(responses) => responses
                .iter()
                .map(|(code, response)| {
                    resolver
                        .resolve(response)
                        .map(|response| (code.as_str(), response))
                })
                .collect::<Result<_, _>>()?,
            None => Vec::new(),
        };
        let content_types: Vec<Vec<&str>> = responses
            .iter()
            .map(|(_, response)| response.content.keys().map(String::as_str).collect())
            .collect();
        let kind = classify_responses(&content_types);
        let type_args = if kind.is_typed() {
            vec![self.responses_type(&responses)?]
        } else {
            Vec::new()
        };

        let mut call = TsExpr::Call {
            callee: Box::new(TsExpr::path(RUNTIME, kind.fetch_fn())),
            type_args,
            args: vec![url, init],
        };
        if self.compiler.options().optimistic {
            call = TsExpr::call(TsExpr::path(RUNTIME, "ok"), vec![call]);
        }

        let mut doc = operation
            .summary
            .clone()
            .or_else(|| operation.description.clone());
        if operation.deprecated == Some(true) {
            doc = Some(match doc {
                Some(text) => format!("{text}\n@deprecated"),
                None => "@deprecated".to_string(),
            });
        }

        log::debug!("operation {name} for {} {path}", method.as_str());
        Ok(Some(TsFunction {
            name,
            doc,
            params: fn_params,
            body: call,
        }))
    }

    /// Type of a parameter, from `content` when it has one.
    fn parameter_type(&mut self, param: &Parameter) -> Result<TsType, GenerateError> {
        if param.has_content() {
            let schema = schema_from_content(&param.content);
            return self
                .compiler
                .type_from_schema(Some(&schema), None, OnlyMode::WriteOnly);
        }
        self.compiler
            .type_from_schema(param.schema.as_ref(), None, OnlyMode::WriteOnly)
    }

    /// `{ status: 200; data: Pet; } | { status: number; data: Error; }`
    fn responses_type(&mut self, responses: &[(&str, Cow<'_, Response>)]) -> Result<TsType, GenerateError> {
        let mut members = Vec::with_capacity(responses.len());
        for (code, response) in responses {
            let status = match code.parse::<u16>() {
                Ok(code) => TsType::Literal(TsLiteral::Number(code.into())),
                Err(_) => TsType::Keyword(Keyword::Number),
            };
            let mut props = vec![TsProp::required("status", status)];
            if response.has_content() {
                let schema = schema_from_content(&response.content);
                let data = self
                    .compiler
                    .type_from_schema(Some(&schema), None, OnlyMode::ReadOnly)?;
                props.push(TsProp::required("data", data));
            }
            members.push(TsType::object(props));
        }
        Ok(TsType::union(members))
    }
}

/// Camel-cased `operationId`, if it is made of word characters and spaces
/// and yields a legal identifier.
fn operation_identifier(id: &str) -> Option<String> {
    let plain = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace());
    if !plain {
        return None;
    }
    let name = camel_case(id);
    is_valid_identifier(&name).then_some(name)
}

/// Body argument named after the referenced schema, else `body`.
fn body_argument_name(schema: &SchemaOrRef) -> String {
    let base = schema.ref_path().map(ref_basename).unwrap_or("body");
    to_identifier(base, false, OnlyMode::None)
}

/// `QS.query(QS.form({ a, b }), QS.deep({ c }))`, grouping query parameters
/// by formatter in first-seen order.
fn query_expression(params: &[Parameter], names: &[String]) -> Option<TsExpr> {
    let mut groups: IndexMap<QueryFormatter, Vec<ObjectEntry>> = IndexMap::new();
    for (param, arg) in at_location(params, names, ParameterLocation::Query) {
        groups
            .entry(QueryFormatter::for_parameter(param))
            .or_default()
            .push(ObjectEntry::Prop(param.name.clone(), TsExpr::ident(arg)));
    }
    if groups.is_empty() {
        return None;
    }
    let encoded = groups
        .into_iter()
        .map(|(formatter, entries)| {
            TsExpr::call(
                TsExpr::path(QS_NAMESPACE, formatter.as_str()),
                vec![TsExpr::Object(entries)],
            )
        })
        .collect();
    Some(TsExpr::call(TsExpr::path(QS_NAMESPACE, "query"), encoded))
}

/// Template literal for the request path with `{name}` segments encoded and
/// the query string appended.
fn url_expression(
    path: &str,
    params: &[Parameter],
    names: &[String],
    query: Option<TsExpr>,
) -> TsExpr {
    let mut parts = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(len) = rest[open + 1..].find('}') else {
            break;
        };
        let name = &rest[open + 1..open + 1 + len];
        if open > 0 {
            parts.push(TemplatePart::Static(rest[..open].to_string()));
        }
        let arg = at_location(params, names, ParameterLocation::Path)
            .find(|(param, _)| param.name == name)
            .map(|(_, arg)| arg.to_string())
            .unwrap_or_else(|| to_identifier(name, false, OnlyMode::None));
        parts.push(TemplatePart::Dynamic(TsExpr::call(
            TsExpr::ident("encodeURIComponent"),
            vec![TsExpr::ident(arg)],
        )));
        rest = &rest[open + len + 2..];
    }
    if !rest.is_empty() {
        parts.push(TemplatePart::Static(rest.to_string()));
    }
    if let Some(query) = query {
        parts.push(TemplatePart::Dynamic(query));
    }
    TsExpr::Template(parts)
}
