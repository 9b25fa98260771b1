use minijinja::{Environment, context};

use apigen_core::config::ApigenConfig;
use apigen_core::error::GenerateError;
use apigen_core::parse::ref_resolve::RefResolver;
use apigen_core::parse::OpenApiSpec;
use apigen_core::transform::preprocess_components;
use apigen_core::{CodeGenerator, GeneratedFile};

use crate::ast::{Declaration, TsLiteral};
use crate::compiler::SchemaCompiler;
use crate::context::GenerationContext;
use crate::operations::OperationSynthesizer;
use crate::printer::{declaration_to_ts, escape_jsdoc, literal_to_ts};
use crate::servers::{default_base_url, server_entries};

/// TypeScript client generator: one module with types and one function per
/// operation.
pub struct ApiGenerator;

impl CodeGenerator for ApiGenerator {
    type Config = ApigenConfig;
    type Error = GenerateError;

    fn generate(
        &self,
        spec: &OpenApiSpec,
        config: &ApigenConfig,
    ) -> Result<Vec<GeneratedFile>, GenerateError> {
        Ok(vec![GeneratedFile {
            path: config.output.clone(),
            content: generate_module(spec, config)?,
        }])
    }
}

/// Render the module text for `spec`.
///
/// Every call works on its own copy of the document and a fresh
/// [`GenerationContext`], so repeated runs produce identical output.
pub fn generate_module(spec: &OpenApiSpec, config: &ApigenConfig) -> Result<String, GenerateError> {
    log::info!("generating client for {} {}", spec.info.title, spec.info.version);

    let mut spec = spec.clone();
    let discriminating = preprocess_components(&mut spec);
    let resolver = RefResolver::new(&spec)?;
    let mut ctx = GenerationContext::new(discriminating);

    let mut functions = Vec::new();
    let compiler = SchemaCompiler::new(&resolver, &config.options, &mut ctx);
    let mut synthesizer = OperationSynthesizer::new(compiler, config.upgraded);
    for (path, item) in &spec.paths {
        for (method, operation) in item.operations() {
            if let Some(func) = synthesizer.synthesize(path, item, method, operation)? {
                functions.push(Declaration::Function(func));
            }
        }
    }
    drop(synthesizer);

    let declarations: Vec<String> = ctx
        .aliases
        .iter()
        .chain(&functions)
        .chain(&ctx.enum_decls)
        .map(declaration_to_ts)
        .collect();
    log::info!(
        "generated {} operations, {} type aliases, {} enums",
        functions.len(),
        ctx.aliases.len(),
        ctx.enum_decls.len()
    );

    render_module(&spec, config, &declarations)
}

fn render_module(
    spec: &OpenApiSpec,
    config: &ApigenConfig,
    declarations: &[String],
) -> Result<String, GenerateError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_filter("escape_jsdoc", |value: String| escape_jsdoc(&value));
    env.add_template("api.ts.j2", include_str!("../templates/api.ts.j2"))
        .map_err(render_error)?;
    let tmpl = env.get_template("api.ts.j2").map_err(render_error)?;

    let string = |value: String| literal_to_ts(&TsLiteral::String(value));
    tmpl.render(context! {
        title => spec.info.title.clone(),
        version => spec.info.version.clone(),
        runtime_module => string(config.runtime_module.clone()),
        query_module => string(format!("{}/query", config.runtime_module)),
        base_url => string(default_base_url(&spec.servers)),
        servers => server_entries(&spec.servers),
        declarations => declarations,
    })
    .map_err(render_error)
}

fn render_error(err: minijinja::Error) -> GenerateError {
    GenerateError::Render(err.to_string())
}
