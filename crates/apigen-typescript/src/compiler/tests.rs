use apigen_core::config::GenerateOptions;
use apigen_core::error::GenerateError;
use apigen_core::parse::from_yaml;
use apigen_core::parse::ref_resolve::RefResolver;
use apigen_core::parse::schema::SchemaOrRef;
use apigen_core::transform::preprocess_components;

use super::{OnlyMode, SchemaCompiler};
use crate::context::GenerationContext;
use crate::printer::{declaration_to_ts, type_to_ts};

const HEADER: &str = r#"
openapi: 3.0.3
info:
  title: Compiler
  version: "1.0"
paths: {}
"#;

struct Compiled {
    types: Vec<String>,
    declarations: Vec<String>,
}

impl Compiled {
    fn declaration(&self, name: &str) -> &str {
        let type_prefix = format!("export type {name} = ");
        let enum_prefix = format!("export enum {name} {{");
        self.declarations
            .iter()
            .find(|d| d.starts_with(&type_prefix) || d.starts_with(&enum_prefix))
            .unwrap_or_else(|| panic!("no declaration {name} in {:#?}", self.declarations))
    }
}

/// Compile references to the named component schemas, in order.
fn compile(
    components: &str,
    options: GenerateOptions,
    refs: &[(&str, OnlyMode)],
) -> Result<Compiled, GenerateError> {
    let mut spec = from_yaml(&format!("{HEADER}{components}")).unwrap();
    let discriminating = preprocess_components(&mut spec);
    let resolver = RefResolver::new(&spec).unwrap();
    let mut ctx = GenerationContext::new(discriminating);
    let mut compiler = SchemaCompiler::new(&resolver, &options, &mut ctx);
    let mut types = Vec::new();
    for (name, mode) in refs {
        let schema = SchemaOrRef::reference(format!("#/components/schemas/{name}"));
        let ty = compiler.type_from_schema(Some(&schema), None, *mode)?;
        types.push(type_to_ts(&ty));
    }
    let declarations = ctx
        .aliases
        .iter()
        .chain(&ctx.enum_decls)
        .map(declaration_to_ts)
        .collect();
    Ok(Compiled {
        types,
        declarations,
    })
}

/// Compile a standalone inline schema against an empty document.
fn inline(schema: &str, options: GenerateOptions) -> String {
    let spec = from_yaml(HEADER).unwrap();
    let resolver = RefResolver::new(&spec).unwrap();
    let mut ctx = GenerationContext::default();
    let mut compiler = SchemaCompiler::new(&resolver, &options, &mut ctx);
    let schema: SchemaOrRef = serde_yaml_ng::from_str(schema).unwrap();
    type_to_ts(
        &compiler
            .type_from_schema(Some(&schema), None, OnlyMode::None)
            .unwrap(),
    )
}

fn enum_options() -> GenerateOptions {
    GenerateOptions {
        use_enum_type: true,
        ..Default::default()
    }
}

#[test]
fn test_primitive_shapes() {
    let options = GenerateOptions::default;
    assert_eq!(inline("{}", options()), "any");
    assert_eq!(inline("type: integer", options()), "number");
    assert_eq!(inline("{ type: string, nullable: true }", options()), "string | null");
    assert_eq!(inline("type: [string, \"null\"]", options()), "string | null");
    assert_eq!(inline("{ type: string, format: binary }", options()), "Blob");
    assert_eq!(inline("const: fixed", options()), "\"fixed\"");
    assert_eq!(inline("{ type: string, enum: [a, b] }", options()), "\"a\" | \"b\"");
    assert_eq!(
        inline("prefixItems: [{ type: number }, { type: string }]", options()),
        "[number, string]"
    );
    assert_eq!(
        inline("{ type: array, items: { type: string, enum: [x, y] } }", options()),
        "(\"x\" | \"y\")[]"
    );
    assert_eq!(
        inline("anyOf: [{ type: string }, { type: number }]", options()),
        "string | number"
    );
}

#[test]
fn test_object_shapes() {
    let options = GenerateOptions::default;
    assert_eq!(
        inline(
            "{ type: object, required: [id], properties: { id: { type: integer }, x-tag: { type: string } } }",
            options()
        ),
        "{ id: number; \"x-tag\"?: string; }"
    );
    assert_eq!(
        inline("{ type: object, additionalProperties: { type: integer } }", options()),
        "{ [key: string]: number; }"
    );
    assert_eq!(
        inline("{ type: object, additionalProperties: true }", options()),
        "{ [key: string]: any; }"
    );
    assert_eq!(
        inline("{ type: object, additionalProperties: false }", options()),
        "object"
    );
    let union_undefined = GenerateOptions {
        union_undefined: true,
        ..Default::default()
    };
    assert_eq!(
        inline("{ properties: { name: { type: string } } }", union_undefined),
        "{ name?: string | undefined; }"
    );
}

#[test]
fn test_self_reference_is_finite() {
    let compiled = compile(
        r##"
components:
  schemas:
    FolderDto:
      type: object
      properties:
        name: { type: string }
        parent: { $ref: "#/components/schemas/FolderDto" }
        children:
          type: array
          items: { $ref: "#/components/schemas/FolderDto" }
"##,
        GenerateOptions::default(),
        &[("FolderDto", OnlyMode::None), ("FolderDto", OnlyMode::ReadOnly)],
    )
    .unwrap();
    assert_eq!(compiled.types, vec!["FolderDto", "FolderDto"]);
    assert_eq!(
        compiled.declarations,
        vec!["export type FolderDto = { name?: string; parent?: FolderDto; children?: FolderDto[]; };"]
    );
}

#[test]
fn test_enums_with_same_values_share_a_declaration() {
    let compiled = compile(
        r#"
components:
  schemas:
    Pet:
      type: object
      properties:
        status: { type: string, enum: [available, sold] }
    Order:
      type: object
      properties:
        status: { type: string, enum: [available, sold] }
    Shipment:
      type: object
      properties:
        status: { type: string, enum: [pending, shipped] }
"#,
        enum_options(),
        &[
            ("Pet", OnlyMode::None),
            ("Order", OnlyMode::None),
            ("Shipment", OnlyMode::None),
        ],
    )
    .unwrap();
    assert_eq!(
        compiled.declaration("Pet"),
        "export type Pet = { status?: Status; };"
    );
    assert_eq!(
        compiled.declaration("Order"),
        "export type Order = { status?: Status; };"
    );
    assert_eq!(
        compiled.declaration("Shipment"),
        "export type Shipment = { status?: Status2; };"
    );
    assert_eq!(
        compiled.declaration("Status"),
        "export enum Status {\n    Available = \"available\",\n    Sold = \"sold\"\n}"
    );
    assert_eq!(
        compiled.declaration("Status2"),
        "export enum Status2 {\n    Pending = \"pending\",\n    Shipped = \"shipped\"\n}"
    );
    assert_eq!(compiled.declarations.len(), 5);
}

#[test]
fn test_type_and_enum_names_do_not_clobber() {
    let compiled = compile(
        r##"
components:
  schemas:
    Category:
      type: object
      properties:
        name: { type: string }
    Item:
      type: object
      properties:
        group: { $ref: "#/components/schemas/Category" }
        category: { type: string, enum: [food, toys] }
"##,
        enum_options(),
        &[("Item", OnlyMode::None)],
    )
    .unwrap();
    assert_eq!(
        compiled.declaration("Item"),
        "export type Item = { group?: Category; category?: Category2; };"
    );
    assert_eq!(
        compiled.declaration("Category"),
        "export type Category = { name?: string; };"
    );
    assert!(compiled.declaration("Category2").starts_with("export enum Category2 {"));
}

#[test]
fn test_renamed_enum_is_reused_by_later_schemas() {
    let compiled = compile(
        r##"
components:
  schemas:
    Category:
      type: object
      properties:
        name: { type: string }
    Item:
      type: object
      properties:
        group: { $ref: "#/components/schemas/Category" }
        category: { type: string, enum: [food, toys] }
    Other:
      type: object
      properties:
        category: { type: string, enum: [food, toys] }
"##,
        enum_options(),
        &[("Item", OnlyMode::None), ("Other", OnlyMode::None)],
    )
    .unwrap();
    assert_eq!(
        compiled.declaration("Item"),
        "export type Item = { group?: Category; category?: Category2; };"
    );
    assert_eq!(
        compiled.declaration("Other"),
        "export type Other = { category?: Category2; };"
    );
    let enums: Vec<_> = compiled
        .declarations
        .iter()
        .filter(|d| d.starts_with("export enum "))
        .collect();
    assert_eq!(enums.len(), 1, "{enums:#?}");
}

#[test]
fn test_enum_matching_the_latest_variant_is_reused() {
    let compiled = compile(
        r#"
components:
  schemas:
    First:
      type: object
      properties:
        status: { type: string, enum: [a, b] }
    Second:
      type: object
      properties:
        status: { type: string, enum: [c] }
    Third:
      type: object
      properties:
        status: { type: string, enum: [c] }
"#,
        enum_options(),
        &[
            ("First", OnlyMode::None),
            ("Second", OnlyMode::None),
            ("Third", OnlyMode::None),
        ],
    )
    .unwrap();
    assert_eq!(
        compiled.declaration("Second"),
        "export type Second = { status?: Status2; };"
    );
    assert_eq!(
        compiled.declaration("Third"),
        "export type Third = { status?: Status2; };"
    );
    assert_eq!(
        compiled.declaration("Status2"),
        "export enum Status2 {\n    C = \"c\"\n}"
    );
    assert_eq!(
        compiled
            .declarations
            .iter()
            .filter(|d| d.starts_with("export enum "))
            .count(),
        2
    );
}

#[test]
fn test_referenced_enum_component_is_declared_once() {
    let compiled = compile(
        r##"
components:
  schemas:
    Size:
      type: integer
      enum: [1, 2]
      x-enumNames: [Small, Large]
    Box:
      type: object
      properties:
        size: { $ref: "#/components/schemas/Size" }
"##,
        enum_options(),
        &[("Box", OnlyMode::None)],
    )
    .unwrap();
    assert_eq!(
        compiled.declarations,
        vec![
            "export type Box = { size?: Size; };",
            "export enum Size {\n    Small = 1,\n    Large = 2\n}",
        ]
    );
}

#[test]
fn test_enum_name_count_mismatch() {
    let err = compile(
        r#"
components:
  schemas:
    Size:
      type: string
      enum: [s, m, l]
      x-enum-varnames: [Small]
"#,
        enum_options(),
        &[("Size", OnlyMode::None)],
    )
    .err()
    .unwrap();
    assert!(
        matches!(err, GenerateError::EnumNames { expected: 3, found: 1, .. }),
        "{err}"
    );
}

#[test]
fn test_boolean_value_in_named_enum_is_rejected() {
    let err = compile(
        r#"
components:
  schemas:
    Flag:
      type: string
      enum: [open, true]
"#,
        enum_options(),
        &[("Flag", OnlyMode::None)],
    )
    .err()
    .unwrap();
    assert!(matches!(err, GenerateError::UnexpectedEnumValue(_)), "{err}");
}

const EXAMPLE_SCHEMA: &str = r##"
components:
  schemas:
    ExampleSchema:
      type: object
      required: [always_present]
      properties:
        always_present: { type: string }
        read_only_prop: { type: string, readOnly: true }
        write_only_prop: { type: string, writeOnly: true }
    ExampleParent:
      type: object
      properties:
        child: { $ref: "#/components/schemas/ExampleSchema" }
"##;

#[test]
fn test_read_write_variants() {
    let compiled = compile(
        EXAMPLE_SCHEMA,
        GenerateOptions::default(),
        &[
            ("ExampleSchema", OnlyMode::None),
            ("ExampleSchema", OnlyMode::ReadOnly),
            ("ExampleSchema", OnlyMode::WriteOnly),
        ],
    )
    .unwrap();
    assert_eq!(
        compiled.types,
        vec!["ExampleSchema", "ExampleSchemaRead", "ExampleSchemaWrite"]
    );
    assert_eq!(
        compiled.declarations,
        vec![
            "export type ExampleSchema = { always_present: string; };",
            "export type ExampleSchemaRead = { always_present: string; read_only_prop?: string; };",
            "export type ExampleSchemaWrite = { always_present: string; write_only_prop?: string; };",
        ]
    );
}

#[test]
fn test_variants_propagate_to_referencing_schemas() {
    let compiled = compile(
        EXAMPLE_SCHEMA,
        GenerateOptions::default(),
        &[("ExampleParent", OnlyMode::ReadOnly)],
    )
    .unwrap();
    assert_eq!(compiled.types, vec!["ExampleParentRead"]);
    assert_eq!(
        compiled.declaration("ExampleParent"),
        "export type ExampleParent = { child?: ExampleSchema; };"
    );
    assert_eq!(
        compiled.declaration("ExampleParentRead"),
        "export type ExampleParentRead = { child?: ExampleSchemaRead; };"
    );
    assert_eq!(
        compiled.declaration("ExampleParentWrite"),
        "export type ExampleParentWrite = { child?: ExampleSchemaWrite; };"
    );
}

#[test]
fn test_read_only_flags_survive_reference_cycles() {
    let compiled = compile(
        r##"
components:
  schemas:
    A:
      type: object
      properties:
        b: { $ref: "#/components/schemas/B" }
    B:
      type: object
      properties:
        a: { $ref: "#/components/schemas/A" }
        id: { type: string, readOnly: true }
    C:
      type: object
      properties:
        a: { $ref: "#/components/schemas/A" }
"##,
        GenerateOptions::default(),
        &[("A", OnlyMode::None), ("C", OnlyMode::ReadOnly)],
    )
    .unwrap();
    assert_eq!(compiled.types, vec!["A", "CRead"]);
    assert_eq!(
        compiled.declaration("CRead"),
        "export type CRead = { a?: ARead; };"
    );
}

#[test]
fn test_merge_read_write_only_keeps_one_declaration() {
    let options = GenerateOptions {
        merge_read_write_only: true,
        ..Default::default()
    };
    let compiled = compile(
        EXAMPLE_SCHEMA,
        options,
        &[
            ("ExampleSchema", OnlyMode::ReadOnly),
            ("ExampleSchema", OnlyMode::WriteOnly),
        ],
    )
    .unwrap();
    assert_eq!(compiled.types, vec!["ExampleSchema", "ExampleSchema"]);
    assert_eq!(
        compiled.declarations,
        vec!["export type ExampleSchema = { always_present: string; read_only_prop?: string; write_only_prop?: string; };"]
    );
}

#[test]
fn test_tagged_one_of_union() {
    let compiled = compile(
        r##"
components:
  schemas:
    Pet:
      oneOf:
        - $ref: "#/components/schemas/Dog"
        - $ref: "#/components/schemas/Cat"
        - $ref: "#/components/schemas/Lizard"
      discriminator:
        propertyName: petType
        mapping:
          kitty: "#/components/schemas/Cat"
    Dog:
      type: object
      properties:
        bark: { type: boolean }
    Cat:
      type: object
      properties:
        meow: { type: boolean }
    Lizard:
      type: object
      properties:
        scales: { type: integer }
"##,
        GenerateOptions::default(),
        &[("Pet", OnlyMode::None)],
    )
    .unwrap();
    assert_eq!(
        compiled.declaration("Pet"),
        "export type Pet = { petType: \"kitty\"; } & Cat | { petType: \"Dog\"; } & Dog | { petType: \"Lizard\"; } & Lizard;"
    );
}

#[test]
fn test_inline_discriminated_variant_is_rejected() {
    let err = compile(
        r#"
components:
  schemas:
    Shape:
      oneOf:
        - type: object
          properties:
            radius: { type: number }
      discriminator:
        propertyName: kind
"#,
        GenerateOptions::default(),
        &[("Shape", OnlyMode::None)],
    )
    .err()
    .unwrap();
    assert!(matches!(err, GenerateError::DiscriminatorConfig(_)), "{err}");
}

#[test]
fn test_discriminator_without_property_name_is_rejected() {
    let err = compile(
        r##"
components:
  schemas:
    Shape:
      oneOf:
        - $ref: "#/components/schemas/Circle"
      discriminator:
        mapping:
          circle: "#/components/schemas/Circle"
    Circle:
      type: object
"##,
        GenerateOptions::default(),
        &[("Shape", OnlyMode::None)],
    )
    .err()
    .unwrap();
    assert!(matches!(err, GenerateError::DiscriminatorConfig(_)), "{err}");
}

#[test]
fn test_discriminating_base_and_subtypes() {
    let compiled = compile(
        r##"
components:
  schemas:
    Pet:
      type: object
      required: [petType]
      properties:
        petType: { type: string }
      discriminator:
        propertyName: petType
        mapping:
          dog: "#/components/schemas/Dog"
    Dog:
      allOf:
        - $ref: "#/components/schemas/Pet"
        - type: object
          properties:
            bark: { type: string }
    Cat:
      allOf:
        - $ref: "#/components/schemas/Pet"
        - type: object
          properties:
            meow: { type: string }
"##,
        GenerateOptions::default(),
        &[("Pet", OnlyMode::None), ("Cat", OnlyMode::None)],
    )
    .unwrap();
    assert_eq!(compiled.types, vec!["Pet", "Cat"]);
    assert_eq!(compiled.declaration("Pet"), "export type Pet = Dog | Cat;");
    assert_eq!(
        compiled.declaration("PetBase"),
        "export type PetBase = { petType: string; };"
    );
    assert_eq!(
        compiled.declaration("Dog"),
        "export type Dog = { petType: \"dog\"; } & PetBase & { bark?: string; };"
    );
    assert_eq!(
        compiled.declaration("Cat"),
        "export type Cat = { petType: \"Cat\"; } & PetBase & { meow?: string; };"
    );
}

#[test]
fn test_all_of_inherits_required_and_adds_own_properties() {
    let compiled = compile(
        r##"
components:
  schemas:
    Base:
      type: object
      properties:
        id: { type: string }
    Named:
      required: [name]
      allOf:
        - $ref: "#/components/schemas/Base"
        - type: object
          properties:
            name: { type: string }
      properties:
        extra: { type: number }
"##,
        GenerateOptions::default(),
        &[("Named", OnlyMode::None)],
    )
    .unwrap();
    assert_eq!(
        compiled.declaration("Named"),
        "export type Named = Base & { name: string; } & { extra?: number; };"
    );
}

#[test]
fn test_external_reference_is_fatal() {
    let err = compile(
        r#"
components:
  schemas:
    Remote:
      type: object
      properties:
        other: { $ref: "other.yaml#/Thing" }
"#,
        GenerateOptions::default(),
        &[("Remote", OnlyMode::None)],
    )
    .err()
    .unwrap();
    assert!(matches!(err, GenerateError::Resolve(_)), "{err}");
}
