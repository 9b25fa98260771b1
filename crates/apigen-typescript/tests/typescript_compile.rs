use std::fs;
use std::process::Command;

use apigen_core::config::{ApigenConfig, GenerateOptions};
use apigen_core::{CodeGenerator, parse};
use apigen_typescript::ApiGenerator;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const POLYMORPHISM: &str = include_str!("fixtures/polymorphism.yaml");

/// Declarations of the runtime surface the generated module calls into.
const RUNTIME_DTS: &str = r#"export type RequestOpts = {
    baseUrl?: string;
    method?: string;
    headers?: Record<string, string | undefined>;
    body?: any;
    [key: string]: any;
};
export type ApiResponse = { status: number; data?: any };
export declare function runtime(defaults: RequestOpts): {
    fetchJson<T extends ApiResponse>(url: string, init?: RequestOpts): Promise<T>;
    fetchText(url: string, init?: RequestOpts): Promise<{ status: number; data: string }>;
    fetchBlob<T extends ApiResponse>(url: string, init?: RequestOpts): Promise<T>;
    json(init: RequestOpts): RequestOpts;
    form(init: RequestOpts): RequestOpts;
    multipart(init: RequestOpts): RequestOpts;
    ok<T extends ApiResponse>(promise: Promise<T>): Promise<any>;
};
"#;

const QUERY_DTS: &str = r#"type Params = Record<string, any>;
export declare function query(...parts: string[]): string;
export declare function form(params: Params): string;
export declare function deep(params: Params): string;
export declare function explode(params: Params): string;
export declare function space(params: Params): string;
export declare function pipe(params: Params): string;
export declare function json(params: Params): string;
"#;

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "strict": true,
    "noEmit": true,
    "target": "es2018",
    "module": "esnext",
    "moduleResolution": "node",
    "lib": ["es2018", "dom"],
    "baseUrl": ".",
    "paths": {
      "@apigen/runtime": ["./runtime/index.d.ts"],
      "@apigen/runtime/query": ["./runtime/query.d.ts"]
    }
  },
  "files": ["api.ts"]
}
"#;

fn compile_typescript(yaml: &str, options: GenerateOptions) {
    let spec = parse::from_yaml(yaml).unwrap();
    let config = ApigenConfig {
        output: "api.ts".to_string(),
        options,
        ..ApigenConfig::default()
    };
    let files = ApiGenerator.generate(&spec, &config).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    for file in &files {
        fs::write(dir.join(&file.path), &file.content).unwrap();
    }
    fs::create_dir_all(dir.join("runtime")).unwrap();
    fs::write(dir.join("runtime/index.d.ts"), RUNTIME_DTS).unwrap();
    fs::write(dir.join("runtime/query.d.ts"), QUERY_DTS).unwrap();
    fs::write(dir.join("tsconfig.json"), TSCONFIG).unwrap();

    let tsc = Command::new("npx")
        .args(["--yes", "-p", "typescript", "tsc", "-p", "."])
        .current_dir(dir)
        .output()
        .expect("failed to run tsc");
    if !tsc.status.success() {
        panic!(
            "tsc failed:\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&tsc.stdout),
            String::from_utf8_lossy(&tsc.stderr),
        );
    }
}

#[test]
#[ignore] // Requires Node.js with network access for npx
fn petstore_module_compiles() {
    compile_typescript(PETSTORE, GenerateOptions::default());
}

#[test]
#[ignore] // Requires Node.js with network access for npx
fn petstore_module_with_enums_compiles() {
    let options = GenerateOptions {
        use_enum_type: true,
        optimistic: true,
        ..Default::default()
    };
    compile_typescript(PETSTORE, options);
}

#[test]
#[ignore] // Requires Node.js with network access for npx
fn polymorphic_module_compiles() {
    compile_typescript(POLYMORPHISM, GenerateOptions::default());
}
