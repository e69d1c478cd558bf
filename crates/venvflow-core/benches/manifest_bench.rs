use criterion::{black_box, criterion_group, criterion_main, Criterion};
use venvflow_core::{ExternalManifest, ToolConfig};

fn bench_manifest_parse(c: &mut Criterion) {
    let pyproject = r#"
[build-system]
requires = ["setuptools>=61", "wheel"]
build-backend = "setuptools.build_meta"

[project]
name = "bench-demo"
version = "0.1.0"
dependencies = ["requests>=2.31", "lxml>=5", "pydantic>=2"]

[project.optional-dependencies]
test = ["pytest>=8", "pytest-cov"]
docs = ["sphinx"]
"#;

    c.bench_function("parse_manifest", |b| {
        b.iter(|| {
            let manifest = ExternalManifest::parse(black_box(pyproject)).unwrap();
            black_box(manifest.test_requirements());
        })
    });
}

fn bench_config_parse(c: &mut Criterion) {
    let toml_text = r#"
[python]
interpreter = "python3.12"

[index]
trusted_hosts = ["mirror.internal", "pypi.org"]

[test]
runner = "pytest"
default_entries = ["src/test/py"]
"#;

    c.bench_function("parse_tool_config", |b| {
        b.iter(|| {
            let _cfg: ToolConfig = toml::from_str(black_box(toml_text)).unwrap();
        })
    });
}

criterion_group!(benches, bench_manifest_parse, bench_config_parse);
criterion_main!(benches);
