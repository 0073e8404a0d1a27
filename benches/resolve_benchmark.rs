//! Performance benchmarks for product tree resolution.
//!
//! Run with: cargo bench --bench resolve_benchmark
//!
//! Covers the two shapes real advisories take: wide trees (one vendor with
//! thousands of versions) and deep chains.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cvrf_tools::model::XmlValue;
use cvrf_tools::parsers::parse_document_str;
use cvrf_tools::tree::{ProductTree, ResolverConfig};
use std::hint::black_box;

fn leaf(index: usize) -> XmlValue {
    XmlValue::map([
        ("@ProductID", format!("CVRFPID-{index}").into()),
        ("#text", format!("Widget 1.{index}").into()),
    ])
}

/// One vendor, `products` version branches below it.
fn wide_tree(products: usize) -> XmlValue {
    let versions: Vec<XmlValue> = (0..products)
        .map(|i| {
            XmlValue::map([
                ("@Type", "Product Version".into()),
                ("@Name", format!("1.{i}").into()),
                ("FullProductName", leaf(i)),
            ])
        })
        .collect();
    XmlValue::map([(
        "Branch",
        XmlValue::map([
            ("@Type", "Vendor".into()),
            ("@Name", "Acme".into()),
            ("Branch", XmlValue::Seq(versions)),
        ]),
    )])
}

/// A single chain `depth` branches deep ending in one product.
fn deep_tree(depth: usize) -> XmlValue {
    let mut node = XmlValue::map([("@Name", "bottom".into()), ("FullProductName", leaf(0))]);
    for level in 1..depth {
        node = XmlValue::map([("@Name", format!("level{level}").into()), ("Branch", node)]);
    }
    XmlValue::map([("Branch", node)])
}

fn wide_xml(products: usize) -> String {
    let mut xml = String::from(r#"<cvrfdoc><ProductTree><Branch Type="Vendor" Name="Acme">"#);
    for i in 0..products {
        xml.push_str(&format!(
            r#"<Branch Type="Product Version" Name="1.{i}"><FullProductName ProductID="CVRFPID-{i}" CPE="cpe:/a:acme:widget:1.{i}">Widget 1.{i}</FullProductName></Branch>"#
        ));
    }
    xml.push_str("</Branch></ProductTree></cvrfdoc>");
    xml
}

fn bench_resolve_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_wide");
    for size in [100, 1_000, 10_000] {
        let raw = wide_tree(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &raw, |b, raw| {
            b.iter(|| {
                let tree = ProductTree::new(raw.clone());
                black_box(tree.products().map(<[_]>::len))
            });
        });
    }
    group.finish();
}

fn bench_resolve_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_deep");
    for depth in [16, 128, 1_000] {
        let raw = deep_tree(depth);
        let config = ResolverConfig::new(depth + 1);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &raw, |b, raw| {
            b.iter(|| {
                let tree = ProductTree::with_config(raw.clone(), config);
                black_box(tree.branches().map(<[_]>::len))
            });
        });
    }
    group.finish();
}

fn bench_parse_document(c: &mut Criterion) {
    let xml = wide_xml(2_000);
    c.bench_function("parse_document_2000_products", |b| {
        b.iter(|| black_box(parse_document_str(black_box(&xml)).map(|doc| doc.vulnerability_count())));
    });
}

criterion_group!(
    benches,
    bench_resolve_wide,
    bench_resolve_deep,
    bench_parse_document
);
criterion_main!(benches);
