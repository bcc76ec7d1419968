use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use forgeprice_core::CatalogRowId;
use forgeprice_pricing::catalog::{CatalogField, CatalogFilter, CatalogRow, distinct, find_row, parse_catalog};

fn synthetic_rows(count: usize) -> Vec<CatalogRow> {
    (1..=count)
        .map(|n| CatalogRow {
            id: CatalogRowId::from_position(n),
            product_group: format!("Group {}", n % 10),
            product_category: format!("Category {}", n % 50),
            printing_sides: if n % 2 == 0 { "Single".into() } else { "Double".into() },
            variables: "None".into(),
            size: format!("{}x{}", 100 + n % 7, 200 + n % 11),
            material: format!("Material {}", n % 13),
            finish: "Gloss".into(),
            tax_rate: 0.2,
            unit_price: 1.0 + (n % 100) as f64,
            unit: if n % 3 == 0 { "sq/m".into() } else { "each".into() },
            ink_cost: 0.0,
            sheet_cost: 0.0,
            lamination_cost: 0.0,
            or_cost: 0.0,
        })
        .collect()
}

fn synthetic_csv(count: usize) -> String {
    let mut text = String::from("Group,Category,Sides,Variables,Size,Material,Finish,Notes,VAT,Price,Unit,Ink,Sheet,Lamination,Other\n");
    for n in 1..=count {
        text.push_str(&format!(
            "Group {},Category {},Single,None,A{},PVC,Gloss,,20%,\"£1,{:03}.00\",each,,,,\n",
            n % 10,
            n % 50,
            n % 6,
            n % 1000
        ));
    }
    text
}

fn bench_find_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_row");
    for size in [100usize, 1_000, 10_000] {
        let rows = synthetic_rows(size);
        let filter = CatalogFilter {
            material: Some("Material 12".into()),
            ..CatalogFilter::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| find_row(black_box(rows), "Group 9", "Category 49", black_box(&filter)))
        });
    }
    group.finish();
}

fn bench_distinct(c: &mut Criterion) {
    let rows = synthetic_rows(10_000);
    c.bench_function("distinct_material_10k", |b| {
        b.iter(|| distinct(CatalogField::Material, black_box(&rows)))
    });
}

fn bench_parse(c: &mut Criterion) {
    let text = synthetic_csv(5_000);
    c.bench_function("parse_catalog_5k", |b| b.iter(|| parse_catalog(black_box(&text))));
}

criterion_group!(benches, bench_find_row, bench_distinct, bench_parse);
criterion_main!(benches);
