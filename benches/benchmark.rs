use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use datashape::caster::{EnumCaster, ListCaster, ObjectCaster};
use datashape::datatype::EnumDef;
use datashape::descriptor::{FieldDescriptor, Shape, TypeDescriptor};
use serde_json::json;

struct Line;
impl Shape for Line {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("Line")
            .field(FieldDescriptor::new("sku"))
            .field(FieldDescriptor::new("quantity").default_value(1))
            .strict()
    }
}

struct Order;
impl Shape for Order {
    fn describe() -> TypeDescriptor {
        let state = Arc::new(EnumDef::new("State").backed("Open", "open").backed("Closed", "closed"));
        TypeDescriptor::new("Order")
            .field(FieldDescriptor::new("id"))
            .field(FieldDescriptor::new("customer_name").source_alias("customer.name"))
            .field(FieldDescriptor::new("state").cast_with(EnumCaster::new(&state)))
            .field(FieldDescriptor::new("lines").cast_with(ListCaster::of(ObjectCaster::of::<Line>())))
            .field(FieldDescriptor::new("note").nullable().output_alias("comment"))
            .strict()
    }
}

fn payload() -> serde_json::Value {
    let lines: Vec<_> = (0..20).map(|i| json!({"sku": format!("SKU-{i}"), "quantity": i})).collect();
    json!({"id": 42, "customer": {"name": "Ada"}, "state": "open", "lines": lines})
}

fn construction(c: &mut Criterion) {
    let input = payload();
    c.bench_function("construct order", |b| {
        b.iter(|| Order::construct(black_box(input.clone())).unwrap())
    });
    let order = Order::construct(input).unwrap();
    c.bench_function("order to plain data", |b| b.iter(|| black_box(&order).to_plain_data(false)));
    c.bench_function("order view", |b| {
        b.iter(|| black_box(&order).only(["id", "lines"]).to_plain_data(false))
    });
}

criterion_group!(benches, construction);
criterion_main!(benches);
