//! Criterion benchmark untuk codec
//!
//! Run dengan: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use image::RgbImage;
use pixelcodec::{Descriptor, ImgHandler, Value};

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive");

    // 1000 x i64 = 8000 byte
    group.throughput(Throughput::Bytes(8000));
    group.bench_function("write_i64_x1000", |b| {
        let mut img = RgbImage::new(64, 64);
        b.iter(|| {
            let mut handler = ImgHandler::new(&mut img);
            for i in 0..1000i64 {
                handler.write_i64(black_box(i)).unwrap();
            }
        });
    });

    group.bench_function("read_i64_x1000", |b| {
        let mut img = RgbImage::new(64, 64);
        {
            let mut handler = ImgHandler::new(&mut img);
            for i in 0..1000i64 {
                handler.write_i64(i).unwrap();
            }
        }
        b.iter(|| {
            let mut reader = ImgHandler::new(&mut img);
            for _ in 0..1000 {
                black_box(reader.read_i64().unwrap());
            }
        });
    });

    group.finish();
}

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("string");

    for len in [16usize, 256, 4096].iter() {
        let text = "é".repeat(*len / 2);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("roundtrip_{}", len), |b| {
            let mut img = RgbImage::new(64, 64);
            b.iter(|| {
                let mut handler = ImgHandler::new(&mut img);
                handler.write_string(black_box(&text)).unwrap();
                let mut reader = ImgHandler::new(&mut img);
                black_box(reader.read_string().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_lists(c: &mut Criterion) {
    let mut group = c.benchmark_group("list");
    let values: Vec<i64> = (0..500).map(|i| i * 7919 - 1_000_000).collect();
    let dynamic = Value::from(values.clone());
    let descriptor = Descriptor::list(Descriptor::I64);

    group.throughput(Throughput::Elements(values.len() as u64));

    group.bench_function("static_500", |b| {
        let mut img = RgbImage::new(50, 50);
        b.iter(|| {
            let mut handler = ImgHandler::new(&mut img);
            handler.write_list(black_box(&values)).unwrap();
            let mut reader = ImgHandler::new(&mut img);
            black_box(reader.read_list::<i64>().unwrap());
        });
    });

    group.bench_function("dynamic_500", |b| {
        let mut img = RgbImage::new(50, 50);
        b.iter(|| {
            let mut handler = ImgHandler::new(&mut img);
            handler.write_value(black_box(&dynamic)).unwrap();
            let mut reader = ImgHandler::new(&mut img);
            black_box(reader.read_value(&descriptor).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_primitives, bench_strings, bench_lists);
criterion_main!(benches);
