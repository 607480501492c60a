use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use driverwatch::extract;
use driverwatch::record::DriverRecord;
use driverwatch::store::diff;

const URL: &str = "https://support.example.com/drivers";

/// Listings of `len` drivers, all released on consecutive days.
fn listing(len: usize) -> Vec<DriverRecord> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..len)
        .map(|i| DriverRecord {
            name: format!("Driver {i}"),
            version: format!("1.{i}"),
            updated_at: start + Duration::days(i as i64),
        })
        .collect()
}

fn markup(len: usize) -> String {
    let rows: String = (0..len)
        .map(|i| {
            format!(
                "<tr><td>Driver {i} バージョン:1.{i}</td><td>Windows 11</td><td>64bit</td><td>2023/{}/{}</td></tr>",
                i % 12 + 1,
                i % 28 + 1
            )
        })
        .collect();
    format!("<html><body><div id=\"Download\"><table><tbody>{rows}</tbody></table></div></body></html>")
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");

    for len in [10, 100, 1_000] {
        let previous = listing(len);

        let mut updated = previous.clone();
        for record in updated.iter_mut().step_by(3) {
            record.updated_at += Duration::days(30);
        }
        group.bench_with_input(BenchmarkId::new("aligned_updates", len), &len, |b, _| {
            b.iter(|| diff::detect(black_box(&updated), Some(black_box(previous.as_slice())), URL))
        });

        let mut grown = previous.clone();
        grown.extend(listing(len / 10 + 1).into_iter().map(|mut r| {
            r.name.push_str(" (new)");
            r
        }));
        group.bench_with_input(BenchmarkId::new("growth", len), &len, |b, _| {
            b.iter(|| diff::detect(black_box(&grown), Some(black_box(previous.as_slice())), URL))
        });
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    group.sample_size(20);

    for len in [10, 200] {
        let page = markup(len);
        group.bench_with_input(BenchmarkId::new("drivers", len), &page, |b, page| {
            b.iter(|| extract::extract_drivers(black_box(page), "Windows 11"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detect, bench_extract);
criterion_main!(benches);
