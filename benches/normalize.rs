use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cupweather::{clean_team_name, normalize_city, parse_match_datetime};

const LABELS: &[&str] = &[
    "Montevideo ",
    "Rio De Janeiro ",
    "Mexico City ",
    "Nuremberg / Nürnberg ",
    "rn\">Bordeaux ",
    "Düsseldorf ",
    "Zaragoza / Saragossa ",
    "São Paulo ",
];

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_city", |b| {
        b.iter(|| {
            for label in LABELS {
                black_box(normalize_city(black_box(label)));
            }
        })
    });
    c.bench_function("clean_team_name", |b| {
        b.iter(|| clean_team_name(black_box("rn\">Bosnia and Herzegovina")))
    });
    c.bench_function("parse_match_datetime", |b| {
        b.iter(|| parse_match_datetime(black_box("13 Jul 1930 - 15:00 ")))
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
