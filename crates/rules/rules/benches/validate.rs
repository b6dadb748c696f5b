use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rulebook_core::Table;
use rulebook_rules::{CandidateRow, RuleEngine, RuleExpression, RuleSet, evaluate};

fn rule_table(codes: usize, alternatives: usize) -> Table {
    let header = ["BIILING_CODE", "Currency", "Country", "Status", "Channel"];
    let mut rows = Vec::with_capacity(codes * alternatives);
    for code in 0..codes {
        for alt in 0..alternatives {
            rows.push(vec![
                format!("B{code}"),
                "USD,EUR,GBP".to_owned(),
                format!("<>(X{alt},Y{alt})"),
                "Not Used".to_owned(),
                format!("C{alt}"),
            ]);
        }
    }
    Table::new(rulebook_core::Header::new(header), rows)
}

fn bench_evaluate(c: &mut Criterion) {
    c.bench_function("evaluate_raw_exclusion", |b| {
        b.iter(|| evaluate(black_box("<>(a,b,c,d,e)"), black_box("z")));
    });

    let parsed = RuleExpression::parse("<>(a,b,c,d,e)").unwrap();
    c.bench_function("accepts_parsed_exclusion", |b| {
        b.iter(|| parsed.accepts(black_box("z")));
    });
}

fn bench_validate(c: &mut Criterion) {
    let table = rule_table(500, 8);
    c.bench_function("build_rule_set_4000_rows", |b| {
        b.iter(|| RuleSet::build(black_box(&table), "BIILING_CODE"));
    });

    let engine = RuleEngine::new(RuleSet::build(&table, "BIILING_CODE").unwrap());
    let last_alternative = CandidateRow::new("B250")
        .with_value("Currency", "eur")
        .with_value("Country", "DE")
        .with_value("Status", "open")
        .with_value("Channel", "C7");
    c.bench_function("validate_last_alternative", |b| {
        b.iter(|| engine.validate(black_box(&last_alternative)));
    });

    let no_match = last_alternative.clone().with_value("Channel", "none");
    c.bench_function("validate_no_match", |b| {
        b.iter(|| engine.validate(black_box(&no_match)));
    });
}

criterion_group!(benches, bench_evaluate, bench_validate);
criterion_main!(benches);
