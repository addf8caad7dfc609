//! 규칙 엔진 벤치마크
//!
//! 내장 카탈로그 매칭 성능과 규칙 수 스케일링을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use logwarden_analyzer::rule::{DetectionRule, RuleEngine, RuleSet};
use logwarden_core::types::Severity;

const BENIGN_LINE: &str =
    r#"192.168.1.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 2326"#;
const ATTACK_LINE: &str =
    "POST /login HTTP/1.1' OR 1=1-- union select password from users; cat /etc/passwd";

fn custom_rule(idx: usize) -> DetectionRule {
    DetectionRule {
        name: format!("bench_rule_{idx}"),
        description: "bench rule".to_owned(),
        severity: Severity::Medium,
        pattern: format!("marker-{idx}-signature"),
        category: "bench".to_owned(),
        tags: vec![],
    }
}

fn bench_analyze_line(c: &mut Criterion) {
    let engine = RuleEngine::new();
    let mut group = c.benchmark_group("analyze_line");

    for (name, line) in [("benign", BENIGN_LINE), ("attack", ATTACK_LINE)] {
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| engine.analyze_line(black_box(line), 1, None));
        });
    }

    group.finish();
}

fn bench_analyze_chunk(c: &mut Criterion) {
    let engine = RuleEngine::new();
    let mut group = c.benchmark_group("analyze_chunk");

    for size in [100usize, 1_000] {
        let lines: Vec<String> = (0..size)
            .map(|i| {
                if i % 10 == 0 {
                    ATTACK_LINE.to_owned()
                } else {
                    BENIGN_LINE.to_owned()
                }
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| engine.analyze_chunk(black_box(lines), 1));
        });
    }

    group.finish();
}

fn bench_rule_count_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_count_scaling");

    for count in [18usize, 100, 500] {
        let mut rules = RuleSet::with_builtin();
        for i in 0..count.saturating_sub(rules.len()) {
            rules
                .add(custom_rule(i))
                .expect("bench rule should be valid");
        }
        let engine = RuleEngine::with_rules(rules);

        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &engine,
            |b, engine| {
                b.iter(|| engine.analyze_line(black_box(ATTACK_LINE), 1, None));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_analyze_line,
    bench_analyze_chunk,
    bench_rule_count_scaling
);
criterion_main!(benches);
